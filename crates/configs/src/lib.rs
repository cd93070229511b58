use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_SEED_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const DEFAULT_USER_HEADER: &str = "x-skillcrucial-user";
pub const DEFAULT_USER_ID: &str = "ad0b9843-8e27-4a0e-bca9-6b4a57fd1763";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub sockets: SocketsConfig,
    #[serde(default)]
    pub headers: HeadersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Where the users file lives and where it is seeded from.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_seed_url")]
    pub seed_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { users_file: default_users_file(), seed_url: default_seed_url() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_assets_dir")]
    pub dir: String,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { dir: default_assets_dir(), title: default_title() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocketsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_socket_path")]
    pub path: String,
}

impl Default for SocketsConfig {
    fn default() -> Self {
        Self { enabled: false, path: default_socket_path() }
    }
}

/// Identity header attached to every response and exposed through CORS.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadersConfig {
    #[serde(default = "default_user_header")]
    pub user_header: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self { user_header: default_user_header(), user_id: default_user_id() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8090 }
fn default_users_file() -> String { "data/users.json".into() }
fn default_seed_url() -> String { DEFAULT_SEED_URL.into() }
fn default_assets_dir() -> String { "dist/assets".into() }
fn default_title() -> String { "Skillcrucial".into() }
fn default_socket_path() -> String { "/ws".into() }
fn default_user_header() -> String { DEFAULT_USER_HEADER.into() }
fn default_user_id() -> String { DEFAULT_USER_ID.into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

fn env_or(key: &str, fallback: String) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or(fallback)
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl AppConfig {
    /// Build the configuration purely from environment variables.
    pub fn from_env() -> Self {
        let defaults = AppConfig::default();
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.server.port);
        let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(defaults.server.worker_threads);
        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", defaults.server.host),
                port,
                worker_threads,
            },
            storage: StorageConfig {
                users_file: env_or("USERS_FILE", defaults.storage.users_file),
                seed_url: env_or("SEED_URL", defaults.storage.seed_url),
            },
            assets: AssetsConfig {
                dir: env_or("ASSETS_DIR", defaults.assets.dir),
                title: env_or("APP_TITLE", defaults.assets.title),
            },
            sockets: SocketsConfig {
                enabled: env_flag("ENABLE_SOCKETS").unwrap_or(defaults.sockets.enabled),
                path: defaults.sockets.path,
            },
            headers: HeadersConfig {
                user_header: env_or("USER_HEADER", defaults.headers.user_header),
                user_id: env_or("USER_ID", defaults.headers.user_id),
            },
        }
    }

    /// Prefer `config.toml` (or `CONFIG_PATH`); without a file, use the environment.
    /// A file that exists but does not parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = if std::path::Path::new(&config_path()).exists() {
            load_default()?
        } else {
            Self::from_env()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.sockets.validate()?;
        if self.headers.user_header.trim().is_empty() {
            return Err(anyhow!("headers.user_header must not be empty"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.users_file.trim().is_empty() {
            return Err(anyhow!("storage.users_file is empty"));
        }
        let lower = self.seed_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("storage.seed_url must start with http:// or https://"));
        }
        Ok(())
    }
}

impl SocketsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(anyhow!("sockets.path must start with '/'"));
        }
        Ok(())
    }
}
