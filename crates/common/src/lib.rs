use thiserror::Error;

pub mod types;
pub mod utils;
pub mod env;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("parse error: {0}")]
    Parse(String),
}

pub mod seed {
    use super::*;

    /// GET `url` and decode the body as JSON. Non-2xx responses are errors.
    pub async fn fetch_json(url: &str) -> Result<serde_json::Value, CoreError> {
        let resp = reqwest::get(url)
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Status { status: status.as_u16(), url: url.to_string() });
        }
        let json = resp
            .json::<serde_json::Value>()
            .await
            .map_err(|e| CoreError::Parse(e.to_string()))?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use tokio::net::TcpListener;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    async fn spawn_upstream() -> anyhow::Result<String> {
        let app = Router::new()
            .route("/users", get(|| async { Json(serde_json::json!([{"id": 1, "name": "Leanne"}])) }))
            .route("/broken", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route("/text", get(|| async { "not json" }));
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{}", addr))
    }

    #[tokio::test]
    async fn fetch_json_decodes_body() -> anyhow::Result<()> {
        let base = spawn_upstream().await?;
        let json = seed::fetch_json(&format!("{base}/users")).await?;
        assert_eq!(json[0]["name"], "Leanne");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_json_rejects_error_status_and_bad_body() -> anyhow::Result<()> {
        let base = spawn_upstream().await?;
        let err = seed::fetch_json(&format!("{base}/broken")).await.unwrap_err();
        assert!(matches!(err, CoreError::Status { status: 503, .. }));
        let err = seed::fetch_json(&format!("{base}/text")).await.unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
        Ok(())
    }
}
