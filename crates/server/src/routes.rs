pub mod shell;
pub mod socket;
pub mod users;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, StatusCode},
    routing::{delete, get, patch},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use configs::AppConfig;
use service::{realtime::ConnectionRegistry, users::UserRepository};

use crate::openapi::ApiDoc;
use shell::HtmlShell;

/// Request bodies up to 50 MiB are accepted.
pub const BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<dyn UserRepository>,
    pub registry: Arc<ConnectionRegistry>,
    pub shell: Arc<HtmlShell>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserRepository>, registry: Arc<ConnectionRegistry>, title: &str) -> Self {
        Self { users, registry, shell: Arc::new(HtmlShell::new(title)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Unknown API paths and methods: 404 with no body.
async fn api_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn api_router() -> Router<ServerState> {
    Router::new()
        .route(
            "/v1/users",
            get(users::list_users)
                .post(users::create_user)
                .delete(users::delete_all_users)
                .fallback(api_not_found),
        )
        .route("/v1/users/", delete(users::delete_all_users).fallback(api_not_found))
        .route(
            "/v1/users/:user_id",
            patch(users::update_user)
                .delete(users::delete_user)
                .fallback(api_not_found),
        )
        .fallback(api_not_found)
}

/// Build the full application router: users API, shell, static assets and the
/// optional socket channel.
pub fn build_router(state: ServerState, cfg: &AppConfig, cors: CorsLayer) -> anyhow::Result<Router> {
    let user_header = HeaderName::from_bytes(cfg.headers.user_header.as_bytes())?;
    let user_id = HeaderValue::from_str(&cfg.headers.user_id)?;
    let expose = HeaderValue::from_str(&cfg.headers.user_header.to_ascii_uppercase())?;

    let static_files = ServeDir::new(&cfg.assets.dir)
        .append_index_html_on_directories(false)
        .fallback(get(shell::shell).with_state::<()>(state.clone()));

    let mut app = Router::new()
        .route("/", get(shell::shell))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api_router());

    if cfg.sockets.enabled {
        app = app.route(&cfg.sockets.path, get(socket::upgrade));
    }

    let router = app
        .fallback_service(static_files)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(SetResponseHeaderLayer::overriding(user_header, user_id))
        .layer(SetResponseHeaderLayer::if_not_present(header::ACCESS_CONTROL_EXPOSE_HEADERS, expose))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        );
    Ok(router)
}
