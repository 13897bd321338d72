use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod config;
use config::Config;

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Basic server information plus whether a build is present
async fn stats(State(config): State<Arc<Config>>) -> impl IntoResponse {
    let site = PathBuf::from(&config.site_directory);
    let stats = serde_json::json!({
        "status": "running",
        "service": "confmap-server",
        "version": env!("CARGO_PKG_VERSION"),
        "site_directory": config.site_directory,
        "has_index": site.join("index.html").exists(),
    });
    (StatusCode::OK, Json(stats))
}

fn build_router(config: Arc<Config>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(stats))
        // Everything else comes from the generated site
        .fallback_service(
            ServeDir::new(&config.site_directory)
                .precompressed_br()
                .precompressed_gzip(),
        )
        .with_state(config.clone());

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    // Load configuration
    let config = Arc::new(Config::load("server.toml")?);
    info!("Loaded configuration: {:?}", config);

    // Validate site directory exists
    let site_path = PathBuf::from(&config.site_directory);
    if !site_path.exists() {
        error!("Site directory does not exist: {}", config.site_directory);
        anyhow::bail!("Site directory not found: {} (run confmap-builder first)", config.site_directory);
    }
    info!("Serving site from: {}", site_path.display());

    let addr = config.socket_addr();
    let app = build_router(config);

    info!("Starting site server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn router(dir: &TempDir) -> Router {
        std::fs::write(dir.path().join("index.html"), "<h1>React Conferences</h1>").unwrap();
        build_router(Arc::new(Config {
            site_directory: dir.path().to_string_lossy().to_string(),
            ..Config::default()
        }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(router(&dir), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_serves_index_at_root() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(router(&dir), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("React Conferences"));
    }

    #[tokio::test]
    async fn test_stats_reports_index() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(router(&dir), "/stats").await;
        assert_eq!(status, StatusCode::OK);
        let stats: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(stats["service"], "confmap-server");
        assert_eq!(stats["has_index"], true);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = TempDir::new().unwrap();
        let (status, _) = get(router(&dir), "/nope.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
