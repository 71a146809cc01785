use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use anyhow::Context;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod config;
mod error;
mod handlers;
mod models;
mod services;

use config::Config;
use services::notifier::TelegramNotifier;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Arc<TelegramNotifier>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let notifier = TelegramNotifier::new(config.telegram.clone())
            .context("Failed to build Telegram HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            notifier: Arc::new(notifier),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mood_logger_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;
    if !config.telegram.is_configured() {
        tracing::warn!("BOT_TOKEN or CHAT_ID not set, mood deliveries will fail");
    }

    let addr = config.listen_addr();
    let app = router(AppState::new(config)?);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/mood", post(handlers::mood::submit_mood))
        .layer(CatchPanicLayer::custom(error::internal_fault))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origins) = &config.cors_allowed_origins else {
        // Open to every origin until CORS_ALLOWED_ORIGINS pins the frontend.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::services::notifier::TelegramConfig;

    fn config_with_origins(origins: Option<Vec<String>>) -> Config {
        Config {
            host: "0.0.0.0".into(),
            port: 8000,
            cors_allowed_origins: origins,
            telegram: TelegramConfig {
                bot_token: None,
                chat_id: None,
                api_base: "http://127.0.0.1:9".into(),
                timeout: Duration::from_secs(1),
            },
        }
    }

    #[test]
    fn test_listen_addr() {
        assert_eq!(config_with_origins(None).listen_addr(), "0.0.0.0:8000");
    }

    #[tokio::test]
    async fn test_cors_allow_list_echoes_listed_origin_only() {
        let config = config_with_origins(Some(vec!["https://moods.example.com".into()]));
        let app = router(AppState::new(config).unwrap());

        let listed = app
            .clone()
            .oneshot(
                Request::get("/")
                    .header(header::ORIGIN, "https://moods.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            listed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://moods.example.com"
        );

        let other = app
            .oneshot(
                Request::get("/")
                    .header(header::ORIGIN, "https://elsewhere.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(other.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
