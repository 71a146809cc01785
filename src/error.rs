use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::notifier::DeliveryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::MalformedBody(rejection) => rejection.body_text(),
            AppError::Delivery(DeliveryError::NotConfigured) => {
                "Telegram credentials not configured".into()
            }
            AppError::Delivery(e) => {
                tracing::error!(error = %e, "Delivery error");
                "Failed to send to Telegram".into()
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Panics escaping a handler are internal faults, not one of the error kinds above.
pub fn internal_fault(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %reason, "Internal fault while handling request");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let resp = AppError::Validation("Name is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"detail": "Name is required"}));
    }

    #[tokio::test]
    async fn test_missing_credentials_detail() {
        let resp = AppError::from(DeliveryError::NotConfigured).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await["detail"],
            "Telegram credentials not configured"
        );
    }

    #[tokio::test]
    async fn test_rejected_delivery_detail_is_generic() {
        let err = DeliveryError::Rejected {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "Unauthorized".into(),
        };
        let resp = AppError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["detail"], "Failed to send to Telegram");
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_fault() {
        async fn boom() -> &'static str {
            panic!("formatter bug")
        }

        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(internal_fault));

        let resp = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({"detail": "Internal server error"}));
    }
}
