use {
    crate::domain::{
        error::KassaError,
        gateway::{ErrorCode, GatewayError},
    },
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
};

// Newtype so axum's IntoResponse can be implemented for the domain error.
pub struct ApiError(pub KassaError);

impl From<KassaError> for ApiError {
    fn from(err: KassaError) -> Self {
        Self(err)
    }
}

/// Status the relay answers with when the gateway rejected the call.
pub fn gateway_status(err: &GatewayError) -> StatusCode {
    match err.code {
        ErrorCode::InvalidRequest | ErrorCode::NotSupported => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::InternalServerError | ErrorCode::Unknown => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self.0 {
            KassaError::Gateway(err) => {
                // The gateway's own error body is the most useful thing to hand back.
                return (gateway_status(&err), Json(err)).into_response();
            }
            KassaError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            KassaError::Transport(err) => {
                tracing::error!("gateway transport error: {err}");
                let status = if err.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (status, "transport_error", "payment gateway unreachable".to_string())
            }
            KassaError::Serialization(err) => {
                tracing::error!("gateway response did not decode: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "serialization_error",
                    "unexpected payment gateway response".to_string(),
                )
            }
            KassaError::Handler(msg) => {
                tracing::error!("notification handler failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "handler_error",
                    "notification handling failed".to_string(),
                )
            }
            KassaError::Config(msg) => {
                tracing::error!("config error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
