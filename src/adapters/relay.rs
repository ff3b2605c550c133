use {
    crate::{
        AppState,
        adapters::{api_errors::ApiError, kassa_client::IDEMPOTENCE_KEY_HEADER, notification},
        domain::{
            error::KassaError,
            gateway::Outcome,
            id::{IdempotenceKey, PaymentId, RefundId},
            payment::{PaymentConfirmRequest, PaymentRequest},
            refund::RefundRequest,
        },
    },
    axum::{
        Json, Router,
        body::Bytes,
        extract::{DefaultBodyLimit, Query, State, rejection::QueryRejection},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    std::time::Duration,
    tower::ServiceBuilder,
    tower_http::timeout::TimeoutLayer,
};

/// `?ID=<id>` on the query routes.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(rename = "ID")]
    pub id: String,
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/create_payment", post(create_payment))
        .route("/payment_info", get(payment_info))
        .route("/payment_capture", post(payment_capture))
        .route("/payment_cancel", post(payment_cancel))
        .route("/create_refund", post(create_refund))
        .route("/refund_info", get(refund_info))
        .route("/payment_notify", post(notification::payment_notify))
        .layer(
            ServiceBuilder::new()
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::GATEWAY_TIMEOUT,
                    request_timeout,
                ))
                .layer(DefaultBodyLimit::max(64 * 1024)),
        )
        .with_state(state)
}

/// Query rejections answer with the same envelope as every other bad input.
fn id_param(query: Result<Query<IdQuery>, QueryRejection>) -> Result<String, KassaError> {
    query
        .map(|Query(q)| q.id)
        .map_err(|e| KassaError::Validation(format!("query: {}", e.body_text())))
}

fn decode_body<T: DeserializeOwned>(what: &str, body: &[u8]) -> Result<T, KassaError> {
    serde_json::from_slice(body).map_err(|e| KassaError::Validation(format!("{what} body: {e}")))
}

fn outcome_response<T: Serialize>(outcome: Outcome<T>) -> Response {
    match outcome {
        Outcome::Ready(resource) => (StatusCode::OK, Json(resource)).into_response(),
        Outcome::Processing(p) => (StatusCode::ACCEPTED, Json(p)).into_response(),
    }
}

/// Reuses the caller's key so retries through the relay stay deduplicated.
fn idempotence_key(headers: &HeaderMap) -> Result<IdempotenceKey, KassaError> {
    match headers.get(IDEMPOTENCE_KEY_HEADER) {
        Some(value) => {
            let value = value.to_str().map_err(|_| {
                KassaError::Validation(format!("{IDEMPOTENCE_KEY_HEADER} is not ASCII"))
            })?;
            IdempotenceKey::new(value)
        }
        None => Ok(IdempotenceKey::generate()),
    }
}

pub async fn create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: PaymentRequest = decode_body("payment", &body)?;
    let key = idempotence_key(&headers)?;
    let outcome = state.kassa.create_payment(&request, &key).await?;
    Ok(outcome_response(outcome))
}

pub async fn payment_info(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let id = PaymentId::new(id_param(query)?)?;
    let outcome = state.kassa.payment_info(&id).await?;
    Ok(outcome_response(outcome))
}

/// An empty body captures the full authorized amount.
pub async fn payment_capture(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = PaymentId::new(id_param(query)?)?;
    let key = idempotence_key(&headers)?;
    let request = if body.is_empty() {
        PaymentConfirmRequest::default()
    } else {
        decode_body("capture", &body)?
    };
    let outcome = state.kassa.payment_confirm(&id, &request, &key).await?;
    Ok(outcome_response(outcome))
}

pub async fn payment_cancel(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = PaymentId::new(id_param(query)?)?;
    let key = idempotence_key(&headers)?;
    let outcome = state.kassa.payment_cancel(&id, &key).await?;
    Ok(outcome_response(outcome))
}

pub async fn create_refund(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: RefundRequest = decode_body("refund", &body)?;
    let key = idempotence_key(&headers)?;
    let outcome = state.kassa.create_refund(&request, &key).await?;
    Ok(outcome_response(outcome))
}

pub async fn refund_info(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let id = RefundId::new(id_param(query)?)?;
    let outcome = state.kassa.refund_info(&id).await?;
    Ok(outcome_response(outcome))
}
