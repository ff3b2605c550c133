use {
    crate::{AppState, adapters::api_errors::ApiError, services::dispatcher::DispatchOutcome},
    axum::{body::Bytes, extract::State, http::StatusCode},
};

/// Webhook endpoint. Answers with an empty 200 once the matching handler has
/// finished; a handler failure answers 500 so the gateway redelivers.
#[tracing::instrument(name = "payment_notify", skip_all)]
pub async fn payment_notify(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    match state.dispatcher.dispatch_body(&body).await? {
        DispatchOutcome::Captured(id) => {
            tracing::info!(payment_id = %id, "capture handler completed")
        }
        DispatchOutcome::Succeeded(id) => {
            tracing::info!(payment_id = %id, "success handler completed")
        }
        // The dispatcher already logged the unhandled status.
        DispatchOutcome::Ignored(_) => {}
    }
    Ok(StatusCode::OK)
}
