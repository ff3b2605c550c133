use {
    crate::domain::{
        error::KassaError,
        handler::{CaptureHandler, SucceedHandler},
        id::PaymentId,
        payment::{Payment, PaymentStatus},
    },
    std::sync::Arc,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Captured(PaymentId),
    Succeeded(PaymentId),
    Ignored(PaymentStatus),
}

/// Routes gateway notifications to the host's completion handlers.
///
/// One decode-and-dispatch pass per delivery; nothing is remembered between
/// calls, so redelivered notifications reach the handlers again.
#[derive(Clone)]
pub struct NotificationDispatcher {
    capture: Arc<dyn CaptureHandler>,
    succeed: Arc<dyn SucceedHandler>,
}

impl NotificationDispatcher {
    pub fn new(capture: Arc<dyn CaptureHandler>, succeed: Arc<dyn SucceedHandler>) -> Self {
        Self { capture, succeed }
    }

    /// Decodes a raw notification body as a [`Payment`] and dispatches it.
    pub async fn dispatch_body(&self, body: &[u8]) -> Result<DispatchOutcome, KassaError> {
        let payment: Payment = serde_json::from_slice(body)
            .map_err(|e| KassaError::Validation(format!("notification body: {e}")))?;
        self.dispatch(&payment).await
    }

    pub async fn dispatch(&self, payment: &Payment) -> Result<DispatchOutcome, KassaError> {
        match payment.status {
            PaymentStatus::WaitingForCapture => {
                self.capture
                    .on_waiting_for_capture(payment)
                    .await
                    .map_err(into_handler_error)?;
                Ok(DispatchOutcome::Captured(payment.id.clone()))
            }
            PaymentStatus::Succeeded => {
                self.succeed
                    .on_succeeded(payment)
                    .await
                    .map_err(into_handler_error)?;
                Ok(DispatchOutcome::Succeeded(payment.id.clone()))
            }
            other => {
                tracing::warn!(
                    payment_id = %payment.id,
                    status = %other,
                    "notification status has no handler, ignored"
                );
                Ok(DispatchOutcome::Ignored(other))
            }
        }
    }
}

// Whatever went wrong inside a handler, the delivery itself failed.
fn into_handler_error(err: KassaError) -> KassaError {
    match err {
        KassaError::Handler(_) => err,
        other => KassaError::Handler(other.to_string()),
    }
}
