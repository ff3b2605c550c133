use {
    crate::{
        adapters::kassa_client::KassaClient,
        domain::{
            gateway::Outcome,
            handler::{CaptureHandler, HandlerFuture, SucceedHandler},
            id::IdempotenceKey,
            payment::{Payment, PaymentConfirmRequest},
        },
    },
    std::sync::Arc,
};

/// Captures the full authorized amount as soon as the payer has paid.
pub struct AutoCapture {
    kassa: Arc<KassaClient>,
}

impl AutoCapture {
    pub fn new(kassa: Arc<KassaClient>) -> Self {
        Self { kassa }
    }
}

impl CaptureHandler for AutoCapture {
    fn on_waiting_for_capture<'a>(&'a self, payment: &'a Payment) -> HandlerFuture<'a> {
        Box::pin(async move {
            // Keyed by payment id so redelivered notifications replay the same capture.
            let key = IdempotenceKey::new(format!("capture-{}", payment.id))?;
            let request = PaymentConfirmRequest::for_amount(payment.amount.clone());

            match self.kassa.payment_confirm(&payment.id, &request, &key).await? {
                Outcome::Ready(captured) => {
                    tracing::info!(payment_id = %captured.id, status = %captured.status, "payment captured");
                }
                Outcome::Processing(p) => {
                    tracing::info!(
                        payment_id = %payment.id,
                        retry_after_ms = p.retry_after,
                        "capture accepted, still processing"
                    );
                }
            }
            Ok(())
        })
    }
}

/// Records successful payments in the log.
pub struct LogSucceeded;

impl SucceedHandler for LogSucceeded {
    fn on_succeeded<'a>(&'a self, payment: &'a Payment) -> HandlerFuture<'a> {
        Box::pin(async move {
            tracing::info!(
                payment_id = %payment.id,
                amount = %payment.amount,
                paid = payment.paid,
                "payment succeeded"
            );
            Ok(())
        })
    }
}
