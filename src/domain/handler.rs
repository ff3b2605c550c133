use {
    super::{error::KassaError, payment::Payment},
    std::{future::Future, pin::Pin},
};

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), KassaError>> + Send + 'a>>;

/// Called when a notification reports `waiting_for_capture`.
///
/// The gateway redelivers notifications, so implementations must tolerate
/// seeing the same payment id more than once.
pub trait CaptureHandler: Send + Sync {
    fn on_waiting_for_capture<'a>(&'a self, payment: &'a Payment) -> HandlerFuture<'a>;
}

/// Called when a notification reports `succeeded`. Same redelivery caveat.
pub trait SucceedHandler: Send + Sync {
    fn on_succeeded<'a>(&'a self, payment: &'a Payment) -> HandlerFuture<'a>;
}
