pub mod error;
pub mod gateway;
pub mod handler;
pub mod id;
pub mod money;
pub mod payment;
pub mod receipt;
pub mod refund;
