pub mod api_errors;
pub mod kassa_client;
pub mod notification;
pub mod relay;
pub mod response;
