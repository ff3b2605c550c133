use {
    crate::domain::{
        error::KassaError,
        gateway::{GatewayError, Outcome, Processing},
    },
    reqwest::StatusCode,
    serde::de::DeserializeOwned,
};

/// Maps one gateway response onto the three possible shapes.
///
/// 200 carries the resource, 202 means "accepted, poll after `retry_after`",
/// anything else carries a [`GatewayError`]. A body that doesn't match the
/// shape its status promises is a [`KassaError::Serialization`].
pub fn classify<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<Outcome<T>, KassaError> {
    match status {
        StatusCode::OK => Ok(Outcome::Ready(serde_json::from_slice(body)?)),
        StatusCode::ACCEPTED => {
            let processing: Processing = serde_json::from_slice(body)?;
            Ok(Outcome::Processing(processing))
        }
        _ => {
            let err: GatewayError = serde_json::from_slice(body)?;
            Err(KassaError::Gateway(err))
        }
    }
}
