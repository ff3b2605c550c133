use {
    super::error::KassaError,
    derive_more::Display,
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

pub(crate) fn check_path_segment(kind: &str, id: &str) -> Result<(), KassaError> {
    if id.is_empty() {
        return Err(KassaError::Validation(format!("{kind} must not be empty")));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(KassaError::Validation(format!(
            "{kind} must be alphanumeric with '-' or '_', got: {id}"
        )));
    }
    Ok(())
}

/// Gateway-assigned payment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Result<Self, KassaError> {
        let id = id.into();
        check_path_segment("PaymentId", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Gateway-assigned refund identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefundId(String);

impl RefundId {
    pub fn new(id: impl Into<String>) -> Result<Self, KassaError> {
        let id = id.into();
        check_path_segment("RefundId", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Deduplicates one logical mutation at the gateway.
///
/// Generate one per operation and reuse it only when retrying that same
/// operation; the gateway replays the first result for a repeated key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotenceKey(String);

impl IdempotenceKey {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wraps a caller-owned key, e.g. one persisted alongside an order.
    pub fn new(key: impl Into<String>) -> Result<Self, KassaError> {
        let key = key.into();
        if key.is_empty() || key.len() > 64 {
            return Err(KassaError::Validation(format!(
                "IdempotenceKey must be 1..=64 chars, got {} chars",
                key.len()
            )));
        }
        if !key.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(KassaError::Validation(
                "IdempotenceKey must be printable ASCII".into(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
