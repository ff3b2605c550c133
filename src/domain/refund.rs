use {
    super::{
        error::KassaError,
        id::{PaymentId, RefundId},
        money::Amount,
        payment::validate_description,
        receipt::{Receipt, ReceiptRegistration},
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Pending,
    Succeeded,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Canceled)
    }
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of `POST /refunds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub payment_id: PaymentId,
    pub amount: Amount,
    /// Reason for the refund.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
}

impl RefundRequest {
    pub fn new(payment_id: PaymentId, amount: Amount) -> Self {
        Self {
            payment_id,
            amount,
            description: None,
            receipt: None,
        }
    }

    pub fn validate(&self) -> Result<(), KassaError> {
        // Deserialized ids skip the constructor check.
        PaymentId::new(self.payment_id.as_str())?;
        self.amount.validate()?;
        if self.amount.decimal()?.is_zero() {
            return Err(KassaError::Validation(
                "refund amount must be greater than zero".into(),
            ));
        }
        validate_description(self.description.as_deref())?;
        if let Some(receipt) = &self.receipt {
            receipt.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: RefundId,
    pub payment_id: PaymentId,
    pub status: RefundStatus,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_registration: Option<ReceiptRegistration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
