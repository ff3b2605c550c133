use {
    super::{error::KassaError, money::Amount},
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    std::str::FromStr,
};

/// Fiscal receipt data sent to the online cash register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_system_code: Option<i64>,
    /// ITU-T E.164 without the plus, e.g. `79000000000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Delivery state of receipt data to the cash register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptRegistration {
    Pending,
    Succeeded,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub description: String,
    pub quantity: String,
    pub amount: Amount,
    /// VAT rate code, 1 through 6.
    pub vat_code: i32,
}

impl Receipt {
    pub fn for_email(email: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            items,
            tax_system_code: None,
            phone: None,
            email: Some(email.into()),
        }
    }

    pub fn for_phone(phone: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            items,
            tax_system_code: None,
            phone: Some(phone.into()),
            email: None,
        }
    }

    pub fn validate(&self) -> Result<(), KassaError> {
        match (&self.phone, &self.email) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                return Err(KassaError::Validation(
                    "receipt needs exactly one of phone or email".into(),
                ));
            }
        }

        if self.items.is_empty() {
            return Err(KassaError::Validation(
                "receipt must list at least one item".into(),
            ));
        }

        if let Some(code) = self.tax_system_code.filter(|c| !(1..=6).contains(c)) {
            return Err(KassaError::Validation(format!(
                "tax_system_code must be 1..=6, got: {code}"
            )));
        }

        self.items.iter().try_for_each(Item::validate)
    }
}

impl Item {
    pub fn validate(&self) -> Result<(), KassaError> {
        if self.description.is_empty() {
            return Err(KassaError::Validation(
                "receipt item description must not be empty".into(),
            ));
        }

        let quantity = Decimal::from_str(&self.quantity).map_err(|_| {
            KassaError::Validation(format!(
                "receipt item quantity is not a decimal: {}",
                self.quantity
            ))
        })?;
        if quantity <= Decimal::ZERO {
            return Err(KassaError::Validation(format!(
                "receipt item quantity must be positive, got: {quantity}"
            )));
        }

        if !(1..=6).contains(&self.vat_code) {
            return Err(KassaError::Validation(format!(
                "vat_code must be 1..=6, got: {}",
                self.vat_code
            )));
        }

        self.amount.validate()
    }
}
