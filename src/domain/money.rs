use {
    super::error::KassaError,
    derive_more::Display,
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

/// ISO-4217 currencies the gateway settles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Rub,
    Usd,
    Eur,
    Byn,
    Kzt,
    Uah,
    Uzs,
    Gbp,
    Cny,
    Jpy,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rub => "RUB",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Byn => "BYN",
            Self::Kzt => "KZT",
            Self::Uah => "UAH",
            Self::Uzs => "UZS",
            Self::Gbp => "GBP",
            Self::Cny => "CNY",
            Self::Jpy => "JPY",
        }
    }

    /// Digits allowed after the decimal point.
    pub fn minor_units(&self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Currency {
    type Error = KassaError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "RUB" => Ok(Self::Rub),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "BYN" => Ok(Self::Byn),
            "KZT" => Ok(Self::Kzt),
            "UAH" => Ok(Self::Uah),
            "UZS" => Ok(Self::Uzs),
            "GBP" => Ok(Self::Gbp),
            "CNY" => Ok(Self::Cny),
            "JPY" => Ok(Self::Jpy),
            other => Err(KassaError::Validation(format!("unknown currency: {other}"))),
        }
    }
}

/// Decimal-as-string amount, e.g. `{"value": "10.00", "currency": "RUB"}`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[display("{value} {currency}")]
pub struct Amount {
    pub value: String,
    pub currency: Currency,
}

impl Amount {
    pub fn new(value: impl Into<String>, currency: Currency) -> Self {
        Self {
            value: value.into(),
            currency,
        }
    }

    /// Renders `value` with exactly the currency's fractional digits.
    pub fn from_decimal(value: Decimal, currency: Currency) -> Result<Self, KassaError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(KassaError::Validation(format!(
                "amount cannot be negative, got: {value}"
            )));
        }
        let minor = currency.minor_units();
        if value.normalize().scale() > minor {
            return Err(KassaError::Validation(format!(
                "{currency} allows {minor} fractional digits, got: {value}"
            )));
        }
        let mut value = value.normalize();
        value.rescale(minor);
        Ok(Self::new(value.to_string(), currency))
    }

    pub fn decimal(&self) -> Result<Decimal, KassaError> {
        Decimal::from_str(&self.value).map_err(|e| {
            KassaError::Validation(format!("amount is not a decimal: {} ({e})", self.value))
        })
    }

    pub fn validate(&self) -> Result<(), KassaError> {
        let v = self.value.as_str();
        let well_formed = !v.is_empty()
            && !v.starts_with('.')
            && !v.ends_with('.')
            && v.bytes().filter(|&b| b == b'.').count() <= 1
            && v.bytes().all(|b| b.is_ascii_digit() || b == b'.');
        if !well_formed {
            return Err(KassaError::Validation(format!(
                "amount must be a non-negative decimal string, got: {v}"
            )));
        }

        let fraction = v.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
        let minor = self.currency.minor_units() as usize;
        if fraction > minor {
            return Err(KassaError::Validation(format!(
                "{} allows {minor} fractional digits, got: {v}",
                self.currency
            )));
        }

        self.decimal().map(|_| ())
    }
}
