use {
    super::{
        error::KassaError,
        id::PaymentId,
        money::Amount,
        receipt::{Receipt, ReceiptRegistration},
    },
    chrono::{DateTime, NaiveDate, Utc},
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, fmt, net::IpAddr},
};

/// Free-form key/value pairs echoed back by the gateway.
pub type Metadata = BTreeMap<String, String>;

const METADATA_MAX_KEYS: usize = 16;
const METADATA_MAX_KEY_LEN: usize = 32;
const METADATA_MAX_VALUE_LEN: usize = 512;
const DESCRIPTION_MAX_LEN: usize = 128;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    WaitingForCapture,
    Succeeded,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::WaitingForCapture => "waiting_for_capture",
            Self::Succeeded => "succeeded",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Canceled)
    }

    /// The lifecycle only moves forward:
    /// pending → waiting_for_capture → succeeded, with canceled reachable
    /// from either non-final state.
    pub fn can_transition_to(&self, next: &PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::WaitingForCapture)
                | (Self::Pending, Self::Succeeded)
                | (Self::Pending, Self::Canceled)
                | (Self::WaitingForCapture, Self::Succeeded)
                | (Self::WaitingForCapture, Self::Canceled)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = KassaError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "pending" => Ok(Self::Pending),
            "waiting_for_capture" => Ok(Self::WaitingForCapture),
            "succeeded" => Ok(Self::Succeeded),
            "canceled" => Ok(Self::Canceled),
            other => Err(KassaError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Sberbank,
    BankCard,
    Cash,
    YandexMoney,
    Qiwi,
    Alfabank,
    Webmoney,
    ApplePay,
    MobileBalance,
    Installments,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationType {
    Redirect,
    External,
    Embedded,
    MobileApplication,
    Qr,
    #[serde(other)]
    Other,
}

/// Routes the payment to a specific gateway within the shop account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub gateway_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodData {
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub number: String,
    pub expiry_year: String,
    pub expiry_month: String,
    pub csc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder: Option<String>,
}

// Keeps card numbers and CSC out of logs.
impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self
            .number
            .get(self.number.len().saturating_sub(4)..)
            .unwrap_or("");
        f.debug_struct("Card")
            .field("number", &format_args!("**** {last4}"))
            .field("expiry_year", &self.expiry_year)
            .field("expiry_month", &self.expiry_month)
            .field("csc", &"***")
            .field("cardholder", &self.cardholder)
            .finish()
    }
}

/// How the payer is asked to confirm the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(rename = "type")]
    pub kind: ConfirmationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

impl Confirmation {
    pub fn redirect(return_url: impl Into<String>) -> Self {
        Self {
            kind: ConfirmationType::Redirect,
            enforce: None,
            return_url: Some(return_url.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationResponse {
    #[serde(rename = "type")]
    pub kind: ConfirmationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    /// Where to send the payer to confirm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_url: Option<String>,
}

/// Ticket data for airline sales. Bank-card payments only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    pub passengers: Vec<Passenger>,
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    /// IATA code, e.g. `LED`.
    pub departure_airport: String,
    pub destination_airport: String,
    pub departure_date: NaiveDate,
}

impl Airline {
    /// Creation needs a booking reference.
    pub fn validate_for_create(&self) -> Result<(), KassaError> {
        if self.booking_reference.as_deref().is_none_or(str::is_empty) {
            return Err(KassaError::Validation(
                "airline.booking_reference is required when creating a payment".into(),
            ));
        }
        self.validate_shape()
    }

    /// Capture needs a ticket number.
    pub fn validate_for_capture(&self) -> Result<(), KassaError> {
        if self.ticket_number.as_deref().is_none_or(str::is_empty) {
            return Err(KassaError::Validation(
                "airline.ticket_number is required when capturing a payment".into(),
            ));
        }
        self.validate_shape()
    }

    fn validate_shape(&self) -> Result<(), KassaError> {
        if !(1..=4).contains(&self.passengers.len()) {
            return Err(KassaError::Validation(format!(
                "airline needs 1..=4 passengers, got {}",
                self.passengers.len()
            )));
        }
        if !(1..=4).contains(&self.legs.len()) {
            return Err(KassaError::Validation(format!(
                "airline needs 1..=4 legs, got {}",
                self.legs.len()
            )));
        }
        for leg in &self.legs {
            for code in [&leg.departure_airport, &leg.destination_airport] {
                if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
                    return Err(KassaError::Validation(format!(
                        "airport must be a 3-letter IATA code, got: {code}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The payment method the payer actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    pub id: String,
    #[serde(default)]
    pub saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Recipient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_data: Option<PaymentMethodData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_payment_method: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<Airline>,
}

impl PaymentRequest {
    pub fn new(amount: Amount) -> Self {
        Self {
            amount,
            description: None,
            receipt: None,
            recipient: None,
            payment_token: None,
            payment_method_id: None,
            payment_method_data: None,
            confirmation: None,
            save_payment_method: None,
            capture: None,
            client_ip: None,
            metadata: Metadata::new(),
            airline: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_receipt(mut self, receipt: Receipt) -> Self {
        self.receipt = Some(receipt);
        self
    }

    pub fn with_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = Some(confirmation);
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), KassaError> {
        self.amount.validate()?;
        validate_description(self.description.as_deref())?;

        let sources = [
            self.payment_token.is_some(),
            self.payment_method_id.is_some(),
            self.payment_method_data.is_some(),
        ];
        if sources.iter().filter(|&&set| set).count() > 1 {
            return Err(KassaError::Validation(
                "set at most one of payment_token, payment_method_id, payment_method_data".into(),
            ));
        }

        if let Some(ip) = &self.client_ip {
            ip.parse::<IpAddr>().map_err(|_| {
                KassaError::Validation(format!("client_ip is not an IP address: {ip}"))
            })?;
        }

        let redirect_without_url = self
            .confirmation
            .as_ref()
            .is_some_and(|c| c.kind == ConfirmationType::Redirect && c.return_url.is_none());
        if redirect_without_url {
            return Err(KassaError::Validation(
                "redirect confirmation needs a return_url".into(),
            ));
        }

        if let Some(receipt) = &self.receipt {
            receipt.validate()?;
        }
        if let Some(airline) = &self.airline {
            airline.validate_for_create()?;
        }
        validate_metadata(&self.metadata)
    }
}

/// Body of `POST /payments/{id}/capture`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentConfirmRequest {
    /// Omit to capture the full authorized amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<Airline>,
}

impl PaymentConfirmRequest {
    pub fn for_amount(amount: Amount) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), KassaError> {
        if let Some(amount) = &self.amount {
            amount.validate()?;
        }
        if let Some(receipt) = &self.receipt {
            receipt.validate()?;
        }
        if let Some(airline) = &self.airline {
            airline.validate_for_capture()?;
        }
        Ok(())
    }
}

impl From<&PaymentRequest> for PaymentConfirmRequest {
    fn from(req: &PaymentRequest) -> Self {
        Self {
            amount: Some(req.amount.clone()),
            receipt: req.receipt.clone(),
            airline: req.airline.clone(),
        }
    }
}

/// A payment as reported by the gateway, from the API or a webhook push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub status: PaymentStatus,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Recipient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// After this instant a `waiting_for_capture` payment is canceled automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationResponse>,
    #[serde(default)]
    pub test: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refunded_amount: Option<Amount>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_registration: Option<ReceiptRegistration>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Payment {
    pub fn confirmation_url(&self) -> Option<&str> {
        self.confirmation
            .as_ref()
            .and_then(|c| c.confirmation_url.as_deref())
    }
}

pub(crate) fn validate_description(description: Option<&str>) -> Result<(), KassaError> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX_LEN => Err(KassaError::Validation(
            format!("description exceeds {DESCRIPTION_MAX_LEN} chars"),
        )),
        _ => Ok(()),
    }
}

pub fn validate_metadata(metadata: &Metadata) -> Result<(), KassaError> {
    if metadata.len() > METADATA_MAX_KEYS {
        return Err(KassaError::Validation(format!(
            "metadata allows {METADATA_MAX_KEYS} keys, got {}",
            metadata.len()
        )));
    }
    for (key, value) in metadata {
        if key.chars().count() > METADATA_MAX_KEY_LEN {
            return Err(KassaError::Validation(format!(
                "metadata key exceeds {METADATA_MAX_KEY_LEN} chars: {key}"
            )));
        }
        if value.chars().count() > METADATA_MAX_VALUE_LEN {
            return Err(KassaError::Validation(format!(
                "metadata value for {key} exceeds {METADATA_MAX_VALUE_LEN} chars"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{money::Currency, receipt::Item},
    };

    fn rub(value: &str) -> Amount {
        Amount::new(value, Currency::Rub)
    }

    fn airline() -> Airline {
        Airline {
            booking_reference: Some("IIIKRV".into()),
            ticket_number: Some("12342123413".into()),
            passengers: vec![Passenger {
                first_name: "SERGEI".into(),
                last_name: "IVANOV".into(),
            }],
            legs: vec![Leg {
                departure_airport: "LED".into(),
                destination_airport: "AMS".into(),
                departure_date: NaiveDate::from_ymd_opt(2018, 6, 20).unwrap(),
            }],
        }
    }

    #[test]
    fn minimal_request_serializes_only_what_is_set() {
        let req = PaymentRequest::new(rub("10.00"))
            .with_capture(true)
            .with_confirmation(Confirmation::redirect("https://shop.example/return"));

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "amount": {"value": "10.00", "currency": "RUB"},
                "capture": true,
                "confirmation": {"type": "redirect", "return_url": "https://shop.example/return"}
            })
        );
    }

    #[test]
    fn request_validation() {
        let item = Item {
            description: "Ticket".into(),
            quantity: "1".into(),
            amount: rub("10.00"),
            vat_code: 1,
        };
        let ok = PaymentRequest::new(rub("10.00"))
            .with_receipt(Receipt::for_email("user@example.com", vec![item]))
            .with_metadata("order_id", "72");
        assert!(ok.validate().is_ok());

        let mut two_sources = PaymentRequest::new(rub("10.00"));
        two_sources.payment_token = Some("tok".into());
        two_sources.payment_method_id = Some("pm".into());
        assert!(two_sources.validate().is_err());

        let mut bad_ip = PaymentRequest::new(rub("10.00"));
        bad_ip.client_ip = Some("not-an-ip".into());
        assert!(bad_ip.validate().is_err());

        let redirect_without_url = PaymentRequest::new(rub("10.00")).with_confirmation(Confirmation {
            kind: ConfirmationType::Redirect,
            enforce: None,
            return_url: None,
        });
        assert!(redirect_without_url.validate().is_err());

        let long = PaymentRequest::new(rub("10.00")).with_description("x".repeat(129));
        assert!(long.validate().is_err());
    }

    #[test]
    fn metadata_limits() {
        let mut meta: Metadata = (0..16).map(|i| (format!("k{i}"), "v".into())).collect();
        assert!(validate_metadata(&meta).is_ok());
        meta.insert("k16".into(), "v".into());
        assert!(validate_metadata(&meta).is_err());

        let long_key: Metadata = [("k".repeat(33), "v".to_string())].into();
        assert!(validate_metadata(&long_key).is_err());

        let long_value: Metadata = [("k".to_string(), "v".repeat(513))].into();
        assert!(validate_metadata(&long_value).is_err());
    }

    #[test]
    fn airline_requirements_depend_on_stage() {
        let mut a = airline();
        assert!(a.validate_for_create().is_ok());
        assert!(a.validate_for_capture().is_ok());

        a.ticket_number = None;
        assert!(a.validate_for_create().is_ok());
        assert!(a.validate_for_capture().is_err());

        let mut crowded = airline();
        crowded.passengers = vec![crowded.passengers[0].clone(); 5];
        assert!(crowded.validate_for_create().is_err());

        let mut bad_code = airline();
        bad_code.legs[0].departure_airport = "led".into();
        assert!(bad_code.validate_for_create().is_err());
    }

    #[test]
    fn confirm_request_is_a_subset_of_the_payment_request() {
        let mut req = PaymentRequest::new(rub("10.00")).with_description("dropped");
        req.airline = Some(airline());
        let confirm = PaymentConfirmRequest::from(&req);

        let json = serde_json::to_value(&confirm).unwrap();
        assert_eq!(json["amount"]["value"], "10.00");
        assert!(json.get("description").is_none());
        assert_eq!(json["airline"]["legs"][0]["departure_date"], "2018-06-20");
    }

    #[test]
    fn status_lifecycle_is_linear() {
        use PaymentStatus::*;
        assert!(Pending.can_transition_to(&WaitingForCapture));
        assert!(WaitingForCapture.can_transition_to(&Succeeded));
        assert!(!Succeeded.can_transition_to(&Pending));
        assert!(!Canceled.can_transition_to(&Succeeded));
        assert!(Succeeded.is_final() && Canceled.is_final());
    }

    #[test]
    fn payment_decodes_gateway_shape() {
        let payment: Payment = serde_json::from_value(serde_json::json!({
            "id": "22e12f66-000f-5000-8000-18db351245c7",
            "status": "waiting_for_capture",
            "paid": true,
            "amount": {"value": "2.00", "currency": "RUB"},
            "created_at": "2018-07-18T10:51:18.139Z",
            "expires_at": "2018-07-25T10:52:00.233Z",
            "description": "Заказ №72",
            "metadata": {"order_id": "72"},
            "payment_method": {
                "type": "bank_card",
                "id": "22e12f66-000f-5000-8000-18db351245c7",
                "saved": false
            },
            "confirmation": {
                "type": "redirect",
                "confirmation_url": "https://money.yandex.ru/payments/external/confirmation?orderId=22e12f66"
            },
            "recipient": {"account_id": "100001", "gateway_id": "1000001"},
            "receipt_registration": "pending",
            "test": false
        }))
        .unwrap();

        assert_eq!(payment.status, PaymentStatus::WaitingForCapture);
        assert_eq!(payment.payment_method.unwrap().kind, PaymentMethodType::BankCard);
        assert_eq!(payment.metadata["order_id"], "72");
        assert_eq!(payment.receipt_registration, Some(ReceiptRegistration::Pending));
        assert!(payment.confirmation.is_some());
        assert!(payment.paid);
    }

    #[test]
    fn card_debug_masks_secrets() {
        let card = Card {
            number: "5555555555554477".into(),
            expiry_year: "2030".into(),
            expiry_month: "12".into(),
            csc: "123".into(),
            cardholder: None,
        };
        let printed = format!("{card:?}");
        assert!(printed.contains("**** 4477"));
        assert!(!printed.contains("5555555555554477"));
        assert!(!printed.contains("123\""));
    }
}
