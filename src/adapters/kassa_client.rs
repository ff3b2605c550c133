use {
    super::response::classify,
    crate::domain::{
        error::KassaError,
        gateway::Outcome,
        id::{IdempotenceKey, PaymentId, RefundId, check_path_segment},
        payment::{Payment, PaymentConfirmRequest, PaymentRequest},
        refund::{Refund, RefundRequest},
    },
    reqwest::{Method, header::CONTENT_TYPE},
    serde::{Serialize, de::DeserializeOwned},
    std::{fmt, time::Duration},
};

pub const DEFAULT_API_URL: &str = "https://payment.yandex.net/api/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const IDEMPOTENCE_KEY_HEADER: &str = "Idempotence-Key";

/// Shop identity used for basic auth on every call.
#[derive(Clone)]
pub struct Credentials {
    shop_id: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(shop_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn shop_id(&self) -> &str {
        &self.shop_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("shop_id", &self.shop_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Upper bound for one round trip, connect through body read.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for the payments REST API.
///
/// Holds only immutable credentials, so one instance can be shared across
/// tasks. Every operation is a single round trip with no retries; dropping
/// the returned future abandons the request.
#[derive(Debug, Clone)]
pub struct KassaClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl KassaClient {
    pub fn new(credentials: Credentials, options: ClientOptions) -> Result<Self, KassaError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(name = "create_payment", skip_all, fields(idempotence_key = %key))]
    pub async fn create_payment(
        &self,
        request: &PaymentRequest,
        key: &IdempotenceKey,
    ) -> Result<Outcome<Payment>, KassaError> {
        request.validate()?;
        self.send(Method::POST, "payments", Some(key), Some(request))
            .await
    }

    #[tracing::instrument(name = "payment_info", skip_all, fields(payment_id = %id))]
    pub async fn payment_info(&self, id: &PaymentId) -> Result<Outcome<Payment>, KassaError> {
        check_path_segment("PaymentId", id.as_str())?;
        self.send::<(), _>(Method::GET, &format!("payments/{id}"), None, None)
            .await
    }

    /// Captures a `waiting_for_capture` payment.
    #[tracing::instrument(
        name = "payment_confirm",
        skip_all,
        fields(payment_id = %id, idempotence_key = %key)
    )]
    pub async fn payment_confirm(
        &self,
        id: &PaymentId,
        request: &PaymentConfirmRequest,
        key: &IdempotenceKey,
    ) -> Result<Outcome<Payment>, KassaError> {
        check_path_segment("PaymentId", id.as_str())?;
        request.validate()?;
        self.send(
            Method::POST,
            &format!("payments/{id}/capture"),
            Some(key),
            Some(request),
        )
        .await
    }

    #[tracing::instrument(
        name = "payment_cancel",
        skip_all,
        fields(payment_id = %id, idempotence_key = %key)
    )]
    pub async fn payment_cancel(
        &self,
        id: &PaymentId,
        key: &IdempotenceKey,
    ) -> Result<Outcome<Payment>, KassaError> {
        check_path_segment("PaymentId", id.as_str())?;
        self.send::<(), _>(
            Method::POST,
            &format!("payments/{id}/cancel"),
            Some(key),
            None,
        )
        .await
    }

    #[tracing::instrument(
        name = "create_refund",
        skip_all,
        fields(payment_id = %request.payment_id, idempotence_key = %key)
    )]
    pub async fn create_refund(
        &self,
        request: &RefundRequest,
        key: &IdempotenceKey,
    ) -> Result<Outcome<Refund>, KassaError> {
        request.validate()?;
        self.send(Method::POST, "refunds", Some(key), Some(request))
            .await
    }

    #[tracing::instrument(name = "refund_info", skip_all, fields(refund_id = %id))]
    pub async fn refund_info(&self, id: &RefundId) -> Result<Outcome<Refund>, KassaError> {
        check_path_segment("RefundId", id.as_str())?;
        self.send::<(), _>(Method::GET, &format!("refunds/{id}"), None, None)
            .await
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        key: Option<&IdempotenceKey>,
        body: Option<&B>,
    ) -> Result<Outcome<T>, KassaError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base_url);
        let mut req = self.http.request(method, &url).basic_auth(
            &self.credentials.shop_id,
            Some(&self.credentials.secret_key),
        );

        if let Some(key) = key {
            req = req.header(IDEMPOTENCE_KEY_HEADER, key.as_str());
        }
        if let Some(body) = body {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let outcome = classify(status, &bytes);
        match &outcome {
            Ok(Outcome::Ready(_)) => tracing::info!(status = status.as_u16(), "resource ready"),
            Ok(Outcome::Processing(p)) => tracing::info!(
                status = status.as_u16(),
                retry_after_ms = p.retry_after,
                "gateway still processing"
            ),
            Err(KassaError::Gateway(e)) => tracing::warn!(
                status = status.as_u16(),
                code = %e.code,
                error_id = %e.id,
                parameter = e.parameter.as_deref().unwrap_or(""),
                "gateway rejected request"
            ),
            Err(e) => tracing::error!(status = status.as_u16(), error = %e, "unreadable gateway response"),
        }
        outcome
    }
}
