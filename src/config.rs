use {
    crate::{
        adapters::kassa_client::{ClientOptions, Credentials, DEFAULT_API_URL, DEFAULT_TIMEOUT},
        domain::error::KassaError,
    },
    std::time::Duration,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4567";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub api_url: String,
    pub timeout: Duration,
    pub bind_addr: String,
}

impl Config {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, KassaError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, KassaError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| KassaError::Config(format!("{key} must be set")))
        };

        let shop_id = required("KASSA_SHOP_ID")?;
        let secret_key = required("KASSA_SECRET_KEY")?;

        let timeout = match lookup("KASSA_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    KassaError::Config(format!("KASSA_TIMEOUT_SECS must be an integer, got: {raw}"))
                })?;
                if secs == 0 {
                    return Err(KassaError::Config(
                        "KASSA_TIMEOUT_SECS must be greater than zero".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            credentials: Credentials::new(shop_id, secret_key),
            api_url: lookup("KASSA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api_url.clone(),
            timeout: self.timeout,
        }
    }

    /// Relay-side bound: the gateway call plus headroom for the response.
    pub fn request_timeout(&self) -> Duration {
        self.timeout + Duration::from_secs(5)
    }
}
