use {super::gateway::GatewayError, thiserror::Error};

#[derive(Debug, Error)]
pub enum KassaError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("gateway: {0}")]
    Gateway(GatewayError),

    #[error("notification handler: {0}")]
    Handler(String),

    #[error("config: {0}")]
    Config(String),
}

impl KassaError {
    /// The structured rejection, if the gateway produced one.
    pub fn as_gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for KassaError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(err)
    }
}
