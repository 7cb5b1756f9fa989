use thiserror::Error;

/// Why a completion call produced no reply. Only ever logged; the user sees
/// one localized message regardless of the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MissingCredential => "missing_credential",
            GatewayError::Network(_) => "network",
            GatewayError::Upstream(_) => "upstream",
            GatewayError::MalformedResponse(_) => "malformed_response",
        }
    }
}
