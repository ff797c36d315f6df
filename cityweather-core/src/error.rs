use reqwest::StatusCode;

/// Failure of a single weather lookup.
///
/// `Provider` carries a message taken from the service's own error payload
/// (e.g. "city not found") and is safe to show verbatim. Every other
/// variant is unexpected: callers log the cause and show a generic line
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The provider rejected the request and said why.
    #[error("{message}")]
    Provider { message: String },

    /// The request never completed (connection, TLS, body read).
    #[error("request to {provider} failed")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with an error status but no usable message.
    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the provider's documented shape.
    #[error("failed to decode {provider} response")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    /// The message to surface verbatim, if the provider supplied one.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            LookupError::Provider { message } => Some(message),
            _ => None,
        }
    }
}
