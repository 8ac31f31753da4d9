/// All error types that can occur while setting up or driving Casambi lights.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required configuration key is absent.
    #[error("missing required configuration key {0:?}")]
    MissingConfig(String),

    /// A configuration key is present but holds the wrong type.
    #[error("configuration key {key:?} must be {expected}")]
    InvalidConfig { key: String, expected: String },

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The cloud accepted the connection but rejected the credentials.
    #[error("login required: {0}")]
    LoginRequired(String),

    /// The account is not registered for the network.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A request to the cloud service failed at the transport level.
    #[error("request error: {0}")]
    Request(String),

    /// Session setup did not complete in time.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Any other error raised by the vendor controller.
    #[error("casambi error: {0}")]
    Casambi(String),

    /// A push notification referenced a unit that was never registered.
    #[error("unit {0:?} not registered")]
    UnknownUnit(String),
}

impl Error {
    /// Create a new invalid configuration error
    pub fn invalid_config(key: &str, expected: &str) -> Self {
        Error::InvalidConfig {
            key: key.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create a new request error
    pub fn request(msg: impl Into<String>) -> Self {
        Error::Request(msg.into())
    }

    /// Create a new catch-all vendor error
    pub fn casambi(msg: impl Into<String>) -> Self {
        Error::Casambi(msg.into())
    }

    /// Credential problems: the service answered but refused the account.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Error::LoginRequired(_) | Error::Unauthorized(_))
    }

    /// Transport problems: the service could not be reached in time.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Timeout(_) | Error::Request(_))
    }

    /// Configuration problems: a key is missing or holds the wrong kind of value.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::MissingConfig(_) | Error::InvalidConfig { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
