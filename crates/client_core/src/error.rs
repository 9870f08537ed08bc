use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout.
    #[error("Cannot connect to server. Is the backend running? ({0})")]
    TransportUnavailable(String),
    /// Non-2xx response; `message` is the server's detail verbatim.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },
    #[error("unexpected response from server: {0}")]
    Decode(String),
    #[error("invalid server url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportUnavailable(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::RequestFailed {
                status: status.as_u16(),
                message: format!("HTTP {}", status.as_u16()),
            };
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::TransportUnavailable(err.to_string())
    }
}
