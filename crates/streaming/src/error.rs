use scene::ValidationError;

use crate::request::Request;

/// Coarse classification surfaced to the user as a notice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Server,
    Decode,
    Superseded,
    SessionRequired,
    Invalid,
}

/// Error type for backend operations.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response.
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Non-2xx response; `message` is the body's `error` field if present.
    Server { status: u16, message: Option<String> },
    /// The response body did not fit the data model.
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// A newer request was issued before this response arrived.
    Superseded(Request),
    /// The operation needs a signed-in user.
    SessionRequired,
    /// Rejected client-side before any request was sent.
    Invalid(ValidationError),
}

/// Failure of a place refresh.
pub type FetchError = ApiError;

impl ApiError {
    pub fn network(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn decode(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            ApiError::Network { .. } => FetchErrorKind::Network,
            ApiError::Server { .. } => FetchErrorKind::Server,
            ApiError::Decode { .. } => FetchErrorKind::Decode,
            ApiError::Superseded(_) => FetchErrorKind::Superseded,
            ApiError::SessionRequired => FetchErrorKind::SessionRequired,
            ApiError::Invalid(_) => FetchErrorKind::Invalid,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network { message, .. } => write!(f, "network error: {message}"),
            ApiError::Server {
                status,
                message: Some(message),
            } => write!(f, "server error {status}: {message}"),
            ApiError::Server {
                status,
                message: None,
            } => write!(f, "server error {status}"),
            ApiError::Decode { message, .. } => write!(f, "malformed response: {message}"),
            ApiError::Superseded(Request(n)) => write!(f, "response to request {n} superseded"),
            ApiError::SessionRequired => write!(f, "please log in first"),
            ApiError::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network { source, .. } | ApiError::Decode { source, .. } => {
                source.as_ref().map(|e| e.as_ref() as _)
            }
            ApiError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Invalid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, FetchErrorKind};
    use crate::request::Request;
    use scene::ValidationError;

    #[test]
    fn display_includes_server_message() {
        let e = ApiError::Server {
            status: 400,
            message: Some("Rating required".into()),
        };
        assert_eq!(e.to_string(), "server error 400: Rating required");
        assert_eq!(e.kind(), FetchErrorKind::Server);

        let e = ApiError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(e.to_string(), "server error 502");
    }

    #[test]
    fn kinds_map_variants() {
        assert_eq!(ApiError::Superseded(Request(3)).kind(), FetchErrorKind::Superseded);
        assert_eq!(
            ApiError::from(ValidationError::RatingOutOfRange(0)).kind(),
            FetchErrorKind::Invalid
        );
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e = ApiError::network("GET /places", io);
        assert_eq!(e.kind(), FetchErrorKind::Network);
        assert!(std::error::Error::source(&e).is_some());
    }
}
