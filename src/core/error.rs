use serde::Serialize;
use thiserror::Error;

/// Why a cookie/crumb handshake could not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionFailure {
    /// The cookie endpoint answered without any usable `set-cookie` header.
    #[error("no cookie received from the cookie endpoint")]
    NoCookie,

    /// The crumb endpoint answered with a non-200 status.
    #[error("crumb endpoint rejected the session cookie (status {status})")]
    CrumbRejected {
        /// The HTTP status returned by the crumb endpoint.
        status: u16,
    },

    /// The crumb endpoint answered 200 but the body is not a bare token.
    #[error("crumb endpoint returned a malformed body")]
    CrumbMalformed,

    /// The full-page strategy needs a transport that tolerates large header blocks.
    #[error("transport header tolerance of {limit} bytes is below the {required} bytes the full-page strategy needs")]
    HeadersTooLarge {
        /// The transport's response-header tolerance.
        limit: usize,
        /// The minimum tolerance the strategy requires.
        required: usize,
    },
}

impl AcquisitionFailure {
    /// A stable, machine-readable tag for this failure.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::NoCookie => "no-cookie",
            Self::CrumbRejected { .. } => "crumb-rejected",
            Self::CrumbMalformed => "crumb-malformed",
            Self::HeadersTooLarge { .. } => "headers-too-large",
        }
    }
}

/// The primary error type for all fallible operations in this crate.
///
/// No variant ever carries the session cookie or crumb; URLs are stored with the
/// `crumb` query parameter redacted.
#[derive(Debug, Error)]
pub enum YfError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A custom transport failed to perform the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The cookie/crumb handshake failed.
    #[error("session acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionFailure),

    /// The fundamentals endpoint rejected the session twice in a row.
    #[error("upstream rejected the session after a fresh handshake")]
    AuthExpired,

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error, with credentials redacted.
        url: String,
    },

    /// The response body could not be parsed as the expected structured data.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The upstream answered with an error object in an otherwise valid envelope.
    #[error("upstream error: {0}")]
    Api(String),

    /// The ticker was empty.
    #[error("ticker must be a non-empty string")]
    InvalidTicker,
}

impl YfError {
    /// A stable error code suitable for a wrapping service's error payload.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Transport(_) => "transport_error",
            Self::Url(_) => "invalid_url",
            Self::Acquisition(_) => "session_acquisition_failed",
            Self::AuthExpired => "auth_expired",
            Self::Status { .. } => "upstream_error",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Api(_) => "upstream_api_error",
            Self::InvalidTicker => "invalid_ticker",
        }
    }

    /// The upstream HTTP status behind this error, when one is known.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Acquisition(AcquisitionFailure::CrumbRejected { status }) => Some(*status),
            Self::AuthExpired => Some(401),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the failure happened while establishing a session, before any
    /// fundamentals request was issued.
    #[must_use]
    pub const fn is_acquisition(&self) -> bool {
        matches!(self, Self::Acquisition(_))
    }
}

/// Structured error body for services that wrap this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Stable error code, see [`YfError::code`].
    pub code: &'static str,
    /// Upstream HTTP status, if known.
    pub status: Option<u16>,
    /// The acquisition failure tag, for handshake errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    /// Human-readable message. Never contains credentials.
    pub message: String,
}

impl From<&YfError> for ErrorPayload {
    fn from(err: &YfError) -> Self {
        let reason = match err {
            YfError::Acquisition(f) => Some(f.tag()),
            _ => None,
        };
        Self {
            code: err.code(),
            status: err.upstream_status(),
            reason,
            message: err.to_string(),
        }
    }
}
