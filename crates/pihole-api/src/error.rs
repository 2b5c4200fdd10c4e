use thiserror::Error;

/// Top-level error type for the `pihole-api` crate.
///
/// One variant per well-known HTTP failure status, plus the transport and
/// payload failures that can happen before a status is even available.
/// Unmapped statuses surface as [`Error::UnimplementedStatus`] so gaps in
/// the protocol surface stay visible.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP status ─────────────────────────────────────────────────
    /// HTTP 400.
    #[error("The request was unacceptable, often due to a missing required parameter")]
    BadRequest,

    /// HTTP 401.
    #[error("No valid session provided for an endpoint requiring authorization")]
    Unauthorized,

    /// HTTP 402.
    #[error("The parameters were valid but the request failed")]
    RequestFailed,

    /// HTTP 403.
    #[error("The session doesn't have permission to perform the request")]
    Forbidden,

    /// HTTP 404.
    #[error("The requested resource doesn't exist")]
    NotFound,

    /// HTTP 429.
    #[error("Too many requests hit the API too quickly")]
    TooManyRequests,

    /// HTTP 500.
    #[error("The appliance hit an internal server error")]
    ServerError,

    /// HTTP 502.
    #[error("Received an invalid response from an upstream server")]
    BadGateway,

    /// HTTP 503.
    #[error("The appliance is temporarily unavailable")]
    ServiceUnavailable,

    /// HTTP 504.
    #[error("The gateway timed out waiting for an upstream server")]
    GatewayTimeout,

    /// Any status >= 400 without a dedicated variant.
    #[error("Unexpected error: status code {status}")]
    UnimplementedStatus { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS resolution failure, or the request timed out.
    #[error("The Pi-hole appliance seems to be unreachable")]
    ClientConnector(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The body could not be parsed as a JSON object.
    #[error("Invalid content type returned by the API: {message}")]
    ContentType { message: String, body: String },

    /// The body parsed but lacks a field the operation depends on.
    #[error("Unexpected response body: {message}")]
    UnexpectedBody { message: String },

    // ── Usage ───────────────────────────────────────────────────────
    /// A group operation referenced a group missing from the cache.
    #[error("Group '{name}' is unknown -- list groups first")]
    UnknownGroup { name: String },
}

impl Error {
    /// Map a failure status to its error kind. `None` for statuses without
    /// a dedicated variant.
    pub fn from_status(status: u16) -> Option<Self> {
        let err = match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            402 => Self::RequestFailed,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::TooManyRequests,
            500 => Self::ServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => return None,
        };
        Some(err)
    }

    /// The HTTP status this error was raised for, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::RequestFailed => Some(402),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::TooManyRequests => Some(429),
            Self::ServerError => Some(500),
            Self::BadGateway => Some(502),
            Self::ServiceUnavailable => Some(503),
            Self::GatewayTimeout => Some(504),
            Self::UnimplementedStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the session was rejected and the caller should
    /// re-enter credentials.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if retrying on the next poll cycle may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ClientConnector(_)
                | Self::TooManyRequests
                | Self::BadGateway
                | Self::ServiceUnavailable
                | Self::GatewayTimeout
        )
    }

    /// Returns `true` if the underlying transport error was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::ClientConnector(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Classify a response status.
///
/// Statuses below 400 pass. Mapped failure statuses return their kind,
/// anything else >= 400 returns [`Error::UnimplementedStatus`].
pub fn classify(status: u16) -> Result<(), Error> {
    if status < 400 {
        return Ok(());
    }

    Err(Error::from_status(status).unwrap_or(Error::UnimplementedStatus { status }))
}
