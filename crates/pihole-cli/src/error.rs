//! CLI error types with miette diagnostics.
//!
//! Maps `pihole_api::Error` and `ConfigError` variants into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pihole_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Pi-hole at {url}")]
    #[diagnostic(
        code(pihole::connection_failed),
        help(
            "Check that the appliance is running and the URL points at its API root.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: pihole_api::Error,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(pihole::timeout),
        help("Increase the timeout with --timeout or check the appliance's load.")
    )]
    Timeout {
        url: String,
        #[source]
        source: pihole_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(pihole::auth_failed),
        help(
            "Verify the web interface or app password.\n\
             Set it with --password, PIHOLE_PASSWORD, or: pihole6 config init --store-password"
        )
    )]
    AuthFailed,

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(pihole::no_credentials),
        help(
            "Configure one with: pihole6 config init --password-env <VAR>\n\
             Or set the PIHOLE_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Group '{name}' not found")]
    #[diagnostic(
        code(pihole::group_not_found),
        help("Run: pihole6 groups list to see available groups")
    )]
    GroupNotFound { name: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(pihole::api_error))]
    Api(pihole_api::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pihole::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration error")]
    #[diagnostic(code(pihole::config))]
    Config(#[source] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::GroupNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Api(_) | Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Wrap a client error, using `url` for connection diagnostics.
    pub fn from_api(err: pihole_api::Error, url: &url::Url) -> Self {
        match err {
            pihole_api::Error::ClientConnector(_) if err.is_timeout() => Self::Timeout {
                url: url.to_string(),
                source: err,
            },
            pihole_api::Error::ClientConnector(_) | pihole_api::Error::Tls(_) => {
                Self::ConnectionFailed {
                    url: url.to_string(),
                    source: err,
                }
            }
            pihole_api::Error::Unauthorized => Self::AuthFailed,
            pihole_api::Error::UnknownGroup { name } => Self::GroupNotFound { name },
            other => Self::Api(other),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
