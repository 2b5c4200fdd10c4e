// pihole-api: Async Rust client for the Pi-hole v6 REST API

pub mod auth;
pub mod blocking;
pub mod client;
pub mod error;
pub mod groups;
pub mod models;
pub mod sensor;
pub mod stats;
pub mod transport;

pub use auth::{redact_session, sid_fingerprint};
pub use blocking::DEFAULT_DISABLE_SECS;
pub use client::{ClientConfig, PiholeClient};
pub use error::{Error, classify};
pub use models::{ApiResponse, BlockingStatus, Group, JsonMap, SessionInfo, SummaryStats};
pub use sensor::{SensorKey, SensorValue, migrate_unique_id};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
