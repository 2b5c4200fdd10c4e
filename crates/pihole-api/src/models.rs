// Wire models for the Pi-hole v6 API
//
// Every operation hands back the raw `ApiResponse` envelope; the typed
// views below are decoded on demand from the JSON it carries.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A JSON object as returned by the appliance.
pub type JsonMap = serde_json::Map<String, Value>;

/// Uniform result of every client operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub code: u16,
    /// Canonical reason phrase for `code` (empty if unknown).
    pub reason: String,
    /// Parsed body; empty when the appliance sent no content.
    pub data: JsonMap,
}

impl ApiResponse {
    /// Decode the body into a typed view.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        decode_map(&self.data)
    }
}

pub(crate) fn decode_map<T: DeserializeOwned>(data: &JsonMap) -> Result<T, Error> {
    serde_json::from_value(Value::Object(data.clone())).map_err(|e| Error::UnexpectedBody {
        message: e.to_string(),
    })
}

// ── Authentication ───────────────────────────────────────────────────

/// `{"session": {...}}` as returned by `/auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub session: SessionInfo,
}

/// Session state reported by the appliance.
///
/// `sid` is `null` on appliances without a password.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub totp: bool,
    /// Remaining validity in seconds (-1 when sessions never expire).
    #[serde(default)]
    pub validity: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Statistics ───────────────────────────────────────────────────────

/// Typed view over `/stats/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub queries: QueryStats,
    #[serde(default)]
    pub clients: ClientStats,
    #[serde(default)]
    pub gravity: GravityStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryStats {
    pub total: u64,
    pub blocked: u64,
    pub percent_blocked: f64,
    pub unique_domains: u64,
    pub forwarded: u64,
    pub cached: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientStats {
    pub active: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityStats {
    pub domains_being_blocked: u64,
    pub last_update: Option<i64>,
}

// ── Blocking ─────────────────────────────────────────────────────────

/// Typed view over `/dns/blocking`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockingStatus {
    /// `"enabled"`, `"disabled"`, `"failed"` or `"unknown"`.
    #[serde(default)]
    pub blocking: String,
    /// Seconds until the current state flips back, if a timer is running.
    #[serde(default)]
    pub timer: Option<f64>,
}

impl BlockingStatus {
    pub fn is_enabled(&self) -> bool {
        self.blocking == "enabled"
    }
}

/// Body of `POST /dns/blocking`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockingRequest {
    pub blocking: bool,
    pub timer: Option<u64>,
}

// ── Groups ───────────────────────────────────────────────────────────

/// A group as cached by the client and sent back on `PUT /groups/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub enabled: bool,
}

/// `{"groups": [...]}`. Extra per-group fields (id, dates) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsResponse {
    pub groups: Vec<Group>,
}
