// Pi-hole API HTTP client
//
// Owns the session token and the cached endpoint snapshots, builds
// request URLs and runs every call through the same pipeline:
// validate session -> ensure login -> dispatch. Endpoint operations live
// in sibling modules as inherent methods, keeping this one focused on
// transport mechanics.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{SessionPolicy, redact_session, sid_fingerprint};
use crate::error::{Error, classify};
use crate::models::{ApiResponse, Group, JsonMap};
use crate::transport::TransportConfig;

/// Header carrying the session token.
pub(crate) const SID_HEADER: &str = "sid";

/// Immutable client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://pi.hole/api`.
    pub url: Url,
    pub password: SecretString,
    pub transport: TransportConfig,
}

/// Most recent successful body per endpoint.
#[derive(Debug, Default)]
pub(crate) struct Snapshots {
    pub(crate) blocking: JsonMap,
    pub(crate) padd: JsonMap,
    pub(crate) summary: JsonMap,
    pub(crate) groups: BTreeMap<String, Group>,
}

/// Async client for the Pi-hole v6 REST API.
///
/// Holds exactly one session. The token sits behind an async mutex that
/// is held for the whole check-then-login sequence, so concurrent calls
/// on one client never race two logins against each other. Snapshots are
/// overwritten wholesale by each successful call to their endpoint and
/// are never cleared on failure.
pub struct PiholeClient {
    http: reqwest::Client,
    base_url: Url,
    password: SecretString,
    timeout: Duration,
    pub(crate) session: Mutex<Option<SecretString>>,
    snapshots: RwLock<Snapshots>,
}

impl PiholeClient {
    /// Create a client from a [`ClientConfig`].
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Ok(Self::from_parts(
            http,
            config.url.clone(),
            config.password.clone(),
            config.transport.timeout,
        ))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The default request timeout still applies per request.
    pub fn with_client(http: reqwest::Client, base_url: Url, password: SecretString) -> Self {
        Self::from_parts(http, base_url, password, crate::transport::DEFAULT_TIMEOUT)
    }

    fn from_parts(
        http: reqwest::Client,
        base_url: Url,
        password: SecretString,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            password,
            timeout,
            session: Mutex::new(None),
            snapshots: RwLock::new(Snapshots::default()),
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    // ── Session state ────────────────────────────────────────────────

    /// Whether a session token is currently held.
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// The held session token, if any.
    pub async fn session_id(&self) -> Option<SecretString> {
        self.session.lock().await.clone()
    }

    // ── Snapshots ────────────────────────────────────────────────────

    /// Last successful `/stats/summary` body.
    pub fn summary_cache(&self) -> JsonMap {
        self.snapshots().summary.clone()
    }

    /// Last successful `/padd` body.
    pub fn padd_cache(&self) -> JsonMap {
        self.snapshots().padd.clone()
    }

    /// Last successful `/dns/blocking` body.
    pub fn blocking_cache(&self) -> JsonMap {
        self.snapshots().blocking.clone()
    }

    /// Groups from the last successful listing, keyed by name.
    pub fn groups_cache(&self) -> BTreeMap<String, Group> {
        self.snapshots().groups.clone()
    }

    pub(crate) fn snapshots(&self) -> RwLockReadGuard<'_, Snapshots> {
        self.snapshots.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshots_mut(&self) -> RwLockWriteGuard<'_, Snapshots> {
        self.snapshots.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{path}`, e.g. `http://pi.hole/api/stats/summary`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Build `{base}{path}/{segment}` with `segment` percent-encoded.
    pub(crate) fn endpoint_with_segment(&self, path: &str, segment: &str) -> Result<Url, Error> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(segment);
        Ok(url)
    }

    // ── Request pipeline ─────────────────────────────────────────────

    /// Run the full pipeline for one operation.
    pub(crate) async fn call(
        &self,
        policy: SessionPolicy,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<ApiResponse, Error> {
        let sid = self.ensure_session(policy).await?;
        self.dispatch(method, url, body, sid.as_ref()).await
    }

    /// Send one request and classify the outcome.
    ///
    /// Transport failures (including the timeout) become
    /// [`Error::ClientConnector`]. The status is classified before the body
    /// is read; an empty body yields an empty map.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        sid: Option<&SecretString>,
    ) -> Result<ApiResponse, Error> {
        let is_auth_route = url.path().ends_with("/auth");

        debug!(
            sid_hash = sid.map(sid_fingerprint).as_deref().unwrap_or("none"),
            "{method} {url}"
        );

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout);

        if let Some(sid) = sid {
            builder = builder.header(SID_HEADER, sid.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(Error::ClientConnector)?;
        let status = resp.status();

        debug!(status = status.as_u16(), "response received");
        classify(status.as_u16())?;

        let text = resp.text().await.map_err(Error::ClientConnector)?;
        let data = parse_body(&text)?;

        if is_auth_route {
            let redacted = Value::Object(redact_session(&data));
            trace!(body = %redacted, "response body");
        } else {
            trace!(body = %text, "response body");
        }

        Ok(ApiResponse {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            data,
        })
    }
}

/// Parse a response body as a JSON object.
fn parse_body(text: &str) -> Result<JsonMap, Error> {
    if text.trim().is_empty() {
        return Ok(JsonMap::new());
    }

    let preview = || text.chars().take(200).collect::<String>();

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::ContentType {
            message: format!("expected a JSON object, got {}", json_kind(&other)),
            body: preview(),
        }),
        Err(e) => Err(Error::ContentType {
            message: e.to_string(),
            body: preview(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
