// Session authentication
//
// Password login against `/auth`, the validity probe, logout, and the
// pre-flight sequence every other operation runs before dispatching.
// Session tokens never reach the logs in cleartext: only their SHA-256
// fingerprint, and login bodies are redacted before tracing.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::client::PiholeClient;
use crate::error::Error;
use crate::models::{ApiResponse, AuthResponse, JsonMap, decode_map};

const AUTH_PATH: &str = "/auth";
const REDACTED: &str = "[redacted]";

/// Which pre-flight steps an operation runs before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionPolicy {
    /// Login itself: no probe, no implicit login, no token sent.
    Skip,
    /// The status probe: no probe of its own, but log in if no token is held.
    EnsureLogin,
    /// Everything else: probe a held token, then log in if none remains.
    Validate,
}

/// Hex SHA-256 of a session token, safe to log.
pub fn sid_fingerprint(sid: &SecretString) -> String {
    format!("{:x}", Sha256::digest(sid.expose_secret().as_bytes()))
}

/// Copy of an `/auth` body with `session.sid` replaced by a placeholder.
pub fn redact_session(data: &JsonMap) -> JsonMap {
    let mut copy = data.clone();
    if let Some(Value::Object(session)) = copy.get_mut("session") {
        if let Some(sid) = session.get_mut("sid") {
            if !sid.is_null() {
                *sid = Value::String(REDACTED.into());
            }
        }
    }
    copy
}

impl PiholeClient {
    /// Probe whether the held session is still valid (`GET /auth`).
    ///
    /// Does not validate the session beforehand, but logs in first when no
    /// token is held.
    pub async fn authentication_status(&self) -> Result<ApiResponse, Error> {
        let url = self.endpoint(AUTH_PATH)?;
        self.call(SessionPolicy::EnsureLogin, Method::GET, url, None)
            .await
    }

    /// Log in with the configured password (`POST /auth`).
    ///
    /// On success the returned `session.sid` becomes the held token; a
    /// failed login leaves the previous token untouched.
    pub async fn login(&self) -> Result<ApiResponse, Error> {
        let mut session = self.session.lock().await;
        let (resp, sid) = self.request_login().await?;
        *session = sid;
        Ok(resp)
    }

    /// End the session (`DELETE /auth`) and drop the held token.
    pub async fn logout(&self) -> Result<ApiResponse, Error> {
        let url = self.endpoint(AUTH_PATH)?;
        let resp = self
            .call(SessionPolicy::Validate, Method::DELETE, url, None)
            .await?;

        *self.session.lock().await = None;
        debug!("logged out");
        Ok(resp)
    }

    // ── Pre-flight ───────────────────────────────────────────────────

    /// Validate the held token and log in when none remains.
    ///
    /// Returns the token to attach to the next request. The session lock is
    /// held across probe and login.
    pub(crate) async fn ensure_session(
        &self,
        policy: SessionPolicy,
    ) -> Result<Option<SecretString>, Error> {
        if policy == SessionPolicy::Skip {
            return Ok(None);
        }

        let mut session = self.session.lock().await;

        if policy == SessionPolicy::Validate {
            let stale = match session.as_ref() {
                Some(sid) => !self.probe(sid).await?,
                None => false,
            };
            if stale {
                debug!("session no longer valid, dropping it");
                *session = None;
            }
        }

        if session.is_none() {
            let (_, sid) = self.request_login().await?;
            *session = sid;
        }

        Ok(session.clone())
    }

    /// Ask the appliance whether `sid` is still valid.
    ///
    /// A 401 means invalid. Any other failure propagates.
    async fn probe(&self, sid: &SecretString) -> Result<bool, Error> {
        let url = self.endpoint(AUTH_PATH)?;

        match self.dispatch(Method::GET, url, None, Some(sid)).await {
            Ok(resp) => {
                let valid = resp.code == 200
                    && resp
                        .data
                        .get("session")
                        .and_then(|s| s.get("valid"))
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                Ok(valid)
            }
            Err(Error::Unauthorized) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Send the password and extract the issued token without storing it.
    async fn request_login(&self) -> Result<(ApiResponse, Option<SecretString>), Error> {
        let url = self.endpoint(AUTH_PATH)?;
        let body = json!({ "password": self.password().expose_secret() });

        debug!("logging in at {}", url);

        let resp = self.dispatch(Method::POST, url, Some(&body), None).await?;
        let auth: AuthResponse = decode_map(&resp.data)?;

        let sid = auth.session.sid.map(SecretString::from);
        match sid.as_ref() {
            Some(sid) => debug!(sid_hash = %sid_fingerprint(sid), "login successful"),
            None => debug!("login successful, appliance issued no session id"),
        }

        Ok((resp, sid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_body() -> JsonMap {
        match json!({
            "session": {"valid": true, "totp": false, "sid": "s3cr3t-token", "validity": 1800},
            "took": 0.02
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn redaction_hides_the_token() {
        let redacted = redact_session(&login_body());
        let rendered = Value::Object(redacted.clone()).to_string();

        assert!(!rendered.contains("s3cr3t-token"));
        assert_eq!(redacted["session"]["sid"], json!("[redacted]"));
        assert_eq!(redacted["session"]["validity"], json!(1800));
    }

    #[test]
    fn redaction_leaves_original_alone() {
        let body = login_body();
        let _ = redact_session(&body);
        assert_eq!(body["session"]["sid"], json!("s3cr3t-token"));
    }

    #[test]
    fn redaction_keeps_null_sid() {
        let body = match json!({"session": {"valid": true, "sid": null}}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        assert_eq!(redact_session(&body)["session"]["sid"], Value::Null);
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        let sid = SecretString::from("abc".to_string());
        let hash = sid_fingerprint(&sid);

        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(!hash.contains("abc"));
    }
}
