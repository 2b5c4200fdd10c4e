// DNS blocking control: `/dns/blocking`.

use reqwest::Method;

use crate::auth::SessionPolicy;
use crate::client::PiholeClient;
use crate::error::Error;
use crate::models::{ApiResponse, BlockingRequest, BlockingStatus, decode_map};

/// Disable duration used when the caller has no preference.
pub const DEFAULT_DISABLE_SECS: u64 = 120;

impl PiholeClient {
    /// Fetch the current blocking state.
    pub async fn blocking_status(&self) -> Result<ApiResponse, Error> {
        let url = self.endpoint("/dns/blocking")?;
        let resp = self
            .call(SessionPolicy::Validate, Method::GET, url, None)
            .await?;

        self.snapshots_mut().blocking.clone_from(&resp.data);
        Ok(resp)
    }

    /// Enable blocking with no timer.
    pub async fn blocking_enable(&self) -> Result<ApiResponse, Error> {
        self.set_blocking(BlockingRequest {
            blocking: true,
            timer: None,
        })
        .await
    }

    /// Disable blocking for `duration` seconds, or indefinitely with `None`.
    pub async fn blocking_disable(&self, duration: Option<u64>) -> Result<ApiResponse, Error> {
        self.set_blocking(BlockingRequest {
            blocking: false,
            timer: duration,
        })
        .await
    }

    /// Typed view over the cached blocking state.
    pub fn blocking_state(&self) -> Result<BlockingStatus, Error> {
        decode_map(&self.snapshots().blocking)
    }

    async fn set_blocking(&self, request: BlockingRequest) -> Result<ApiResponse, Error> {
        let url = self.endpoint("/dns/blocking")?;
        let body = serde_json::to_value(&request).map_err(|e| Error::UnexpectedBody {
            message: e.to_string(),
        })?;

        let resp = self
            .call(SessionPolicy::Validate, Method::POST, url, Some(&body))
            .await?;

        self.snapshots_mut().blocking.clone_from(&resp.data);
        Ok(resp)
    }
}
