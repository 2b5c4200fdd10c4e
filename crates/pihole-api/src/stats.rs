// Statistics endpoints: `/stats/summary` and `/padd`.

use reqwest::Method;

use crate::auth::SessionPolicy;
use crate::client::PiholeClient;
use crate::error::Error;
use crate::models::{ApiResponse, SummaryStats, decode_map};

impl PiholeClient {
    /// Fetch aggregate statistics and replace the summary snapshot.
    pub async fn summary(&self) -> Result<ApiResponse, Error> {
        let url = self.endpoint("/stats/summary")?;
        let resp = self
            .call(SessionPolicy::Validate, Method::GET, url, None)
            .await?;

        self.snapshots_mut().summary.clone_from(&resp.data);
        Ok(resp)
    }

    /// Fetch the dashboard bundle and replace the PADD snapshot.
    ///
    /// `full = false` asks the appliance for the reduced payload.
    pub async fn padd(&self, full: bool) -> Result<ApiResponse, Error> {
        let mut url = self.endpoint("/padd")?;
        url.query_pairs_mut()
            .append_pair("full", if full { "true" } else { "false" });

        let resp = self
            .call(SessionPolicy::Validate, Method::GET, url, None)
            .await?;

        self.snapshots_mut().padd.clone_from(&resp.data);
        Ok(resp)
    }

    /// Typed view over the cached summary.
    pub fn summary_stats(&self) -> Result<SummaryStats, Error> {
        decode_map(&self.snapshots().summary)
    }

    /// One polling pass: summary, blocking status, PADD, then groups.
    ///
    /// Stops at the first failure; snapshots refreshed before it keep
    /// their new values.
    pub async fn refresh(&self) -> Result<(), Error> {
        self.summary().await?;
        self.blocking_status().await?;
        self.padd(true).await?;
        self.list_groups().await?;
        Ok(())
    }
}
