// Group management: `/groups`.

use std::collections::BTreeMap;

use reqwest::Method;
use tracing::debug;

use crate::auth::SessionPolicy;
use crate::client::PiholeClient;
use crate::error::Error;
use crate::models::{ApiResponse, Group, GroupsResponse, decode_map};

impl PiholeClient {
    /// List all groups and rebuild the group snapshot from the response.
    pub async fn list_groups(&self) -> Result<ApiResponse, Error> {
        let url = self.endpoint("/groups")?;
        let resp = self
            .call(SessionPolicy::Validate, Method::GET, url, None)
            .await?;

        let listing: GroupsResponse = decode_map(&resp.data)?;
        let groups: BTreeMap<String, Group> = listing
            .groups
            .into_iter()
            .map(|g| (g.name.clone(), g))
            .collect();

        debug!(count = groups.len(), "groups cached");
        self.snapshots_mut().groups = groups;
        Ok(resp)
    }

    /// Enable a cached group.
    pub async fn group_enable(&self, name: &str) -> Result<ApiResponse, Error> {
        self.set_group_enabled(name, true).await
    }

    /// Disable a cached group.
    pub async fn group_disable(&self, name: &str) -> Result<ApiResponse, Error> {
        self.set_group_enabled(name, false).await
    }

    /// `PUT /groups/{name}` carrying the cached comment over.
    ///
    /// The group must already be cached by [`list_groups`](Self::list_groups);
    /// otherwise no request is sent.
    async fn set_group_enabled(&self, name: &str, enabled: bool) -> Result<ApiResponse, Error> {
        let comment = self
            .snapshots()
            .groups
            .get(name)
            .map(|g| g.comment.clone())
            .ok_or_else(|| Error::UnknownGroup { name: name.into() })?;

        let body = Group {
            name: name.into(),
            comment,
            enabled,
        };
        let body = serde_json::to_value(&body).map_err(|e| Error::UnexpectedBody {
            message: e.to_string(),
        })?;

        let url = self.endpoint_with_segment("/groups", name)?;
        self.call(SessionPolicy::Validate, Method::PUT, url, Some(&body))
            .await
    }
}
