// Summary sensors and their stable identifiers
//
// Consumers that expose the summary as individual readings key them by
// `SensorKey`. Older consumers keyed readings by display name; the
// migration helper rewrites those identifiers once.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::models::SummaryStats;

/// One reading derived from `/stats/summary`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorKey {
    AdsBlockedToday,
    AdsPercentageToday,
    ClientsEverSeen,
    DnsQueriesToday,
    DomainsBeingBlocked,
    QueriesCached,
    QueriesForwarded,
    UniqueClients,
    UniqueDomains,
}

impl SensorKey {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::AdsBlockedToday => "Ads Blocked Today",
            Self::AdsPercentageToday => "Ads Percentage Blocked Today",
            Self::ClientsEverSeen => "Seen Clients",
            Self::DnsQueriesToday => "DNS Queries Today",
            Self::DomainsBeingBlocked => "Domains Blocked",
            Self::QueriesCached => "DNS Queries Cached",
            Self::QueriesForwarded => "DNS Queries Forwarded",
            Self::UniqueClients => "DNS Unique Clients",
            Self::UniqueDomains => "DNS Unique Domains",
        }
    }
}

/// A sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    Count(u64),
    Percent(f64),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Percent(p) => write!(f, "{p:.2}%"),
        }
    }
}

impl SummaryStats {
    /// Read one sensor from the summary.
    pub fn value(&self, key: SensorKey) -> SensorValue {
        match key {
            SensorKey::AdsBlockedToday => SensorValue::Count(self.queries.blocked),
            SensorKey::AdsPercentageToday => SensorValue::Percent(self.queries.percent_blocked),
            SensorKey::ClientsEverSeen => SensorValue::Count(self.clients.total),
            SensorKey::DnsQueriesToday => SensorValue::Count(self.queries.total),
            SensorKey::DomainsBeingBlocked => {
                SensorValue::Count(self.gravity.domains_being_blocked)
            }
            SensorKey::QueriesCached => SensorValue::Count(self.queries.cached),
            SensorKey::QueriesForwarded => SensorValue::Count(self.queries.forwarded),
            SensorKey::UniqueClients => SensorValue::Count(self.clients.active),
            SensorKey::UniqueDomains => SensorValue::Count(self.queries.unique_domains),
        }
    }
}

// ── Identifier migration ─────────────────────────────────────────────

/// Display names that used to serve as identifiers, with their stable keys.
const LEGACY_NAMES: &[(&str, &str)] = &[
    ("Core Update Available", "core_update_available"),
    ("Web Update Available", "web_update_available"),
    ("FTL Update Available", "ftl_update_available"),
    ("Status", "status"),
    ("Ads Blocked Today", "ads_blocked_today"),
    ("Ads Percentage Blocked Today", "ads_percentage_today"),
    ("Seen Clients", "clients_ever_seen"),
    ("DNS Queries Today", "dns_queries_today"),
    ("Domains Blocked", "domains_being_blocked"),
    ("DNS Queries Cached", "queries_cached"),
    ("DNS Queries Forwarded", "queries_forwarded"),
    ("DNS Unique Clients", "unique_clients"),
    ("DNS Unique Domains", "unique_domains"),
];

/// Rewrite a `<server>/<Display Name>` identifier to `<server>/<key>`.
///
/// Returns `None` when the identifier needs no migration: it doesn't have
/// exactly two parts, or its name isn't an exact legacy match. Migrated
/// identifiers therefore stay put on a second pass.
pub fn migrate_unique_id(unique_id: &str) -> Option<String> {
    let (server, name) = unique_id.split_once('/')?;
    if name.contains('/') {
        return None;
    }

    LEGACY_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map(|(_, key)| format!("{server}/{key}"))
}
