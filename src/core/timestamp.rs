//! Timestamp parsing shared by the on-disk records.
//!
//! Stamps are written as RFC 3339. Files written by older versions carry
//! naive ISO-8601 stamps in local time, and those must keep loading.

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Accepts RFC 3339, or a naive ISO-8601 stamp taken as local time.
pub fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("Invalid timestamp: {raw}"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Timestamp does not exist in local time: {raw}"))
}

/// `deserialize_with` helper for optional stamps in either accepted format.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
