//! Core types: license status, the persisted record and the remote activation result

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const SECS_PER_DAY: f64 = 86_400.0;

/// License status as reported by the licensing endpoint.
///
/// Serialized as the endpoint's lowercase wire string; the empty string is `Unset`.
/// Values the client has no variant for are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LicenseStatus {
    #[default]
    Unset,
    Valid,
    Invalid,
    Expired,
    Deactivated,
    SiteInactive,
    Other(String),
}

impl LicenseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LicenseStatus::Unset => "",
            LicenseStatus::Valid => "valid",
            LicenseStatus::Invalid => "invalid",
            LicenseStatus::Expired => "expired",
            LicenseStatus::Deactivated => "deactivated",
            LicenseStatus::SiteInactive => "site_inactive",
            LicenseStatus::Other(s) => s,
        }
    }
}

impl From<&str> for LicenseStatus {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" => LicenseStatus::Unset,
            "valid" => LicenseStatus::Valid,
            "invalid" => LicenseStatus::Invalid,
            "expired" => LicenseStatus::Expired,
            "deactivated" => LicenseStatus::Deactivated,
            "site_inactive" => LicenseStatus::SiteInactive,
            other => LicenseStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for LicenseStatus {
    fn from(value: String) -> Self {
        LicenseStatus::from(value.as_str())
    }
}

impl From<LicenseStatus> for String {
    fn from(status: LicenseStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseStatus::Unset => write!(f, "unset"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// The persisted license option bundle (`<prefix>license`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub status: LicenseStatus,
}

/// Decoded body of an `activate_license` / `deactivate_license` call.
///
/// Only `license` is required; counters tolerate numeric strings and
/// anything unreadable counts as zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivationResult {
    pub license: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub site_count: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub license_limit: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expires: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
}

impl ActivationResult {
    pub fn is_valid(&self) -> bool {
        self.license == "valid"
    }

    /// Activations left, or `None` when the license is unlimited (limit 0).
    pub fn remaining_activations(&self) -> Option<u32> {
        if self.license_limit == 0 {
            None
        } else {
            Some(self.license_limit.saturating_sub(self.site_count))
        }
    }

    /// Parsed expiry; `None` for lifetime licenses or unrecognised dates.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires.as_deref().and_then(parse_expiry)
    }

    /// Whole days until expiry, rounded to the nearest day.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        let expires = self.expires_at()?;
        let secs = (expires - now).num_seconds() as f64;
        Some((secs / SECS_PER_DAY).round() as i64)
    }
}

/// Parses the expiry formats the endpoint is known to send.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("lifetime") {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}
