//! Notice texts for activation and deactivation outcomes

use crate::config::ProductConfig;
use crate::types::ActivationResult;
use chrono::{DateTime, Duration, Utc};

/// Activations left at or below which an upgrade hint is shown
pub const UPGRADE_HINT_THRESHOLD: u32 = 3;

/// Expiry window in which a renewal hint is shown
pub const RENEWAL_HINT_DAYS: i64 = 30;

/// Success message for a valid activation, with at most one hint appended.
pub fn activated(config: &ProductConfig, result: &ActivationResult, now: DateTime<Utc>) -> String {
    let mut message = format!(
        "Your {} license has been activated. You have used {}/{} activations. ",
        config.item_name, result.site_count, result.license_limit
    );

    if let Some(hint) = activation_hint(config, result, now) {
        message.push_str(&hint);
    }
    message.trim_end().to_string()
}

/// Upgrade hint when activations run low, otherwise a renewal hint when expiry is near.
pub fn activation_hint(
    config: &ProductConfig,
    result: &ActivationResult,
    now: DateTime<Utc>,
) -> Option<String> {
    if matches!(result.remaining_activations(), Some(left) if left <= UPGRADE_HINT_THRESHOLD) {
        return Some(format!(
            "Did you know you can upgrade your license? {}",
            config.item_url()
        ));
    }

    let expires = result.expires_at()?;
    if expires < now + Duration::days(RENEWAL_HINT_DAYS) {
        let days_left = result.days_until_expiry(now)?;
        return Some(format!(
            "Your license is expiring in {} days, would you like to extend it? {}",
            days_left,
            config.item_url()
        ));
    }
    None
}

/// Error message for a rejected activation, keyed on the endpoint's `error` field.
pub fn activation_failed(config: &ProductConfig, error: Option<&str>) -> String {
    match error {
        Some("no_activations_left") => format!(
            "You've reached your activation limit. You must upgrade your license to use it on this site: {}",
            config.item_url()
        ),
        Some("expired") => format!(
            "Your license is expired. You must extend your license in order to use it again: {}",
            config.item_url()
        ),
        _ => "Failed to activate your license, your license key seems to be invalid.".to_string(),
    }
}

pub fn deactivated(config: &ProductConfig) -> String {
    format!("Your {} license has been deactivated.", config.item_name)
}

pub fn deactivation_failed(config: &ProductConfig) -> String {
    format!("Failed to deactivate your {} license.", config.item_name)
}

pub fn request_error(detail: &str) -> String {
    format!("Request error: {detail}")
}

pub fn malformed_response(detail: &str) -> String {
    format!("The license server sent a response that could not be read: {detail}")
}

/// Warning shown while the license is not active.
pub fn inactive_license(config: &ProductConfig) -> String {
    format!(
        "Warning! Your {} license is inactive which means you're missing out on updates and support! \
         Enter your license key ({}) or get a license here ({}).",
        config.item_name,
        config.license_page_url,
        config.item_url()
    )
}
