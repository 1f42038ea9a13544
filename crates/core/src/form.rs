//! License key form: what the settings page shows and which controls are live

use crate::api::LicenseApi;
use crate::manager::LicenseManager;
use crate::nonce::NonceVerifier;
use crate::notice::Notifier;
use crate::store::OptionStore;
use crate::types::LicenseStatus;
use std::fmt;

/// Character used to mask the key. Submitted keys containing it are ignored.
pub const MASK_CHAR: char = '*';

/// Trailing characters left readable when a key is masked
const VISIBLE_TAIL: usize = 4;

/// Keys this short are never masked
const MIN_MASKED_LEN: usize = 5;

/// Replace all but the last four characters with `*`.
pub fn obfuscate_key(key: &str) -> String {
    let len = key.chars().count();
    let hidden = len.saturating_sub(VISIBLE_TAIL);
    key.chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { MASK_CHAR } else { c })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseForm {
    pub key_field: String,
    pub nonce_field: String,
    pub action_field: String,
    pub nonce: String,
    pub visible_key: String,
    pub status: LicenseStatus,
    pub readonly: bool,
    pub activate_enabled: bool,
    pub deactivate_enabled: bool,
    /// Rendered inside another form, so it has no submit button of its own
    pub embedded: bool,
    pub item_name: String,
}

impl LicenseForm {
    pub fn build<S, A, N>(
        manager: &LicenseManager<S, A, N>,
        nonces: &dyn NonceVerifier,
        embedded: bool,
    ) -> Self
    where
        S: OptionStore,
        A: LicenseApi,
        N: Notifier,
    {
        let config = manager.config();
        let key = manager.get_key().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read license key; showing an empty field");
            String::new()
        });
        let valid = manager.is_valid();

        // A key the endpoint just rejected stays unmasked.
        let mask = key.chars().count() > MIN_MASKED_LEN
            && (valid || !manager.remote_activation_failed());
        let visible_key = if mask { obfuscate_key(&key) } else { key };

        let status = manager.get_status().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read license status; showing it as unset");
            LicenseStatus::Unset
        });

        let nonce_field = config.nonce_field();
        Self {
            key_field: config.key_field(),
            nonce: nonces.issue(&nonce_field),
            nonce_field,
            action_field: config.action_field(),
            visible_key,
            status,
            readonly: valid || manager.key_is_pinned(),
            activate_enabled: !valid,
            deactivate_enabled: valid,
            embedded,
            item_name: config.item_name.clone(),
        }
    }
}

impl fmt::Display for LicenseForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} license", self.item_name)?;
        writeln!(
            f,
            "  {}: {}{}",
            self.key_field,
            self.visible_key,
            if self.readonly { " (read-only)" } else { "" }
        )?;
        writeln!(f, "  status: {}", self.status)?;
        writeln!(f, "  {}: {}", self.nonce_field, self.nonce)?;

        let mut actions = Vec::new();
        if self.activate_enabled {
            actions.push("activate");
        }
        if self.deactivate_enabled {
            actions.push("deactivate");
        }
        write!(f, "  {}: [{}]", self.action_field, actions.join(", "))?;
        if !self.embedded {
            write!(f, " save")?;
        }
        Ok(())
    }
}
