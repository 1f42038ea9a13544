//! License manager: key/status persistence plus remote activation
//!
//! One concrete manager per licensed product. The host supplies the option
//! store, the remote API, a notifier and its product-specific hooks; nothing
//! here touches global state except the optional environment override.

use crate::api::{ApiAction, LicenseApi};
use crate::config::ProductConfig;
use crate::error::{LicenseError, LicenseResult};
use crate::messages;
use crate::notice::{Notice, Notifier};
use crate::store::{load_record, save_record, OptionStore};
use crate::types::{ActivationResult, LicenseRecord, LicenseStatus};
use chrono::Utc;

/// Product-type specific setup, run once when the manager is built.
///
/// Plugins and themes register different host integrations and updaters;
/// both hooks default to doing nothing.
pub trait ProductHooks {
    fn on_setup(&mut self, _config: &ProductConfig) {}

    fn on_register_updater(&mut self, _config: &ProductConfig) {}
}

/// Hooks for products without host-specific setup.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl ProductHooks for NoHooks {}

pub struct LicenseManager<S, A, N> {
    config: ProductConfig,
    store: S,
    api: A,
    notifier: N,
    pinned_key: Option<String>,
    remote_activation_failed: bool,
}

impl<S, A, N> LicenseManager<S, A, N>
where
    S: OptionStore,
    A: LicenseApi,
    N: Notifier,
{
    pub fn new(config: ProductConfig, store: S, api: A, notifier: N) -> Self {
        Self::with_hooks(config, store, api, notifier, &mut NoHooks)
    }

    /// Build the manager, run the product hooks, then apply the environment override.
    pub fn with_hooks(
        config: ProductConfig,
        store: S,
        api: A,
        notifier: N,
        hooks: &mut dyn ProductHooks,
    ) -> Self {
        hooks.on_setup(&config);
        hooks.on_register_updater(&config);

        let mut manager = Self {
            config,
            store,
            api,
            notifier,
            pinned_key: None,
            remote_activation_failed: false,
        };
        manager.maybe_load_key_from_override();
        manager
    }

    pub fn config(&self) -> &ProductConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// True once the key came from the environment override; the UI must not edit it.
    pub fn key_is_pinned(&self) -> bool {
        self.pinned_key.is_some()
    }

    /// True if the last activation attempt was rejected by the endpoint.
    pub fn remote_activation_failed(&self) -> bool {
        self.remote_activation_failed
    }

    // ── Persisted record ─────────────────────────────────────────

    pub fn record(&self) -> LicenseResult<LicenseRecord> {
        load_record(&self.store, &self.config.option_name())
    }

    fn update_record(&self, update: impl FnOnce(&mut LicenseRecord)) -> LicenseResult<()> {
        let mut record = self.record()?;
        update(&mut record);
        save_record(&self.store, &self.config.option_name(), &record)
    }

    pub fn get_status(&self) -> LicenseResult<LicenseStatus> {
        Ok(self.record()?.status)
    }

    pub fn set_status(&self, status: LicenseStatus) -> LicenseResult<()> {
        tracing::debug!(option = %self.config.option_name(), %status, "setting license status");
        self.update_record(|record| record.status = status)
    }

    /// The license key, trimmed. A pinned override always wins.
    pub fn get_key(&self) -> LicenseResult<String> {
        if let Some(pinned) = &self.pinned_key {
            return Ok(pinned.trim().to_string());
        }
        Ok(self.record()?.key.trim().to_string())
    }

    /// Store a new key. Ignored while the key is pinned by the environment.
    pub fn set_key(&self, key: &str) -> LicenseResult<()> {
        if self.key_is_pinned() {
            tracing::debug!("license key is pinned by the environment; ignoring set_key");
            return Ok(());
        }
        self.write_key(key)
    }

    fn write_key(&self, key: &str) -> LicenseResult<()> {
        self.update_record(|record| record.key = key.to_string())
    }

    /// Store read failures count as "not valid".
    pub fn is_valid(&self) -> bool {
        match self.get_status() {
            Ok(status) => status == LicenseStatus::Valid,
            Err(e) => {
                tracing::warn!(error = %e, "could not read license status");
                false
            }
        }
    }

    // ── Environment override ─────────────────────────────────────

    /// Apply `<OVERRIDE_NAME>` from the process environment, if set.
    pub fn maybe_load_key_from_override(&mut self) {
        self.maybe_load_key_from(|name| std::env::var(name).ok());
    }

    /// Apply the override from an arbitrary lookup (the environment, a host constant table, ...).
    pub fn maybe_load_key_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = self.config.override_name();
        let Some(value) = lookup(&name) else {
            return;
        };

        let stored = self.record().map(|r| r.key).unwrap_or_default();
        if stored.trim() != value.trim() {
            if let Err(e) = self.write_key(&value) {
                tracing::warn!(error = %e, "could not persist license key from {name}");
            }
        }

        tracing::info!(source = %name, "license key pinned by override");
        self.pinned_key = Some(value);
    }

    /// Use an explicit override name instead of the derived one.
    pub fn set_override_name(&mut self, name: &str) {
        self.config.license_constant_name = Some(name.trim().to_string());
        self.maybe_load_key_from_override();
    }

    // ── Remote calls ─────────────────────────────────────────────

    /// Activate the stored key remotely. Returns whether the license is now valid.
    pub fn activate(&mut self) -> bool {
        let key = match self.get_key() {
            Ok(key) => key,
            Err(e) => {
                self.report_store_error(&e);
                return false;
            }
        };

        // Nothing to send; report whatever we already know.
        if key.is_empty() {
            return self.is_valid();
        }

        let Some(result) = self.call_api(ApiAction::Activate, &key) else {
            return false;
        };

        if result.is_valid() {
            let message = messages::activated(&self.config, &result, Utc::now());
            self.notifier.notify(Notice::success(message));
        } else {
            let message = messages::activation_failed(&self.config, result.error.as_deref());
            self.notifier.notify(Notice::error(message));
            self.remote_activation_failed = true;
        }

        self.apply_status(activation_status(&result));
        self.is_valid()
    }

    /// Deactivate the stored key remotely. Returns whether the license is now deactivated.
    pub fn deactivate(&mut self) -> bool {
        let key = match self.get_key() {
            Ok(key) => key,
            Err(e) => {
                self.report_store_error(&e);
                return false;
            }
        };

        if !key.is_empty() {
            if let Some(result) = self.call_api(ApiAction::Deactivate, &key) {
                let notice = if result.license == "deactivated" {
                    Notice::success(messages::deactivated(&self.config))
                } else {
                    Notice::error(messages::deactivation_failed(&self.config))
                };
                self.notifier.notify(notice);
                self.apply_status(LicenseStatus::from(result.license.as_str()));
            }
        }

        matches!(self.get_status(), Ok(LicenseStatus::Deactivated))
    }

    /// Warning notice for the admin area while the license is not valid.
    pub fn inactive_license_notice(&self) -> Option<Notice> {
        if self.is_valid() {
            None
        } else {
            Some(Notice::error(messages::inactive_license(&self.config)))
        }
    }

    fn call_api(&self, action: ApiAction, key: &str) -> Option<ActivationResult> {
        match self.api.call(action, key, &self.config.item_name) {
            Ok(result) => {
                tracing::debug!(%action, license = %result.license, "license API result");
                Some(result)
            }
            Err(LicenseError::MalformedResponse(detail)) => {
                tracing::warn!(%action, %detail, "unreadable license API response");
                self.notifier
                    .notify(Notice::error(messages::malformed_response(&detail)));
                None
            }
            Err(e) => {
                tracing::warn!(%action, error = %e, "license API request failed");
                let detail = match e {
                    LicenseError::Transport(detail) => detail,
                    other => other.to_string(),
                };
                self.notifier
                    .notify(Notice::error(messages::request_error(&detail)));
                None
            }
        }
    }

    fn apply_status(&self, status: LicenseStatus) {
        if let Err(e) = self.set_status(status) {
            self.report_store_error(&e);
        }
    }

    fn report_store_error(&self, error: &LicenseError) {
        tracing::error!(%error, "license option store failed");
        self.notifier.notify(Notice::error(error.to_string()));
    }
}

/// Status to persist after an activation call.
///
/// An `expired` error is recorded as `expired` even when the endpoint reports
/// the license itself as `invalid`.
pub fn activation_status(result: &ActivationResult) -> LicenseStatus {
    if result.is_valid() {
        LicenseStatus::Valid
    } else if result.error.as_deref() == Some("expired") {
        LicenseStatus::Expired
    } else {
        LicenseStatus::from(result.license.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(license: &str, error: Option<&str>) -> ActivationResult {
        ActivationResult {
            license: license.to_string(),
            site_count: 0,
            license_limit: 0,
            expires: None,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn activation_status_mapping() {
        assert_eq!(activation_status(&result("valid", None)), LicenseStatus::Valid);
        assert_eq!(
            activation_status(&result("invalid", Some("expired"))),
            LicenseStatus::Expired
        );
        assert_eq!(
            activation_status(&result("invalid", Some("no_activations_left"))),
            LicenseStatus::Invalid
        );
        assert_eq!(
            activation_status(&result("site_inactive", None)),
            LicenseStatus::SiteInactive
        );
    }

    #[derive(Default)]
    struct RecordingHooks {
        calls: Vec<&'static str>,
    }

    impl ProductHooks for RecordingHooks {
        fn on_setup(&mut self, _config: &ProductConfig) {
            self.calls.push("setup");
        }

        fn on_register_updater(&mut self, _config: &ProductConfig) {
            self.calls.push("updater");
        }
    }

    struct NoApi;

    impl LicenseApi for NoApi {
        fn call(&self, _: ApiAction, _: &str, _: &str) -> LicenseResult<ActivationResult> {
            Err(LicenseError::Transport("offline".to_string()))
        }
    }

    #[test]
    fn hooks_run_in_order() {
        let mut hooks = RecordingHooks::default();
        let config = ProductConfig::new("https://shop.test", "Hooked Plugin", "hooked", "1.0");
        let _manager = LicenseManager::with_hooks(
            config,
            crate::store::MemoryStore::new(),
            NoApi,
            crate::notice::NoticeLog::new(),
            &mut hooks,
        );
        assert_eq!(hooks.calls, vec!["setup", "updater"]);
    }
}
