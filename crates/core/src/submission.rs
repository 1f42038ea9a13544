//! Handler for the posted license form

use crate::api::LicenseApi;
use crate::config::sanitize_key;
use crate::form::MASK_CHAR;
use crate::manager::LicenseManager;
use crate::nonce::NonceVerifier;
use crate::notice::Notifier;
use crate::store::OptionStore;
use std::collections::HashMap;

/// The action buttons on the license form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Activate,
    Deactivate,
}

impl FormAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "activate" => Some(FormAction::Activate),
            "deactivate" => Some(FormAction::Deactivate),
            _ => None,
        }
    }
}

/// Posted form fields, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    fields: HashMap<String, String>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for FormSubmission {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Process a license form post.
///
/// Returns `None` when the post is not for this product or fails the
/// anti-forgery check, and when no remote call was made. Otherwise returns
/// the outcome of the activate/deactivate call.
///
/// A license that is not yet valid is activated on every save, even without
/// an explicit "activate" action.
pub fn handle_submission<S, A, N>(
    manager: &mut LicenseManager<S, A, N>,
    nonces: &dyn NonceVerifier,
    submission: &FormSubmission,
) -> Option<bool>
where
    S: OptionStore,
    A: LicenseApi,
    N: Notifier,
{
    let config = manager.config();
    let key_field = config.key_field();
    let nonce_field = config.nonce_field();
    let action_field = config.action_field();

    let posted_key = submission.get(&key_field)?;

    let token = submission.get(&nonce_field).unwrap_or_default();
    if !nonces.verify(&nonce_field, token) {
        tracing::warn!(field = %nonce_field, "license form failed the nonce check");
        return None;
    }

    // A masked key is the stored one echoed back.
    if !posted_key.contains(MASK_CHAR) {
        let key = sanitize_key(posted_key);
        if let Err(e) = manager.set_key(key.trim()) {
            tracing::error!(error = %e, "could not save posted license key");
        }
    }

    if !manager.is_valid() {
        return Some(manager.activate());
    }

    match submission.get(&action_field).and_then(FormAction::parse)? {
        FormAction::Activate => Some(manager.activate()),
        FormAction::Deactivate => Some(manager.deactivate()),
    }
}
