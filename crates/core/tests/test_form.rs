//! License form view and POST handler

mod common;

use common::{manager, product, ScriptedApi};
use licman_core::{
    handle_submission, FormSubmission, HashNonce, LicenseError, LicenseForm, LicenseManager,
    LicenseResult, LicenseStatus, NonceVerifier, NoticeLog, OptionStore,
};

const KEY_FIELD: &str = "widget-pro_license_key";
const NONCE_FIELD: &str = "widget-pro_license_nonce";
const ACTION_FIELD: &str = "widget-pro_license_action";

fn nonces() -> HashNonce {
    HashNonce::new("test-secret")
}

fn post(key: &str, nonces: &HashNonce) -> FormSubmission {
    FormSubmission::new()
        .with_field(KEY_FIELD, key)
        .with_field(NONCE_FIELD, nonces.issue(NONCE_FIELD))
}

// --- LicenseForm ---

#[test]
fn form_field_names_use_prefix() {
    let (api, _) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let m = manager(api);
    let form = LicenseForm::build(&m, &nonces(), true);
    assert_eq!(form.key_field, KEY_FIELD);
    assert_eq!(form.nonce_field, NONCE_FIELD);
    assert_eq!(form.action_field, ACTION_FIELD);
    assert!(nonces().verify(NONCE_FIELD, &form.nonce));
}

#[test]
fn valid_license_is_masked_and_readonly() {
    let (api, _) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let m = manager(api);
    m.set_key("0123456789abcdef").unwrap();
    m.set_status(LicenseStatus::Valid).unwrap();

    let form = LicenseForm::build(&m, &nonces(), true);
    assert_eq!(form.visible_key, "************cdef");
    assert!(form.readonly);
    assert!(!form.activate_enabled);
    assert!(form.deactivate_enabled);
}

#[test]
fn short_key_is_never_masked() {
    let (api, _) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let m = manager(api);
    m.set_key("abcde").unwrap();
    m.set_status(LicenseStatus::Valid).unwrap();

    let form = LicenseForm::build(&m, &nonces(), true);
    assert_eq!(form.visible_key, "abcde");
}

#[test]
fn rejected_key_stays_readable_and_editable() {
    let (api, _) = ScriptedApi::json(r#"{"license":"invalid"}"#);
    let mut m = manager(api);
    m.set_key("typo-key-1234").unwrap();
    assert!(!m.activate());

    let form = LicenseForm::build(&m, &nonces(), false);
    assert_eq!(form.visible_key, "typo-key-1234");
    assert!(!form.readonly);
    assert!(form.activate_enabled);
    assert!(!form.deactivate_enabled);
}

#[test]
fn unchecked_key_is_masked_but_editable() {
    let (api, _) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let m = manager(api);
    m.set_key("never-activated").unwrap();

    let form = LicenseForm::build(&m, &nonces(), true);
    assert_eq!(form.visible_key, "***********ated");
    assert!(!form.readonly);
}

#[test]
fn pinned_key_is_readonly() {
    let (api, _) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let mut m = manager(api);
    m.maybe_load_key_from(|_| Some("pinned-key-0000".to_string()));

    let form = LicenseForm::build(&m, &nonces(), true);
    assert!(form.readonly);
}

#[test]
fn form_renders_as_text() {
    let (api, _) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let m = manager(api);
    let text = LicenseForm::build(&m, &nonces(), false).to_string();
    assert!(text.starts_with("Widget Pro license"));
    assert!(text.contains("status: unset"));
    assert!(text.contains("[activate] save"));
}

/// Store whose every read and write fails.
struct BrokenStore;

impl OptionStore for BrokenStore {
    fn get(&self, _name: &str) -> LicenseResult<Option<serde_json::Value>> {
        Err(LicenseError::Store("disk unavailable".to_string()))
    }

    fn set(&self, _name: &str, _value: serde_json::Value) -> LicenseResult<()> {
        Err(LicenseError::Store("disk unavailable".to_string()))
    }
}

#[test]
fn unreadable_store_renders_empty_form() {
    let (api, _) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let m = LicenseManager::new(product(), BrokenStore, api, NoticeLog::new());

    let form = LicenseForm::build(&m, &nonces(), true);
    assert_eq!(form.visible_key, "");
    assert_eq!(form.status, LicenseStatus::Unset);
    assert!(!form.readonly);
    assert!(form.activate_enabled);
}

// --- handle_submission ---

#[test]
fn post_without_key_field_is_ignored() {
    let (api, calls) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let mut m = manager(api);
    let n = nonces();
    let submission = FormSubmission::new().with_field(NONCE_FIELD, n.issue(NONCE_FIELD));

    assert_eq!(handle_submission(&mut m, &n, &submission), None);
    assert!(calls.borrow().is_empty());
}

#[test]
fn post_with_bad_nonce_is_ignored() {
    let (api, calls) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let mut m = manager(api);
    let submission = FormSubmission::new()
        .with_field(KEY_FIELD, "new-key")
        .with_field(NONCE_FIELD, "0000000000");

    assert_eq!(handle_submission(&mut m, &nonces(), &submission), None);
    assert_eq!(m.get_key().unwrap(), "");
    assert!(calls.borrow().is_empty());
}

#[test]
fn saving_a_key_auto_activates() {
    let (api, calls) = ScriptedApi::json(r#"{"license":"valid","site_count":1,"license_limit":10}"#);
    let mut m = manager(api);
    let n = nonces();

    assert_eq!(handle_submission(&mut m, &n, &post("  New-Key_99! ", &n)), Some(true));
    assert_eq!(m.get_key().unwrap(), "new-key_99");
    assert_eq!(calls.borrow().len(), 1);
    assert!(m.is_valid());
}

#[test]
fn masked_key_is_not_saved() {
    let (api, calls) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let mut m = manager(api);
    m.set_key("original-key").unwrap();
    let n = nonces();

    handle_submission(&mut m, &n, &post("********-key", &n));
    assert_eq!(m.get_key().unwrap(), "original-key");
    assert_eq!(calls.borrow()[0].1, "original-key");
}

#[test]
fn valid_license_without_action_does_nothing_remote() {
    let (api, calls) = ScriptedApi::json(r#"{"license":"deactivated"}"#);
    let mut m = manager(api);
    m.set_key("abcdef").unwrap();
    m.set_status(LicenseStatus::Valid).unwrap();
    let n = nonces();

    assert_eq!(handle_submission(&mut m, &n, &post("abcdef", &n)), None);
    assert!(calls.borrow().is_empty());
}

#[test]
fn deactivate_action_on_valid_license() {
    let (api, calls) = ScriptedApi::json(r#"{"license":"deactivated"}"#);
    let mut m = manager(api);
    m.set_key("abcdef").unwrap();
    m.set_status(LicenseStatus::Valid).unwrap();
    let n = nonces();

    let submission = post("******", &n).with_field(ACTION_FIELD, "deactivate");
    assert_eq!(handle_submission(&mut m, &n, &submission), Some(true));
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(m.get_status().unwrap(), LicenseStatus::Deactivated);
}

#[test]
fn unknown_action_is_ignored() {
    let (api, calls) = ScriptedApi::json(r#"{"license":"valid"}"#);
    let mut m = manager(api);
    m.set_key("abcdef").unwrap();
    m.set_status(LicenseStatus::Valid).unwrap();
    let n = nonces();

    let submission = post("abcdef", &n).with_field(ACTION_FIELD, "explode");
    assert_eq!(handle_submission(&mut m, &n, &submission), None);
    assert!(calls.borrow().is_empty());
}
