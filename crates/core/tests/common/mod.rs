//! Shared fakes for license manager tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use licman_core::{
    ActivationResult, ApiAction, LicenseApi, LicenseManager, LicenseResult, MemoryStore, NoticeLog,
    ProductConfig,
};
use std::cell::RefCell;
use std::rc::Rc;

pub type Calls = Rc<RefCell<Vec<(ApiAction, String, String)>>>;

/// LicenseApi that answers every call from a closure and records what it was asked.
pub struct ScriptedApi {
    respond: Box<dyn Fn(ApiAction) -> LicenseResult<ActivationResult>>,
    calls: Calls,
}

impl ScriptedApi {
    pub fn new<F>(respond: F) -> (Self, Calls)
    where
        F: Fn(ApiAction) -> LicenseResult<ActivationResult> + 'static,
    {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                respond: Box::new(respond),
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }

    /// Always answers with the given JSON body.
    pub fn json(body: &'static str) -> (Self, Calls) {
        Self::new(move |_| Ok(serde_json::from_str(body).expect("test body must parse")))
    }
}

impl LicenseApi for ScriptedApi {
    fn call(
        &self,
        action: ApiAction,
        license: &str,
        item_name: &str,
    ) -> LicenseResult<ActivationResult> {
        self.calls
            .borrow_mut()
            .push((action, license.to_string(), item_name.to_string()));
        (self.respond)(action)
    }
}

pub type TestManager = LicenseManager<MemoryStore, ScriptedApi, NoticeLog>;

pub fn product() -> ProductConfig {
    let mut config = ProductConfig::new(
        "https://shop.example.com",
        "Widget Pro",
        "widget-pro/widget-pro.php",
        "3.1.0",
    );
    config.set_item_url("https://shop.example.com/widget-pro");
    config
}

pub fn manager(api: ScriptedApi) -> TestManager {
    LicenseManager::new(product(), MemoryStore::new(), api, NoticeLog::new())
}

pub fn valid_result(site_count: u32, license_limit: u32, days_out: i64) -> ActivationResult {
    let expires = Utc::now() + Duration::days(days_out);
    ActivationResult {
        license: "valid".to_string(),
        site_count,
        license_limit,
        expires: Some(expires.format("%Y-%m-%d %H:%M:%S").to_string()),
        error: None,
    }
}
