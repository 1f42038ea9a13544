//! Configuration file parsing for .licman.toml

use crate::error::LicenseError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".licman.toml";

/// Main configuration structure for .licman.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicmanConfig {
    #[serde(default)]
    pub product: ProductConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// The licensed item and the shop that sells it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// URL of the shop running the EDD API
    #[serde(default)]
    pub api_url: String,

    /// Item name in the EDD shop
    #[serde(default)]
    pub item_name: String,

    /// Theme slug or plugin file
    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub version: String,

    /// Page on which users can purchase, upgrade or renew (defaults to `api_url`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_url: Option<String>,

    /// Page on which users can enter their license key
    #[serde(default = "default_license_page")]
    pub license_page_url: String,

    #[serde(default = "default_text_domain")]
    pub text_domain: String,

    #[serde(default = "default_author")]
    pub author: String,

    /// Environment variable that pins the license key. Derived from the item name if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_constant_name: Option<String>,

    /// Remote call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Options file; defaults to `<config dir>/licman/options.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// Default functions
fn default_license_page() -> String {
    "#".to_string()
}

fn default_text_domain() -> String {
    "yoast".to_string()
}

fn default_author() -> String {
    "Yoast".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            item_name: String::new(),
            slug: String::new(),
            version: String::new(),
            item_url: None,
            license_page_url: default_license_page(),
            text_domain: default_text_domain(),
            author: default_author(),
            license_constant_name: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProductConfig {
    pub fn new(api_url: &str, item_name: &str, slug: &str, version: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            item_name: item_name.to_string(),
            slug: slug.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    /// Checks the fields a remote call cannot do without.
    pub fn validate(&self) -> Result<(), LicenseError> {
        if self.api_url.trim().is_empty() {
            return Err(LicenseError::Config("api_url is empty".to_string()));
        }
        if self.item_name.trim().is_empty() {
            return Err(LicenseError::Config("item_name is empty".to_string()));
        }
        Ok(())
    }

    pub fn item_url(&self) -> &str {
        match self.item_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => &self.api_url,
        }
    }

    pub fn set_item_url(&mut self, item_url: &str) {
        self.item_url = Some(item_url.to_string());
    }

    pub fn set_license_page(&mut self, license_page_url: &str) {
        self.license_page_url = license_page_url.to_string();
    }

    pub fn set_author(&mut self, author: &str) {
        self.author = author.to_string();
    }

    pub fn set_text_domain(&mut self, text_domain: &str) {
        self.text_domain = text_domain.to_string();
    }

    /// Prefix for option names, form fields and the nonce action
    pub fn prefix(&self) -> String {
        sanitize_title_with_dashes(&format!("{}_", self.item_name))
    }

    pub fn option_name(&self) -> String {
        format!("{}license", self.prefix())
    }

    pub fn key_field(&self) -> String {
        format!("{}license_key", self.prefix())
    }

    pub fn nonce_field(&self) -> String {
        format!("{}license_nonce", self.prefix())
    }

    pub fn action_field(&self) -> String {
        format!("{}license_action", self.prefix())
    }

    /// Name of the environment override, e.g. `MYPLUGIN_LICENSE`.
    pub fn override_name(&self) -> String {
        match self.license_constant_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!(
                "{}_LICENSE",
                sanitize_key(&self.item_name).replace('-', "").to_uppercase()
            ),
        }
    }
}

/// Lowercases and keeps only `[a-z0-9_-]`.
pub fn sanitize_key(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Slug-style sanitization: whitespace becomes dashes, dash runs collapse,
/// everything outside `[a-z0-9_-]` is dropped.
pub fn sanitize_title_with_dashes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        let c = if c.is_whitespace() || c == '.' { '-' } else { c };
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-') {
            continue;
        }
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}

impl LicmanConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: LicmanConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Find and load .licman.toml from the current directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
