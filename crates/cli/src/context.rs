//! Resolves config, option store and nonce secret for a CLI invocation

use anyhow::{Context as _, Result};
use licman_core::config::CONFIG_FILENAME;
use licman_core::{HashNonce, HttpLicenseApi, JsonFileStore, LicenseManager, LicmanConfig, OptionStore};
use licman_core::nonce::hex_encode;
use rand::RngCore;
use std::path::{Path, PathBuf};

use crate::notifier::TerminalNotifier;

/// Option holding the generated nonce secret when `LICMAN_NONCE_SECRET` is unset
pub const NONCE_SECRET_OPTION: &str = "licman_nonce_secret";

pub const NONCE_SECRET_ENV: &str = "LICMAN_NONCE_SECRET";

const SECRET_BYTES: usize = 16;

pub type CliManager = LicenseManager<JsonFileStore, HttpLicenseApi, TerminalNotifier>;

pub struct Context {
    pub config: LicmanConfig,
    pub store_path: PathBuf,
}

impl Context {
    /// Load config from `config_path`, or the nearest `.licman.toml` above
    /// the current directory. The store path comes from `store_path`, then the
    /// config, then the default location.
    pub fn load(config_path: Option<&Path>, store_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => LicmanConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => LicmanConfig::find_and_load(&std::env::current_dir()?)?,
        };

        config.product.validate().with_context(|| {
            format!("edit {CONFIG_FILENAME} or run `licman init` to create one")
        })?;

        let store_path = match store_path.map(Path::to_path_buf).or_else(|| config.store.path.clone()) {
            Some(path) => path,
            None => JsonFileStore::default_location()?.path().to_path_buf(),
        };

        Ok(Self::new(config, store_path))
    }

    pub fn new(config: LicmanConfig, store_path: PathBuf) -> Self {
        Self { config, store_path }
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store_path)
    }

    /// Build a manager wired to the file store and the HTTP endpoint.
    pub fn manager(&self) -> Result<CliManager> {
        let api = HttpLicenseApi::from_config(&self.config.product)?;
        Ok(LicenseManager::new(
            self.config.product.clone(),
            self.store(),
            api,
            TerminalNotifier,
        ))
    }

    /// Nonce signer keyed by `LICMAN_NONCE_SECRET`, or by a secret generated
    /// once and kept in the option store.
    pub fn nonces(&self) -> Result<HashNonce> {
        if let Ok(secret) = std::env::var(NONCE_SECRET_ENV) {
            if !secret.is_empty() {
                return Ok(HashNonce::new(secret));
            }
        }
        Ok(HashNonce::new(stored_secret(&self.store())?))
    }
}

fn stored_secret(store: &impl OptionStore) -> Result<String> {
    if let Some(secret) = store
        .get(NONCE_SECRET_OPTION)?
        .as_ref()
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
    {
        return Ok(secret.to_string());
    }

    let secret = generate_secret();
    store.set(NONCE_SECRET_OPTION, serde_json::Value::String(secret.clone()))?;
    tracing::debug!("generated nonce secret");
    Ok(secret)
}

/// 16 bytes from the OS RNG, hex encoded.
fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex_encode(&bytes)
}
