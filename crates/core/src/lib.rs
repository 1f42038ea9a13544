//! Licman Core - License Activation Client
//!
//! This crate provides license-key handling for a commercial plugin sold
//! through an EDD-style shop:
//! - Persisting the key and its status in a host-supplied option store
//! - Activating and deactivating the key against the remote licensing API
//! - Turning API outcomes into user-visible notices
//! - The settings form view and its POST handler

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod manager;
pub mod messages;
pub mod nonce;
pub mod notice;
pub mod store;
pub mod submission;
pub mod types;

pub use api::{ApiAction, HttpLicenseApi, LicenseApi};
pub use config::{LicmanConfig, ProductConfig};
pub use error::{LicenseError, LicenseResult};
pub use form::LicenseForm;
pub use manager::{LicenseManager, NoHooks, ProductHooks};
pub use nonce::{HashNonce, NonceVerifier};
pub use notice::{Notice, NoticeKind, NoticeLog, Notifier};
pub use store::{JsonFileStore, MemoryStore, OptionStore};
pub use submission::{handle_submission, FormAction, FormSubmission};
pub use types::{ActivationResult, LicenseRecord, LicenseStatus};

/// Licman version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
