//! licman CLI library, exposed for integration tests

pub mod commands;
pub mod context;
pub mod notifier;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use context::{CliManager, Context};
pub use notifier::TerminalNotifier;

#[derive(Parser)]
#[command(name = "licman")]
#[command(about = "Activate and deactivate product license keys", long_about = None)]
#[command(version = licman_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: nearest .licman.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Option store file (default: ~/.config/licman/options.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize .licman.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Show the stored key and license status
    Status,

    /// Store a license key
    Key {
        /// License key to store
        key: String,
    },

    /// Activate the stored key against the license server
    Activate,

    /// Deactivate the stored key on the license server
    Deactivate,

    /// Render the license form
    Form {
        /// Render as part of an enclosing settings form
        #[arg(long)]
        embedded: bool,
    },

    /// Submit the license form
    Submit {
        /// Posted license key
        #[arg(long)]
        key: String,

        /// Anti-forgery token (default: a freshly issued one)
        #[arg(long)]
        nonce: Option<String>,

        /// Form action: activate or deactivate
        #[arg(long)]
        action: Option<String>,
    },
}
