//! licman CLI - license key manager

use anyhow::Result;
use clap::Parser;
use licman_cli::{commands, Cli, Commands, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LICMAN_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Commands::Init { ref path } = cli.command {
        return commands::init::run(path.as_deref());
    }

    let ctx = Context::load(cli.config.as_deref(), cli.store.as_deref())?;

    let ok = match cli.command {
        Commands::Init { .. } => true,
        Commands::Status => commands::license::status(&ctx)?,
        Commands::Key { ref key } => commands::license::set_key(&ctx, key)?,
        Commands::Activate => commands::license::activate(&ctx)?,
        Commands::Deactivate => commands::license::deactivate(&ctx)?,
        Commands::Form { embedded } => commands::form::show(&ctx, embedded)?,
        Commands::Submit {
            ref key,
            ref nonce,
            ref action,
        } => commands::form::submit(&ctx, key, nonce.as_deref(), action.as_deref())?,
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
