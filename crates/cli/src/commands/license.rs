//! Key, status, activate and deactivate commands

use anyhow::Result;
use colored::Colorize;
use licman_core::form::obfuscate_key;
use licman_core::LicenseStatus;

use crate::context::Context;
use crate::notifier::format_notice;

/// Runs `licman status`.
pub fn status(ctx: &Context) -> Result<bool> {
    let manager = ctx.manager()?;
    let key = manager.get_key()?;
    let status = manager.get_status()?;

    eprintln!("  {}: {}", "Product".bold(), manager.config().item_name);
    if key.is_empty() {
        eprintln!("  {}: {}", "Key".bold(), "none".dimmed());
    } else {
        eprintln!("  {}: {}", "Key".bold(), obfuscate_key(&key));
    }
    if manager.key_is_pinned() {
        eprintln!(
            "  {}: {}",
            "Pinned by".bold(),
            manager.config().override_name().cyan()
        );
    }
    eprintln!("  {}: {}", "Status".bold(), colorize_status(&status));

    if let Some(notice) = manager.inactive_license_notice() {
        eprintln!();
        eprintln!("{}", format_notice(&notice));
    }
    eprintln!();

    Ok(true)
}

/// Runs `licman key <KEY>`.
pub fn set_key(ctx: &Context, key: &str) -> Result<bool> {
    let manager = ctx.manager()?;

    if manager.key_is_pinned() {
        eprintln!(
            "  {} Key is pinned by {}; stored key left unchanged.",
            "Warning:".yellow().bold(),
            manager.config().override_name()
        );
        return Ok(false);
    }

    manager.set_key(key)?;
    eprintln!("  {} License key saved.", "\u{2713}".green());
    eprintln!("  Run {} to activate it.", "licman activate".bold());
    Ok(true)
}

/// Runs `licman activate`.
pub fn activate(ctx: &Context) -> Result<bool> {
    let mut manager = ctx.manager()?;
    if manager.get_key()?.is_empty() {
        eprintln!(
            "  No license key stored. Run {} first.",
            "licman key <YOUR_KEY>".bold()
        );
    }

    eprintln!("  Activating {}...", manager.config().item_name);
    Ok(manager.activate())
}

/// Runs `licman deactivate`.
pub fn deactivate(ctx: &Context) -> Result<bool> {
    let mut manager = ctx.manager()?;
    eprintln!("  Deactivating {}...", manager.config().item_name);
    Ok(manager.deactivate())
}

fn colorize_status(status: &LicenseStatus) -> String {
    let text = status.to_string();
    match status {
        LicenseStatus::Valid => text.green().to_string(),
        LicenseStatus::Unset => text.dimmed().to_string(),
        LicenseStatus::Expired | LicenseStatus::SiteInactive | LicenseStatus::Deactivated => {
            text.yellow().to_string()
        }
        _ => text.red().to_string(),
    }
}
