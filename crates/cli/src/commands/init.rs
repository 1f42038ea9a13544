//! Initialize .licman.toml configuration

use anyhow::Result;
use colored::Colorize;
use licman_core::config::CONFIG_FILENAME;
use licman_core::{LicmanConfig, ProductConfig};
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "  {} {} already exists at {}",
            "Warning:".yellow().bold(),
            CONFIG_FILENAME,
            config_path.display()
        );
        return Ok(());
    }

    let config = LicmanConfig {
        product: ProductConfig::new(
            "https://shop.example.com",
            "My Product",
            "my-product/my-product.php",
            "1.0.0",
        ),
        ..LicmanConfig::default()
    };
    config.save(&config_path)?;

    eprintln!(
        "  {} Created {} at {}",
        "\u{2713}".green(),
        CONFIG_FILENAME,
        config_path.display()
    );
    eprintln!();
    eprintln!("  Set api_url and item_name for your product, then run:");
    eprintln!("    {}", "licman key <YOUR_KEY>".bold());

    Ok(())
}
