use anyhow::{Context, Result};
use colored::Colorize;
use platform::DeckConfig;
use std::path::Path;

/// Load a deck configuration; fields missing from the file keep their defaults.
pub fn load(path: &Path) -> Result<DeckConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn run(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(path) => load(path)?,
        None => DeckConfig::default(),
    };

    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!();

    if let Err(e) = config.validate() {
        eprintln!("{}", format!("✗ {e}").red().bold());
        anyhow::bail!("Invalid configuration");
    }

    let (w, h) = config.logical_size();
    println!("{}", "✓ Configuration valid".green().bold());
    println!("   logical screen  {w} x {h}");
    println!(
        "   band buffers    {} x {} bytes",
        config.buffer_count(),
        config.buffer_len_bytes()
    );
    println!(
        "   bands per frame {}",
        h.div_ceil(config.band_height.max(1))
    );
    println!(
        "   report period   {} ms",
        config
            .tick_period_ms
            .saturating_mul(config.report_interval_ticks)
    );
    println!();

    Ok(())
}
