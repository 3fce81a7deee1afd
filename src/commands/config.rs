//! Configuration commands.
//!
//! - `config show`: display the effective configuration
//! - `config get` / `config set`: read or change one key
//! - `config path`: print where the file lives

use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{API_URL_ENV, Config};
use crate::error::Result;

pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;
    let env_override = std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty());

    let mut text = format!(
        "{}\n\n",
        "Configuration:".if_supports_color(Stdout, |s| s.bold())
    );
    text.push_str(&format!("{}:\n", "api".if_supports_color(Stdout, |s| s.cyan())));
    text.push_str(&format!("  base_url: {}", config.api.base_url));
    if env_override.is_some() {
        text.push_str(&format!(" (from {API_URL_ENV})"));
    }
    text.push('\n');
    text.push_str(&format!("  timeout_secs: {}\n", config.api.timeout_secs));
    text.push_str(&format!("{}:\n", "list".if_supports_color(Stdout, |s| s.cyan())));
    text.push_str(&format!("  page_size: {}\n\n", config.list.page_size));
    text.push_str(&format!("Config file: {}", path.display()));

    CommandOutput::new(json!({
        "api": {
            "base_url": config.api.base_url,
            "timeout_secs": config.api.timeout_secs,
            "base_url_from_env": env_override.is_some(),
        },
        "list": { "page_size": config.list.page_size },
        "config_file": path.to_string_lossy(),
    }))
    .with_text(text)
    .print(output)
}

pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let value = Config::load()?.get(key)?;
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(value)
        .print(output)
}

/// Set a key in the config file. Environment overrides are not written back.
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load_file()?;
    config.set(key, value)?;
    config.save()?;
    let stored = config.get(key)?;
    tracing::debug!(key, value = %stored, "config updated");

    CommandOutput::new(json!({ "key": key, "value": stored, "action": "set" }))
        .with_text(format!("Set {key} = {stored}"))
        .print(output)
}

pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}
