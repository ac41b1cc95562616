use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use esomchat_types::WidgetConfig;

use crate::cli::Cli;
use crate::store::esomchat_dir;

/// Everything the terminal client needs to start a session
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub widget: WidgetConfig,
    pub history_file: PathBuf,
}

impl Settings {
    /// Defaults, then the TOML file, then flags and environment
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut widget = match &cli.config {
            Some(path) => load_config_file(path)?,
            None => WidgetConfig::default(),
        };
        apply_overrides(&mut widget, cli);

        let history_file = match &cli.history_file {
            Some(path) => path.clone(),
            None => esomchat_dir()?.join(format!("{}.json", widget.storage_key)),
        };

        Ok(Self { widget, history_file })
    }
}

/// Read widget options from a TOML file. Missing keys take their defaults.
pub fn load_config_file(path: &Path) -> Result<WidgetConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn apply_overrides(widget: &mut WidgetConfig, cli: &Cli) {
    if let Some(url) = &cli.api_url {
        widget.api_url = url.clone();
    }
    if let Some(max) = cli.max_history {
        widget.max_history_items = max;
    }
    if let Some(secs) = cli.timeout_secs {
        widget.request_timeout_secs = secs;
    }
    if let Some(name) = &cli.bot_name {
        widget.bot_name = name.clone();
    }
    if cli.no_sources {
        widget.show_sources = false;
    }
}
