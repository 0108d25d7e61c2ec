//! Workbench configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use submit_compare_core::model::{
    default_display_name, default_our_answer_label, default_submit_button_label,
    default_your_answer_label,
};

/// Settings a fresh block is seeded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefaults {
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub max_attempts: u32,
    #[serde(default = "default_your_answer_label")]
    pub your_answer_label: String,
    #[serde(default = "default_our_answer_label")]
    pub our_answer_label: String,
    #[serde(default = "default_submit_button_label")]
    pub submit_button_label: String,
    /// Question XML file; the built-in question when unset.
    #[serde(default)]
    pub question_file: Option<PathBuf>,
}

impl Default for BlockDefaults {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            weight: 0,
            max_attempts: 0,
            your_answer_label: default_your_answer_label(),
            our_answer_label: default_our_answer_label(),
            submit_button_label: default_submit_button_label(),
            question_file: None,
        }
    }
}

/// Top-level workbench configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchConfig {
    /// Where field values are persisted.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// JSON-lines log of published events.
    #[serde(default)]
    pub event_log: Option<PathBuf>,
    /// Prefix for packaged static resources.
    #[serde(default = "default_static_base_url")]
    pub static_base_url: String,
    /// Prefix for JSON handler URLs.
    #[serde(default = "default_handler_base_url")]
    pub handler_base_url: String,
    /// Learner the workbench acts as.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Block usage id; the block falls back to a fixed id when unset.
    #[serde(default)]
    pub usage_id: Option<String>,
    /// Initial block settings.
    #[serde(default)]
    pub block: BlockDefaults,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./submit-compare-state.json")
}
fn default_static_base_url() -> String {
    "/static".to_string()
}
fn default_handler_base_url() -> String {
    "/handler".to_string()
}
fn default_user_id() -> String {
    "student".to_string()
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            event_log: None,
            static_base_url: default_static_base_url(),
            handler_base_url: default_handler_base_url(),
            user_id: default_user_id(),
            usage_id: None,
            block: BlockDefaults::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        // Substituted values are not expanded again
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

impl WorkbenchConfig {
    fn resolve_env(mut self) -> Self {
        self.state_file = resolve_path(&self.state_file);
        self.event_log = self.event_log.as_deref().map(resolve_path);
        self.static_base_url = resolve_env_vars(&self.static_base_url);
        self.handler_base_url = resolve_env_vars(&self.handler_base_url);
        self.user_id = resolve_env_vars(&self.user_id);
        self.usage_id = self.usage_id.as_deref().map(resolve_env_vars);
        self.block.question_file = self.block.question_file.as_deref().map(resolve_path);
        self
    }

    /// Make relative paths relative to `base` (the config file's directory).
    fn rebase_paths(mut self, base: &Path) -> Self {
        let rebase = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.state_file = rebase(self.state_file);
        self.event_log = self.event_log.map(rebase);
        self.block.question_file = self.block.question_file.map(rebase);
        self
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `submit-compare.toml` in the current directory
/// 2. `~/.config/submit-compare/config.toml`
///
/// Environment variable override: `SUBMIT_COMPARE_USER`.
pub fn load_config() -> Result<WorkbenchConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<WorkbenchConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("submit-compare.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<WorkbenchConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
                .resolve_env();
            match path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(base) => config.rebase_paths(base),
                None => config,
            }
        }
        None => WorkbenchConfig::default(),
    };

    if let Ok(user) = std::env::var("SUBMIT_COMPARE_USER") {
        config.user_id = user;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("submit-compare"))
}
