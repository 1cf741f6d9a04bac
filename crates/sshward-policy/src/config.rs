use crate::category::Category;
use crate::error::{CategoryError, ConfigError, LoadError};
use crate::mode::validate_mode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root policy configuration, as read from a YAML or JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyConfig {
    /// Fallback for every category left unconfigured. Unconfigured here means `enable`;
    /// restricted setups should set `disable` so features added later stay off.
    pub default_mode: String,

    /// Replaces the program of any admitted shell, exec or subsystem request. The
    /// original command or subsystem name is passed in `SSH_ORIGINAL_COMMAND`.
    /// Empty means unset.
    pub force_command: String,

    pub env: EnvConfig,
    pub command: CommandConfig,
    pub shell: ShellConfig,
    pub subsystem: SubsystemConfig,
    pub tty: TtyConfig,
    pub signal: SignalConfig,

    /// Session channels that may be open at once on a single network connection.
    /// Zero means unlimited.
    pub max_sessions: u32,
}

/// Common view over the per-category configuration blocks.
pub trait CategoryConfig {
    fn mode(&self) -> &str;

    fn allow(&self) -> &[String] {
        &[]
    }

    fn deny(&self) -> &[String] {
        &[]
    }

    /// Check the block, labelling any failure with `category`.
    fn validate_as(&self, category: Category) -> Result<(), CategoryError> {
        validate_mode(self.mode()).map_err(|source| CategoryError { category, source })
    }
}

/// Mode only: shell and TTY requests carry no value to match against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    pub mode: String,
}

/// Exec requests. Commands are matched as whole strings and there is no deny list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub mode: String,

    /// Consulted under `filter` only.
    #[serde(alias = "Allow")]
    pub allow: Vec<String>,
}

/// Categories matched by name against both an allow and a deny list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub mode: String,

    /// Consulted under `filter` only.
    #[serde(alias = "Allow")]
    pub allow: Vec<String>,

    /// Consulted under `enable` only.
    #[serde(alias = "Deny")]
    pub deny: Vec<String>,
}

pub type EnvConfig = ListConfig;
pub type ShellConfig = ModeConfig;
pub type SubsystemConfig = ListConfig;
pub type TtyConfig = ModeConfig;
pub type SignalConfig = ListConfig;

impl CategoryConfig for ModeConfig {
    fn mode(&self) -> &str {
        &self.mode
    }
}

impl CategoryConfig for CommandConfig {
    fn mode(&self) -> &str {
        &self.mode
    }

    fn allow(&self) -> &[String] {
        &self.allow
    }
}

impl CategoryConfig for ListConfig {
    fn mode(&self) -> &str {
        &self.mode
    }

    fn allow(&self) -> &[String] {
        &self.allow
    }

    fn deny(&self) -> &[String] {
        &self.deny
    }
}

impl ModeConfig {
    pub fn new(mode: &str) -> Self {
        ModeConfig {
            mode: mode.to_string(),
        }
    }
}

impl CommandConfig {
    pub fn new(mode: &str, allow: &[&str]) -> Self {
        CommandConfig {
            mode: mode.to_string(),
            allow: allow.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ListConfig {
    pub fn new(mode: &str, allow: &[&str], deny: &[&str]) -> Self {
        ListConfig {
            mode: mode.to_string(),
            allow: allow.iter().map(|s| s.to_string()).collect(),
            deny: deny.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PolicyConfig {
    /// The configuration block for `category`.
    pub fn category(&self, category: Category) -> &dyn CategoryConfig {
        match category {
            Category::Env => &self.env,
            Category::Command => &self.command,
            Category::Shell => &self.shell,
            Category::Subsystem => &self.subsystem,
            Category::Tty => &self.tty,
            Category::Signal => &self.signal,
        }
    }

    /// Check the default mode, then each category in [`Category::ALL`] order,
    /// stopping at the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_mode(&self.default_mode).map_err(ConfigError::DefaultMode)?;
        for category in Category::ALL {
            self.category(category).validate_as(category)?;
        }
        Ok(())
    }

    /// Load from disk. `.json` files are read as JSON, anything else as YAML.
    /// The result is not validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        // An empty document means "nothing configured".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }
}
