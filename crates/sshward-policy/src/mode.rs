use crate::error::InvalidModeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a category of request is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    /// Falls back to the enclosing default. Written as the empty string.
    #[default]
    #[serde(rename = "")]
    Unconfigured,
    /// Allowed unless the candidate is on the deny list.
    Enable,
    /// Allowed only if the candidate is on a non-empty allow list.
    Filter,
    /// Rejected; allow and deny lists are not consulted.
    Disable,
}

/// An [`ExecutionPolicy`] after the `Unconfigured` fallback has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveMode {
    Enable,
    Filter,
    Disable,
}

impl ExecutionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionPolicy::Unconfigured => "",
            ExecutionPolicy::Enable => "enable",
            ExecutionPolicy::Filter => "filter",
            ExecutionPolicy::Disable => "disable",
        }
    }

    /// Resolve against the root default mode. An unconfigured default means `enable`.
    pub fn resolve(self, default_mode: ExecutionPolicy) -> EffectiveMode {
        let mode = match self {
            ExecutionPolicy::Unconfigured => default_mode,
            configured => configured,
        };
        match mode {
            ExecutionPolicy::Unconfigured | ExecutionPolicy::Enable => EffectiveMode::Enable,
            ExecutionPolicy::Filter => EffectiveMode::Filter,
            ExecutionPolicy::Disable => EffectiveMode::Disable,
        }
    }
}

impl FromStr for ExecutionPolicy {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(ExecutionPolicy::Unconfigured),
            "enable" => Ok(ExecutionPolicy::Enable),
            "filter" => Ok(ExecutionPolicy::Filter),
            "disable" => Ok(ExecutionPolicy::Disable),
            other => Err(InvalidModeError {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EffectiveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveMode::Enable => "enable",
            EffectiveMode::Filter => "filter",
            EffectiveMode::Disable => "disable",
        }
    }
}

impl fmt::Display for EffectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a mode string as stored in the configuration.
pub fn validate_mode(value: &str) -> Result<(), InvalidModeError> {
    value.parse::<ExecutionPolicy>().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_the_four_literals() {
        for value in ["", "enable", "filter", "disable"] {
            assert!(validate_mode(value).is_ok(), "{:?} should be valid", value);
        }
    }

    #[test]
    fn test_rejects_everything_else_verbatim() {
        for value in ["allow", "Enable", "DISABLE", " enable", "filter ", "deny", "none"] {
            let err = validate_mode(value).expect_err("should be rejected");
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn test_as_str_parses_back() {
        for mode in [
            ExecutionPolicy::Unconfigured,
            ExecutionPolicy::Enable,
            ExecutionPolicy::Filter,
            ExecutionPolicy::Disable,
        ] {
            assert_eq!(mode.as_str().parse::<ExecutionPolicy>(), Ok(mode));
        }
    }

    #[test]
    fn test_unconfigured_falls_back_to_default() {
        assert_eq!(
            ExecutionPolicy::Unconfigured.resolve(ExecutionPolicy::Disable),
            EffectiveMode::Disable
        );
        assert_eq!(
            ExecutionPolicy::Unconfigured.resolve(ExecutionPolicy::Filter),
            EffectiveMode::Filter
        );
    }

    #[test]
    fn test_unconfigured_everywhere_means_enable() {
        assert_eq!(
            ExecutionPolicy::Unconfigured.resolve(ExecutionPolicy::Unconfigured),
            EffectiveMode::Enable
        );
    }

    #[test]
    fn test_configured_mode_ignores_default() {
        assert_eq!(
            ExecutionPolicy::Enable.resolve(ExecutionPolicy::Disable),
            EffectiveMode::Enable
        );
        assert_eq!(
            ExecutionPolicy::Disable.resolve(ExecutionPolicy::Enable),
            EffectiveMode::Disable
        );
    }

    #[test]
    fn test_yaml_representation() {
        let mode: ExecutionPolicy = serde_yaml::from_str("filter").expect("parse failed");
        assert_eq!(mode, ExecutionPolicy::Filter);
        let mode: ExecutionPolicy = serde_yaml::from_str("''").expect("parse failed");
        assert_eq!(mode, ExecutionPolicy::Unconfigured);
    }
}
