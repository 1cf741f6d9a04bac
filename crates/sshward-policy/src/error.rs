use crate::category::Category;
use thiserror::Error;

/// A mode string outside `"" | "enable" | "filter" | "disable"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid mode: {value:?}")]
pub struct InvalidModeError {
    pub value: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {category} configuration")]
pub struct CategoryError {
    pub category: Category,
    #[source]
    pub source: InvalidModeError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid defaultMode configuration")]
    DefaultMode(#[source] InvalidModeError),

    #[error("invalid {} configuration", .0.category)]
    Category(#[source] CategoryError),
}

impl ConfigError {
    /// The category that failed, or `None` when the root default mode is at fault.
    pub fn category(&self) -> Option<Category> {
        match self {
            ConfigError::DefaultMode(_) => None,
            ConfigError::Category(e) => Some(e.category),
        }
    }

    /// The offending mode value, as written in the configuration source.
    pub fn invalid_value(&self) -> &str {
        match self {
            ConfigError::DefaultMode(e) => &e.value,
            ConfigError::Category(e) => &e.source.value,
        }
    }
}

impl From<CategoryError> for ConfigError {
    fn from(e: CategoryError) -> Self {
        ConfigError::Category(e)
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("policy configuration rejected")]
    Invalid(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_mode_names_value_verbatim() {
        let err = InvalidModeError {
            value: "Enabled ".to_string(),
        };
        assert_eq!(err.to_string(), "invalid mode: \"Enabled \"");
    }

    #[test]
    fn test_config_error_chain_reaches_root_cause() {
        let err = ConfigError::from(CategoryError {
            category: Category::Signal,
            source: InvalidModeError {
                value: "deny".to_string(),
            },
        });

        assert_eq!(err.to_string(), "invalid signal configuration");
        assert_eq!(err.category(), Some(Category::Signal));
        assert_eq!(err.invalid_value(), "deny");

        let category = err.source().expect("category cause");
        assert_eq!(category.to_string(), "invalid signal configuration");
        let root = category
            .source()
            .and_then(|e| e.downcast_ref::<InvalidModeError>())
            .expect("mode cause");
        assert_eq!(root.value, "deny");
    }
}
