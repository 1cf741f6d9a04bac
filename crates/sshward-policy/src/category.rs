use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A class of SSH request that is subject to its own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Env,
    Command,
    Shell,
    Subsystem,
    Tty,
    Signal,
}

impl Category {
    /// Validation order of the root configuration.
    pub const ALL: [Category; 6] = [
        Category::Env,
        Category::Command,
        Category::Shell,
        Category::Subsystem,
        Category::Tty,
        Category::Signal,
    ];

    /// Key of this category in the configuration file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Env => "env",
            Category::Command => "command",
            Category::Shell => "shell",
            Category::Subsystem => "subsystem",
            Category::Tty => "tty",
            Category::Signal => "signal",
        }
    }

    /// Whether the category carries an allow list.
    pub fn has_allow(&self) -> bool {
        !matches!(self, Category::Shell | Category::Tty)
    }

    /// Whether the category carries a deny list.
    pub fn has_deny(&self) -> bool {
        matches!(self, Category::Env | Category::Subsystem | Category::Signal)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}
