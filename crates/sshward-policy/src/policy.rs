use crate::category::Category;
use crate::config::PolicyConfig;
use crate::error::{CategoryError, ConfigError};
use crate::launch::{self, Launch, ProgramRequest};
use crate::mode::{EffectiveMode, ExecutionPolicy};
use crate::resolver::{self, Decision};
use std::num::NonZeroU32;

/// A validated, read-only policy. Share it between connections with `Arc`.
#[derive(Debug, Clone)]
pub struct Policy {
    config: PolicyConfig,
    default_mode: ExecutionPolicy,
    modes: [ExecutionPolicy; 6],
}

impl Policy {
    /// Validate `config` and take ownership of it.
    pub fn new(config: PolicyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let default_mode = config
            .default_mode
            .parse::<ExecutionPolicy>()
            .map_err(ConfigError::DefaultMode)?;
        let mut modes = [ExecutionPolicy::Unconfigured; 6];
        for (slot, category) in modes.iter_mut().zip(Category::ALL) {
            *slot = config
                .category(category)
                .mode()
                .parse::<ExecutionPolicy>()
                .map_err(|source| CategoryError { category, source })?;
        }

        Ok(Policy {
            config,
            default_mode,
            modes,
        })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// The configured mode of `category`, before fallback.
    pub fn mode(&self, category: Category) -> ExecutionPolicy {
        self.modes[Self::index(category)]
    }

    pub fn effective_mode(&self, category: Category) -> EffectiveMode {
        self.mode(category).resolve(self.default_mode)
    }

    /// Admission for `candidate` in `category`. Shell and TTY requests have no
    /// candidate; pass an empty string.
    pub fn decide(&self, category: Category, candidate: &str) -> Decision {
        let block = self.config.category(category);
        resolver::decide(
            self.effective_mode(category),
            block.allow(),
            block.deny(),
            candidate,
        )
    }

    /// The forced command, if one is configured.
    pub fn force_command(&self) -> Option<&str> {
        Some(self.config.force_command.as_str()).filter(|c| !c.is_empty())
    }

    /// Session channel cap per connection; `None` means unlimited.
    pub fn max_sessions(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.config.max_sessions)
    }

    /// Apply the forced command to an already admitted request.
    pub fn launch(&self, request: ProgramRequest) -> Launch {
        launch::rewrite(&self.config.force_command, request)
    }

    fn index(category: Category) -> usize {
        match category {
            Category::Env => 0,
            Category::Command => 1,
            Category::Shell => 2,
            Category::Subsystem => 3,
            Category::Tty => 4,
            Category::Signal => 5,
        }
    }
}

impl TryFrom<PolicyConfig> for Policy {
    type Error = ConfigError;

    fn try_from(config: PolicyConfig) -> Result<Self, Self::Error> {
        Policy::new(config)
    }
}
