//! Authorization policy for SSH session requests.
//!
//! A [`PolicyConfig`] is loaded from YAML or JSON, turned into a validated [`Policy`]
//! once, and then consulted for every env, exec, shell, subsystem, pty and signal
//! request a client sends.

pub mod category;
pub mod config;
pub mod error;
pub mod launch;
pub mod mode;
pub mod policy;
pub mod resolver;

pub use category::Category;
pub use config::{
    CategoryConfig, CommandConfig, EnvConfig, ListConfig, ModeConfig, PolicyConfig, ShellConfig,
    SignalConfig, SubsystemConfig, TtyConfig,
};
pub use error::{CategoryError, ConfigError, InvalidModeError, LoadError};
pub use launch::{Launch, Program, ProgramRequest, ORIGINAL_COMMAND_ENV};
pub use mode::{EffectiveMode, ExecutionPolicy};
pub use policy::Policy;
pub use resolver::Decision;

/// Reject a structurally invalid configuration.
pub fn validate_config(config: &PolicyConfig) -> Result<(), ConfigError> {
    config.validate()
}

/// Admission for `candidate` in `category` under a validated policy.
pub fn decide(policy: &Policy, category: Category, candidate: &str) -> Decision {
    policy.decide(category, candidate)
}

/// The command that runs for a client exec request of `requested`.
pub fn effective_command(config: &PolicyConfig, requested: &str) -> String {
    launch::effective_command(&config.force_command, requested)
}
