use sshward_policy::{Category, ConfigError, LoadError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("{category} request denied by policy: {candidate:?}")]
    Denied { category: Category, candidate: String },

    #[error("session limit of {max} reached")]
    SessionLimit { max: u32 },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("failed to load policy")]
    PolicyLoad(#[from] LoadError),

    #[error("policy rejected")]
    InvalidPolicy(#[from] ConfigError),
}

impl GateError {
    /// True for refusals the client caused, as opposed to local failures.
    pub fn is_refusal(&self) -> bool {
        matches!(self, GateError::Denied { .. } | GateError::SessionLimit { .. })
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
