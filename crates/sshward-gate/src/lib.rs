pub mod audit;
pub mod config;
pub mod error;
pub mod gate;
pub mod session_limiter;

pub use audit::AuditLogger;
pub use config::{AuditConfig, GateConfig};
pub use error::{GateError, Result};
pub use gate::ConnectionGate;
pub use session_limiter::{SessionLimiter, SessionSlot};

use sshward_policy::{Policy, PolicyConfig};
use std::path::Path;

/// Load and validate a policy file. Any error means the server must not start.
pub fn load_policy(path: impl AsRef<Path>) -> Result<Policy> {
    let path = path.as_ref();
    tracing::info!("Loading policy from: {}", path.display());
    let config = PolicyConfig::from_file(path)?;
    let policy = Policy::new(config)?;
    tracing::info!(
        default_mode = %policy.config().default_mode,
        forced = policy.force_command().is_some(),
        max_sessions = policy.config().max_sessions,
        "Policy loaded"
    );
    Ok(policy)
}
