use serde::{Deserialize, Serialize};

/// Environment variable carrying the client's request when a forced command runs.
pub const ORIGINAL_COMMAND_ENV: &str = "SSH_ORIGINAL_COMMAND";

/// What the client asked a session channel to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgramRequest {
    Shell,
    Exec { command: String },
    Subsystem { name: String },
}

/// What the backend should actually start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Program {
    Shell,
    Exec(String),
    Subsystem(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launch {
    pub program: Program,
    /// Extra environment for the started program.
    pub env: Vec<(String, String)>,
    /// Set whenever the forced command replaced the request, shell requests included.
    pub forced: bool,
}

impl Launch {
    pub fn is_forced(&self) -> bool {
        self.forced
    }
}

/// Apply `force_command` (empty means unset) to a request.
///
/// Exec and subsystem requests become an exec of the forced command, with the
/// original command or subsystem name in [`ORIGINAL_COMMAND_ENV`]. A shell request
/// also runs the forced command but has no original command to pass on.
pub fn rewrite(force_command: &str, request: ProgramRequest) -> Launch {
    if force_command.is_empty() {
        let program = match request {
            ProgramRequest::Shell => Program::Shell,
            ProgramRequest::Exec { command } => Program::Exec(command),
            ProgramRequest::Subsystem { name } => Program::Subsystem(name),
        };
        return Launch {
            program,
            env: Vec::new(),
            forced: false,
        };
    }

    let original = match request {
        ProgramRequest::Shell => None,
        ProgramRequest::Exec { command } => Some(command),
        ProgramRequest::Subsystem { name } => Some(name),
    };

    Launch {
        program: Program::Exec(force_command.to_string()),
        env: original
            .map(|o| vec![(ORIGINAL_COMMAND_ENV.to_string(), o)])
            .unwrap_or_default(),
        forced: true,
    }
}

/// The command that ends up executing for a client exec request.
pub fn effective_command(force_command: &str, requested: &str) -> String {
    if force_command.is_empty() {
        requested.to_string()
    } else {
        force_command.to_string()
    }
}
