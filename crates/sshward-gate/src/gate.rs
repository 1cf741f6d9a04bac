use sshward_policy::{Category, Decision, Launch, Policy, ProgramRequest};
use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::error::{GateError, Result};
use crate::session_limiter::{SessionLimiter, SessionSlot};

/// Policy enforcement for the requests of one SSH connection.
///
/// The SSH handler calls one `check_*` method per channel request and only acts on
/// the request when it returns `Ok`.
pub struct ConnectionGate {
    id: String,
    policy: Arc<Policy>,
    sessions: SessionLimiter,
    audit: Arc<AuditLogger>,
}

impl ConnectionGate {
    pub fn new(policy: Arc<Policy>, audit: Arc<AuditLogger>) -> Self {
        let sessions = SessionLimiter::new(policy.max_sessions());
        ConnectionGate {
            id: uuid::Uuid::new_v4().to_string(),
            policy,
            sessions,
            audit,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn open_sessions(&self) -> u32 {
        self.sessions.open_count()
    }

    /// Claim a session channel. Hold the slot for as long as the channel is open.
    pub fn open_session(&self) -> Result<SessionSlot> {
        match self.sessions.try_open() {
            Ok(slot) => {
                let open = self.sessions.open_count();
                tracing::debug!(connection = %self.id, open, "Session channel opened");
                self.audit.log_session(&self.id, true, open);
                Ok(slot)
            }
            Err(e) => {
                tracing::warn!(connection = %self.id, "Session channel refused: {}", e);
                Err(e)
            }
        }
    }

    pub fn close_session(&self, slot: SessionSlot) {
        drop(slot);
        let open = self.sessions.open_count();
        tracing::debug!(connection = %self.id, open, "Session channel closed");
        self.audit.log_session(&self.id, false, open);
    }

    /// `env` request for variable `name`.
    pub fn check_env(&self, name: &str) -> Result<()> {
        self.check(Category::Env, name, false)
    }

    /// `pty-req` request.
    pub fn check_pty(&self) -> Result<()> {
        self.check(Category::Tty, "", false)
    }

    /// `signal` request for signal `name` (without the `SIG` prefix, as on the wire).
    pub fn check_signal(&self, name: &str) -> Result<()> {
        self.check(Category::Signal, name, false)
    }

    /// `shell`, `exec` or `subsystem` request.
    ///
    /// The request is judged under its own category first; only an admitted request
    /// is rewritten to the forced command.
    pub fn check_program(&self, request: ProgramRequest) -> Result<Launch> {
        let forced = self.policy.force_command().is_some();
        let (category, candidate) = match &request {
            ProgramRequest::Shell => (Category::Shell, ""),
            ProgramRequest::Exec { command } => (Category::Command, command.as_str()),
            ProgramRequest::Subsystem { name } => (Category::Subsystem, name.as_str()),
        };
        self.check(category, candidate, forced)?;

        let launch = self.policy.launch(request);
        if launch.is_forced() {
            tracing::info!(
                connection = %self.id,
                requested = %category,
                "Running forced command instead of client request"
            );
        }
        Ok(launch)
    }

    fn check(&self, category: Category, candidate: &str, forced: bool) -> Result<()> {
        let mode = self.policy.effective_mode(category);
        let decision = self.policy.decide(category, candidate);
        self.audit
            .log_decision(&self.id, category, candidate, mode, decision, forced);
        let logged = self.audit.loggable_candidate(category, candidate);
        let logged = logged.as_deref().unwrap_or("");

        match decision {
            Decision::Admit => {
                tracing::debug!(
                    connection = %self.id,
                    %category,
                    candidate = logged,
                    %mode,
                    "Request admitted"
                );
                Ok(())
            }
            Decision::Deny => {
                tracing::warn!(
                    connection = %self.id,
                    %category,
                    candidate = logged,
                    %mode,
                    "Request denied by policy"
                );
                Err(GateError::Denied {
                    category,
                    candidate: candidate.to_string(),
                })
            }
        }
    }
}
