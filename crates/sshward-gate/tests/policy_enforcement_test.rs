use sshward_gate::{load_policy, AuditConfig, AuditLogger, ConnectionGate, GateError};
use sshward_policy::{Category, Program, ProgramRequest};
use std::io::Write;
use std::sync::Arc;

const RESTRICTED: &str = r#"
defaultMode: disable
forceCommand: /usr/local/bin/git-shell-wrapper
env:
  mode: filter
  allow: [LANG, LC_ALL]
command:
  mode: filter
  allow:
    - git-upload-pack 'repo.git'
    - git-receive-pack 'repo.git'
signal:
  mode: enable
  deny: [KILL]
maxSessions: 1
"#;

fn write_policy(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("tempfile");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[test]
fn test_restricted_git_host() {
    let file = write_policy(RESTRICTED);
    let policy = load_policy(file.path()).expect("policy should load");
    let gate = ConnectionGate::new(Arc::new(policy), Arc::new(AuditLogger::disabled()));

    let _session = gate.open_session().expect("first session");
    assert!(gate.open_session().is_err());

    assert!(gate.check_env("LANG").is_ok());
    assert!(gate.check_env("PATH").is_err());
    assert!(gate.check_pty().is_err());
    assert!(gate.check_signal("TERM").is_ok());
    assert!(gate.check_signal("KILL").is_err());
    assert!(gate.check_program(ProgramRequest::Shell).is_err());
    assert!(gate
        .check_program(ProgramRequest::Subsystem {
            name: "sftp".to_string()
        })
        .is_err());

    let launch = gate
        .check_program(ProgramRequest::Exec {
            command: "git-upload-pack 'repo.git'".to_string(),
        })
        .expect("listed command");
    assert_eq!(
        launch.program,
        Program::Exec("/usr/local/bin/git-shell-wrapper".to_string())
    );
    assert!(launch.is_forced());
}

#[test]
fn test_invalid_policy_refuses_to_start() {
    let file = write_policy("defaultMode: enable\ncommand:\n  mode: allow\n");
    let err = load_policy(file.path()).expect_err("should fail closed");
    match err {
        GateError::InvalidPolicy(e) => {
            assert_eq!(e.category(), Some(Category::Command));
            assert_eq!(e.invalid_value(), "allow");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unreadable_policy_refuses_to_start() {
    let err = load_policy("/nonexistent/policy.yaml").expect_err("should fail");
    assert!(matches!(err, GateError::PolicyLoad(_)));
    assert!(!err.is_refusal());
}

#[test]
fn test_decisions_reach_audit_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("audit.log");
    let audit = AuditLogger::with_config(&AuditConfig {
        log_file: Some(log.clone()),
        ..AuditConfig::default()
    });

    let file = write_policy(RESTRICTED);
    let policy = load_policy(file.path()).expect("policy should load");
    let gate = ConnectionGate::new(Arc::new(policy), Arc::new(audit));

    let _ = gate.check_env("PATH");
    let slot = gate.open_session().expect("session");
    gate.close_session(slot);

    let content = std::fs::read_to_string(&log).expect("read audit log");
    let entries: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["decision"], "deny");
    assert_eq!(entries[0]["connection_id"], gate.id());
    assert_eq!(entries[1]["event"], "session_open");
    assert_eq!(entries[2]["event"], "session_close");
    assert_eq!(entries[2]["open_sessions"], 0);
}
