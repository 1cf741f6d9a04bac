use sshward_gate::{AuditLogger, ConnectionGate, GateError};
use sshward_policy::{Policy, PolicyConfig};
use std::sync::Arc;

fn gate(max_sessions: u32) -> Arc<ConnectionGate> {
    let policy = Policy::new(PolicyConfig {
        max_sessions,
        ..Default::default()
    })
    .expect("valid policy");
    Arc::new(ConnectionGate::new(
        Arc::new(policy),
        Arc::new(AuditLogger::disabled()),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_opens_never_exceed_cap() {
    let gate = gate(3);
    let barrier = Arc::new(tokio::sync::Barrier::new(32));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let gate = gate.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            gate.open_session()
        }));
    }

    let mut slots = Vec::new();
    let mut refused = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(slot) => slots.push(slot),
            Err(GateError::SessionLimit { max }) => {
                assert_eq!(max, 3);
                refused += 1;
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(slots.len(), 3);
    assert_eq!(refused, 29);
    assert_eq!(gate.open_sessions(), 3);

    drop(slots);
    assert_eq!(gate.open_sessions(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_open_close_churn_returns_to_zero() {
    let gate = gate(2);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let gate = gate.clone();
        handles.push(tokio::spawn(async move {
            let mut admitted = 0;
            for _ in 0..100 {
                if let Ok(slot) = gate.open_session() {
                    assert!(gate.open_sessions() <= 2);
                    admitted += 1;
                    tokio::task::yield_now().await;
                    gate.close_session(slot);
                }
            }
            admitted
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.expect("task panicked");
    }
    assert!(total > 0);
    assert_eq!(gate.open_sessions(), 0);
}

#[test]
fn test_limits_are_per_connection() {
    let policy = Arc::new(
        Policy::new(PolicyConfig {
            max_sessions: 1,
            ..Default::default()
        })
        .expect("valid policy"),
    );
    let audit = Arc::new(AuditLogger::disabled());
    let first = ConnectionGate::new(policy.clone(), audit.clone());
    let second = ConnectionGate::new(policy, audit);

    let _a = first.open_session().expect("first connection");
    let _b = second.open_session().expect("second connection has its own count");
    assert!(first.open_session().is_err());
}
