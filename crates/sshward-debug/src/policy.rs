use anyhow::{anyhow, Context, Result};
use serde_json::json;
use sshward_policy::{Category, Policy, PolicyConfig, Program, ProgramRequest};
use std::path::Path;

/// Load and validate a policy file, printing the full error chain on failure.
pub async fn validate(policy_file: &Path, format: &str) -> Result<()> {
    let config = PolicyConfig::from_file(policy_file)
        .with_context(|| format!("Failed to load policy {}", policy_file.display()))?;

    let result = match Policy::new(config) {
        Ok(policy) => json!({
            "valid": true,
            "defaultMode": policy.config().default_mode,
            "forceCommand": policy.force_command(),
            "maxSessions": policy.config().max_sessions,
        }),
        Err(e) => json!({
            "valid": false,
            "reason": format!("{:#}", anyhow::Error::new(e.clone())),
            "category": e.category(),
            "value": e.invalid_value(),
        }),
    };

    print_result(&result, format)?;

    if result["valid"].as_bool().unwrap_or(false) {
        Ok(())
    } else {
        Err(anyhow!("policy {} is invalid", policy_file.display()))
    }
}

/// Show how a single request would be decided.
pub async fn decide(policy_file: &Path, category: &str, value: &str, format: &str) -> Result<()> {
    let policy = load(policy_file)?;
    let category: Category = category.parse().map_err(|e: String| anyhow!(e))?;
    let result = decision_report(&policy, category, value);
    print_result(&result, format)
}

/// Show what would run for a shell, exec or subsystem request.
pub async fn launch(policy_file: &Path, kind: &str, value: &str, format: &str) -> Result<()> {
    let policy = load(policy_file)?;
    let request = program_request(kind, value)?;
    let result = launch_report(&policy, request);
    print_result(&result, format)
}

fn load(policy_file: &Path) -> Result<Policy> {
    sshward_gate::load_policy(policy_file)
        .with_context(|| format!("Failed to load policy {}", policy_file.display()))
}

fn program_request(kind: &str, value: &str) -> Result<ProgramRequest> {
    match kind {
        "shell" => Ok(ProgramRequest::Shell),
        "exec" => Ok(ProgramRequest::Exec {
            command: value.to_string(),
        }),
        "subsystem" => Ok(ProgramRequest::Subsystem {
            name: value.to_string(),
        }),
        other => Err(anyhow!(
            "Unknown request kind '{}': expected shell, exec or subsystem",
            other
        )),
    }
}

fn decision_report(policy: &Policy, category: Category, value: &str) -> serde_json::Value {
    json!({
        "category": category,
        "value": value,
        "configuredMode": policy.mode(category).as_str(),
        "effectiveMode": policy.effective_mode(category),
        "decision": policy.decide(category, value),
    })
}

fn launch_report(policy: &Policy, request: ProgramRequest) -> serde_json::Value {
    let (category, value) = match &request {
        ProgramRequest::Shell => (Category::Shell, String::new()),
        ProgramRequest::Exec { command } => (Category::Command, command.clone()),
        ProgramRequest::Subsystem { name } => (Category::Subsystem, name.clone()),
    };

    let mut report = decision_report(policy, category, &value);
    if policy.decide(category, &value).is_admit() {
        let launch = policy.launch(request);
        report["program"] = json!(launch.program);
        report["env"] = json!(launch.env);
        report["forced"] = json!(launch.is_forced());
    }
    report
}

fn print_result(result: &serde_json::Value, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if let Some(valid) = result.get("valid").and_then(|v| v.as_bool()) {
        println!("=== Policy Validation ===");
        println!("Result: {}", if valid { "✅ VALID" } else { "❌ INVALID" });
        if let Some(reason) = result.get("reason").and_then(|v| v.as_str()) {
            println!("Reason: {}", reason);
        }
        return Ok(());
    }

    let str_field = |key: &str| {
        result
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    println!("=== Policy Decision ===");
    println!("Category: {}", str_field("category"));
    if !str_field("value").is_empty() {
        println!("Value: {}", str_field("value"));
    }
    let configured = str_field("configuredMode");
    println!(
        "Mode: {} (configured: {})",
        str_field("effectiveMode"),
        if configured.is_empty() { "unset" } else { configured.as_str() }
    );
    println!(
        "Decision: {}",
        if str_field("decision") == "admit" {
            "✅ ADMIT"
        } else {
            "❌ DENY"
        }
    );

    if let Some(program) = result.get("program") {
        let program: Program = serde_json::from_value(program.clone())?;
        match program {
            Program::Shell => println!("Runs: login shell"),
            Program::Exec(command) => println!("Runs: {}", command),
            Program::Subsystem(name) => println!("Runs: subsystem {}", name),
        }
    }
    if let Some(env) = result.get("env").and_then(|v| v.as_array()) {
        for pair in env {
            if let (Some(k), Some(v)) = (pair[0].as_str(), pair[1].as_str()) {
                println!("Env: {}={}", k, v);
            }
        }
    }

    Ok(())
}
