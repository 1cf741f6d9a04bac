use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod policy;

#[derive(Parser)]
#[command(name = "sshward-debug")]
#[command(about = "Inspect sshward policies without running an SSH server")]
#[command(version)]
struct Cli {
    /// Output format: json, text (default: text)
    #[arg(long, global = true, default_value = "text")]
    format: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a policy file is valid
    Validate {
        /// Policy file to check
        policy: PathBuf,
    },

    /// Decide a single request
    Decide {
        /// Policy file to test
        policy: PathBuf,

        /// Request category: env, command, shell, subsystem, tty, signal
        category: String,

        /// Candidate value (variable name, command, subsystem or signal)
        #[arg(default_value = "")]
        value: String,
    },

    /// Show what runs for a shell, exec or subsystem request
    Launch {
        /// Policy file to test
        policy: PathBuf,

        /// Request kind: shell, exec, subsystem
        kind: String,

        /// Command line or subsystem name
        #[arg(default_value = "")]
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Validate { policy } => {
            policy::validate(&policy, &cli.format).await?;
        }
        Commands::Decide {
            policy,
            category,
            value,
        } => {
            policy::decide(&policy, &category, &value, &cli.format).await?;
        }
        Commands::Launch {
            policy,
            kind,
            value,
        } => {
            policy::launch(&policy, &kind, &value, &cli.format).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_file_is_positional() {
        let cli = Cli::try_parse_from([
            "sshward-debug",
            "decide",
            "/etc/sshward/policy.yaml",
            "env",
            "LANG",
            "--format",
            "json",
        ])
        .expect("parse");

        assert_eq!(cli.format, "json");
        match cli.command {
            Commands::Decide {
                policy,
                category,
                value,
            } => {
                assert_eq!(policy, PathBuf::from("/etc/sshward/policy.yaml"));
                assert_eq!(category, "env");
                assert_eq!(value, "LANG");
            }
            _ => panic!("expected decide"),
        }
    }

    #[test]
    fn test_policy_file_is_required() {
        assert!(Cli::try_parse_from(["sshward-debug", "validate"]).is_err());

        let cli = Cli::try_parse_from(["sshward-debug", "launch", "policy.yaml", "shell"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Launch { ref kind, ref value, .. } if kind == "shell" && value.is_empty()
        ));
    }
}
