//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    Text,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for arbiter
#[derive(Parser, Debug)]
#[command(name = "arbiter")]
#[command(author, version, about = "Escalation and approval engine for decision-making anti-patterns")]
#[command(long_about = r#"
Arbiter scores findings about organizational decision-making, decides whether
to escalate them to humans, drives multi-stage approval, and keeps a
hash-chained audit log of every decision.

Configuration files are loaded from (in priority order):
1. ARBITER_<SECTION>__<KEY>   Environment variables
2. --config <path>            Explicit config file
3. ./arbiter.toml             Project-level config
4. ~/.config/arbiter/config.toml   Global config

Example:
  arbiter assess findings.json
  arbiter run scenario.json
  arbiter audit verify
  arbiter audit activity alice --days 7
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score findings and role assessments into an analysis result
    Assess {
        /// JSON file with `findings` and optional `role_assessments`
        file: PathBuf,
    },

    /// Assess, escalate and apply the scripted approvals of a scenario
    Run {
        /// JSON scenario file
        scenario: PathBuf,
    },

    /// Inspect the audit log
    Audit {
        #[command(subcommand)]
        action: AuditCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    /// Recompute the hash chain and report the first broken entry
    Verify,

    /// List entries, newest first
    List {
        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        role: Option<String>,

        /// view_analysis, view_meeting, view_chat, escalate, approve, reject, execute
        #[arg(long)]
        action: Option<String>,

        #[arg(long)]
        resource_type: Option<String>,

        #[arg(long)]
        resource_id: Option<String>,

        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Summarize one user's recent actions
    Activity {
        user: String,

        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["arbiter", "-vv", "run", "scenario.json", "-o", "json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Some(Command::Run { .. })));
    }

    #[test]
    fn test_parse_audit_list() {
        let cli = Cli::parse_from([
            "arbiter", "audit", "list", "--user", "alice", "--action", "approve", "--limit", "5",
        ]);
        match cli.command {
            Some(Command::Audit {
                action: AuditCommand::List {
                    user, action, limit, ..
                },
            }) => {
                assert_eq!(user.as_deref(), Some("alice"));
                assert_eq!(action.as_deref(), Some("approve"));
                assert_eq!(limit, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_activity_default_days() {
        let cli = Cli::parse_from(["arbiter", "audit", "activity", "bob"]);
        assert!(matches!(
            cli.command,
            Some(Command::Audit {
                action: AuditCommand::Activity { days: 30, .. }
            })
        ));
    }

    #[test]
    fn test_show_config_without_command() {
        let cli = Cli::parse_from(["arbiter", "--show-config", "--no-config"]);
        assert!(cli.show_config);
        assert!(cli.no_config);
        assert!(cli.command.is_none());
    }
}
