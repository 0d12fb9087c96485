//! Presentation layer for arbiter
//!
//! This crate contains CLI definitions, scenario files and output formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{AuditCommand, Cli, Command, OutputFormat};
pub use cli::scenario::{Scenario, ScriptedDecision};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, formatter_for};
pub use output::json::JsonFormatter;
pub use output::report::{ApprovalStep, RunReport};
