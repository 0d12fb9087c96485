//! Output formatter trait

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use crate::output::json::JsonFormatter;
use crate::output::report::RunReport;
use arbiter_domain::{
    AnalysisResult, AuditEntry, ChainVerification, EscalationRecord,
    UserActivity,
};

/// Renders command results for the terminal
pub trait OutputFormatter {
    fn analysis(&self, analysis: &AnalysisResult) -> String;

    /// `None` means the analysis did not escalate.
    fn escalation(&self, record: Option<&EscalationRecord>) -> String;

    /// Full result of a scenario run
    fn run(&self, report: &RunReport) -> String;

    fn verification(&self, result: &ChainVerification) -> String;

    fn audit_entries(&self, entries: &[AuditEntry]) -> String;

    fn activity(&self, activity: &UserActivity) -> String;
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
