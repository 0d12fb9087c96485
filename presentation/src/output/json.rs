//! JSON output

use crate::output::formatter::OutputFormatter;
use crate::output::report::RunReport;
use arbiter_domain::{
    AnalysisResult, AuditEntry, ChainVerification, EscalationRecord,
    UserActivity,
};
use serde::Serialize;

/// Pretty-printed JSON, one document per call
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn analysis(&self, analysis: &AnalysisResult) -> String {
        Self::render(analysis)
    }

    fn escalation(&self, record: Option<&EscalationRecord>) -> String {
        Self::render(&record)
    }

    fn run(&self, report: &RunReport) -> String {
        Self::render(report)
    }

    fn verification(&self, result: &ChainVerification) -> String {
        Self::render(result)
    }

    fn audit_entries(&self, entries: &[AuditEntry]) -> String {
        Self::render(entries)
    }

    fn activity(&self, activity: &UserActivity) -> String {
        Self::render(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_escalation_is_null() {
        assert_eq!(JsonFormatter.escalation(None), "null");
    }

    #[test]
    fn test_verification_fields() {
        let rendered = JsonFormatter.verification(&ChainVerification::intact(3));
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["valid"], true);
        assert_eq!(value["total_entries"], 3);
        assert!(value["invalid_index"].is_null());
    }
}
