//! Console output formatter

use crate::output::formatter::OutputFormatter;
use crate::output::report::{ApprovalStep, RunReport};
use arbiter_domain::{
    AnalysisResult, AuditEntry, ChainFailure, ChainVerification,
    EscalationRecord, EscalationStatus, Severity, Transition, UserActivity,
};
use colored::{ColoredString, Colorize};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    fn field(label: &str, value: impl std::fmt::Display) -> String {
        format!("{} {}\n", format!("{label}:").cyan().bold(), value)
    }

    fn severity(severity: Severity) -> ColoredString {
        match severity {
            Severity::Critical => severity.as_str().red().bold(),
            Severity::High => severity.as_str().red(),
            Severity::Medium => severity.as_str().yellow(),
            Severity::Low => severity.as_str().green(),
        }
    }

    fn status(status: EscalationStatus) -> ColoredString {
        let text = status.to_string();
        match status {
            EscalationStatus::Approved => text.green().bold(),
            EscalationStatus::Rejected => text.red().bold(),
            EscalationStatus::Pending => text.yellow(),
        }
    }

    fn step(step: &ApprovalStep) -> String {
        let what = match &step.transition {
            Transition::Ignored { reason } => format!("ignored ({reason})").dimmed(),
            Transition::Recorded { stage_id, missing } => {
                format!("recorded at {stage_id}, waiting on {}", missing.join(", ")).normal()
            }
            Transition::StageCompleted { from, to } => format!("{from} complete, now {to}").cyan(),
            Transition::Approved => "approved".green().bold(),
            Transition::Rejected => "rejected".red().bold(),
        };
        format!("  {} {}\n", format!("[{}]", step.role_id).bold(), what)
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn analysis(&self, analysis: &AnalysisResult) -> String {
        let mut output = Self::header("Analysis");
        output.push_str(&Self::field("Score", analysis.overall_score));
        output.push_str(&Self::field("Severity", Self::severity(analysis.severity)));
        output.push_str(&Self::field("Urgency", analysis.urgency));
        if let Some(rule) = analysis.rule_score {
            output.push_str(&Self::field("Rule score", format!("{rule:.1}")));
        }
        if let Some(llm) = analysis.llm_score {
            output.push_str(&Self::field("Role score", format!("{llm:.1}")));
        }

        if !analysis.findings.is_empty() {
            output.push_str(&format!("\n{}\n", "Findings:".cyan().bold()));
            for finding in &analysis.findings {
                output.push_str(&format!(
                    "  * {} {}\n",
                    finding.pattern.id().yellow(),
                    finding.description
                ));
            }
        }
        if !analysis.reasons.is_empty() {
            output.push_str(&format!("\n{}\n", "Reasons:".cyan().bold()));
            for reason in &analysis.reasons {
                output.push_str(&format!("  * {}\n", reason));
            }
        }
        output.push_str(&format!("\n{}\n", analysis.explanation));
        output
    }

    fn escalation(&self, record: Option<&EscalationRecord>) -> String {
        let Some(record) = record else {
            return format!("{}\n", "No escalation required.".dimmed());
        };

        let mut output = Self::header("Escalation");
        output.push_str(&Self::field("Id", &record.escalation_id));
        output.push_str(&Self::field("Tier", record.tier));
        if let Some(stage) = record.stage {
            let name = record.stage_name.as_deref().unwrap_or(stage.as_str());
            output.push_str(&Self::field("Stage", name));
        }
        if record.is_question() {
            output.push_str(&Self::field("Type", "clarifying question".magenta()));
        }
        output.push_str(&Self::field("Severity", Self::severity(record.severity)));
        output.push_str(&Self::field("Score", record.score));
        output.push_str(&Self::field("Target roles", record.target_roles.join(", ")));
        output.push_str(&Self::field("Status", Self::status(record.status)));
        if let Some(flow) = &record.approval_flow_id {
            let stage = record.current_stage_id.as_deref().unwrap_or("-");
            output.push_str(&Self::field("Approval flow", format!("{flow} @ {stage}")));
        }
        if let Some(confidence) = record.confidence {
            output.push_str(&Self::field("Confidence", format!("{confidence:.2}")));
        }
        if let Some(reason) = &record.degraded_reason {
            output.push_str(&Self::field("Degraded", reason.yellow()));
        }

        output.push_str(&format!(
            "\n{}\n{}\n",
            "Reason:".cyan().bold(),
            Self::indent(&record.reason, "  ")
        ));
        if let Some(question) = &record.question {
            output.push_str(&format!("\n{}\n", question.message.magenta()));
            for q in &question.questions {
                output.push_str(&format!("  ? {}\n", q));
            }
        }
        output
    }

    fn run(&self, report: &RunReport) -> String {
        let mut output = self.analysis(&report.analysis);
        output.push('\n');
        output.push_str(&self.escalation(report.escalation.as_ref()));

        if !report.approvals.is_empty() {
            output.push_str(&format!("\n{}\n", "Approvals:".cyan().bold()));
            for step in &report.approvals {
                output.push_str(&Self::step(step));
            }
        }
        if let Some(record) = &report.final_record {
            output.push_str(&format!("\n{}\n", "Final state:".cyan().bold()));
            output.push_str(&Self::field("Status", Self::status(record.status)));
            if let Some(stage) = &record.current_stage_id {
                output.push_str(&Self::field("Stage", stage));
            }
            let recorded: usize = record.stage_approvals.values().map(Vec::len).sum();
            output.push_str(&Self::field("Recorded approvals", recorded));
        }
        output
    }

    fn verification(&self, result: &ChainVerification) -> String {
        if result.valid {
            return format!(
                "{} {} entries verified\n",
                "Audit chain intact:".green().bold(),
                result.total_entries
            );
        }

        let detail = match &result.failure {
            Some(ChainFailure::LinkageMismatch { expected, found }) => {
                format!("prev_hash {found:?} does not follow {expected:?}")
            }
            Some(ChainFailure::HashMismatch { expected, found }) => {
                format!("entry_hash {found} should be {expected}")
            }
            Some(ChainFailure::Unparseable { location, message }) => {
                format!("{location} is not a valid entry: {message}")
            }
            Some(ChainFailure::Truncated { tail_hash, last_hash }) => {
                format!("log ends at {last_hash} but the recorded tail is {tail_hash}")
            }
            Some(ChainFailure::StoreUnavailable { message }) => message.clone(),
            None => String::new(),
        };
        let position = result
            .invalid_index
            .map(|i| format!(" at entry {i} of {}", result.total_entries))
            .unwrap_or_default();
        format!(
            "{}{}\n  {}\n",
            "Audit chain broken".red().bold(),
            position,
            detail
        )
    }

    fn audit_entries(&self, entries: &[AuditEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "No audit entries.".dimmed());
        }
        entries
            .iter()
            .map(|e| {
                format!(
                    "{} {:<14} {} ({}) {}:{}\n",
                    e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                    e.action.as_str().yellow(),
                    e.user_id,
                    e.role,
                    e.resource_type,
                    e.resource_id
                )
            })
            .collect()
    }

    fn activity(&self, activity: &UserActivity) -> String {
        let mut output = Self::header(&format!(
            "Activity of {} ({} days)",
            activity.user_id, activity.period_days
        ));
        output.push_str(&Self::field("Total actions", activity.total_actions));
        for (action, count) in &activity.action_counts {
            output.push_str(&format!("  {:<14} {}\n", action.as_str(), count));
        }
        if !activity.recent.is_empty() {
            output.push_str(&format!("\n{}\n", "Recent:".cyan().bold()));
            output.push_str(&self.audit_entries(&activity.recent));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_domain::{EscalationRecord, EscalationTier};
    use chrono::Utc;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_no_escalation() {
        plain();
        assert_eq!(ConsoleFormatter.escalation(None), "No escalation required.\n");
    }

    #[test]
    fn test_escalation_lists_flow() {
        plain();
        let mut record = EscalationRecord::new("a-1", EscalationTier::Staged, Utc::now());
        record.reason = "line one\nline two".to_string();
        record.approval_flow_id = Some("standard".to_string());
        record.current_stage_id = Some("review".to_string());

        let text = ConsoleFormatter.escalation(Some(&record));
        assert!(text.contains("Approval flow: standard @ review"));
        assert!(text.contains("  line one\n  line two"));
        assert!(text.contains("Status: pending"));
    }

    #[test]
    fn test_broken_chain_names_position() {
        plain();
        let result = ChainVerification::broken(
            2,
            5,
            ChainFailure::HashMismatch {
                expected: "aa".into(),
                found: "bb".into(),
            },
        );
        let text = ConsoleFormatter.verification(&result);
        assert!(text.contains("at entry 2 of 5"));
        assert!(text.contains("entry_hash bb should be aa"));
    }

    #[test]
    fn test_run_lists_steps() {
        plain();
        let record = EscalationRecord::new("a-1", EscalationTier::Staged, Utc::now());
        let mut report = RunReport::new(AnalysisResult::default(), Some(record.clone()));
        report.approvals.push(ApprovalStep {
            role_id: "Manager".into(),
            transition: Transition::StageCompleted {
                from: "manager".into(),
                to: "exec".into(),
            },
            status: EscalationStatus::Pending,
            current_stage_id: Some("exec".into()),
        });
        report.final_record = Some(record);

        let text = ConsoleFormatter.run(&report);
        assert!(text.contains("[Manager] manager complete, now exec"));
        assert!(text.contains("Final state:"));
    }

    #[test]
    fn test_truncated_chain_names_tail() {
        plain();
        let result = ChainVerification::broken(
            3,
            3,
            ChainFailure::Truncated {
                tail_hash: "cc".into(),
                last_hash: "bb".into(),
            },
        );
        let text = ConsoleFormatter.verification(&result);
        assert!(text.contains("at entry 3 of 3"));
        assert!(text.contains("log ends at bb but the recorded tail is cc"));
    }
}
