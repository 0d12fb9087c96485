//! Evidence citer trait and the default transcript matcher

use super::sources::EvidenceSources;
use crate::analysis::Finding;
use thiserror::Error;

const EXCERPT_CHARS: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvidenceError {
    #[error("No evidence sources supplied")]
    NoSources,

    #[error("Citation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationSource {
    Meeting { speaker: String },
    Chat { user: String },
}

/// A piece of source material that backs a finding's evidence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// `M…` for meeting statements, `C…` for chat messages
    pub id: String,
    pub source: CitationSource,
    pub excerpt: String,
    pub timestamp: Option<String>,
}

impl Citation {
    pub fn render(&self) -> String {
        let timestamp = self.timestamp.as_deref().unwrap_or("unknown");
        match &self.source {
            CitationSource::Meeting { speaker } => format!(
                "- Statement {}, speaker: {}, time: {}\n  \"{}\"",
                self.id, speaker, timestamp, self.excerpt
            ),
            CitationSource::Chat { user } => format!(
                "- Message {}, user: {}, time: {}\n  \"{}\"",
                self.id, user, timestamp, self.excerpt
            ),
        }
    }
}

/// Attaches source citations to an escalation reason.
///
/// Implementations must return the reason unchanged when nothing matches.
pub trait EvidenceCiter: Send + Sync {
    fn cite(
        &self,
        reason: &str,
        findings: &[Finding],
        sources: &EvidenceSources,
    ) -> Result<String, EvidenceError>;
}

/// Matches finding evidence against transcript statements and chat messages
/// by substring.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptEvidenceCiter;

impl TranscriptEvidenceCiter {
    pub fn new() -> Self {
        Self
    }

    pub fn citations(&self, findings: &[Finding], sources: &EvidenceSources) -> Vec<Citation> {
        let evidence: Vec<&str> = findings
            .iter()
            .flat_map(|f| f.evidence.iter())
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .collect();
        if evidence.is_empty() {
            return Vec::new();
        }

        let mut citations = Vec::new();

        for statement in sources.statements() {
            if evidence.iter().any(|e| statement.text.contains(e)) {
                citations.push(Citation {
                    id: statement.id,
                    source: CitationSource::Meeting {
                        speaker: statement.speaker,
                    },
                    excerpt: excerpt(&statement.text),
                    timestamp: statement.timestamp,
                });
            }
        }

        for (index, message) in sources.messages.iter().enumerate() {
            if evidence.iter().any(|e| message.text.contains(e)) {
                let user = if message.user.is_empty() {
                    "unknown".to_string()
                } else {
                    message.user.clone()
                };
                citations.push(Citation {
                    id: format!("C{:03}", index),
                    source: CitationSource::Chat { user },
                    excerpt: excerpt(&message.text),
                    timestamp: message.timestamp.clone(),
                });
            }
        }

        citations
    }
}

impl EvidenceCiter for TranscriptEvidenceCiter {
    fn cite(
        &self,
        reason: &str,
        findings: &[Finding],
        sources: &EvidenceSources,
    ) -> Result<String, EvidenceError> {
        if sources.is_empty() {
            return Err(EvidenceError::NoSources);
        }

        let citations = self.citations(findings, sources);
        if citations.is_empty() {
            return Ok(reason.to_string());
        }

        let rendered: Vec<String> = citations.iter().map(Citation::render).collect();
        Ok(format!("{}\n\nEvidence:\n{}", reason, rendered.join("\n")))
    }
}

/// First `EXCERPT_CHARS` characters, on a char boundary.
fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::ChatMessage;

    fn sources() -> EvidenceSources {
        EvidenceSources {
            transcript: [
                "[10:00:00] Tanaka: The Q3 target was revised downward again.",
                "[10:02:10] Sato: We stay the course.",
            ]
            .join("\n"),
            messages: vec![
                ChatMessage {
                    user: "suzuki".to_string(),
                    text: "I disagree, the Q3 target was revised downward twice".to_string(),
                    timestamp: Some("2026-01-10T10:05:00Z".to_string()),
                },
                ChatMessage {
                    user: String::new(),
                    text: "lunch?".to_string(),
                    timestamp: None,
                },
            ],
        }
    }

    fn finding() -> Finding {
        Finding::new("B1", "justification").with_evidence("target was revised downward")
    }

    #[test]
    fn test_citations_from_meeting_and_chat() {
        let citations = TranscriptEvidenceCiter::new().citations(&[finding()], &sources());

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].id, "M000");
        assert_eq!(
            citations[0].source,
            CitationSource::Meeting {
                speaker: "Tanaka".to_string()
            }
        );
        assert_eq!(citations[0].timestamp.as_deref(), Some("10:00:00"));
        assert_eq!(citations[1].id, "C000");
    }

    #[test]
    fn test_cite_appends_evidence_block() {
        let cited = TranscriptEvidenceCiter::new()
            .cite("Approval needed.", &[finding()], &sources())
            .unwrap();

        assert!(cited.starts_with("Approval needed.\n\nEvidence:\n"));
        assert!(cited.contains("Statement M000, speaker: Tanaka"));
        assert!(cited.contains("Message C000, user: suzuki"));
    }

    #[test]
    fn test_cite_without_match_keeps_reason() {
        let finding = Finding::new("B1", "x").with_evidence("nothing like this");
        let cited = TranscriptEvidenceCiter::new()
            .cite("Approval needed.", &[finding], &sources())
            .unwrap();
        assert_eq!(cited, "Approval needed.");
    }

    #[test]
    fn test_source_must_contain_whole_evidence() {
        // "We stay the course." is contained in the evidence, not the other way round.
        let finding = Finding::new("B1", "x").with_evidence("We stay the course. No change.");
        let citations = TranscriptEvidenceCiter::new().citations(&[finding], &sources());
        assert!(citations.is_empty());
    }

    #[test]
    fn test_ids_are_zero_based() {
        let finding = Finding::new("B1", "x").with_evidence("lunch");
        let citations = TranscriptEvidenceCiter::new().citations(&[finding], &sources());
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].id, "C001");

        let finding = Finding::new("B1", "x").with_evidence("stay the course");
        let citations = TranscriptEvidenceCiter::new().citations(&[finding], &sources());
        assert_eq!(citations[0].id, "M001");
    }

    #[test]
    fn test_cite_without_sources_is_an_error() {
        let result =
            TranscriptEvidenceCiter::new().cite("reason", &[finding()], &EvidenceSources::default());
        assert_eq!(result, Err(EvidenceError::NoSources));
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        assert_eq!(excerpt(&long).chars().count(), 100);
    }
}
