//! Raw material evidence is cited from

use serde::{Deserialize, Serialize};

/// One chat message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub user: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Meeting transcript and chat log belonging to one analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceSources {
    /// Plain-text transcript, one `[HH:MM:SS] speaker: text` statement per line
    pub transcript: String,
    pub messages: Vec<ChatMessage>,
}

impl EvidenceSources {
    pub fn is_empty(&self) -> bool {
        self.transcript.trim().is_empty() && self.messages.is_empty()
    }

    /// Parse the transcript into statements. Lines without a `speaker:`
    /// prefix are skipped; ids follow the line number (`M000`, `M001`, …).
    pub fn statements(&self) -> Vec<Statement> {
        self.transcript
            .lines()
            .enumerate()
            .filter_map(|(line_no, line)| Statement::parse(line_no, line))
            .collect()
    }
}

/// One parsed transcript statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: String,
    pub speaker: String,
    pub text: String,
    pub timestamp: Option<String>,
}

impl Statement {
    fn parse(line_no: usize, line: &str) -> Option<Self> {
        let line = line.trim();
        let (timestamp, rest) = match line.strip_prefix('[') {
            Some(stripped) => match stripped.split_once(']') {
                Some((ts, rest)) => (Some(ts.trim().to_string()), rest.trim_start()),
                None => (None, line),
            },
            None => (None, line),
        };

        let (speaker, text) = rest.split_once(':')?;
        let speaker = speaker.trim();
        if speaker.is_empty() {
            return None;
        }

        Some(Self {
            id: format!("M{:03}", line_no),
            speaker: speaker.to_string(),
            text: text.trim().to_string(),
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statements() {
        let sources = EvidenceSources {
            transcript: "[00:01:05] Tanaka: We will keep the plan.\nno speaker line\nSato: Revenue is down again."
                .to_string(),
            messages: Vec::new(),
        };

        let statements = sources.statements();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].id, "M000");
        assert_eq!(statements[0].speaker, "Tanaka");
        assert_eq!(statements[0].timestamp.as_deref(), Some("00:01:05"));
        assert_eq!(statements[0].text, "We will keep the plan.");
        assert_eq!(statements[1].id, "M002");
        assert!(statements[1].timestamp.is_none());
    }

    #[test]
    fn test_empty_speaker_is_skipped() {
        let sources = EvidenceSources {
            transcript: ": orphan text".to_string(),
            messages: Vec::new(),
        };
        assert!(sources.statements().is_empty());
    }

    #[test]
    fn test_is_empty() {
        assert!(EvidenceSources::default().is_empty());
        let sources = EvidenceSources {
            transcript: String::new(),
            messages: vec![ChatMessage::default()],
        };
        assert!(!sources.is_empty());
    }
}
