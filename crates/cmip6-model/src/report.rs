//! Check results and diagnostic messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity classification of a whole check pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    Low,
    Medium,
    High,
}

/// Classification of an individual diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// An attribute is absent where required.
    MissingAttribute,
    /// An attribute is present but fails its validation rule.
    InvalidValue,
    /// Cross-field mismatch: filename vs attribute, computed vs stored
    /// identifier, parent cluster inconsistency.
    InconsistentValue,
    /// A CV lookup named a collection the CV source does not recognize.
    UnknownCvCollection,
    /// A filename date range is unparsable or inverted.
    MalformedDateRange,
    /// A frequency value outside the known template table.
    UnsupportedFrequency,
}

/// One diagnostic produced by a check pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl CheckMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Aggregated outcome of one check pass over one data file.
///
/// Checks are pass/fail: `max_score` is always 1 and `score` is derived from
/// the message list, so the message list is empty exactly when the check
/// passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub level: CheckLevel,
    pub score: u32,
    pub max_score: u32,
    pub name: String,
    pub messages: Vec<CheckMessage>,
}

impl CheckResult {
    /// Build a result from accumulated diagnostics.
    pub fn from_messages(
        level: CheckLevel,
        name: impl Into<String>,
        messages: Vec<CheckMessage>,
    ) -> Self {
        let score = u32::from(messages.is_empty());
        Self {
            level,
            score,
            max_score: 1,
            name: name.into(),
            messages,
        }
    }

    pub fn passed(&self) -> bool {
        self.score == self.max_score
    }

    /// Messages of one kind, for hosts that filter diagnostics.
    pub fn messages_of_kind(&self, kind: MessageKind) -> impl Iterator<Item = &CheckMessage> {
        self.messages.iter().filter(move |message| message.kind == kind)
    }
}
