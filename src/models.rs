use serde::{Deserialize, Serialize};
use std::fmt;

/// Class label of a training or scored message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::Ham => "ham",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and decision for a single message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub name: String,
    pub score: f64,
    pub threshold: f64,
    pub label: Label,
}

impl Verdict {
    pub fn is_spam(&self) -> bool {
        self.label == Label::Spam
    }
}

/// Snapshot of a trained model's corpus statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelStats {
    pub spam_messages: u64,
    pub ham_messages: u64,
    pub spam_vocabulary: usize,
    pub ham_vocabulary: usize,
    /// Words seen in at least one message of each class
    pub shared_vocabulary: usize,
    pub total_vocabulary: usize,
}
