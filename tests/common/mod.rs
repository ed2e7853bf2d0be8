//! Common test utilities and fixtures

#![allow(dead_code)]

use bayes_filter::{Label, SpamClassifier};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const EPSILON: f64 = 0.001;

/// Ham messages of the basic corpus: 14 distinct words, "a" in both messages
pub const BASIC_HAM: &[(&str, &str)] = &[
    ("ham1.txt", "foo is a sentence bar foo"),
    (
        "ham2.txt",
        "please send me a great ham sandwich a totally legitimate message",
    ),
];

/// Spam messages of the basic corpus: 26 distinct words
pub const BASIC_SPAM: &[(&str, &str)] = &[
    (
        "spam1.txt",
        "buy replica watches available on great prices please",
    ),
    ("spam2.txt", "please enter your credit card information"),
    (
        "spam3.txt",
        "send me money Nigerian oil a totally legitimate ham sandwich message\nenter your password foo foo",
    ),
];

/// Split on whitespace the same way the corpus loader does
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// A classifier trained in memory on the basic corpus
pub fn basic_classifier() -> SpamClassifier {
    let mut classifier = SpamClassifier::new();
    for (_, text) in BASIC_HAM {
        classifier.train(&words(text), Label::Ham);
    }
    for (_, text) in BASIC_SPAM {
        classifier.train(&words(text), Label::Spam);
    }
    classifier
}

/// Write `files` into `dir`, creating it if needed
pub fn write_messages(dir: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents).unwrap();
    }
}

/// On-disk layout of a labeled corpus: `spam/`, `ham/` and optional test directories
pub struct CorpusFixture {
    pub root: TempDir,
}

impl CorpusFixture {
    pub fn new(spam: &[(&str, &str)], ham: &[(&str, &str)]) -> Self {
        let root = TempDir::new().unwrap();
        write_messages(&root.path().join("spam"), spam);
        write_messages(&root.path().join("ham"), ham);
        Self { root }
    }

    pub fn basic() -> Self {
        Self::new(BASIC_SPAM, BASIC_HAM)
    }

    pub fn with_held_out(self, spam_test: &[(&str, &str)], ham_test: &[(&str, &str)]) -> Self {
        write_messages(&self.spam_test_dir(), spam_test);
        write_messages(&self.ham_test_dir(), ham_test);
        self
    }

    pub fn spam_dir(&self) -> PathBuf {
        self.root.path().join("spam")
    }

    pub fn ham_dir(&self) -> PathBuf {
        self.root.path().join("ham")
    }

    pub fn spam_test_dir(&self) -> PathBuf {
        self.root.path().join("spamtest")
    }

    pub fn ham_test_dir(&self) -> PathBuf {
        self.root.path().join("hamtest")
    }
}
