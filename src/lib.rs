//! Bayesian Spam Filter
//!
//! A word-presence Naive Bayes classifier trained from directories of labeled
//! plain-text messages.
//!
//! # Overview
//!
//! - **Model**: per-class document-frequency tables and message counters
//! - **Scoring**: odds-ratio combination of per-word posteriors `P(spam | word)`
//! - **Corpora**: concurrent directory loading with whitespace tokenization
//! - **Evaluation**: held-out accuracy, precision and recall reports
//!
//! # Example Usage
//!
//! ```
//! use bayes_filter::{Label, SpamClassifier};
//!
//! let mut classifier = SpamClassifier::with_threshold(0.5);
//! classifier.train(&["please", "message", "me"], Label::Ham);
//! classifier.train(&["please", "buy", "now"], Label::Spam);
//!
//! assert_eq!(classifier.posterior("buy"), Some(1.0));
//! assert_eq!(classifier.posterior("unseen"), None);
//! assert!(classifier.is_spam(&["buy", "now"]));
//! ```
//!
//! # Module Organization
//!
//! - [`classifier`] - The Naive Bayes model
//! - [`corpus`] - Tokenization and corpus directory loading
//! - [`evaluation`] - Held-out evaluation and reports
//! - [`cli`] - Command-line interface
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`models`] - Shared data structures

pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod models;

pub use error::{FilterError, Result};

pub use classifier::SpamClassifier;
pub use models::{Label, ModelStats, Verdict};

pub use corpus::{read_directory, read_document, tokenize, Corpus, Document};

pub use evaluation::{evaluate, ConfusionMatrix, EvaluationReport};

pub use config::{ClassifierConfig, Config, CorpusConfig, ReportConfig};
