//! Word-presence Naive Bayes spam classifier
//!
//! The model keeps one document-frequency table per class: for every word, the number
//! of training messages of that class that contained it at least once. Scoring combines
//! the per-word posteriors `P(spam | word)` in odds-ratio form.

use crate::models::{Label, ModelStats};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Evidence used in place of a posterior of exactly 1.0 or 0.0, so a single
/// one-sided word cannot drive the score to certainty.
const CLAMPED_LIKELY: f64 = 0.95;
const CLAMPED_UNLIKELY: f64 = 0.05;

/// Bounds of the open interval `(0, 1)` in `f64`.
const MIN_SCORE: f64 = f64::MIN_POSITIVE;
const MAX_SCORE: f64 = 1.0 - f64::EPSILON / 2.0;

#[derive(Debug, Clone, Default)]
pub struct SpamClassifier {
    spam_counts: HashMap<String, u64>,
    ham_counts: HashMap<String, u64>,
    num_spam_messages: u64,
    num_ham_messages: u64,
    threshold: f64,
}

impl SpamClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Add one training message.
    ///
    /// Each distinct token increments its class count once, however often it repeats
    /// in the message. The class message counter always advances by one, also for an
    /// empty message.
    pub fn train<S: AsRef<str>>(&mut self, tokens: &[S], label: Label) {
        let (counts, messages) = match label {
            Label::Spam => (&mut self.spam_counts, &mut self.num_spam_messages),
            Label::Ham => (&mut self.ham_counts, &mut self.num_ham_messages),
        };

        let mut seen: HashSet<&str> = HashSet::with_capacity(tokens.len());
        for token in tokens {
            let word = token.as_ref();
            if seen.insert(word) {
                *counts.entry(word.to_string()).or_insert(0) += 1;
            }
        }
        *messages += 1;

        debug!(
            "Trained {} message: {} tokens, {} distinct",
            label,
            tokens.len(),
            seen.len()
        );
    }

    /// Number of training messages of `label` that contained `word`
    pub fn occurrence_count(&self, word: &str, label: Label) -> u64 {
        self.counts(label).get(word).copied().unwrap_or(0)
    }

    /// Number of training messages added with `label`
    pub fn message_count(&self, label: Label) -> u64 {
        match label {
            Label::Spam => self.num_spam_messages,
            Label::Ham => self.num_ham_messages,
        }
    }

    pub fn total_messages(&self) -> u64 {
        self.num_spam_messages + self.num_ham_messages
    }

    /// Every distinct word seen in at least one message of `label`
    pub fn vocabulary(&self, label: Label) -> HashSet<&str> {
        self.counts(label).keys().map(String::as_str).collect()
    }

    /// Every distinct word seen in any training message
    pub fn all_words(&self) -> HashSet<&str> {
        self.spam_counts
            .keys()
            .chain(self.ham_counts.keys())
            .map(String::as_str)
            .collect()
    }

    /// Share of training messages that contained `word`, across both classes.
    ///
    /// The denominator is the total message count, so this is a per-message frequency
    /// rather than a distribution over words.
    pub fn word_probability(&self, word: &str) -> f64 {
        let occurrences =
            self.occurrence_count(word, Label::Spam) + self.occurrence_count(word, Label::Ham);
        if occurrences == 0 {
            return 0.0;
        }
        occurrences as f64 / self.total_messages() as f64
    }

    /// Estimated `P(spam | word)`, or `None` when the word never occurred in training.
    ///
    /// A word seen only in spam yields exactly `1.0`, one seen only in ham exactly `0.0`.
    pub fn posterior(&self, word: &str) -> Option<f64> {
        match (self.spam_counts.get(word), self.ham_counts.get(word)) {
            (Some(&spam), Some(&ham)) => Some(spam as f64 / (spam + ham) as f64),
            (Some(_), None) => Some(1.0),
            (None, Some(_)) => Some(0.0),
            (None, None) => None,
        }
    }

    /// Spam score of a message in `(0, 1)`.
    ///
    /// Distinct tokens are combined in message order as `a / (a + b)` with
    /// `a = Π p` and `b = Π (1 - p)`. Unknown words are skipped, and posteriors of
    /// exactly 1.0 or 0.0 are clamped to 0.95 / 0.05. A message with no known words
    /// scores 0.5.
    ///
    /// If either product underflows, the ratio is taken from the log-space sums
    /// instead. A score closer to 0 or 1 than an `f64` can express is reported as the
    /// nearest value inside the interval.
    pub fn score<S: AsRef<str>>(&self, tokens: &[S]) -> f64 {
        let mut a = 1.0_f64;
        let mut b = 1.0_f64;
        // Log-space shadow of a and b, only read if either product underflows.
        let mut log_a = 0.0_f64;
        let mut log_b = 0.0_f64;

        let mut seen: HashSet<&str> = HashSet::with_capacity(tokens.len());
        for token in tokens {
            let word = token.as_ref();
            if !seen.insert(word) {
                continue;
            }

            let Some(p) = self.posterior(word) else {
                continue;
            };

            let (spam_factor, ham_factor) = if p == 1.0 {
                (CLAMPED_LIKELY, CLAMPED_UNLIKELY)
            } else if p == 0.0 {
                (CLAMPED_UNLIKELY, CLAMPED_LIKELY)
            } else {
                (p, 1.0 - p)
            };

            a *= spam_factor;
            b *= ham_factor;
            log_a += spam_factor.ln();
            log_b += ham_factor.ln();
        }

        let score = if a > 0.0 && b > 0.0 {
            a / (a + b)
        } else {
            debug!("Score accumulators underflowed, falling back to log-space ratio");
            logistic(log_a - log_b)
        };
        score.clamp(MIN_SCORE, MAX_SCORE)
    }

    /// True when the message scores strictly above the threshold
    pub fn is_spam<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.score(tokens) > self.threshold
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// The `n` words of `label` that appear in the most messages, ties broken by word
    pub fn top_words(&self, label: Label, n: usize) -> Vec<(String, u64)> {
        let mut words: Vec<(&String, &u64)> = self.counts(label).iter().collect();
        words.sort_by(|(word_a, count_a), (word_b, count_b)| {
            count_b.cmp(count_a).then_with(|| word_a.cmp(word_b))
        });
        words
            .into_iter()
            .take(n)
            .map(|(word, count)| (word.clone(), *count))
            .collect()
    }

    pub fn stats(&self) -> ModelStats {
        let shared = self
            .spam_counts
            .keys()
            .filter(|word| self.ham_counts.contains_key(*word))
            .count();

        ModelStats {
            spam_messages: self.num_spam_messages,
            ham_messages: self.num_ham_messages,
            spam_vocabulary: self.spam_counts.len(),
            ham_vocabulary: self.ham_counts.len(),
            shared_vocabulary: shared,
            total_vocabulary: self.spam_counts.len() + self.ham_counts.len() - shared,
        }
    }

    fn counts(&self, label: Label) -> &HashMap<String, u64> {
        match label {
            Label::Spam => &self.spam_counts,
            Label::Ham => &self.ham_counts,
        }
    }
}

/// `1 / (1 + e^-x)`, without overflowing `exp` for large negative `x`
fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
