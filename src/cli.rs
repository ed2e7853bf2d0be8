//! Command-line interface

use crate::classifier::SpamClassifier;
use crate::config::Config;
use crate::corpus::{self, read_directory};
use crate::error::{FilterError, Result};
use crate::evaluation::{self, classify_document, EvaluationReport};
use crate::models::{Label, Verdict};
use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bayes-filter")]
#[command(version)]
#[command(about = "Naive Bayes spam filter trained from labeled message directories", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bayes-filter.toml")]
    pub config: PathBuf,

    /// Directory of spam training messages (overrides config)
    #[arg(long)]
    pub spam_dir: Option<PathBuf>,

    /// Directory of ham training messages (overrides config)
    #[arg(long)]
    pub ham_dir: Option<PathBuf>,

    /// Spam score threshold (overrides config)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train on the corpora and classify message files
    Classify {
        /// Message files to score
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print one JSON object per message
        #[arg(long)]
        json: bool,
    },

    /// Train on the corpora and print vocabulary statistics
    Stats {
        /// Number of most frequent words to list per class (overrides config)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Train on the corpora and measure accuracy on held-out directories
    Evaluate {
        /// Directory of held-out spam messages
        #[arg(long)]
        spam_test: PathBuf,

        /// Directory of held-out ham messages
        #[arg(long)]
        ham_test: PathBuf,

        /// Write the Markdown report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },

    /// Generate example configuration file
    InitConfig {
        /// Path to create config file
        #[arg(short, long, default_value = "bayes-filter.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

/// Training inputs after applying command-line overrides to the config file
#[derive(Debug, Clone)]
pub struct TrainingSettings {
    pub spam_dir: PathBuf,
    pub ham_dir: PathBuf,
    pub threshold: f64,
    pub max_concurrent_reads: usize,
}

impl TrainingSettings {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let mut config = config.clone();
        if let Some(threshold) = cli.threshold {
            config.classifier.threshold = threshold;
        }
        config.validate()?;

        let spam_dir = cli
            .spam_dir
            .clone()
            .or(config.corpus.spam_dir)
            .ok_or_else(|| {
                FilterError::ConfigError(
                    "no spam directory: pass --spam-dir or set corpus.spam_dir".to_string(),
                )
            })?;
        let ham_dir = cli
            .ham_dir
            .clone()
            .or(config.corpus.ham_dir)
            .ok_or_else(|| {
                FilterError::ConfigError(
                    "no ham directory: pass --ham-dir or set corpus.ham_dir".to_string(),
                )
            })?;

        Ok(Self {
            spam_dir,
            ham_dir,
            threshold: config.classifier.threshold,
            max_concurrent_reads: config.corpus.max_concurrent_reads,
        })
    }
}

/// Progress reporter using indicatif
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new(multi: MultiProgress) -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        Self {
            multi,
            spinner_style,
        }
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Finish a spinner and clear it from the multi-progress display
    pub fn finish_spinner(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        let _ = self.multi.println(format!("  ✓ {}", msg));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(MultiProgress::new())
    }
}

/// Read both training corpora and build a classifier with the configured threshold
pub async fn train_model(
    settings: &TrainingSettings,
    progress: &ProgressReporter,
) -> Result<SpamClassifier> {
    let spinner = progress.add_spinner("Reading training corpora...");
    let result = corpus::train_from_directories(
        &settings.spam_dir,
        &settings.ham_dir,
        settings.max_concurrent_reads,
    )
    .await;

    let mut classifier = match result {
        Ok(classifier) => classifier,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    classifier.set_threshold(settings.threshold);

    progress.finish_spinner(
        &spinner,
        &format!(
            "Trained on {} spam and {} ham messages ({} distinct words)",
            classifier.message_count(Label::Spam),
            classifier.message_count(Label::Ham),
            classifier.stats().total_vocabulary
        ),
    );
    Ok(classifier)
}

/// Score message files with a trained classifier.
///
/// Stops at the first file that is missing or not a regular file, naming it in the error.
pub async fn classify_files(
    classifier: &SpamClassifier,
    files: &[PathBuf],
) -> Result<Vec<Verdict>> {
    let mut verdicts = Vec::with_capacity(files.len());
    for path in files {
        let document = corpus::read_document(path).await?;
        let verdict = classify_document(classifier, &document);
        info!(
            "{}: score {:.6} -> {}",
            verdict.name, verdict.score, verdict.label
        );
        verdicts.push(verdict);
    }
    Ok(verdicts)
}

pub fn format_verdict(verdict: &Verdict, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(verdict)?)
    } else {
        Ok(format!(
            "{:<40} {:>10.6}  {}",
            truncate_string(&verdict.name, 40),
            verdict.score,
            verdict.label.as_str().to_uppercase()
        ))
    }
}

/// Plain-text corpus statistics with the `top` most frequent words per class
pub fn format_stats(classifier: &SpamClassifier, top: usize) -> String {
    let stats = classifier.stats();
    let mut out = String::new();

    out.push_str("========================================\n");
    out.push_str("Corpus Statistics\n");
    out.push_str("========================================\n");
    out.push_str(&format!("Spam messages: {}\n", stats.spam_messages));
    out.push_str(&format!("Ham messages: {}\n", stats.ham_messages));
    out.push_str(&format!("Spam vocabulary: {}\n", stats.spam_vocabulary));
    out.push_str(&format!("Ham vocabulary: {}\n", stats.ham_vocabulary));
    out.push_str(&format!("Shared vocabulary: {}\n", stats.shared_vocabulary));
    out.push_str(&format!("Total vocabulary: {}\n", stats.total_vocabulary));

    for label in [Label::Spam, Label::Ham] {
        out.push_str(&format!("\nTop {} {} words:\n", top, label));
        for (word, count) in classifier.top_words(label, top) {
            let posterior = classifier
                .posterior(&word)
                .map(|p| format!("{:.3}", p))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "  {:<30} {:>7}  P(spam|w)={}\n",
                truncate_string(&word, 30),
                count,
                posterior
            ));
        }
    }
    out.push_str("========================================\n");
    out
}

/// Read held-out corpora and evaluate the classifier against them
pub async fn evaluate_directories(
    classifier: &SpamClassifier,
    spam_test: &Path,
    ham_test: &Path,
    max_concurrent_reads: usize,
) -> Result<EvaluationReport> {
    let spam = read_directory(spam_test, max_concurrent_reads).await?;
    let ham = read_directory(ham_test, max_concurrent_reads).await?;
    if spam.is_empty() && ham.is_empty() {
        return Err(FilterError::EmptyCorpus(
            "no held-out messages to evaluate".to_string(),
        ));
    }
    Ok(evaluation::evaluate(classifier, &spam, &ham))
}

/// Truncate a string to max_len characters, adding "..." if truncated
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len.saturating_sub(3)).collect::<String>())
    }
}
