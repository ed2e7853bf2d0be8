//! Held-out evaluation of a trained classifier

use crate::classifier::SpamClassifier;
use crate::corpus::{Corpus, Document};
use crate::models::{Label, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Score one document against the classifier's current threshold
pub fn classify_document(classifier: &SpamClassifier, document: &Document) -> Verdict {
    let score = classifier.score(&document.tokens);
    let label = if score > classifier.threshold() {
        Label::Spam
    } else {
        Label::Ham
    };

    Verdict {
        name: document.name.clone(),
        score,
        threshold: classifier.threshold(),
        label,
    }
}

/// Verdict for a held-out document together with its known label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedDocument {
    pub expected: Label,
    pub verdict: Verdict,
}

impl EvaluatedDocument {
    pub fn is_correct(&self) -> bool {
        self.verdict.label == self.expected
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, expected: Label, predicted: Label) {
        match (expected, predicted) {
            (Label::Spam, Label::Spam) => self.true_positives += 1,
            (Label::Ham, Label::Spam) => self.false_positives += 1,
            (Label::Ham, Label::Ham) => self.true_negatives += 1,
            (Label::Spam, Label::Ham) => self.false_negatives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub threshold: f64,
    pub training_spam_messages: u64,
    pub training_ham_messages: u64,
    pub confusion: ConfusionMatrix,
    pub documents: Vec<EvaluatedDocument>,
}

impl EvaluationReport {
    pub fn accuracy(&self) -> f64 {
        self.confusion.accuracy()
    }

    pub fn precision(&self) -> f64 {
        self.confusion.precision()
    }

    pub fn recall(&self) -> f64 {
        self.confusion.recall()
    }

    pub fn misclassified(&self) -> impl Iterator<Item = &EvaluatedDocument> {
        self.documents.iter().filter(|d| !d.is_correct())
    }

    /// Generate Markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Spam Filter Evaluation\n\n");
        md.push_str(&format!(
            "Generated: {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));

        md.push_str("## Summary\n\n");
        md.push_str(&format!("- **Run ID:** {}\n", self.run_id));
        md.push_str(&format!(
            "- **Training messages:** {} spam, {} ham\n",
            self.training_spam_messages, self.training_ham_messages
        ));
        md.push_str(&format!("- **Threshold:** {}\n", self.threshold));
        md.push_str(&format!("- **Documents evaluated:** {}\n", self.confusion.total()));
        md.push_str(&format!("- **Accuracy:** {:.2}%\n", self.accuracy() * 100.0));
        md.push_str(&format!("- **Precision:** {:.2}%\n", self.precision() * 100.0));
        md.push_str(&format!("- **Recall:** {:.2}%\n\n", self.recall() * 100.0));

        md.push_str("## Confusion Matrix\n\n");
        md.push_str("| | Predicted spam | Predicted ham |\n");
        md.push_str("|---|---:|---:|\n");
        md.push_str(&format!(
            "| Actual spam | {} | {} |\n",
            self.confusion.true_positives, self.confusion.false_negatives
        ));
        md.push_str(&format!(
            "| Actual ham | {} | {} |\n\n",
            self.confusion.false_positives, self.confusion.true_negatives
        ));

        let misclassified: Vec<&EvaluatedDocument> = self.misclassified().collect();
        if !misclassified.is_empty() {
            md.push_str("## Misclassified\n\n");
            md.push_str("| Document | Expected | Score |\n");
            md.push_str("|---|---|---:|\n");
            for doc in misclassified {
                md.push_str(&format!(
                    "| {} | {} | {:.6} |\n",
                    doc.verdict.name, doc.expected, doc.verdict.score
                ));
            }
            md.push('\n');
        }

        md
    }
}

/// Score every held-out document and tally the results
pub fn evaluate(
    classifier: &SpamClassifier,
    spam_test: &Corpus,
    ham_test: &Corpus,
) -> EvaluationReport {
    let mut confusion = ConfusionMatrix::default();
    let mut documents = Vec::with_capacity(spam_test.len() + ham_test.len());

    let labelled = spam_test
        .documents
        .iter()
        .map(|d| (Label::Spam, d))
        .chain(ham_test.documents.iter().map(|d| (Label::Ham, d)));

    for (expected, document) in labelled {
        let verdict = classify_document(classifier, document);
        confusion.record(expected, verdict.label);
        documents.push(EvaluatedDocument { expected, verdict });
    }

    info!(
        "Evaluated {} documents: accuracy {:.4}",
        confusion.total(),
        confusion.accuracy()
    );

    EvaluationReport {
        run_id: uuid::Uuid::new_v4().to_string(),
        generated_at: Utc::now(),
        threshold: classifier.threshold(),
        training_spam_messages: classifier.message_count(Label::Spam),
        training_ham_messages: classifier.message_count(Label::Ham),
        confusion,
        documents,
    }
}
