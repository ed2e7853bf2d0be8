//! Training corpora read from directories of plain-text messages
//!
//! Every regular file in a corpus directory is one message. Files are tokenized on
//! whitespace with no further normalization. A directory is read completely before
//! any of it is trained into a model, so a failed read never leaves the model
//! half-trained.

use crate::classifier::SpamClassifier;
use crate::error::{FilterError, Result};
use crate::models::Label;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Split a message into whitespace-delimited tokens, preserving case and order
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// A single message read from disk
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub path: PathBuf,
    pub tokens: Vec<String>,
}

impl Document {
    #[cfg(test)]
    pub(crate) fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            path: PathBuf::new(),
            tokens: tokenize(text),
        }
    }
}

/// Read one message file. Invalid UTF-8 is replaced rather than rejected.
///
/// Fails with a [`FilterError::CorpusError`] naming `path` if it is not a regular
/// file or cannot be read.
pub async fn read_document(path: &Path) -> Result<Document> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| FilterError::corpus(path, format!("cannot access file: {}", e)))?;
    if !metadata.is_file() {
        return Err(FilterError::corpus(path, "not a regular file"));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FilterError::corpus(path, format!("cannot read file: {}", e)))?;
    let text = String::from_utf8_lossy(&bytes);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!("Read document {:?}", path);
    Ok(Document {
        name,
        path: path.to_path_buf(),
        tokens: tokenize(&text),
    })
}

/// All messages read from one directory, ordered by file name
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub root: PathBuf,
    pub documents: Vec<Document>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.name.as_str())
    }

    /// Add every document to the model as one training message of `label`
    pub fn train_into(&self, classifier: &mut SpamClassifier, label: Label) -> usize {
        for document in &self.documents {
            classifier.train(&document.tokens, label);
        }

        info!(
            "Trained {} {} messages from {:?}",
            self.documents.len(),
            label,
            self.root
        );
        self.documents.len()
    }
}

/// Read every regular file in `dir`, at most `max_concurrent` at a time.
///
/// Fails if `dir` is missing or not a directory, or if any file cannot be read.
/// Symlinks are followed; anything that does not resolve to a regular file is skipped.
pub async fn read_directory(dir: &Path, max_concurrent: usize) -> Result<Corpus> {
    let metadata = tokio::fs::metadata(dir)
        .await
        .map_err(|e| FilterError::corpus(dir, format!("cannot access directory: {}", e)))?;
    if !metadata.is_dir() {
        return Err(FilterError::corpus(dir, "not a directory"));
    }

    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| FilterError::corpus(dir, format!("cannot list directory: {}", e)))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FilterError::corpus(dir, format!("cannot list directory: {}", e)))?
    {
        let path = entry.path();
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| FilterError::corpus(&path, format!("cannot access file: {}", e)))?;
        if !metadata.is_file() {
            debug!("Skipping non-regular entry {:?}", path);
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    info!(
        "Reading {} documents from {:?} with {} concurrent readers",
        paths.len(),
        dir,
        max_concurrent
    );

    let documents: Vec<Document> = stream::iter(paths)
        .map(|path| async move { read_document(&path).await })
        .buffered(max_concurrent.max(1))
        .try_collect()
        .await?;

    Ok(Corpus {
        root: dir.to_path_buf(),
        documents,
    })
}

/// Read both training directories, then train them into a fresh model.
///
/// Both directories must be readable and non-empty; on error the model is never built.
pub async fn train_from_directories(
    spam_dir: &Path,
    ham_dir: &Path,
    max_concurrent: usize,
) -> Result<SpamClassifier> {
    let spam = read_directory(spam_dir, max_concurrent).await?;
    if spam.is_empty() {
        return Err(FilterError::EmptyCorpus(format!(
            "no spam messages in {:?}",
            spam_dir
        )));
    }

    let ham = read_directory(ham_dir, max_concurrent).await?;
    if ham.is_empty() {
        return Err(FilterError::EmptyCorpus(format!(
            "no ham messages in {:?}",
            ham_dir
        )));
    }

    let mut classifier = SpamClassifier::new();
    spam.train_into(&mut classifier, Label::Spam);
    ham.train_into(&mut classifier, Label::Ham);
    Ok(classifier)
}
