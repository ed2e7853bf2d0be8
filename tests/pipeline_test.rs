//! Training from directories and evaluating on held-out directories

mod common;

use bayes_filter::cli::{self, ProgressReporter, TrainingSettings};
use bayes_filter::corpus::{read_directory, train_from_directories};
use bayes_filter::{evaluate, FilterError, Label};
use common::{write_messages, CorpusFixture};
use indicatif::{MultiProgress, ProgressDrawTarget};
use std::path::PathBuf;

const TRAIN_SPAM: &[(&str, &str)] = &[
    ("0001.spam.txt", "Subject: cheap replica watches buy now limited offer"),
    ("0002.spam.txt", "Subject: you won a prize click here to claim your money"),
    ("0003.spam.txt", "Subject: lowest prices on meds buy now no prescription"),
    ("0004.spam.txt", "Subject: claim your free money offer click here"),
];

const TRAIN_HAM: &[(&str, &str)] = &[
    ("0001.ham.txt", "Subject: meeting notes attached for the gas nomination review"),
    ("0002.ham.txt", "Subject: please review the attached schedule for the meeting"),
    ("0003.ham.txt", "Subject: lunch on friday to discuss the nomination volumes"),
    ("0004.ham.txt", "Subject: updated volumes attached please confirm by friday"),
];

fn quiet_progress() -> ProgressReporter {
    ProgressReporter::new(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
}

fn fixture() -> CorpusFixture {
    CorpusFixture::new(TRAIN_SPAM, TRAIN_HAM).with_held_out(
        &[
            ("0101.spam.txt", "Subject: buy cheap watches now click here"),
            ("0102.spam.txt", "Subject: free money claim your prize"),
        ],
        &[
            ("0101.ham.txt", "Subject: nomination volumes attached for review"),
            ("0102.ham.txt", "Subject: meeting on friday please confirm"),
        ],
    )
}

#[tokio::test]
async fn test_held_out_messages_are_classified_correctly() {
    let fixture = fixture();
    let mut classifier = train_from_directories(&fixture.spam_dir(), &fixture.ham_dir(), 4)
        .await
        .unwrap();
    classifier.set_threshold(0.5);

    let spam_test = read_directory(&fixture.spam_test_dir(), 4).await.unwrap();
    let ham_test = read_directory(&fixture.ham_test_dir(), 4).await.unwrap();

    for document in &spam_test.documents {
        let p = classifier.score(&document.tokens);
        assert!(p > 0.99, "{} scored {}", document.name, p);
        assert!(classifier.is_spam(&document.tokens));
    }
    for document in &ham_test.documents {
        let p = classifier.score(&document.tokens);
        assert!(p < 0.01, "{} scored {}", document.name, p);
        assert!(!classifier.is_spam(&document.tokens));
    }

    let report = evaluate(&classifier, &spam_test, &ham_test);
    assert_eq!(report.confusion.total(), 4);
    assert_eq!(report.accuracy(), 1.0);
    assert_eq!(report.precision(), 1.0);
    assert_eq!(report.recall(), 1.0);
    assert_eq!(report.misclassified().count(), 0);
}

#[tokio::test]
async fn test_missing_directory_fails_before_training() {
    let fixture = CorpusFixture::new(TRAIN_SPAM, TRAIN_HAM);
    let missing = fixture.root.path().join("nope");

    let result = train_from_directories(&fixture.spam_dir(), &missing, 4).await;
    match result {
        Err(FilterError::CorpusError { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected corpus error, got {:?}", other.map(|c| c.stats())),
    }
}

#[tokio::test]
async fn test_cli_training_applies_threshold() {
    let fixture = fixture();
    let settings = TrainingSettings {
        spam_dir: fixture.spam_dir(),
        ham_dir: fixture.ham_dir(),
        threshold: 0.8,
        max_concurrent_reads: 2,
    };

    let classifier = cli::train_model(&settings, &quiet_progress()).await.unwrap();
    assert_eq!(classifier.threshold(), 0.8);
    assert_eq!(classifier.message_count(Label::Spam), 4);
    assert_eq!(classifier.message_count(Label::Ham), 4);
}

#[tokio::test]
async fn test_cli_classify_files() {
    let fixture = fixture();
    let settings = TrainingSettings {
        spam_dir: fixture.spam_dir(),
        ham_dir: fixture.ham_dir(),
        threshold: 0.5,
        max_concurrent_reads: 4,
    };
    let classifier = cli::train_model(&settings, &quiet_progress()).await.unwrap();

    let inbox = fixture.root.path().join("inbox");
    write_messages(
        &inbox,
        &[
            ("offer.txt", "click here to claim your free prize"),
            ("notes.txt", "meeting notes for friday attached"),
        ],
    );

    let files: Vec<PathBuf> = vec![inbox.join("offer.txt"), inbox.join("notes.txt")];
    let verdicts = cli::classify_files(&classifier, &files).await.unwrap();

    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0].name, "offer.txt");
    assert_eq!(verdicts[0].label, Label::Spam);
    assert_eq!(verdicts[1].label, Label::Ham);
}

#[tokio::test]
async fn test_cli_classify_missing_file() {
    let fixture = fixture();
    let classifier = train_from_directories(&fixture.spam_dir(), &fixture.ham_dir(), 4)
        .await
        .unwrap();

    let missing = fixture.root.path().join("missing.txt");
    let files = vec![fixture.spam_test_dir().join("0101.spam.txt"), missing.clone()];
    let err = cli::classify_files(&classifier, &files).await.unwrap_err();

    assert!(err.to_string().contains("missing.txt"));
    match err {
        FilterError::CorpusError { path, .. } => assert_eq!(path, missing),
        other => panic!("expected corpus error, got {}", other),
    }
}

#[tokio::test]
async fn test_cli_evaluate_directories_report() {
    let fixture = fixture();
    let mut classifier = train_from_directories(&fixture.spam_dir(), &fixture.ham_dir(), 4)
        .await
        .unwrap();
    classifier.set_threshold(0.5);

    let report = cli::evaluate_directories(
        &classifier,
        &fixture.spam_test_dir(),
        &fixture.ham_test_dir(),
        4,
    )
    .await
    .unwrap();

    let markdown = report.to_markdown();
    assert!(markdown.contains("- **Documents evaluated:** 4"));
    assert!(markdown.contains("- **Accuracy:** 100.00%"));
    assert!(!markdown.contains("## Misclassified"));
}
