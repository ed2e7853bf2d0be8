use anyhow::Result;
use bayes_filter::cli::{self, Cli, Commands, ProgressReporter, TrainingSettings};
use bayes_filter::config::Config;
use bayes_filter::error::FilterError;
use clap::Parser;
use indicatif::MultiProgress;
use std::io::Write;
use std::process;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// A writer that prints through MultiProgress to avoid progress bar conflicts
#[derive(Clone)]
struct MultiProgressWriter {
    multi: Arc<MultiProgress>,
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MultiProgressWriter {
    fn new(multi: Arc<MultiProgress>) -> Self {
        Self {
            multi,
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Write for MultiProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        if !buffer.is_empty() {
            let msg = String::from_utf8_lossy(&buffer);
            let msg = msg.trim_end_matches('\n');
            if !msg.is_empty() {
                let _ = self.multi.println(msg);
            }
            buffer.clear();
        }
        Ok(())
    }
}

impl Drop for MultiProgressWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// MakeWriter implementation for tracing
#[derive(Clone)]
struct MultiProgressMakeWriter {
    multi: Arc<MultiProgress>,
}

impl<'a> MakeWriter<'a> for MultiProgressMakeWriter {
    type Writer = MultiProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MultiProgressWriter::new(Arc::clone(&self.multi))
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        match e.downcast_ref::<FilterError>() {
            Some(error) if error.is_input_error() => eprintln!(
                "\nCheck the corpus paths and the settings in the configuration file, \
                 or create one with: bayes-filter init-config"
            ),
            _ => eprintln!("\nFor help, run: bayes-filter --help"),
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bayes_filter=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bayes_filter=info,warn"))
    };

    // Logs print above the training spinner instead of through it
    let multi_progress = Arc::new(MultiProgress::new());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(MultiProgressMakeWriter {
            multi: Arc::clone(&multi_progress),
        })
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let progress = ProgressReporter::new((*multi_progress).clone());

    match &cli.command {
        Commands::InitConfig { output, force } => {
            tracing::info!("Generating example configuration file");

            if output.exists() && !force {
                return Err(FilterError::ConfigError(format!(
                    "Configuration file already exists at {:?}. Use --force to overwrite.",
                    output
                ))
                .into());
            }

            Config::create_example(output).await?;
            println!("Created example configuration at {:?}", output);
            Ok(())
        }

        Commands::Classify { files, json } => {
            let config = Config::load(&cli.config).await?;
            let settings = TrainingSettings::resolve(&cli, &config)?;
            let classifier = cli::train_model(&settings, &progress).await?;

            let verdicts = cli::classify_files(&classifier, files).await?;
            for verdict in &verdicts {
                println!("{}", cli::format_verdict(verdict, *json)?);
            }

            if !json {
                let spam = verdicts.iter().filter(|v| v.is_spam()).count();
                println!(
                    "\n{} of {} messages classified as spam (threshold {})",
                    spam,
                    verdicts.len(),
                    classifier.threshold()
                );
            }
            Ok(())
        }

        Commands::Stats { top } => {
            let config = Config::load(&cli.config).await?;
            let settings = TrainingSettings::resolve(&cli, &config)?;
            let classifier = cli::train_model(&settings, &progress).await?;

            let top = top.unwrap_or(config.report.top_words);
            print!("{}", cli::format_stats(&classifier, top));
            Ok(())
        }

        Commands::Evaluate {
            spam_test,
            ham_test,
            output,
            json,
        } => {
            let config = Config::load(&cli.config).await?;
            let settings = TrainingSettings::resolve(&cli, &config)?;
            let classifier = cli::train_model(&settings, &progress).await?;

            let report = cli::evaluate_directories(
                &classifier,
                spam_test,
                ham_test,
                settings.max_concurrent_reads,
            )
            .await?;

            let markdown = report.to_markdown();
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", markdown);
            }

            if let Some(path) = output {
                tokio::fs::write(path, &markdown).await?;
                println!("Report saved to: {:?}", path);
            }
            Ok(())
        }
    }
}
