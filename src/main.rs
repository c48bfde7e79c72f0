//! Mixlate - Mixed-Language Translation
//!
//! Command-line entry point: word-level language analysis and best-candidate
//! translation through ollama.

use anyhow::Result;
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use mixlate::cli::{Args, CacheAction, Commands, ConfigAction};
use mixlate::config::Config;
use mixlate::detect::{self, WhatlangIdentifier};
use mixlate::language;
use mixlate::translate::{TranslationCache, check_ollama_availability};
use mixlate::workflow::{TranslateResponse, Workflow, format_analysis};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Translate { text, input, target, output, json } => {
            let text = read_input(text, input)?;
            let workflow = Workflow::new(config)?;
            let target_name = target.unwrap_or_else(|| workflow.config().default_target.clone());

            let selection = match workflow.select(&text, &target_name).await {
                Ok(selection) => selection,
                Err(e) => {
                    eprintln!("Translation failed: {}", e);
                    std::process::exit(1);
                }
            };
            let response = TranslateResponse::from(&selection);

            if let Some(output_path) = &output {
                std::fs::write(output_path, format!("{}\n", response.translation))?;
                info!("Wrote translation to {}", output_path.display());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.translation);
                println!();
                println!("{}", response.status_line());
                let report = format_analysis(&selection.analysis);
                if !report.is_empty() {
                    println!();
                    print!("{}", report);
                }
            }
        }
        Commands::Analyze { text, input, json } => {
            let text = read_input(text, input)?;
            let identifier = WhatlangIdentifier::new(config.detection.min_confidence);
            let analyzer = detect::build_analyzer(&config.detection, Box::new(identifier))?;
            let analysis = analyzer.analyze(&text);

            if json {
                println!("{}", serde_json::to_string_pretty(&TranslateResponse::from(&analysis))?);
            } else if analysis.is_empty() {
                println!("Please enter some text.");
            } else {
                print!("{}", format_analysis(&analysis));
            }
        }
        Commands::Batch { input_dir, output_dir, target } => {
            let workflow = Workflow::new(config)?;
            let target_name = target.unwrap_or_else(|| workflow.config().default_target.clone());
            let summary = workflow.process_directory(&input_dir, &output_dir, &target_name).await?;
            println!(
                "Translated {} file(s), {} empty, {} failed",
                summary.translated, summary.skipped_empty, summary.failed
            );
        }
        Commands::Languages => {
            println!("{:<25} {:<10}", "Name", "Code");
            println!("{}", "-".repeat(35));
            for name in language::all_language_names() {
                if let Some(tag) = language::from_name(name) {
                    println!("{:<25} {:<10}", name, tag);
                }
            }
        }
        Commands::Check => {
            check_ollama_availability(&config.engine.endpoint, &config.engine.model).await?;
            println!("Model '{}' is available at {}", config.engine.model, config.engine.endpoint);
        }
        Commands::Cache { action } => {
            let cache = TranslationCache::new(&config.engine.cache_dir);
            match action {
                CacheAction::List => {
                    let entries = cache.list().await?;
                    if entries.is_empty() {
                        println!("No cached translations found in {}", cache.cache_dir().display());
                    } else {
                        println!("\nCached Translations:");
                        println!("{:<15} {:<10} {:<10} {:<15} {:<50}", "Model", "Source", "Target", "Cached", "Source Text");
                        println!("{}", "-".repeat(100));

                        for entry in entries {
                            let cached_ago = std::time::SystemTime::now()
                                .duration_since(std::time::UNIX_EPOCH)
                                .unwrap_or_default()
                                .as_secs()
                                .saturating_sub(entry.cached_at);

                            let preview: String = if entry.source_text.chars().count() > 47 {
                                format!("{}...", entry.source_text.chars().take(47).collect::<String>())
                            } else {
                                entry.source_text.clone()
                            };

                            println!("{:<15} {:<10} {:<10} {:<15} {:<50}",
                                entry.model,
                                entry.source_language,
                                entry.target_language,
                                format_duration(cached_ago),
                                preview
                            );
                        }
                    }
                }
                CacheAction::Clear => {
                    let count = cache.clear().await?;
                    println!("Cleared {} cached translations", count);
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { path } => {
                Config::default().save_to_file(&path)?;
                println!("Wrote default configuration to {}", path.display());
            }
        },
    }

    Ok(())
}

/// Text from `--text`, `--input`, or stdin.
fn read_input(text: Option<String>, input: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = input {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".mixlate").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "mixlate.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr so stdout stays clean for translations and JSON
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("mixlate.log").display());

    Ok(())
}

/// Format duration in seconds to human readable string
fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
