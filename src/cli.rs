use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate mixed-language text, picking the best source hypothesis
    Translate {
        /// Text to process (stdin when neither --text nor --input is given)
        #[arg(short, long, conflicts_with = "input")]
        text: Option<String>,

        /// File containing the text to process
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Target language name or code (defaults to the configured target)
        #[arg(short = 'l', long)]
        target: Option<String>,

        /// Write the translation to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show word-by-word language analysis without translating
    Analyze {
        /// Text to process (stdin when neither --text nor --input is given)
        #[arg(short, long, conflicts_with = "input")]
        text: Option<String>,

        /// File containing the text to process
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate every .txt file in a directory
    Batch {
        /// Input directory containing text files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output directory for translated files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Target language name or code (defaults to the configured target)
        #[arg(short = 'l', long)]
        target: Option<String>,
    },

    /// List supported languages
    Languages,

    /// Check that the ollama model is available
    Check,

    /// Manage the translation cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached translations
    List,

    /// Clear all cached translations
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Destination file
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,
    },
}
