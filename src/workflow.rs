use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::detect::{self, AnalysisResult, LanguageIdentifier, WhatlangIdentifier, WordTag};
use crate::error::{Result, MixlateError};
use crate::language::{self, LanguageTag};
use crate::quality::TranslationScorer;
use crate::select::{BestCandidateSelector, SelectionResult};
use crate::translate::{EngineFactory, TranslationEngine};

/// What the presentation layer receives for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
    pub detected_languages: Vec<String>,
    pub languages_count: usize,
    /// (token, language display name or the punctuation marker)
    pub word_by_word: Vec<(String, String)>,
    pub source: Option<String>,
    pub score: Option<f64>,
}

impl From<&SelectionResult> for TranslateResponse {
    fn from(selection: &SelectionResult) -> Self {
        let mut response = Self::from(&selection.analysis);
        response.translation = selection.translation.clone();
        response.source = selection.source.map(|tag| tag.display_name().to_string());
        response.score = selection.score.map(|score| (score * 1000.0).round() / 1000.0);
        response
    }
}

/// Analysis only, no translation.
impl From<&AnalysisResult> for TranslateResponse {
    fn from(analysis: &AnalysisResult) -> Self {
        Self {
            detected_languages: analysis
                .languages
                .iter()
                .map(|tag| tag.display_name().to_string())
                .collect(),
            languages_count: analysis.languages_count(),
            word_by_word: analysis
                .words
                .iter()
                .map(|word| (word.text.clone(), word.tag.display_name().to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

impl TranslateResponse {
    /// One-line summary for the user.
    pub fn status_line(&self) -> String {
        let Some(source) = &self.source else {
            return "Nothing to translate".to_string();
        };
        let mut status = format!("Done | Languages: {} | Source: {}", self.languages_count, source);
        if let Some(score) = self.score {
            status.push_str(&format!(" | Score: {:.3}", score));
        }
        status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub translated: usize,
    pub skipped_empty: usize,
    pub failed: usize,
}

pub struct Workflow {
    config: Config,
    selector: BestCandidateSelector,
}

impl Workflow {
    /// Whatlang identification and the configured ollama engine.
    pub fn new(config: Config) -> Result<Self> {
        let engine = EngineFactory::create(&config.engine)?;
        let identifier = Box::new(WhatlangIdentifier::new(config.detection.min_confidence));
        Self::with_components(config, identifier, engine)
    }

    pub fn with_components(
        config: Config,
        identifier: Box<dyn LanguageIdentifier>,
        engine: Box<dyn TranslationEngine>,
    ) -> Result<Self> {
        config.validate()?;

        let analyzer = detect::build_analyzer(&config.detection, identifier)?;
        let scorer = TranslationScorer::new(config.scoring.clone());
        let selector = BestCandidateSelector::new(analyzer, scorer, engine);

        Ok(Self { config, selector })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a target given by display name or code, defaulting to the
    /// configured target.
    pub fn resolve_target(&self, target: Option<&str>) -> Result<LanguageTag> {
        let name = target.unwrap_or(&self.config.default_target);
        language::from_name(name).ok_or_else(|| MixlateError::UnknownLanguage(name.to_string()))
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        self.selector.analyzer().analyze(text)
    }

    /// Best translation of `text` into the named target, with its analysis.
    ///
    /// Blank text yields an empty result without resolving the target.
    pub async fn select(&self, text: &str, target_name: &str) -> Result<SelectionResult> {
        if text.trim().is_empty() {
            return Ok(SelectionResult::empty());
        }

        let target = self.resolve_target(Some(target_name))?;
        self.selector.select(text, target).await
    }

    /// Word-level analysis plus the best translation, shaped for display.
    pub async fn analyze_and_translate(&self, text: &str, target_name: &str) -> Result<TranslateResponse> {
        let selection = self.select(text, target_name).await?;
        Ok(TranslateResponse::from(&selection))
    }

    /// Translate every `.txt` file under `input_dir` into `output_dir` as
    /// `<stem>.<target code>.txt`. Per-file failures are counted, not fatal.
    pub async fn process_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
        target_name: &str,
    ) -> Result<BatchSummary> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(MixlateError::FileNotFound(input_dir.display().to_string()));
        }

        let target = self.resolve_target(Some(target_name))?;
        fs::create_dir_all(output_dir).await?;

        let text_files = collect_text_files(input_dir);
        info!("Found {} text files to translate", text_files.len());

        let pb = ProgressBar::new(text_files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut summary = BatchSummary::default();

        for path in text_files {
            let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
            pb.set_message(name);

            match self.translate_file(&path, output_dir, target).await {
                Ok(true) => summary.translated += 1,
                Ok(false) => summary.skipped_empty += 1,
                Err(e) => {
                    warn!("Failed to translate {}: {}", path.display(), e);
                    summary.failed += 1;
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("done");
        info!(
            "Batch finished: {} translated, {} empty, {} failed",
            summary.translated, summary.skipped_empty, summary.failed
        );
        Ok(summary)
    }

    /// `Ok(false)` when the file had no text.
    async fn translate_file(&self, path: &Path, output_dir: &Path, target: LanguageTag) -> Result<bool> {
        let text = fs::read_to_string(path).await?;
        let selection = self.selector.select(&text, target).await?;
        if selection.is_empty() {
            return Ok(false);
        }

        let output_path = output_path_for(path, output_dir, target);
        fs::write(&output_path, format!("{}\n", selection.translation)).await?;
        info!("Wrote {}", output_path.display());
        Ok(true)
    }
}

fn collect_text_files(input_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn output_path_for(input: &Path, output_dir: &Path, target: LanguageTag) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.{}.txt", stem, target.code()))
}

/// Markdown report: detected languages, then one bullet per token.
pub fn format_analysis(analysis: &AnalysisResult) -> String {
    if analysis.is_empty() {
        return String::new();
    }

    let names: Vec<&str> = analysis.languages.iter().map(|tag| tag.display_name()).collect();
    let mut md = format!(
        "**Detected Languages ({}):** {}\n\n**Word-by-word:**\n",
        analysis.languages_count(),
        names.join(", ")
    );

    for word in &analysis.words {
        match word.tag {
            WordTag::Punctuation => md.push_str(&format!("- `{}` → punctuation\n", word.text)),
            WordTag::Language(tag) => {
                md.push_str(&format!("- **{}** → `{}`\n", word.text, tag.display_name()))
            }
        }
    }

    md
}
