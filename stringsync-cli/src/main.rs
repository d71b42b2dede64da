use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use stringsync::{
    Disabled, GoogleTranslate, MockTranslator, RetryPolicy, SyncOptions, SyncReport, Translator,
    append_content, sync_tables,
};
use tracing_subscriber::EnvFilter;
use unic_langid::LanguageIdentifier;

/// Synchronize Localizable.strings tables across *.lproj directories,
/// translating missing or stale entries.
#[derive(Parser, Debug)]
#[command(name = "stringsync", version, about, long_about = None)]
struct Args {
    /// Path to the i18n directory containing the *.lproj folders
    i18n_dir: PathBuf,

    /// Source language code; when omitted, the Localizable.strings at the
    /// root of the i18n directory is used as the source table
    #[arg(long, alias = "original_language")]
    original_language: Option<String>,

    /// Translate a single string and append it to every target table
    #[arg(long, alias = "specific_content")]
    specific_content: Option<String>,

    /// Force retranslation of every entry
    #[arg(long)]
    replace: bool,

    /// Retranslate entries whose target value still equals the source value
    #[arg(long, alias = "retry_translate")]
    retry_translate: bool,

    /// Remote translation attempts per string; 0 disables translation and
    /// every entry falls back to the source text
    #[arg(long, alias = "max_attempts", default_value_t = 0)]
    max_attempts: u32,

    /// Use the deterministic mock translator instead of Google Translate
    #[arg(long)]
    mock: bool,

    /// Write the run summary as JSON to this path
    #[arg(long, alias = "report_json")]
    report_json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if !args.i18n_dir.is_dir() {
        eprintln!(
            "Error: the directory {} does not exist.",
            args.i18n_dir.display()
        );
        return ExitCode::FAILURE;
    }

    if let Some(lang) = &args.original_language {
        // Directory selection stays unconditional; this only flags typos.
        if lang.parse::<LanguageIdentifier>().is_err() {
            tracing::warn!("'{lang}' does not look like a language identifier; using it as-is");
        }
    }

    match run(&args).await {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<SyncReport, String> {
    let translator = build_translator(args)?;

    let mut options = SyncOptions::new(&args.i18n_dir);
    options.original_language = args.original_language.clone();
    options.replace = args.replace;
    options.retry_identical = args.retry_translate;
    options.retry = RetryPolicy {
        max_attempts: args.max_attempts,
        ..RetryPolicy::default()
    };

    let report = match &args.specific_content {
        Some(content) => append_content(&options, translator.as_ref(), content)
            .await
            .map_err(|e| e.to_string())?,
        None => sync_tables(&options, translator.as_ref())
            .await
            .map_err(|e| e.to_string())?,
    };

    if let Some(path) = &args.report_json {
        write_report(path, &report)?;
        println!("Report JSON written: {}", path.display());
    }

    Ok(report)
}

fn build_translator(args: &Args) -> Result<Box<dyn Translator>, String> {
    if args.mock {
        Ok(Box::new(MockTranslator::suffix()))
    } else if args.max_attempts == 0 {
        // Translation is disabled by default; the retry wrapper falls back
        // to the source text without ever consulting the provider.
        Ok(Box::new(Disabled))
    } else {
        GoogleTranslate::from_env()
            .map(|provider| Box::new(provider) as Box<dyn Translator>)
            .map_err(|e| e.to_string())
    }
}

fn write_report(path: &Path, report: &SyncReport) -> Result<(), String> {
    let text = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(path, text)
        .map_err(|e| format!("Failed to write report JSON '{}': {}", path.display(), e))
}

fn print_summary(report: &SyncReport) {
    println!("Translation completed!");
    println!("Directories processed: {}", report.directories);
    println!("Source entries: {}", report.source_entries);
    println!("Kept: {}", report.kept);
    println!("Translated: {}", report.translated);
    println!("Retranslated: {}", report.retranslated);
    println!("Appended: {}", report.appended);
    println!("Fallbacks to source text: {}", report.fallbacks);
    if !report.fallback_languages.is_empty() {
        println!("The following languages fell back to source text:");
        for lang in &report.fallback_languages {
            println!("  {}", lang);
        }
    }
}
