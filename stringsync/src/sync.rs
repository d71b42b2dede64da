//! Incremental synchronization of target tables against the source table.
//!
//! The per-key decision is a pure function ([`plan_entry`]) from the source
//! value, the loaded target entry, and the run flags to an [`EntryAction`];
//! the drivers ([`sync_tables`], [`append_content`]) perform the resulting
//! translations and file rewrites.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Error;
use crate::locale::{directory_stem, service_code};
use crate::table::{Entry, Table};
use crate::traits::Parser;
use crate::translate::{Outcome, RetryPolicy, Translator, translate_with_retry};

/// Comment block used for entries that carry none of their own.
pub const DEFAULT_COMMENT: &str = "/* No comment provided by engineer. */";

/// Options for one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Root i18n directory containing the `*.lproj` language directories.
    pub root: PathBuf,
    /// Source language code. When unset, the source table is read from
    /// `Localizable.strings` at the root of the i18n directory and treated
    /// as English.
    pub original_language: Option<String>,
    /// Force retranslation of every entry.
    pub replace: bool,
    /// Retranslate entries whose target value still equals the source value.
    pub retry_identical: bool,
    /// Comment block written when neither source nor target carries one.
    pub default_comment: String,
    /// Retry policy for remote translation calls.
    pub retry: RetryPolicy,
}

impl SyncOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            original_language: None,
            replace: false,
            retry_identical: false,
            default_comment: DEFAULT_COMMENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    fn flags(&self) -> SyncFlags {
        SyncFlags {
            replace: self.replace,
            retry_identical: self.retry_identical,
        }
    }

    fn source_dir_name(&self) -> String {
        format!(
            "{}.lproj",
            self.original_language.as_deref().unwrap_or("en")
        )
    }

    fn source_locale_code(&self) -> &str {
        service_code(self.original_language.as_deref().unwrap_or("en"))
    }
}

/// The two flags that influence the per-key decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncFlags {
    pub replace: bool,
    pub retry_identical: bool,
}

/// Why an entry is being sent to the translation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateReason {
    /// The target table has no entry for the key.
    Missing,
    /// The target entry exists but its value is empty.
    Empty,
    /// The target value contains `{`/`}`, an unexpanded template marker.
    Placeholder,
    /// Replace mode forces retranslation of everything.
    Replace,
}

/// What to do with one source entry when rebuilding a target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction<'a> {
    /// The target already has a usable translation; carry it forward.
    Keep(&'a Entry),
    /// The target value still equals the source text; translate it again.
    Retranslate,
    /// No usable target value; translate from source.
    Translate(TranslateReason),
}

/// Decide what to do with one source entry, without touching I/O or the
/// network.
///
/// A target value containing `{`/`}` is always retranslated, regardless of
/// any mode; an empty target value counts as missing.
pub fn plan_entry<'a>(
    source_value: &str,
    target: Option<&'a Entry>,
    flags: SyncFlags,
) -> EntryAction<'a> {
    let Some(target) = target else {
        return EntryAction::Translate(TranslateReason::Missing);
    };
    if target.value.is_empty() {
        return EntryAction::Translate(TranslateReason::Empty);
    }
    if target.value.contains(['{', '}']) {
        return EntryAction::Translate(TranslateReason::Placeholder);
    }
    if flags.replace {
        return EntryAction::Translate(TranslateReason::Replace);
    }
    if flags.retry_identical && target.value == source_value {
        return EntryAction::Retranslate;
    }
    EntryAction::Keep(target)
}

/// Counters for one run, serialized into the optional JSON report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Language directories processed (skipped directories not included).
    pub directories: usize,
    /// Entries in the source table.
    pub source_entries: usize,
    pub kept: usize,
    pub translated: usize,
    pub retranslated: usize,
    /// Entries appended in specific-content mode.
    pub appended: usize,
    /// Requests that fell back to the source text.
    pub fallbacks: usize,
    /// Locale codes that had at least one fallback.
    pub fallback_languages: BTreeSet<String>,
}

impl SyncReport {
    fn note_outcome(&mut self, outcome: &Outcome, code: &str) {
        if outcome.is_fallback() {
            self.fallbacks += 1;
            self.fallback_languages.insert(code.to_string());
        }
    }
}

/// List the language directories: every immediate subdirectory of the root,
/// sorted by name. No locale-convention validation is applied.
pub fn language_directories(root: &Path) -> Result<Vec<String>, Error> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Path of the authoritative source table.
pub fn source_table_path(root: &Path, original_language: Option<&str>) -> PathBuf {
    match original_language {
        Some(lang) => root
            .join(format!("{}.lproj", lang))
            .join("Localizable.strings"),
        None => root.join("Localizable.strings"),
    }
}

/// Rebuild every target table from the source table.
///
/// For each language directory, each source key is kept, retranslated, or
/// translated per [`plan_entry`], and the whole target file is rewritten in
/// source order. Every source key ends up in every target table.
pub async fn sync_tables(
    options: &SyncOptions,
    provider: &dyn Translator,
) -> Result<SyncReport, Error> {
    let source_path = source_table_path(&options.root, options.original_language.as_deref());
    if !source_path.is_file() {
        return Err(Error::MissingSource(source_path));
    }
    let source = Table::read_from(&source_path)?;
    let dirs = language_directories(&options.root)?;
    let flags = options.flags();
    let source_dir = options.source_dir_name();
    let source_code = options.source_locale_code().to_string();

    let mut report = SyncReport {
        source_entries: source.len(),
        ..SyncReport::default()
    };

    let dir_total = dirs.len();
    let entry_total = source.len();
    for (dir_index, dir) in dirs.iter().enumerate() {
        info!(
            "translating directory {}/{}: {}",
            dir_index + 1,
            dir_total,
            dir
        );

        // The source-language directory itself is rewritten normalized to
        // en.lproj, with the locale code pinned to "en".
        let (code, target_path) = if *dir == source_dir {
            (
                "en".to_string(),
                options.root.join("en.lproj").join("Localizable.strings"),
            )
        } else {
            (
                service_code(directory_stem(dir)).to_string(),
                options.root.join(dir).join("Localizable.strings"),
            )
        };

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let target = Table::read_or_empty(&target_path)?;

        let mut rewritten = Table::default();
        for (position, source_entry) in source.entries.iter().enumerate() {
            let source_comment = source_entry
                .comment
                .clone()
                .unwrap_or_else(|| options.default_comment.clone());

            match plan_entry(&source_entry.value, target.get(&source_entry.key), flags) {
                EntryAction::Keep(existing) => {
                    debug!("keeping '{}' for '{}'", source_entry.key, code);
                    rewritten.entries.push(Entry {
                        key: source_entry.key.clone(),
                        value: existing.value.clone(),
                        comment: Some(existing.comment.clone().unwrap_or(source_comment)),
                    });
                    report.kept += 1;
                }
                EntryAction::Retranslate => {
                    let outcome = translate_with_retry(
                        provider,
                        &source_entry.value,
                        &source_code,
                        &code,
                        options.retry,
                    )
                    .await;
                    info!(
                        "retrying translation for '{}' ({}/{}): original: {:?}, translated: {:?}",
                        code,
                        position + 1,
                        entry_total,
                        source_entry.value,
                        outcome.text()
                    );
                    report.note_outcome(&outcome, &code);
                    rewritten.entries.push(Entry {
                        key: source_entry.key.clone(),
                        value: outcome.into_text(),
                        comment: Some(source_comment),
                    });
                    report.retranslated += 1;
                }
                EntryAction::Translate(reason) => {
                    let outcome = translate_with_retry(
                        provider,
                        &source_entry.value,
                        &source_code,
                        &code,
                        options.retry,
                    )
                    .await;
                    info!(
                        "translating for '{}' ({}/{}, {:?}): original: {:?}, translated: {:?}",
                        code,
                        position + 1,
                        entry_total,
                        reason,
                        source_entry.value,
                        outcome.text()
                    );
                    report.note_outcome(&outcome, &code);
                    rewritten.entries.push(Entry {
                        key: source_entry.key.clone(),
                        value: outcome.into_text(),
                        comment: Some(source_comment),
                    });
                    report.translated += 1;
                }
            }
        }

        rewritten.write_to(&target_path)?;
        report.directories += 1;
    }

    Ok(report)
}

/// Translate one literal string into every target locale and append it to
/// each target file under the default comment, with the key quoted.
///
/// Append-only: repeated runs with the same content append duplicate
/// entries. The source/English directory is skipped.
pub async fn append_content(
    options: &SyncOptions,
    provider: &dyn Translator,
    content: &str,
) -> Result<SyncReport, Error> {
    let source_path = source_table_path(&options.root, options.original_language.as_deref());
    if !source_path.is_file() {
        return Err(Error::MissingSource(source_path));
    }
    let dirs = language_directories(&options.root)?;
    let source_dir = options.source_dir_name();
    let source_code = options.source_locale_code().to_string();

    let mut report = SyncReport::default();

    let dir_total = dirs.len();
    for (dir_index, dir) in dirs.iter().enumerate() {
        info!(
            "translating directory {}/{}: {}",
            dir_index + 1,
            dir_total,
            dir
        );
        if *dir == source_dir || dir == "en.lproj" {
            continue;
        }

        let code = service_code(directory_stem(dir));
        let target_path = options.root.join(dir).join("Localizable.strings");
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let outcome = translate_with_retry(provider, content, &source_code, code, options.retry).await;
        info!(
            "translating for '{}' ({}/{}): original: {:?}, translated: {:?}",
            code,
            dir_index + 1,
            dir_total,
            content,
            outcome.text()
        );
        report.note_outcome(&outcome, code);

        let entry = Entry {
            key: format!("\"{}\"", content),
            value: outcome.into_text(),
            comment: Some(options.default_comment.clone()),
        };
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&target_path)?;
        write!(file, "{}\n\n", entry)?;
        report.appended += 1;
        report.directories += 1;
    }

    Ok(report)
}
