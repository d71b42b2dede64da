#![forbid(unsafe_code)]
//! Synchronize Apple `.strings` tables across `*.lproj` language directories.
//!
//! The authoritative source-language table drives every run: for each of its
//! keys the sync engine decides whether to keep the existing target value,
//! retranslate it, or insert a fresh translation, then rewrites each target
//! file deterministically in source order. Remote translation is optional —
//! with the default retry policy every request falls back to the source text,
//! so the tool degrades to a table normalizer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stringsync::{Disabled, SyncOptions, sync_tables};
//!
//! # async fn run() -> Result<(), stringsync::Error> {
//! let options = SyncOptions::new("resources/l10n");
//! let report = sync_tables(&options, &Disabled).await?;
//! println!("kept {}, translated {}", report.kept, report.translated);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod locale;
pub mod sync;
pub mod table;
pub mod traits;
pub mod translate;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    sync::{
        DEFAULT_COMMENT, EntryAction, SyncFlags, SyncOptions, SyncReport, TranslateReason,
        append_content, plan_entry, sync_tables,
    },
    table::{Entry, Table},
    translate::{
        Disabled, GoogleTranslate, MockMode, MockTranslator, Outcome, RetryPolicy, Translator,
        translate_with_retry,
    },
};
