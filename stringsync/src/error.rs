//! All error types for the stringsync crate.
//!
//! These are returned from all fallible operations (parsing, serialization,
//! directory discovery, remote translation).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source strings file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid locale: {0}")]
    InvalidLocale(String),

    #[error("configuration error: {0}")]
    Config(String),
}
