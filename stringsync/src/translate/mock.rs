//! Deterministic, API-free translator for tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Error;
use crate::translate::Translator;

/// Mock translation modes.
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target locale: `hello` -> `hello_fr`.
    Suffix,
    /// Predefined `(text, target locale) -> translation` mappings, falling
    /// back to the suffix behavior for unknown pairs.
    Mappings(HashMap<(String, String), String>),
    /// Always fail with the given message.
    Error(String),
}

/// Translator that simulates translation without network access.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self { mode }
    }

    /// Shorthand for the suffix mode, the one most tests want.
    pub fn suffix() -> Self {
        Self::new(MockMode::Suffix)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String, Error> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Error(message) => Err(Error::Translation(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
