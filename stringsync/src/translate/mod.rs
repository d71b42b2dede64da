//! Translation provider abstraction and the bounded-retry fallback policy.
//!
//! Providers implement [`Translator`]; the sync driver only ever calls them
//! through [`translate_with_retry`], which caps attempts and degrades to the
//! source text instead of surfacing an error.

pub mod google;
pub mod mock;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Error;

pub use google::GoogleTranslate;
pub use mock::{MockMode, MockTranslator};

/// Generic trait for machine translation providers.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from the `source` to the `target` locale code.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, Error>;

    /// Provider name used in logs.
    fn name(&self) -> &str;
}

/// Placeholder provider used when remote translation is turned off.
///
/// Every call errors, so the retry wrapper immediately falls back to the
/// source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl Translator for Disabled {
    async fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String, Error> {
        Err(Error::Translation(
            "remote translation is disabled".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Bounded linear retry for remote translation calls.
///
/// A `max_attempts` of zero disables translation entirely; every request
/// falls back to the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed sleep between failed attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            delay: Duration::from_secs(1),
        }
    }
}

/// Result of a translate-or-fall-back request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The provider returned a translation.
    Translated(String),
    /// All attempts were exhausted; the source text is carried unchanged.
    Fallback(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::Translated(text) | Outcome::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Outcome::Translated(text) | Outcome::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }
}

/// Attempt a remote translation up to `policy.max_attempts` times, sleeping
/// `policy.delay` between failures.
///
/// Errors never propagate to the caller: each failed attempt is logged and
/// retried, and exhaustion yields [`Outcome::Fallback`] with the source text.
pub async fn translate_with_retry(
    provider: &dyn Translator,
    text: &str,
    source: &str,
    target: &str,
    policy: RetryPolicy,
) -> Outcome {
    for attempt in 1..=policy.max_attempts {
        match provider.translate(text, source, target).await {
            Ok(translated) => return Outcome::Translated(translated),
            Err(error) => {
                warn!(
                    provider = provider.name(),
                    attempt,
                    "failed to translate {:?} to '{}': {}",
                    text,
                    target,
                    error
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }

    if policy.max_attempts > 0 {
        warn!(
            "failed to translate {:?} to '{}' after {} attempts, falling back to source text",
            text, target, policy.max_attempts
        );
    } else {
        debug!("translation disabled, carrying source text for '{}'", target);
    }
    Outcome::Fallback(text.to_string())
}
