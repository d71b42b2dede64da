//! Google Translate API provider.
//!
//! Talks to Google Translate API v2. The API key is loaded from the
//! `GOOGLE_TRANSLATE_API_KEY` environment variable.

use async_trait::async_trait;
use serde_json::json;

use crate::error::Error;
use crate::locale::validate_code;
use crate::translate::Translator;

/// Google Translate API v2 provider.
#[derive(Clone)]
pub struct GoogleTranslate {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslate {
    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Create a new provider with an explicit API key.
    pub fn new(api_key: String) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            api_key,
            client,
            base_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment
    /// variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("GOOGLE_TRANSLATE_API_KEY").map_err(|_| {
            Error::Config("GOOGLE_TRANSLATE_API_KEY environment variable not set".to_string())
        })?;

        Self::new(api_key)
    }
}

impl std::fmt::Debug for GoogleTranslate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslate")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, Error> {
        validate_code(source)?;
        validate_code(target)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        if text.len() > Self::MAX_CHARS_PER_STRING {
            return Err(Error::Translation(format!(
                "text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);

        // Locale codes are already service codes (e.g. "zh-cn"); they are
        // passed through as-is, not normalized to their base language.
        let body = json!({
            "q": [text],
            "source": source,
            "target": target,
            "format": "text"
        });

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());

            return Err(Error::Translation(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let payload: serde_json::Value = response.json().await?;

        payload["data"]["translations"][0]["translatedText"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                Error::Translation(
                    "invalid API response: missing 'data.translations[0].translatedText'"
                        .to_string(),
                )
            })
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}
