//! Locale code handling for `*.lproj` language directories.

use crate::error::Error;

/// Map a language directory stem to the translation service's locale code.
///
/// Chinese variants need an explicit remap; every other name passes through
/// unchanged.
pub fn service_code(language: &str) -> &str {
    match language {
        "zh-Hans" | "zh-CN" => "zh-cn",
        "zh-Hant" | "zh-TW" | "zh-HK" => "zh-tw",
        other => other,
    }
}

/// Language part of a directory name, e.g. `fr.lproj` -> `fr`.
pub fn directory_stem(dir_name: &str) -> &str {
    dir_name.split('.').next().unwrap_or(dir_name)
}

/// Check that a locale code is safe to put in a translation request:
/// non-empty, ASCII alphanumeric plus `-`/`_`.
pub fn validate_code(code: &str) -> Result<(), Error> {
    if code.is_empty() {
        return Err(Error::InvalidLocale("locale code is empty".to_string()));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidLocale(format!(
            "invalid characters in locale code: {}",
            code
        )));
    }

    Ok(())
}
