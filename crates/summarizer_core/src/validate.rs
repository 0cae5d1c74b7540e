//! URL gate for submissions. Pure and deterministic: the same input always
//! yields the same verdict, and nothing is cached between attempts.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Longest URL accepted for submission, in bytes.
pub const MAX_URL_LEN: usize = 2048;

const REQUIRED_PREFIX: &str = "https://";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("must be a valid URL")]
    Syntax,
    #[error("must start with https://")]
    SchemePolicy,
}

/// A URL that passed [`validate_url`]. Keeps the text the user typed (trimmed)
/// alongside the parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    raw: String,
    parsed: Url,
}

impl ValidatedUrl {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Validate a candidate URL for submission.
///
/// Rules, in order:
/// 1. It must parse as an absolute URL (`ValidationError::Syntax`).
/// 2. It must start with `https://`, lowercase, and carry the `https` scheme
///    (`ValidationError::SchemePolicy`). The prefix is anchored; `https://`
///    appearing later in the string does not count.
/// 3. It must name a host (`ValidationError::Syntax`).
pub fn validate_url(raw: &str) -> Result<ValidatedUrl, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_URL_LEN {
        return Err(ValidationError::Syntax);
    }

    let parsed = Url::parse(trimmed).map_err(|_| ValidationError::Syntax)?;

    if !trimmed.starts_with(REQUIRED_PREFIX) || parsed.scheme() != "https" {
        return Err(ValidationError::SchemePolicy);
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(ValidationError::Syntax),
    }

    Ok(ValidatedUrl {
        raw: trimmed.to_string(),
        parsed,
    })
}
