use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Sessions are keyed by a random UUID assigned when they are composed.
pub type SessionId = uuid::Uuid;

/// Opaque user identifier supplied by the identity provider.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Locales the analysis pipeline supports end to end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// ISO 639-1 code, as sent to the speech provider and stored on the session.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Upper-case language name used in generation prompts.
    pub fn feedback_name(self) -> &'static str {
        match self {
            Language::En => "ENGLISH",
            Language::Es => "SPANISH",
        }
    }

    /// Labour-market context the recruiter persona is told to assume.
    pub fn market_context(self) -> &'static str {
        match self {
            Language::En => "English-speaking",
            Language::Es => "Spanish-speaking",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(CoreError::Validation(format!(
                "Unsupported language '{other}'. Supported: en, es"
            ))),
        }
    }
}
