use serde::{Deserialize, Serialize};

/// Languages the recognition service accepts, as (tag, display name)
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("es-ES", "Español (España)"),
    ("en-US", "English (US)"),
    ("ar-SA", "العربية (السعودية)"),
    ("ur-PK", "اردو (پاکستان)"),
];

/// Whether `tag` is in the supported language set
pub fn is_supported_language(tag: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(code, _)| *code == tag)
}

/// Configuration for a recognition supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// BCP-47 tag for the language to recognize.
    ///
    /// A live session keeps the language it was created with; changing it
    /// requires stopping and starting again.
    pub language: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            language: "ar-SA".to_string(),
        }
    }
}
