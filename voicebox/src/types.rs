//! Core types shared across the engine layer.

use serde::{Deserialize, Serialize};

/// A single installed voice exposed by a host engine.
///
/// The `id` is the engine's own opaque identifier and is the only field
/// used for matching a requested voice; `name` and `language` are
/// metadata for diagnostics.
///
/// ## Examples
///
/// ```
/// use voicebox::Voice;
///
/// let voice = Voice::new("en-gb", "English (GB)").with_language("en-gb");
/// assert_eq!(voice.id, "en-gb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Opaque engine-specific identifier.
    pub id: String,
    /// Display name of the voice.
    pub name: String,
    /// Language or locale tag, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Voice {
    /// Create a new voice with the given identifier and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: None,
        }
    }

    /// Set the language tag for this voice.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
