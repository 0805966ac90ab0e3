//! The speech request and its decoder.
//!
//! One process handles exactly one request: a JSON object with a required
//! `text` key and optional `rate`, `volume`, and `voice` keys. The request
//! is immutable once decoded.

use serde::Deserialize;

use crate::errors::RequestError;

/// Default speaking rate in words per minute.
pub const DEFAULT_RATE_WPM: u32 = 175;

/// Default output volume (full scale).
pub const DEFAULT_VOLUME: f32 = 1.0;

/// One utterance plus its optional voice parameters.
///
/// Unrecognized keys in the payload are ignored. Out-of-range `rate` and
/// `volume` values are accepted here and clamped at the engine boundary.
///
/// ## Examples
///
/// ```
/// use voicebox::SpeechRequest;
///
/// let request = SpeechRequest::from_json(r#"{"text":"hello"}"#).unwrap();
/// assert_eq!(request.rate, 175);
/// assert_eq!(request.volume, 1.0);
/// assert!(request.voice.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeechRequest {
    /// The utterance to synthesize.
    pub text: String,
    /// Speaking rate in words per minute.
    #[serde(default = "default_rate")]
    pub rate: u32,
    /// Output volume in [0.0, 1.0].
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Requested installed-voice id; `None` keeps the engine default.
    #[serde(default)]
    pub voice: Option<String>,
}

fn default_rate() -> u32 {
    DEFAULT_RATE_WPM
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl SpeechRequest {
    /// Decode a request from the raw JSON argument.
    ///
    /// ## Errors
    ///
    /// - [`RequestError::Malformed`] when the argument is not JSON
    /// - [`RequestError::NotAnObject`] when it is JSON but not an object
    /// - [`RequestError::MissingText`] when the object has no `text` key
    /// - [`RequestError::InvalidField`] when a recognized key has the
    ///   wrong type
    pub fn from_json(raw: &str) -> Result<Self, RequestError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|source| RequestError::Malformed { source })?;

        let object = value.as_object().ok_or(RequestError::NotAnObject)?;
        if !object.contains_key("text") {
            return Err(RequestError::MissingText);
        }

        serde_json::from_value(value).map_err(|source| RequestError::InvalidField { source })
    }
}
