//! Voicebox
//!
//! A small abstraction over host text-to-speech engines, built for
//! single-shot use: decode one speech request, configure an engine,
//! speak, wait until the audio is done.
//!
//! ## Engines
//!
//! - macOS `say`
//! - eSpeak-NG / eSpeak (Linux and anywhere else it is installed)
//! - Windows System.Speech via PowerShell
//!
//! ## Quick Start
//!
//! ```ignore
//! use voicebox::SpeechRequest;
//!
//! let request = SpeechRequest::from_json(r#"{"text":"hello","rate":200}"#)?;
//! let mut engine = voicebox::detect()?;
//! voicebox::speak(&mut engine, &request).await?;
//! ```
//!
//! ## Module Structure
//!
//! - [`request`] - the decoded speech request
//! - [`engine`] - the `TtsEngine` capability and host-engine detection
//! - [`providers`] - the concrete engine implementations
//! - [`speak`] - the invoker that drives one request through an engine
//! - [`errors`] - error types

pub mod engine;
pub mod errors;
pub mod providers;
pub mod request;
pub mod speak;
pub mod types;

pub use engine::{HostEngine, TtsEngine, detect};
pub use errors::{RequestError, TtsError};
pub use providers::{EspeakEngine, SapiEngine, SayEngine};
pub use request::{DEFAULT_RATE_WPM, DEFAULT_VOLUME, SpeechRequest};
pub use speak::speak;
pub use types::Voice;
