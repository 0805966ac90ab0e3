//! The engine capability and host-engine detection.
//!
//! The engine handle is constructed locally by [`detect`] at the start of
//! an invocation and dropped when the utterance is done. There is no
//! process-wide engine state.

use tracing::debug;

use crate::errors::TtsError;
use crate::providers::{EspeakEngine, SapiEngine, SayEngine};
use crate::types::Voice;

/// The capability every host text-to-speech engine exposes.
///
/// Setters stage configuration on the handle; [`TtsEngine::speak`] submits
/// the utterance and resolves only after the engine has finished speaking.
/// Every engine here is a subprocess, so "speak" and "wait until done" are
/// one operation: the subprocess exiting is the queue draining.
///
/// Uses native async functions in traits; implementations must be
/// `Send + Sync` and produce `Send` futures.
pub trait TtsEngine: Send + Sync {
    /// Short name of the engine, for diagnostics.
    fn name(&self) -> &str;

    /// Stage the speaking rate in words per minute.
    fn set_rate(&mut self, wpm: u32);

    /// Stage the output volume. Values outside [0.0, 1.0] are clamped
    /// when the engine arguments are built.
    fn set_volume(&mut self, volume: f32);

    /// Stage an installed voice by its engine-specific id.
    fn set_voice(&mut self, id: &str);

    /// Enumerate the voices installed for this engine.
    fn list_voices(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Voice>, TtsError>> + Send;

    /// Synthesize the text with the staged configuration and block until
    /// the engine has finished speaking.
    fn speak(&self, text: &str) -> impl std::future::Future<Output = Result<(), TtsError>> + Send;
}

/// A host engine selected by [`detect`].
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum HostEngine {
    /// eSpeak-NG / eSpeak subprocess.
    ESpeak(EspeakEngine),
    /// macOS `say` subprocess.
    Say(SayEngine),
    /// Windows System.Speech via PowerShell.
    Sapi(SapiEngine),
}

impl TtsEngine for HostEngine {
    fn name(&self) -> &str {
        match self {
            HostEngine::ESpeak(engine) => engine.name(),
            HostEngine::Say(engine) => engine.name(),
            HostEngine::Sapi(engine) => engine.name(),
        }
    }

    fn set_rate(&mut self, wpm: u32) {
        match self {
            HostEngine::ESpeak(engine) => engine.set_rate(wpm),
            HostEngine::Say(engine) => engine.set_rate(wpm),
            HostEngine::Sapi(engine) => engine.set_rate(wpm),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        match self {
            HostEngine::ESpeak(engine) => engine.set_volume(volume),
            HostEngine::Say(engine) => engine.set_volume(volume),
            HostEngine::Sapi(engine) => engine.set_volume(volume),
        }
    }

    fn set_voice(&mut self, id: &str) {
        match self {
            HostEngine::ESpeak(engine) => engine.set_voice(id),
            HostEngine::Say(engine) => engine.set_voice(id),
            HostEngine::Sapi(engine) => engine.set_voice(id),
        }
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, TtsError> {
        match self {
            HostEngine::ESpeak(engine) => engine.list_voices().await,
            HostEngine::Say(engine) => engine.list_voices().await,
            HostEngine::Sapi(engine) => engine.list_voices().await,
        }
    }

    async fn speak(&self, text: &str) -> Result<(), TtsError> {
        match self {
            HostEngine::ESpeak(engine) => engine.speak(text).await,
            HostEngine::Say(engine) => engine.speak(text).await,
            HostEngine::Sapi(engine) => engine.speak(text).await,
        }
    }
}

/// Binaries probed by [`detect`], in priority order for this platform.
#[cfg(target_os = "macos")]
const PROBED_BINARIES: &[&str] = &["say", "espeak-ng", "espeak"];
#[cfg(target_os = "windows")]
const PROBED_BINARIES: &[&str] = &["powershell", "espeak-ng", "espeak"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const PROBED_BINARIES: &[&str] = &["espeak-ng", "espeak"];

/// Find a usable host engine.
///
/// Probes for the platform's native engine first (`say` on macOS, SAPI via
/// PowerShell on Windows), then falls back to eSpeak-NG/eSpeak anywhere.
///
/// ## Errors
///
/// Returns [`TtsError::EngineUnavailable`] when none of the candidate
/// binaries exist on the host.
pub fn detect() -> Result<HostEngine, TtsError> {
    #[cfg(target_os = "macos")]
    if which::which("say").is_ok() {
        debug!(engine = "say", "selected host text-to-speech engine");
        return Ok(HostEngine::Say(SayEngine::new()));
    }

    #[cfg(target_os = "windows")]
    if which::which("powershell").is_ok() {
        debug!(engine = "sapi", "selected host text-to-speech engine");
        return Ok(HostEngine::Sapi(SapiEngine::new()));
    }

    for binary in ["espeak-ng", "espeak"] {
        if which::which(binary).is_ok() {
            debug!(engine = binary, "selected host text-to-speech engine");
            return Ok(HostEngine::ESpeak(EspeakEngine::with_binary(binary)));
        }
    }

    Err(TtsError::EngineUnavailable {
        searched: PROBED_BINARIES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_finds_an_engine_or_reports_the_probe_list() {
        match detect() {
            Ok(engine) => assert!(!engine.name().is_empty()),
            Err(TtsError::EngineUnavailable { searched }) => {
                assert!(searched.contains(&"espeak-ng"));
            }
            Err(other) => panic!("unexpected detection error: {other}"),
        }
    }

    #[test]
    fn host_engine_delegates_setters() {
        let mut engine = HostEngine::ESpeak(EspeakEngine::with_binary("espeak-ng"));
        engine.set_rate(200);
        engine.set_volume(0.5);
        engine.set_voice("en-gb");
        assert_eq!(engine.name(), "espeak-ng");
    }
}
