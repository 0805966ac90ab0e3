//! macOS `say` engine.
//!
//! Uses the speech synthesis command built into every macOS system.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::engine::TtsEngine;
use crate::errors::TtsError;
use crate::request::{DEFAULT_RATE_WPM, DEFAULT_VOLUME};
use crate::types::Voice;

/// macOS `say` engine handle.
///
/// ## Flags
///
/// - `-r` sets the rate in words per minute
/// - `-v` selects a voice by name ("Samantha", "Alex", ...)
///
/// `say` has no volume flag; volume rides as a `[[volm v]]` embedded
/// speech command prefixed to the utterance. Text is piped over stdin.
#[derive(Debug, Clone)]
pub struct SayEngine {
    rate: u32,
    volume: f32,
    voice: Option<String>,
}

impl SayEngine {
    const BINARY: &'static str = "say";

    /// Create a handle with default rate and volume.
    pub fn new() -> Self {
        Self {
            rate: DEFAULT_RATE_WPM,
            volume: DEFAULT_VOLUME,
            voice: None,
        }
    }

    fn synthesis_args(&self) -> Vec<String> {
        let mut args = vec!["-r".into(), self.rate.to_string()];
        if let Some(voice) = &self.voice {
            args.push("-v".into());
            args.push(voice.clone());
        }
        args
    }
}

impl Default for SayEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix the utterance with a `[[volm]]` directive carrying the volume.
///
/// The directive is interpreted by the synthesizer, not spoken.
fn spoken_text(volume: f32, text: &str) -> String {
    format!("[[volm {:.2}]] {text}", volume.clamp(0.0, 1.0))
}

impl TtsEngine for SayEngine {
    fn name(&self) -> &str {
        Self::BINARY
    }

    fn set_rate(&mut self, wpm: u32) {
        self.rate = wpm;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_voice(&mut self, id: &str) {
        self.voice = Some(id.to_string());
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, TtsError> {
        let output = tokio::process::Command::new(Self::BINARY)
            .arg("-v")
            .arg("?")
            .output()
            .await
            .map_err(|source| TtsError::SpawnFailed {
                engine: Self::BINARY.into(),
                source,
            })?;

        if !output.status.success() {
            return Err(TtsError::VoiceListFailed {
                engine: Self::BINARY.into(),
                message: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(parse_voice_line)
            .collect())
    }

    async fn speak(&self, text: &str) -> Result<(), TtsError> {
        let mut cmd = tokio::process::Command::new(Self::BINARY);
        cmd.args(self.synthesis_args());
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| TtsError::SpawnFailed {
            engine: Self::BINARY.into(),
            source,
        })?;

        let mut stdin = child.stdin.take().ok_or_else(|| TtsError::StdinPipe {
            engine: Self::BINARY.into(),
        })?;

        stdin
            .write_all(spoken_text(self.volume, text).as_bytes())
            .await
            .map_err(|_| TtsError::StdinWrite {
                engine: Self::BINARY.into(),
            })?;

        // Drop stdin to send EOF; say speaks once input ends.
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| TtsError::Io { source })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(TtsError::SynthesisFailed {
                engine: Self::BINARY.into(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}

/// Parse a line of `say -v '?'` output.
///
/// The format is:
///
/// ```text
/// VoiceName           locale    # Sample text
/// VoiceName (Qualifier) locale  # Sample text
/// ```
///
/// `say` addresses voices by name, so the name is the identifier. The
/// locale is the last token before the `#`.
fn parse_voice_line(line: &str) -> Option<Voice> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let metadata = line.splitn(2, '#').next()?.trim();
    let tokens: Vec<&str> = metadata.split_whitespace().collect();
    if tokens.len() < 2 {
        trace!(line, "skipping voice line with insufficient tokens");
        return None;
    }

    let locale = *tokens.last()?;
    let name_end = metadata.rfind(locale)?;
    let name = metadata[..name_end].trim();
    if name.is_empty() {
        return None;
    }

    Some(Voice::new(name, name).with_language(locale.replace('_', "-")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_args_with_defaults() {
        let engine = SayEngine::new();
        assert_eq!(engine.synthesis_args(), vec!["-r", "175"]);
    }

    #[test]
    fn synthesis_args_with_staged_configuration() {
        let mut engine = SayEngine::new();
        engine.set_rate(219);
        engine.set_voice("Samantha");
        assert_eq!(
            engine.synthesis_args(),
            vec!["-r", "219", "-v", "Samantha"]
        );
    }

    #[test]
    fn volume_rides_as_an_embedded_directive() {
        assert_eq!(spoken_text(0.5, "hello"), "[[volm 0.50]] hello");
        assert_eq!(spoken_text(1.0, "hello"), "[[volm 1.00]] hello");
    }

    #[test]
    fn embedded_volume_is_clamped() {
        assert_eq!(spoken_text(1.5, "hi"), "[[volm 1.00]] hi");
        assert_eq!(spoken_text(-0.3, "hi"), "[[volm 0.00]] hi");
    }

    #[test]
    fn parse_simple_voice() {
        let line = "Albert              en_US    # Hello! My name is Albert.";
        let voice = parse_voice_line(line).unwrap();
        assert_eq!(voice.id, "Albert");
        assert_eq!(voice.name, "Albert");
        assert_eq!(voice.language, Some("en-US".into()));
    }

    #[test]
    fn parse_qualified_voice_keeps_full_name() {
        let line = "Samantha (Enhanced) en_US    # Hello! My name is Samantha.";
        let voice = parse_voice_line(line).unwrap();
        assert_eq!(voice.id, "Samantha (Enhanced)");
    }

    #[test]
    fn parse_voice_with_nested_qualifier() {
        let line = "Eddy (English (US)) en_US    # Hello! My name is Eddy.";
        let voice = parse_voice_line(line).unwrap();
        assert_eq!(voice.id, "Eddy (English (US))");
        assert_eq!(voice.language, Some("en-US".into()));
    }

    #[test]
    fn parse_non_english_voice() {
        let line = "Amélie              fr_CA    # Bonjour! Je m'appelle Amélie.";
        let voice = parse_voice_line(line).unwrap();
        assert_eq!(voice.id, "Amélie");
        assert_eq!(voice.language, Some("fr-CA".into()));
    }

    #[test]
    fn parse_multi_word_voice_name() {
        let line = "Bad News            en_US    # Hello! My name is Bad News.";
        let voice = parse_voice_line(line).unwrap();
        assert_eq!(voice.id, "Bad News");
    }

    #[test]
    fn empty_and_malformed_lines_are_skipped() {
        assert!(parse_voice_line("").is_none());
        assert!(parse_voice_line("   ").is_none());
        assert!(parse_voice_line("LoneName").is_none());
    }

    #[cfg(target_os = "macos")]
    #[tokio::test]
    #[ignore] // Produces audio - run manually.
    async fn speaks_on_macos() {
        let engine = SayEngine::new();
        engine.speak("Testing the say engine.").await.unwrap();
    }
}
