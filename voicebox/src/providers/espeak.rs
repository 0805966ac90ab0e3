//! eSpeak/eSpeak-NG engine.
//!
//! Uses the `espeak-ng` or `espeak` command. Common on Linux, available
//! cross-platform.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::engine::TtsEngine;
use crate::errors::TtsError;
use crate::request::{DEFAULT_RATE_WPM, DEFAULT_VOLUME};
use crate::types::Voice;

/// eSpeak-NG / eSpeak engine handle.
///
/// ## Flags
///
/// - `-s` sets the rate in words per minute (the tool's own default is
///   175 wpm)
/// - `-a` sets the amplitude, 0..=200 where 100 is normal
/// - `-v` selects a voice by its language-code identifier (e.g. "en-gb")
///
/// Text is piped over stdin.
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    /// The binary in use (espeak-ng or espeak).
    binary: String,
    rate: u32,
    volume: f32,
    voice: Option<String>,
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EspeakEngine {
    /// Create a handle, preferring `espeak-ng` over `espeak`.
    pub fn new() -> Self {
        let binary = if which::which("espeak-ng").is_ok() {
            "espeak-ng"
        } else {
            "espeak"
        };
        Self::with_binary(binary)
    }

    /// Create a handle for a specific binary name.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            rate: DEFAULT_RATE_WPM,
            volume: DEFAULT_VOLUME,
            voice: None,
        }
    }

    /// Build the synthesis argument list from the staged configuration.
    fn synthesis_args(&self) -> Vec<String> {
        let mut args = vec![
            "-s".into(),
            self.rate.to_string(),
            "-a".into(),
            amplitude(self.volume).to_string(),
        ];
        if let Some(voice) = &self.voice {
            args.push("-v".into());
            args.push(voice.clone());
        }
        args
    }
}

/// Map a [0.0, 1.0] volume onto the `-a` amplitude scale (100 = normal).
fn amplitude(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u32
}

impl TtsEngine for EspeakEngine {
    fn name(&self) -> &str {
        &self.binary
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
        let output = tokio::process::Command::new(&self.binary)
            .arg("--voices")
            .output()
            .await
            .map_err(|e| TtsError::VoiceListFailed {
                engine: self.binary.clone(),
                message: format!("failed to run `{} --voices`: {e}", self.binary),
            })?;

        if !output.status.success() {
            return Err(TtsError::VoiceListFailed {
                engine: self.binary.clone(),
                message: format!(
                    "`--voices` exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }

        Ok(parse_voice_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn speak(&self, text: &str) -> Result<(), TtsError> {
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.args(self.synthesis_args());
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| TtsError::SpawnFailed {
            engine: self.binary.clone(),
            source,
        })?;

        let mut stdin = child.stdin.take().ok_or_else(|| TtsError::StdinPipe {
            engine: self.binary.clone(),
        })?;

        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|_| TtsError::StdinWrite {
                engine: self.binary.clone(),
            })?;

        // Drop stdin to send EOF; espeak reads to end of input.
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| TtsError::Io { source })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(TtsError::SynthesisFailed {
                engine: self.binary.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}

/// Parse the output of `espeak-ng --voices` / `espeak --voices`.
///
/// The listing is whitespace-columned:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File
///  5  en-gb              -/M    English_(GB)       gmw/en-GB
/// ```
///
/// The language code doubles as the voice identifier: it is what `-v`
/// accepts. Unparseable lines are skipped.
fn parse_voice_listing(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let voice = parse_voice_line(line);
            if voice.is_none() && !line.trim().is_empty() {
                trace!(line, "skipping unparseable voice line");
            }
            voice
        })
        .collect()
}

fn parse_voice_line(line: &str) -> Option<Voice> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    // Pty, Language, Age/Gender, VoiceName, File
    if parts.len() < 5 {
        return None;
    }

    // The header line starts with "Pty", which is not numeric.
    if parts[0].parse::<u32>().is_err() {
        return None;
    }

    let language = parts[1];
    let name = parts[3];
    if language.is_empty() || name.is_empty() {
        return None;
    }

    Some(Voice::new(language, name).with_language(language))
}
