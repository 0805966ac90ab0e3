//! Windows SAPI engine.
//!
//! Drives System.Speech through PowerShell, which keeps the crate free of
//! Windows API bindings and works on every stock Windows install.

use tracing::trace;

use crate::engine::TtsEngine;
use crate::errors::TtsError;
use crate::request::{DEFAULT_RATE_WPM, DEFAULT_VOLUME};
use crate::types::Voice;

/// SAPI rate 0 corresponds to roughly this many words per minute; each
/// rate step up or down is ~11% faster or slower.
const SAPI_BASE_WPM: f64 = 156.63;
const SAPI_RATE_STEP: f64 = 1.11;

/// Windows System.Speech engine handle.
///
/// Each operation generates one PowerShell script. The utterance and any
/// voice id are embedded as single-quoted PowerShell string literals.
#[derive(Debug, Clone)]
pub struct SapiEngine {
    rate: u32,
    volume: f32,
    voice: Option<String>,
}

impl SapiEngine {
    const BINARY: &'static str = "powershell";

    /// Create a handle with default rate and volume.
    pub fn new() -> Self {
        Self {
            rate: DEFAULT_RATE_WPM,
            volume: DEFAULT_VOLUME,
            voice: None,
        }
    }

    /// Build the synthesis script from the staged configuration.
    fn synthesis_script(&self, text: &str) -> String {
        let mut script = String::from(
            "Add-Type -AssemblyName System.Speech; \
             $speech = New-Object System.Speech.Synthesis.SpeechSynthesizer; ",
        );
        script.push_str(&format!("$speech.Rate = {}; ", sapi_rate(self.rate)));
        script.push_str(&format!("$speech.Volume = {}; ", sapi_volume(self.volume)));
        if let Some(id) = &self.voice {
            script.push_str(&format!(
                "foreach ($v in $speech.GetInstalledVoices()) {{ \
                 if ($v.VoiceInfo.Id -eq '{}') {{ $speech.SelectVoice($v.VoiceInfo.Name) }} }}; ",
                single_quoted(id)
            ));
        }
        script.push_str(&format!("$speech.Speak('{}');", single_quoted(text)));
        script
    }

    async fn run(&self, script: &str) -> Result<std::process::Output, TtsError> {
        tokio::process::Command::new(Self::BINARY)
            .arg("-NoProfile")
            .arg("-Command")
            .arg(script)
            .output()
            .await
            .map_err(|source| TtsError::SpawnFailed {
                engine: Self::BINARY.into(),
                source,
            })
    }
}

impl Default for SapiEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Map words per minute onto SAPI's log-scaled [-10, 10] rate.
fn sapi_rate(wpm: u32) -> i32 {
    let ratio = f64::from(wpm) / SAPI_BASE_WPM;
    let steps = (ratio.ln() / SAPI_RATE_STEP.ln()).trunc() as i32;
    steps.clamp(-10, 10)
}

/// Map a [0.0, 1.0] volume onto SAPI's 0..=100 scale.
fn sapi_volume(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Escape a string for a single-quoted PowerShell literal.
fn single_quoted(text: &str) -> String {
    text.replace('\'', "''")
}

impl TtsEngine for SapiEngine {
    fn name(&self) -> &str {
        "sapi"
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
        let script = "Add-Type -AssemblyName System.Speech; \
             $speech = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
             foreach ($v in $speech.GetInstalledVoices()) { \
             $i = $v.VoiceInfo; Write-Output ('{0}|{1}|{2}' -f $i.Id, $i.Name, $i.Culture) }";

        let output = self.run(script).await?;
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
        let output = self.run(&self.synthesis_script(text)).await?;

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

/// Parse one `Id|Name|Culture` line of the voice-listing script output.
fn parse_voice_line(line: &str) -> Option<Voice> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = line.splitn(3, '|');
    let id = parts.next()?.trim();
    let name = parts.next()?.trim();
    if id.is_empty() || name.is_empty() {
        trace!(line, "skipping voice line without id and name");
        return None;
    }

    let mut voice = Voice::new(id, name);
    if let Some(culture) = parts.next() {
        let culture = culture.trim();
        if !culture.is_empty() {
            voice = voice.with_language(culture);
        }
    }
    Some(voice)
}
