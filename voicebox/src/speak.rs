//! The invoker: one request, one engine, strictly linear.

use tracing::debug;

use crate::engine::TtsEngine;
use crate::errors::TtsError;
use crate::request::SpeechRequest;

/// Render one request as audible speech and wait for it to finish.
///
/// Configuration reaches the engine in a fixed order: rate, then volume,
/// then — when a voice id was requested — the exact-id voice match. The
/// catalog is only consulted when a voice was requested; an unmatched id
/// (or an unreadable catalog) keeps the engine's current voice and the
/// utterance is spoken anyway.
///
/// ## Errors
///
/// Returns the engine's [`TtsError`] when synthesis itself fails.
pub async fn speak<E: TtsEngine>(engine: &mut E, request: &SpeechRequest) -> Result<(), TtsError> {
    engine.set_rate(request.rate);
    engine.set_volume(request.volume);

    if let Some(requested) = &request.voice {
        apply_voice(engine, requested).await;
    }

    engine.speak(&request.text).await
}

/// Select the first installed voice whose id is exactly `requested`.
///
/// Falls back to the engine's current voice on no match or when the
/// catalog cannot be read; neither case is an error for the caller.
async fn apply_voice<E: TtsEngine>(engine: &mut E, requested: &str) {
    match engine.list_voices().await {
        Ok(voices) => match voices.iter().find(|voice| voice.id == requested) {
            Some(voice) => {
                debug!(engine = engine.name(), voice = %voice.id, "selected requested voice");
                engine.set_voice(requested);
            }
            None => {
                debug!(
                    engine = engine.name(),
                    requested, "requested voice not installed, keeping engine default"
                );
            }
        },
        Err(error) => {
            debug!(
                engine = engine.name(),
                %error,
                "voice enumeration failed, keeping engine default"
            );
        }
    }
}
