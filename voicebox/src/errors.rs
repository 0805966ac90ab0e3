//! Error types for request decoding and engine operations.

/// Errors produced while decoding the JSON speech request.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The argument could not be parsed as JSON at all.
    #[error("request is not valid JSON")]
    Malformed {
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The argument parsed, but the top-level value is not an object.
    #[error("request must be a JSON object")]
    NotAnObject,

    /// The object has no `text` key.
    #[error("request is missing the required `text` field")]
    MissingText,

    /// A recognized field carries the wrong type (e.g. a numeric `text`).
    #[error("request field has the wrong type")]
    InvalidField {
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced by the host text-to-speech engine.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// No supported engine binary was found on the host.
    #[error("no usable text-to-speech engine on this host (looked for: {})", .searched.join(", "))]
    EngineUnavailable {
        /// The binaries that were probed, in priority order.
        searched: &'static [&'static str],
    },

    /// The engine subprocess could not be launched.
    #[error("failed to launch `{engine}`")]
    SpawnFailed {
        /// The engine binary that failed to start.
        engine: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The engine subprocess exposed no stdin handle.
    #[error("could not open stdin for `{engine}`")]
    StdinPipe {
        /// The engine binary involved.
        engine: String,
    },

    /// The utterance could not be written to the engine subprocess.
    #[error("could not write the utterance to `{engine}`")]
    StdinWrite {
        /// The engine binary involved.
        engine: String,
    },

    /// The engine subprocess exited with a failure status.
    #[error("`{engine}` exited with an error: {stderr}")]
    SynthesisFailed {
        /// The engine binary involved.
        engine: String,
        /// Captured stderr from the subprocess.
        stderr: String,
    },

    /// The installed-voice catalog could not be read.
    #[error("voice enumeration failed for `{engine}`: {message}")]
    VoiceListFailed {
        /// The engine binary involved.
        engine: String,
        /// What went wrong.
        message: String,
    },

    /// An I/O failure while waiting on the engine subprocess.
    #[error("engine I/O failure")]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
