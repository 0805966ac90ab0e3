//! Host engine implementations.
//!
//! Each engine wraps a CLI tool installed on the host system.

mod espeak;
mod sapi;
mod say;

pub use espeak::EspeakEngine;
pub use sapi::SapiEngine;
pub use say::SayEngine;
