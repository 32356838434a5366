use chatflow_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// How the fake endpoint should settle one call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Answer with the given text.
    #[serde(rename = "answer")]
    Answer(String),
    /// Fail with an error of the given kind.
    #[serde(rename = "failure")]
    Failure(ErrorKind),
    /// Never settle. Useful for exercising timeouts.
    #[serde(rename = "hang")]
    Hang,
}

impl PresetReply {
    /// Creates an answer reply.
    #[inline]
    pub fn answer<S: Into<String>>(text: S) -> Self {
        Self::Answer(text.into())
    }
}
