use serde::{Deserialize, Serialize};

/// A complete answer from the prediction provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// The answer text.
    pub text: String,
}

impl PredictionResponse {
    /// Creates a response with the given answer text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
