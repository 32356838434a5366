use serde::{Deserialize, Serialize};

/// A request to be sent to the prediction provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// The text the user submitted.
    pub question: String,
    /// Identifier of the chat session this question belongs to.
    ///
    /// Providers usually use it to look up the memory of the flow, so
    /// it should stay the same for all turns of one conversation.
    pub chat_id: String,
}

impl PredictionRequest {
    /// Creates a new `PredictionRequest`.
    #[inline]
    pub fn new<Q: Into<String>, C: Into<String>>(question: Q, chat_id: C) -> Self {
        Self {
            question: question.into(),
            chat_id: chat_id.into(),
        }
    }
}
