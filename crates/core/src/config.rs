//! Controller configuration.

use std::time::Duration;

use chrono::Utc;

/// The text shown in place of an answer when a request fails.
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "⚠️ I encountered an issue processing your request. Please try again.";

/// Prefix of generated chat ids.
pub const DEFAULT_SESSION_ID_PREFIX: &str = "chatflow-user-";

/// How long a request may stay in flight before it counts as failed.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`ControllerConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ControllerConfigBuilder {
    fallback_message: Option<String>,
    session_id_prefix: Option<String>,
    welcome_message: Option<String>,
    request_timeout: Option<Duration>,
}

impl ControllerConfigBuilder {
    /// Sets the text appended as the bot reply when a request fails.
    #[inline]
    pub fn with_fallback_message<S: Into<String>>(mut self, message: S) -> Self {
        self.fallback_message = Some(message.into());
        self
    }

    /// Sets the prefix of the generated chat id.
    #[inline]
    pub fn with_session_id_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.session_id_prefix = Some(prefix.into());
        self
    }

    /// Seeds every new (or reset) conversation with a bot greeting.
    #[inline]
    pub fn with_welcome_message<S: Into<String>>(mut self, message: S) -> Self {
        self.welcome_message = Some(message.into());
        self
    }

    /// Sets the upper bound of a single request.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ControllerConfig {
        ControllerConfig {
            fallback_message: self
                .fallback_message
                .unwrap_or_else(|| DEFAULT_FALLBACK_MESSAGE.to_owned()),
            session_id_prefix: self
                .session_id_prefix
                .unwrap_or_else(|| DEFAULT_SESSION_ID_PREFIX.to_owned()),
            welcome_message: self.welcome_message,
            request_timeout: self
                .request_timeout
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// Configuration for [`crate::ConversationController`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ControllerConfig {
    pub(crate) fallback_message: String,
    pub(crate) session_id_prefix: String,
    pub(crate) welcome_message: Option<String>,
    pub(crate) request_timeout: Duration,
}

impl ControllerConfig {
    /// Returns a builder with all defaults.
    #[inline]
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }

    /// Returns the text appended when a request fails.
    #[inline]
    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Returns the greeting seeded into new conversations, if any.
    #[inline]
    pub fn welcome_message(&self) -> Option<&str> {
        self.welcome_message.as_deref()
    }

    /// Returns the upper bound of a single request.
    #[inline]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Generates the chat id for a new conversation.
    pub(crate) fn new_chat_id(&self) -> String {
        format!("{}{}", self.session_id_prefix, Utc::now().timestamp_millis())
    }
}

impl Default for ControllerConfig {
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}
