use chatflow_core::{
    ControllerBuilder, ControllerConfig, ConversationController,
    ConversationSnapshot,
};
use chatflow_flowise_model::FlowiseProvider;
use chatflow_model::{PredictionProvider, PredictionProviderError};
use tokio::sync::watch;

use crate::Settings;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    controller_builder: ControllerBuilder,
    bot_name: String,
}

impl SessionBuilder {
    /// Creates a session builder with a specified prediction provider.
    pub fn with_provider<P: PredictionProvider + 'static>(provider: P) -> Self {
        let controller_builder = ControllerBuilder::with_provider(provider)
            .on_failure(|err| {
                debug!("request failed with {:?}: {err}", err.kind());
            });
        Self {
            controller_builder,
            bot_name: "Assistant".to_owned(),
        }
    }

    /// Creates a session builder talking to the Flowise flow described by
    /// `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let provider = FlowiseProvider::new(settings.flowise.clone());
        Self::with_provider(provider)
            .with_config(settings.controller.clone())
            .with_bot_name(settings.bot_name.clone())
    }

    /// Sets the controller configuration.
    #[inline]
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.controller_builder = self.controller_builder.with_config(config);
        self
    }

    /// Sets the name displayed for the bot.
    #[inline]
    pub fn with_bot_name<S: Into<String>>(mut self, bot_name: S) -> Self {
        self.bot_name = bot_name.into();
        self
    }

    /// Attaches a callback to be invoked when a request fails.
    #[inline]
    pub fn on_failure(
        mut self,
        on_failure: impl Fn(&dyn PredictionProviderError) + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder = self.controller_builder.on_failure(on_failure);
        self
    }

    /// Builds a new session.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Session {
        let controller = self.controller_builder.build();
        info!("session started with chat id {}", controller.chat_id());
        Session {
            controller,
            bot_name: self.bot_name,
        }
    }
}

/// A chat session, like a window that displays messages and has an input
/// box.
///
/// The session holds a fully configured controller, and it is basically a
/// wrapper around [`ConversationController`].
pub struct Session {
    controller: ConversationController,
    bot_name: String,
}

impl Session {
    /// Sends a message to the session.
    #[inline]
    pub fn submit(&self, message: &str) {
        self.controller.submit(message);
    }

    /// Sends whatever is in the input box.
    #[inline]
    pub fn submit_pending(&self) {
        self.controller.submit_pending();
    }

    /// Replaces the content of the input box.
    #[inline]
    pub fn update_input(&self, text: &str) {
        self.controller.update_input(text);
    }

    /// Starts the conversation over.
    #[inline]
    pub fn reset(&self) {
        self.controller.reset();
    }

    /// Returns the current state of the conversation.
    #[inline]
    pub fn snapshot(&self) -> ConversationSnapshot {
        self.controller.snapshot()
    }

    /// Returns a receiver that is notified whenever the conversation
    /// changes.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.controller.subscribe()
    }

    /// Returns the name displayed for the bot.
    #[inline]
    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Returns the chat id of this session.
    #[inline]
    pub fn chat_id(&self) -> &str {
        self.controller.chat_id()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chatflow_core::Role;
    use chatflow_test_model::{PresetReply, TestPredictionProvider};
    use tokio::time::timeout;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_session_round_trip() {
        let provider = TestPredictionProvider::with_script([
            PresetReply::answer("Hi there"),
        ]);
        let session = SessionBuilder::with_provider(provider)
            .with_config(
                ControllerConfig::builder()
                    .with_welcome_message("Welcome!")
                    .build(),
            )
            .with_bot_name("Sigler AI")
            .build();
        assert_eq!(session.bot_name(), "Sigler AI");
        assert_eq!(session.snapshot().messages.len(), 1);

        let mut rx = session.subscribe();
        session.update_input("Hello");
        session.submit_pending();

        let snapshot = timeout(
            Duration::from_secs(60),
            rx.wait_for(|s| !s.is_awaiting_response && s.messages.len() == 3),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        let roles: Vec<_> = snapshot.messages.iter().map(|m| m.role()).collect();
        assert_eq!(roles, [Role::Bot, Role::User, Role::Bot]);
        assert_eq!(snapshot.messages[2].content(), "Hi there");
    }
}
