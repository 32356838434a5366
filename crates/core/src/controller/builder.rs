use chatflow_model::{PredictionProvider, PredictionProviderError};

use super::ConversationController;
use crate::config::ControllerConfig;
use crate::prediction_client::PredictionClient;

pub(crate) type FailureObserver =
    Box<dyn Fn(&dyn PredictionProviderError) + Send + Sync>;

/// [`ConversationController`] builder.
pub struct ControllerBuilder {
    pub(crate) client: PredictionClient,
    pub(crate) config: ControllerConfig,
    pub(crate) on_failure: Option<FailureObserver>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified prediction provider.
    #[inline]
    pub fn with_provider<P: PredictionProvider + 'static>(provider: P) -> Self {
        Self {
            client: PredictionClient::new(provider),
            config: ControllerConfig::default(),
            on_failure: None,
        }
    }

    /// Replaces the default configuration.
    #[inline]
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a callback to be invoked with the diagnostic error whenever
    /// a request fails and the fallback message is shown instead.
    #[inline]
    pub fn on_failure(
        mut self,
        on_failure: impl Fn(&dyn PredictionProviderError) + Send + Sync + 'static,
    ) -> Self {
        self.on_failure = Some(Box::new(on_failure));
        self
    }

    /// Builds the controller and spawns its task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[inline]
    pub fn build(self) -> ConversationController {
        ConversationController::spawn_from_builder(self)
    }
}
