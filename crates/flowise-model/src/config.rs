use std::fmt::Debug;

/// Builder for [`FlowiseConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FlowiseConfigBuilder {
    flow_id: String,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl FlowiseConfigBuilder {
    /// Creates a builder for the flow with the given identifier.
    #[inline]
    pub fn with_flow_id<S: Into<String>>(flow_id: S) -> Self {
        Self {
            flow_id: flow_id.into(),
            base_url: None,
            api_key: None,
        }
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the API key of the flow, if it's protected.
    #[inline]
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> FlowiseConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        FlowiseConfig {
            flow_id: self.flow_id,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: self.api_key,
        }
    }
}

impl Debug for FlowiseConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowiseConfigBuilder")
            .field("flow_id", &self.flow_id)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<deducted>"))
            .finish()
    }
}

/// Configuration for the Flowise prediction provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FlowiseConfig {
    pub(crate) flow_id: String,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl FlowiseConfig {
    /// Returns the full prediction URL of the flow.
    #[inline]
    pub fn endpoint(&self) -> String {
        format!("{}/api/v1/prediction/{}", self.base_url, self.flow_id)
    }
}

impl Debug for FlowiseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowiseConfig")
            .field("flow_id", &self.flow_id)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<deducted>"))
            .finish()
    }
}
