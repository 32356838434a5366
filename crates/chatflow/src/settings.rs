use std::env;
use std::error::Error;
use std::fmt::{self, Display};
use std::time::Duration;

use chatflow_core::ControllerConfig;
use chatflow_flowise_model::{FlowiseConfig, FlowiseConfigBuilder};

/// Settings error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required variable is not set or is blank.
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    Invalid {
        /// Name of the variable.
        key: &'static str,
        /// The offending value.
        value: String,
    },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Missing(key) => {
                write!(f, "{key} environment variable is not set")
            }
            SettingsError::Invalid { key, value } => {
                write!(f, "{key} has an invalid value: {value:?}")
            }
        }
    }
}

impl Error for SettingsError {}

/// Everything needed to talk to one chatflow, gathered from `CHATFLOW_*`
/// environment variables.
///
/// | variable | meaning |
/// |---|---|
/// | `CHATFLOW_BASE_URL` | base URL of the server (required) |
/// | `CHATFLOW_FLOW_ID` | identifier of the flow (required) |
/// | `CHATFLOW_API_KEY` | API key of the flow |
/// | `CHATFLOW_BOT_NAME` | display name, defaults to `Assistant` |
/// | `CHATFLOW_WELCOME` | greeting seeded into the conversation |
/// | `CHATFLOW_FALLBACK` | text shown when a request fails |
/// | `CHATFLOW_SESSION_PREFIX` | prefix of the generated chat id |
/// | `CHATFLOW_TIMEOUT_SECS` | request timeout in seconds |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Flowise connection settings.
    pub flowise: FlowiseConfig,
    /// Controller settings.
    pub controller: ControllerConfig,
    /// Name shown in the header of the chat.
    pub bot_name: String,
}

impl Settings {
    /// Reads the settings from the process environment.
    #[inline]
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(SettingsError::Missing(key));

        let mut flowise = FlowiseConfigBuilder::with_flow_id(require("CHATFLOW_FLOW_ID")?)
            .with_base_url(require("CHATFLOW_BASE_URL")?);
        if let Some(api_key) = get("CHATFLOW_API_KEY") {
            flowise = flowise.with_api_key(api_key);
        }

        let mut controller = ControllerConfig::builder();
        if let Some(welcome) = get("CHATFLOW_WELCOME") {
            controller = controller.with_welcome_message(welcome);
        }
        if let Some(fallback) = get("CHATFLOW_FALLBACK") {
            controller = controller.with_fallback_message(fallback);
        }
        if let Some(prefix) = get("CHATFLOW_SESSION_PREFIX") {
            controller = controller.with_session_id_prefix(prefix);
        }
        if let Some(value) = get("CHATFLOW_TIMEOUT_SECS") {
            let secs = value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(SettingsError::Invalid {
                    key: "CHATFLOW_TIMEOUT_SECS",
                    value,
                })?;
            controller =
                controller.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            flowise: flowise.build(),
            controller: controller.build(),
            bot_name: get("CHATFLOW_BOT_NAME")
                .unwrap_or_else(|| "Assistant".to_owned()),
        })
    }
}
