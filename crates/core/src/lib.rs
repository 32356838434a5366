//! Core logic of a chat conversation: the controller state machine, the
//! message log and the bounded prediction client.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
mod controller;
pub mod conversation;
mod prediction_client;

pub use config::{ControllerConfig, ControllerConfigBuilder};
pub use controller::{ControllerBuilder, ConversationController};
pub use conversation::{ConversationSnapshot, Message, Role};

/// Re-exports of [`chatflow_model`] types that appear in this crate's API.
pub mod model {
    pub use chatflow_model::{
        ErrorKind, PredictionProvider, PredictionProviderError,
    };
}
