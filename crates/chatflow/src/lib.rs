//! An out-of-the-box chat client for hosted chatflows.
//!
//! The crate wires the Flowise provider into a conversation controller,
//! reads its settings from the environment, and ships a CLI front-end for
//! chatting in the terminal. You can also use it as a library to drive the
//! conversation from your own view layer.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod session;
mod settings;

pub use session::{Session, SessionBuilder};
pub use settings::{Settings, SettingsError};

/// Re-exports of [`chatflow_core`] crate.
pub mod core {
    pub use chatflow_core::*;
}
