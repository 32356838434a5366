//! An abstraction layer for remote prediction endpoints.
//!
//! This crate establishes a unified protocol for the conversation
//! controller to ask a hosted flow for an answer, so that the controller
//! can work against the real HTTP service or a scripted fake without
//! modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
