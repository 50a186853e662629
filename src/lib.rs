//! Implements a client for the apptimize server API
//!
//! Two operations are exposed: fetching the code block variant a user should
//! run for an experiment, and tracking an event for a user with optional
//! attributes. All decisions happen server side, the client keeps no state.
//!
//! [`Client`] is async and needs a tokio runtime, [`blocking::Client`] does
//! the same round-trips synchronously.
pub mod blocking;
mod client;
mod error;
mod http;

pub mod models;
pub use crate::client::Client;
pub use crate::error::{Error, Result};
