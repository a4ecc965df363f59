//! Streaming chat client for the Genie study-abroad assistant.
//!
//! A turn posts the user's message to the backend, then reads the answer from
//! a server-sent event stream, building one draft message that is sealed into
//! the conversation history when the turn ends.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod state;
pub mod traits;

pub use client::{GenieClient, TurnReport};
pub use config::GenieConfig;
pub use error::{GenieError, GenieResult};
