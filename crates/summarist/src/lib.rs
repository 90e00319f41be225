//! Summarist - clinical note summaries
//!
//! Turns clinical notes into summaries through a hosted text-generation
//! model and keeps every generation in an append-only CSV spreadsheet that
//! can be downloaded by holders of an access phrase.

pub mod access;
pub mod cli;
pub mod config;
pub mod errors;
pub mod generation;
pub mod prompt;
pub mod server;
pub mod service;
pub mod store;

pub use errors::{Error, Result};
