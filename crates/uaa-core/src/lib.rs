//! Core domain + application logic for the UNIZIK Academic Assistant.
//!
//! This crate is intentionally framework-agnostic. Telegram and the
//! language-model providers live behind ports (traits) implemented in adapter
//! crates.

pub mod backend;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod orchestrator;
pub mod replies;

pub use errors::{Error, Result};
