//! Shared library module for the jigsaw command-line front end.
#![allow(missing_docs, clippy::missing_errors_doc, clippy::missing_panics_doc)]

/// Simulated time one scripted command takes.
pub const DEFAULT_STEP_MILLIS: u64 = 750;

pub mod autoplay;
pub mod clock;
pub mod manifest;
pub mod setup;
pub mod store;
