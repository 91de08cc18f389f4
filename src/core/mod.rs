//! Core types and error handling shared across the CLI.

pub mod error;

pub use error::{ErrorContext, user_friendly_error};
