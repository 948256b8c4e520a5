//! Utils module - Shared utilities and helpers

/// Verbose/warning/error print helpers
pub mod logging;

/// Input validation for URLs, dates, and identifiers
pub mod validation;
