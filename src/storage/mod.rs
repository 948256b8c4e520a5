//! Storage layer for osticket-cli
//!
//! Handles the persisted configuration file (TOML) and the environment
//! variable precedence rules layered on top of it.

use crate::error::StorageError;

pub mod config;

type Result<T> = std::result::Result<T, StorageError>;
