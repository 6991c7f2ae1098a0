//! # Controlled Vocabulary Common Library
//!
//! Shared code for the vocabulary engine and its tooling:
//! - Vocabulary and term records (SQLite persistence)
//! - Bootstrap configuration loading and data root resolution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
