//! # Domain Layer
//!
//! Pure token logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod canonical;
pub mod config;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod expiry;
pub mod keys;
pub mod validation;
pub mod wire;
