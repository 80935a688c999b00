//! # Integration Tests
//!
//! Cross-crate behaviour of the codec as a caller sees it.

pub mod flows;
pub mod tamper;
