//! # QR-Token Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Codec builders with a manual clock
//! └── integration/
//!     ├── flows.rs      # Issue → scan flows, expiry, rate limiting
//!     └── tamper.rs     # Bit-flip and forgery simulations
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p codec-tests
//!
//! # By category
//! cargo test -p codec-tests integration::flows
//! cargo test -p codec-tests integration::tamper
//!
//! # Benchmarks
//! cargo bench -p codec-tests
//! ```

pub mod fixtures;
pub mod integration;
