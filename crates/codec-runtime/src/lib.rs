//! # Codec Runtime
//!
//! Library half of the `qr-token` binary: configuration loading and the
//! JSON input/output helpers used by the subcommands.
//!
//! ## Configuration Order
//!
//! 1. Built-in defaults
//! 2. JSON config file (`--config`), if given
//! 3. `QRT_*` environment variables
//!
//! The result is validated before any codec is built.

pub mod config;
pub mod input;

pub use config::{apply_env, load_config, read_config_file};
pub use input::{parse_map, read_token, render_json};
