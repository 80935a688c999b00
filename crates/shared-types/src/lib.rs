//! # Shared Types Crate
//!
//! Types shared by every crate in the workspace.
//!
//! ## Contents
//!
//! - **Value model** (`value`): a closed, recursive sum type for JSON-compatible
//!   data. Token payloads and metadata are expressed as [`Map`]s of [`Value`]s.
//! - **Time** (`time`): epoch-millisecond timestamps.
//! - **Errors** (`errors`): failures converting foreign data into the value model.

pub mod errors;
pub mod time;
pub mod value;

pub use errors::ValueError;
pub use time::EpochMillis;
pub use value::{Map, Number, Value};
