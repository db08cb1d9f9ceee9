//! Error types and result aliases for fortdoc.
//!
//! Extraction itself never fails; errors only come from the outer surface:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used for I/O, TOML and JSON failures

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
