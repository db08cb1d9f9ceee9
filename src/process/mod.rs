//! File processing and extraction pipeline.
//!
//! The library core in [`crate::extract`] works on text only. This module
//! connects it to files: reading bytes, honouring size limits and in-file
//! directives, and serializing the resulting [`pipeline::Report`]s as JSON.

pub mod pipeline;

pub use pipeline::{extract_bytes, extract_path, write_report_file, write_reports, Report};
