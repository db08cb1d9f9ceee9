//! Text-level utilities shared by every extractor.
//!
//! This module provides the infrastructure the structural extractors build on:
//! - [`preprocess`]: Resolves `#ifdef`/`#ifndef`/`#else`/`#endif` against active defines
//! - [`comments`]: Splits leading comment blocks and cleans bodies before declaration scans
//! - [`blocks`]: Locates `<opening line> ... END <kind>` regions
//! - [`patterns`]: Precompiled regex patterns for Fortran syntax elements
//!
//! Nothing here tokenizes Fortran. Every stage works on raw text with line
//! oriented regexes and silently leaves anything it does not recognise.

pub mod blocks;
pub mod comments;
pub mod patterns;
pub mod preprocess;

pub use blocks::{find_blocks, find_blocks_with, strip_blocks, Block};
pub use comments::{clean_declarations, is_comment_line, split_comment, split_trailing_comment};
pub use preprocess::{resolve_conditionals, Defines};
