//! fortdoc - Source-model extraction for Fortran documentation
//!
//! Turns raw Fortran source text into a tree of modules, derived types,
//! procedures, arguments, dependencies and interfaces for a documentation
//! renderer. Extraction is best-effort: anything that does not fit the
//! expected shape is skipped, never reported as an error.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::Result;
pub use extract::{
    extract_classes, extract_dependencies, extract_file, extract_interfaces, extract_modules,
    extract_program, extract_source, extract_subroutines, extract_variables, is_dependency_line,
    is_program, module_only_subroutines, parse_declaration, parse_dependency_line,
    resolve_class_procedures, strip_dependencies,
};
pub use model::{
    AccessModifier, Argument, Category, Class, Interface, Module, SourceKind, SourceUnit,
    Subroutine, SubroutineSet,
};
pub use parser::{clean_declarations, resolve_conditionals, split_comment, Defines};
