//! Structural extraction of the Fortran source model.
//!
//! Extractors nest the way Fortran scopes do:
//! - [`file`]: Entry point; resolves conditionals, then modules, dependencies and free procedures
//! - [`module`]: `module ... end module` blocks and the module-only procedure set
//! - [`class`]: Derived types and the procedures bound to them
//! - [`interface`]: Named generic interfaces
//! - [`subroutine`]: Procedure headers, argument binding, return types and aliases
//! - [`variable`]: One-line declarations
//! - [`dependency`]: `use` statements
//!
//! Every extractor is a pure function of its input text. Fragments that do not
//! fit the expected shape are skipped; omissions surface as `tracing` debug
//! events, never as errors.

pub mod class;
pub mod dependency;
pub mod file;
pub mod interface;
pub mod module;
pub mod subroutine;
pub mod variable;

pub use class::{extract_classes, resolve_class_procedures};
pub use dependency::{
    extract_dependencies, is_dependency_line, parse_dependency_line, strip_dependencies,
};
pub use file::{extract_file, extract_program, extract_source, is_program};
pub use interface::extract_interfaces;
pub use module::{extract_modules, module_only_subroutines};
pub use subroutine::{extract_subroutines, find_bindings, Binding};
pub use variable::{extract_variables, parse_declaration};
