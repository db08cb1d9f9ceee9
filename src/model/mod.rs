//! The extracted source model.
//!
//! A [`SourceUnit`] owns its [`Module`]s, each module owns its [`Class`]es and
//! [`Interface`]s, and procedures ([`Subroutine`]) hang off whichever scope
//! owns them. Procedure collections are insertion-ordered sets keyed by name,
//! so output is stable across runs.

pub mod types;

pub use types::{
    AccessModifier, Argument, Category, Class, Interface, Module, SourceKind, SourceUnit,
    Subroutine, SubroutineSet,
};
