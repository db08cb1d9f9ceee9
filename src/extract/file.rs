/// Source-unit extraction - the entry point of the pipeline
use indexmap::IndexSet;

use super::dependency::extract_dependencies;
use super::module::extract_modules;
use super::subroutine::extract_subroutines;
use crate::model::{SourceKind, SourceUnit, Subroutine};
use crate::parser::blocks::strip_blocks;
use crate::parser::comments::split_comment;
use crate::parser::patterns::{ENDMOD_RE, ENDTYPE_RE, MOD_RE, PROG_RE, TYPE_RE};
use crate::parser::preprocess::{resolve_conditionals, Defines};

/// Check if `text` holds a main `program <name>` statement.
#[must_use]
pub fn is_program(text: &str) -> bool {
    PROG_RE.is_match(text)
}

/// Extract a plain source file.
#[must_use]
pub fn extract_file(text: &str, defines: &Defines) -> SourceUnit {
    extract_unit(text, defines, SourceKind::File)
}

/// Extract a file holding a main program.
#[must_use]
pub fn extract_program(text: &str, defines: &Defines) -> SourceUnit {
    extract_unit(text, defines, SourceKind::Program)
}

/// Extract `text` as a program or a plain file, whichever it is.
#[must_use]
pub fn extract_source(text: &str, defines: &Defines) -> SourceUnit {
    if is_program(text) {
        extract_program(text, defines)
    } else {
        extract_file(text, defines)
    }
}

fn extract_unit(text: &str, defines: &Defines, kind: SourceKind) -> SourceUnit {
    let text = resolve_conditionals(text, defines);
    let (comment, rest) = split_comment(&text);

    let modules = extract_modules(rest);
    let dependencies = extract_dependencies(rest);
    let subroutines = free_subroutines(rest);

    tracing::debug!(
        ?kind,
        modules = modules.len(),
        dependencies = dependencies.len(),
        subroutines = subroutines.len(),
        "extracted source unit"
    );
    SourceUnit {
        kind,
        comment,
        modules,
        dependencies,
        subroutines,
    }
}

/// Procedures outside every module and derived type
fn free_subroutines(text: &str) -> IndexSet<Subroutine> {
    let without_modules = strip_blocks(text, &MOD_RE, &ENDMOD_RE);
    let without_types = strip_blocks(&without_modules, &TYPE_RE, &ENDTYPE_RE);
    extract_subroutines(&without_types).into_iter().collect()
}
