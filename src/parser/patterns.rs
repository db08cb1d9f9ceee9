/// Regex patterns for Fortran source-model extraction
///
/// All patterns are compiled once at first use via `LazyLock`.
///
/// Fortran keywords are case-insensitive, so every pattern built with
/// [`build_re`] carries the case-insensitive + unicode flags. Preprocessor
/// directives are matched case-sensitively, as `cpp` does.
///
/// The `regex` crate has no back-references or look-around, so block patterns
/// only describe the opening line; the matching `END` line is located
/// separately (see [`crate::parser::blocks`]).
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Build a case-insensitive regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
fn build_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .unicode(true)
        .multi_line(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

/// Same as [`build_re`] but case-sensitive (preprocessor directives).
fn build_cs_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// Anchors
const SOL_STR: &str = r"^[ \t]*"; // Start of line, indentation allowed
const EOL_STR: &str = r"[ \t]*(?:!.*)?$"; // End of line, trailing comment allowed
const END_NAME_STR: &str = r"\b[ \t]*\w*"; // Optional block name after END <kind>
const PARENS_STR: &str = r"\((?:[^()\n]|\([^()\n]*\))*\)"; // One nested level: `(kind=f(15))`

// ===== COMMENTS =====

/// A comment-only line, applied to a trimmed line.
pub static COMMENT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^[!\s*]+(?P<comment>.*)$"));

/// `implicit none` anywhere in a line.
pub static IMPLICIT_NONE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\bimplicit\s+none\b"));

/// Trailing `&` (plus optional comment), the line break(s) and an optional leading `&`.
pub static CONTINUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"&[ \t]*(?:![^\n]*)?(?:\r?\n[ \t]*)+&?"));

// ===== PREPROCESSOR =====

/// Any conditional directive. `if` must come last so `ifdef`/`ifndef` win.
pub static CPP_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_cs_re(r"#(?P<kind>ifdef|ifndef|endif|if)"));

/// `#else` and the remainder of its line.
pub static CPP_ELSE_RE: LazyLock<Regex> = LazyLock::new(|| build_cs_re(r"#else[^\n]*\n?"));

// ===== DEPENDENCIES =====

// USE [, INTRINSIC | NON_INTRINSIC] [::] name
pub static USE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(r"^\s*use(?:\s*,\s*(?:intrinsic|non_intrinsic))?\s*(?:::\s*|\s+)(?P<dependency>\w+)")
});

// ===== DECLARATIONS =====

// <type>[(<param>)] [, <extra>]... [::] <names>
// Applied to the code part of a single trimmed line (trailing comment removed).
// Initialisers stay in `names`; they are cut off per name.
pub static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"^(?P<type>\w+(?:\s*\*\s*\d+)?(?:\s*{PARENS_STR}|\s+precision)?)(?P<extras>(?:\s*,\s*\w+(?:\s*\([^\n]*?\))?)*)\s*(?:::|\s)\s*(?P<names>[\w(][^;\n]*)",
    ))
});

/// A single declared name, optionally with a dimension suffix.
pub static DECLARED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^\w+\s*(?:\(.*\))?$"));

// ===== PROCEDURES =====

// [prefix words] SUBROUTINE|FUNCTION name ( args ) [RESULT(r)]
pub static PROCEDURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(?P<prefix>(?:\w+(?:[ \t]*{PARENS_STR})?[ \t]+)*?)(?P<category>subroutine|function)[ \t]+(?P<name>\w+)[ \t]*\((?P<args>[\w\s,&]*)\)(?:[ \t]*(?:&[ \t]*\r?\n[ \t]*&?)?[ \t]*result[ \t]*\([ \t]*(?P<result>\w+)[ \t]*\))?"
    ))
});

/// One word of a procedure prefix, e.g. `real(dp)` or `pure`.
pub static PREFIX_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"\w+(?:[ \t]*{PARENS_STR})?")));

pub static ENDSUBR_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}END[ \t]*SUBROUTINE{END_NAME_STR}")));
pub static ENDFCT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}END[ \t]*FUNCTION{END_NAME_STR}")));

// PROCEDURE [(iface)] [, attrs] :: binding list
pub static BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}PROCEDURE\b[^:\n]*::[ \t]*(?P<list>[^!\n]*)"
    ))
});

/// One item of a binding list: `name [=> target]`.
pub static BINDING_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^(?P<name>\w+)(?:\s*=>\s*(?P<target>\w+))?"));

// ===== MODULES =====

pub static MOD_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}MODULE[ \t]+(?P<name>\w+){EOL_STR}")));
pub static ENDMOD_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}END[ \t]*MODULE{END_NAME_STR}")));

// ===== DERIVED TYPES =====

// TYPE [, attr]... [::] name
// Attributes (ABSTRACT, PUBLIC, EXTENDS(parent), BIND(C), ...) are captured as one list.
pub static TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}TYPE\b(?P<attrs>(?:[ \t]*,[ \t]*\w+(?:[ \t]*\([^()\n]*\))?)*)[ \t]*(?:::)?[ \t]*(?P<name>\w+){EOL_STR}"
    ))
});
pub static ENDTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}END[ \t]*TYPE{END_NAME_STR}")));

// CONTAINS
pub static CONTAINS_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}CONTAINS\b")));

// ===== INTERFACES =====

// Named generic interface only (no OPERATOR/ASSIGNMENT, no abstract interfaces)
pub static INTERFACE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}INTERFACE[ \t]+(?P<name>\w+){EOL_STR}")));
pub static ENDINTERFACE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}END[ \t]*INTERFACE{END_NAME_STR}")));

// [MODULE] PROCEDURE [::] a, b, c
pub static MODULE_PROCEDURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(?:MODULE[ \t]+)?PROCEDURE\b[ \t]*(?:::)?[ \t]*(?P<names>[^!\n]*)"
    ))
});

// ===== PROGRAM =====

pub static PROG_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}PROGRAM[ \t]+(?P<name>\w+)")));
