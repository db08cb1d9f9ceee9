/// Conditional compilation - resolves `#ifdef` / `#ifndef` / `#else` / `#endif`
///
/// Blocks are resolved innermost first: a block qualifies once its body holds
/// no other `#if...` or `#endif` directive. Resolution repeats until no block
/// qualifies, so properly nested blocks unwind from the inside out. `#if EXPR`
/// and `#elif` are never evaluated; they and any unterminated block pass
/// through verbatim.
use std::collections::BTreeSet;
use std::ops::Range;

use super::patterns::{CPP_DIRECTIVE_RE, CPP_ELSE_RE};

/// Set of active preprocessor symbols
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defines(BTreeSet<String>);

impl Defines {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>) -> bool {
        self.0.insert(symbol.into())
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        self.0.remove(symbol)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains(symbol)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Defines {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for Defines {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// An innermost conditional block ready for substitution
struct Conditional {
    /// From the `#` of `#ifdef` to the end of `#endif`
    span: Range<usize>,
    /// Text between the directive keyword and `#endif`
    inner: Range<usize>,
    negated: bool,
}

/// Resolve all flat/nested `#ifdef` blocks against `defines`.
#[must_use]
pub fn resolve_conditionals(text: &str, defines: &Defines) -> String {
    let mut text = text.to_string();

    while let Some(block) = find_innermost(&text) {
        let replacement = select_branch(&text[block.inner.clone()], block.negated, defines);
        text.replace_range(block.span, &replacement);
    }

    text
}

fn find_innermost(text: &str) -> Option<Conditional> {
    // Most recent #ifdef/#ifndef not yet interrupted by another directive
    let mut open: Option<(usize, usize, bool)> = None;

    for caps in CPP_DIRECTIVE_RE.captures_iter(text) {
        let (Some(whole), Some(kind)) = (caps.get(0), caps.name("kind")) else {
            continue;
        };
        match kind.as_str() {
            "ifdef" => open = Some((whole.start(), whole.end(), false)),
            "ifndef" => open = Some((whole.start(), whole.end(), true)),
            "endif" => {
                if let Some((start, inner_start, negated)) = open {
                    return Some(Conditional {
                        span: start..whole.end(),
                        inner: inner_start..whole.start(),
                        negated,
                    });
                }
            }
            // #if EXPR blocks are left alone and shadow any enclosing #ifdef
            _ => open = None,
        }
    }

    None
}

/// Pick the then/else branch of a block given its text after the keyword
fn select_branch(inner: &str, negated: bool, defines: &Defines) -> String {
    let inner = inner.trim_start();
    let symbol_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
    let (symbol, body) = inner.split_at(symbol_end);
    let body = body.trim_start();

    let (then_branch, else_branch) = match CPP_ELSE_RE.find(body) {
        Some(m) => (&body[..m.start()], &body[m.end()..]),
        None => (body, ""),
    };

    let active = defines.contains(symbol) != negated;
    tracing::trace!(symbol, active, "resolved conditional block");
    if active {
        then_branch.to_string()
    } else {
        else_branch.to_string()
    }
}
