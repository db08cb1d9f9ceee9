//! Inline directive parsing for `! fortdoc:` comments
//!
//! A source file can adjust its own preprocessor symbols:
//! `! fortdoc: -D MPI --define DOUBLE -U DEBUG`

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::Defines;

/// Pattern to match fortdoc directives
static FORTDOC_DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*!\s*fortdoc:\s*(.*)\s*$").expect("directive pattern is valid")
});

/// Symbol changes requested by a directive
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    pub defines: Vec<String>,
    pub undefines: Vec<String>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty() && self.undefines.is_empty()
    }

    /// Apply the overrides on top of `defines`; undefines win.
    pub fn apply(&self, defines: &mut Defines) {
        defines.extend(self.defines.iter().cloned());
        for symbol in &self.undefines {
            defines.remove(symbol);
        }
    }
}

/// Check if a line contains a fortdoc directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    FORTDOC_DIRECTIVE_RE.is_match(line)
}

/// Parse a fortdoc directive line
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a directive with at least one option
/// * `None` otherwise
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = FORTDOC_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();

    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let mut tokens = args_str.split_whitespace();

    while let Some(token) = tokens.next() {
        match token {
            "-D" | "--define" => {
                if let Some(symbol) = tokens.next() {
                    overrides.defines.push(symbol.to_string());
                }
            }
            "-U" | "--undefine" => {
                if let Some(symbol) = tokens.next() {
                    overrides.undefines.push(symbol.to_string());
                }
            }
            // -DSYM / -USYM
            _ if token.len() > 2 && token.starts_with("-D") => {
                overrides.defines.push(token[2..].to_string());
            }
            _ if token.len() > 2 && token.starts_with("-U") => {
                overrides.undefines.push(token[2..].to_string());
            }
            _ => {
                // Unknown option, skip
            }
        }
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for fortdoc directives and return the first found
///
/// Only the first directive is used (subsequent ones are ignored).
pub fn find_directive<R: std::io::BufRead>(input: &mut R) -> Option<DirectiveOverrides> {
    let mut buffer = String::new();

    while input.read_line(&mut buffer).ok()? > 0 {
        if is_directive_line(&buffer) {
            return parse_directive(&buffer);
        }
        buffer.clear();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive_line() {
        assert!(is_directive_line("! fortdoc: -D MPI"));
        assert!(is_directive_line("  ! fortdoc: --define MPI"));
        assert!(is_directive_line("! FORTDOC: -U DEBUG"));
        assert!(!is_directive_line("! this is a regular comment"));
        assert!(!is_directive_line("x = 1"));
    }

    #[test]
    fn test_parse_directive_defines() {
        let overrides = parse_directive("! fortdoc: -D MPI --define DOUBLE -DOPENMP").unwrap();
        assert_eq!(overrides.defines, vec!["MPI", "DOUBLE", "OPENMP"]);
        assert!(overrides.undefines.is_empty());
    }

    #[test]
    fn test_parse_directive_undefines() {
        let overrides = parse_directive("! fortdoc: -U DEBUG --undefine TRACE").unwrap();
        assert_eq!(overrides.undefines, vec!["DEBUG", "TRACE"]);
    }

    #[test]
    fn test_apply_undefine_wins() {
        let overrides = parse_directive("! fortdoc: -D A -U B -D B").unwrap();
        let mut defines: Defines = ["B", "C"].into_iter().collect();
        overrides.apply(&mut defines);
        assert!(defines.contains("A"));
        assert!(!defines.contains("B"));
        assert!(defines.contains("C"));
    }

    #[test]
    fn test_parse_invalid_directive() {
        assert!(parse_directive("! fortdoc:").is_none());
        assert!(parse_directive("! fortdoc: --pretty").is_none());
    }

    #[test]
    fn test_find_directive_first_only() {
        let text = "module m\n! fortdoc: -D FIRST\n! fortdoc: -D SECOND\nend module m\n";
        let overrides = find_directive(&mut text.as_bytes()).unwrap();
        assert_eq!(overrides.defines, vec!["FIRST"]);
    }
}
