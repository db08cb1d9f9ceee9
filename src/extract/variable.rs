/// Declaration scanning - one declaration statement per line
///
/// In a declaration like
///
/// ```text
/// real(dp), allocatable, dimension(:) :: err ! per-point error
/// ```
///
/// `real(dp)` is the type, `allocatable,dimension(:)` are the extras and
/// `per-point error` is the comment shared by every declared name.
///
/// The pattern is loose and also matches plenty of statements
/// that are not declarations (`call foo(a)` reads as type `call`, name
/// `foo(a)`). Callers only keep names they can bind to something.
use crate::model::Argument;
use crate::parser::comments::split_trailing_comment;
use crate::parser::patterns::{DECLARATION_RE, DECLARED_NAME_RE};

/// Parse one declaration line into one record per declared name.
///
/// Returns `None` when the line does not look like a declaration.
#[must_use]
pub fn parse_declaration(line: &str) -> Option<Vec<Argument>> {
    let (code, comment) = split_trailing_comment(line.trim());
    let caps = DECLARATION_RE.captures(code.trim_end())?;

    let type_name = caps.name("type")?.as_str().trim().to_string();
    let extras = caps
        .name("extras")
        .map(|m| split_top_level(m.as_str()))
        .filter(|parts| !parts.is_empty())
        .map(|parts| parts.join(","));
    let comment = comment
        .map(|c| c.trim_start_matches('!').trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let names: Vec<&str> = split_top_level(caps.name("names")?.as_str())
        .into_iter()
        .map(strip_initializer)
        .filter(|name| DECLARED_NAME_RE.is_match(name))
        .collect();
    if names.is_empty() {
        return None;
    }

    Some(
        names
            .into_iter()
            .map(|name| Argument {
                name: name.to_string(),
                type_name: type_name.clone(),
                extras: extras.clone(),
                comment: comment.clone(),
            })
            .collect(),
    )
}

/// `x = 1.0` and `p => null()` become `x` and `p`
fn strip_initializer(name: &str) -> &str {
    name.split_once('=').map_or(name, |(name, _)| name.trim_end())
}

/// Scan every line of a cleaned body for declarations
#[must_use]
pub fn extract_variables(text: &str) -> Vec<Argument> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_declaration)
        .flatten()
        .collect()
}

/// Split on commas that are not nested in parentheses or brackets; parts are
/// trimmed and empty parts dropped.
#[must_use]
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
