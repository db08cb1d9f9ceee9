/// Comment separation and declaration cleanup
///
/// Every nesting level (file, module, type, procedure) splits its own leading
/// comment block off before anything else is extracted, and cleans its body
/// before declarations are scanned.
use super::patterns::{COMMENT_LINE_RE, CONTINUATION_RE, IMPLICIT_NONE_RE};
use crate::extract::dependency::strip_dependencies;

/// Marker pushed for a blank line inside a comment block
pub const PARAGRAPH_BREAK: &str = "\n";

/// Split the leading comment block from `text`.
///
/// Blank lines inside the block are kept as paragraph breaks. The block ends
/// at the first line that is neither blank nor a comment line; the returned
/// body starts at that line. When every line belongs to the comment block the
/// body is empty.
#[must_use]
pub fn split_comment(text: &str) -> (String, &str) {
    let mut comment_lines: Vec<&str> = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let stripped = line.trim();
        if stripped.is_empty() {
            comment_lines.push(PARAGRAPH_BREAK);
        } else if let Some(caps) = COMMENT_LINE_RE.captures(stripped) {
            comment_lines.push(caps.name("comment").map_or("", |m| m.as_str()));
        } else {
            return (comment_lines.join("\n"), &text[offset..]);
        }
        offset += line.len();
    }

    (comment_lines.join("\n"), &text[text.len()..])
}

/// Check if a line holds nothing but a comment
#[must_use]
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('!')
}

/// Blank out comment-only lines. Trailing comments on code lines survive.
#[must_use]
pub fn strip_comment_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| if is_comment_line(line) { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop lines that disable implicit typing
#[must_use]
pub fn strip_implicit_none(text: &str) -> String {
    text.split('\n')
        .filter(|line| !IMPLICIT_NONE_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join `&` continuation lines into one line
#[must_use]
pub fn join_continuations(text: &str) -> String {
    CONTINUATION_RE.replace_all(text, " ").into_owned()
}

/// Prepare a body for declaration scanning: comment-only lines, continuation
/// breaks, `implicit none` and `use` lines are removed.
#[must_use]
pub fn clean_declarations(text: &str) -> String {
    let text = strip_comment_lines(text);
    let text = join_continuations(&text);
    let text = strip_implicit_none(&text);
    strip_dependencies(&text)
}

/// Split a line into its code part and its trailing `!` comment, ignoring
/// `!` characters inside string literals.
#[must_use]
pub fn split_trailing_comment(line: &str) -> (&str, Option<&str>) {
    let mut quote: Option<char> = None;
    for (idx, ch) in line.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(q), c) if c == q => quote = None,
            (None, '!') => return (&line[..idx], Some(&line[idx..])),
            _ => {}
        }
    }
    (line, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comment_paragraphs() {
        let (comment, body) = split_comment("! a\n! b\n\nfoo = 1");
        let lines: Vec<&str> = comment.split('\n').collect();
        assert_eq!(lines[0], "a");
        assert_eq!(lines[1], "b");
        assert!(comment.contains("b\n\n"));
        assert_eq!(body, "foo = 1");
    }

    #[test]
    fn test_split_comment_keeps_indentation_of_body() {
        let (comment, body) = split_comment("  ! Adds numbers\n  real :: x\n  ! not leading\n");
        assert_eq!(comment, "Adds numbers");
        assert_eq!(body, "  real :: x\n  ! not leading\n");
    }

    #[test]
    fn test_split_comment_no_comment() {
        let (comment, body) = split_comment("integer :: n");
        assert_eq!(comment, "");
        assert_eq!(body, "integer :: n");
    }

    #[test]
    fn test_split_comment_only_comments() {
        let (comment, body) = split_comment("! one\n! two\n");
        assert_eq!(comment, "one\ntwo");
        assert_eq!(body, "");
    }

    #[test]
    fn test_is_comment_line() {
        assert!(is_comment_line("   ! note"));
        assert!(!is_comment_line("x = 1 ! note"));
        assert!(!is_comment_line(""));
    }

    #[test]
    fn test_clean_declarations() {
        let body = "  use kinds\n  implicit none\n  ! the input\n  real :: x ! value\n  IMPLICIT NONE\n";
        let cleaned = clean_declarations(body);
        assert!(!cleaned.contains("use kinds"));
        assert!(!cleaned.to_lowercase().contains("implicit"));
        assert!(!cleaned.contains("the input"));
        assert!(cleaned.contains("real :: x ! value"));
    }

    #[test]
    fn test_join_continuations() {
        let joined = join_continuations("real :: a, &\n    b, &\n    c\n");
        assert_eq!(joined.lines().count(), 1);

        // comment lines between continuation lines are dropped first
        let cleaned = clean_declarations("real :: a, &\n  ! note\n  & b\n");
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        assert_eq!(tokens, vec!["real", "::", "a,", "b"]);
    }

    #[test]
    fn test_split_trailing_comment() {
        assert_eq!(split_trailing_comment("real :: x ! the x"), ("real :: x ", Some("! the x")));
        assert_eq!(
            split_trailing_comment("character(len=3) :: s = 'a!b'"),
            ("character(len=3) :: s = 'a!b'", None)
        );
    }
}
