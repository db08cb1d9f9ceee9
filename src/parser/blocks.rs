/// Block matching - locates `<opening line> ... END <kind>` regions
///
/// A block starts at a match of an opening pattern and ends at the first
/// following match of its closing pattern. Blocks are found left to right
/// and never overlap; an opening line without a closing line is skipped.
use std::ops::Range;

use regex::{Captures, Regex};

use crate::parser::comments::split_trailing_comment;

/// A matched block
#[derive(Debug)]
pub struct Block<'t> {
    /// Captures of the opening line
    pub header: Captures<'t>,
    /// Text between the opening match and the closing line
    pub body: &'t str,
    /// Byte range from the opening match to the end of the closing match
    pub span: Range<usize>,
}

impl<'t> Block<'t> {
    /// Text of a named header group, if it participated in the match
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&'t str> {
        self.header.name(name).map(|m| m.as_str())
    }

    /// Body without the remainder of the opening statement, including any
    /// `&` continuation lines of the header
    #[must_use]
    pub fn inner(&self) -> &'t str {
        let mut rest = self.body;
        loop {
            let Some((line, next)) = rest.split_once('\n') else {
                return "";
            };
            rest = next;
            if !continues(line) {
                return rest;
            }
        }
    }
}

fn continues(line: &str) -> bool {
    split_trailing_comment(line).0.trim_end().ends_with('&')
}

/// Find all blocks of one kind whose closing pattern is fixed.
#[must_use]
pub fn find_blocks<'t>(text: &'t str, open: &Regex, close: &Regex) -> Vec<Block<'t>> {
    find_blocks_with(text, open, |_| close)
}

/// Find all blocks, choosing the closing pattern from the opening captures
/// (e.g. `END SUBROUTINE` vs `END FUNCTION`).
pub fn find_blocks_with<'t, 'r, F>(text: &'t str, open: &Regex, close_for: F) -> Vec<Block<'t>>
where
    F: Fn(&Captures<'t>) -> &'r Regex,
{
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(header) = open.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = header.get(0) else {
            break;
        };
        let body_start = whole.end();

        if let Some(end) = close_for(&header).find_at(text, body_start) {
            tracing::trace!(
                header = whole.as_str().trim(),
                start = whole.start(),
                end = end.end(),
                "matched block"
            );
            blocks.push(Block {
                body: &text[body_start..end.start()],
                span: whole.start()..end.end(),
                header,
            });
            pos = end.end();
        } else {
            tracing::debug!(header = whole.as_str().trim(), "no closing line, skipped");
            pos = next_char_boundary(text, body_start.max(pos + 1));
        }
    }

    blocks
}

/// Remove every block of one kind from `text`.
#[must_use]
pub fn strip_blocks(text: &str, open: &Regex, close: &Regex) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for block in find_blocks(text, open, close) {
        result.push_str(&text[last..block.span.start]);
        last = block.span.end;
    }
    result.push_str(&text[last..]);
    result
}

fn next_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
