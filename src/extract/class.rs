/// Derived type extraction and type-bound procedure resolution
use indexmap::IndexSet;

use super::subroutine::{extract_subroutines, find_bindings};
use super::variable::{extract_variables, split_top_level};
use crate::model::{AccessModifier, Class, Subroutine};
use crate::parser::blocks::find_blocks;
use crate::parser::comments::{clean_declarations, split_comment};
use crate::parser::patterns::{CONTAINS_RE, ENDTYPE_RE, TYPE_RE};

/// Extract the derived types of a module body.
#[must_use]
pub fn extract_classes(module_text: &str) -> Vec<Class> {
    let blocks = find_blocks(module_text, &TYPE_RE, &ENDTYPE_RE);
    if blocks.is_empty() {
        return Vec::new();
    }
    let enclosing = extract_subroutines(module_text);

    blocks
        .iter()
        .filter_map(|block| {
            let name = block.group("name")?.to_string();
            let (access_modifier, parent) = parse_type_attributes(block.group("attrs").unwrap_or(""));

            let (comment, rest) = split_comment(block.inner());
            let region = CONTAINS_RE.find(rest).map_or(rest, |m| &rest[..m.start()]);
            let variables = extract_variables(&clean_declarations(region));
            let subroutines = resolve_with(&enclosing, block.body);

            tracing::trace!(
                class = %name,
                variables = variables.len(),
                subroutines = subroutines.len(),
                "extracted class"
            );
            Some(Class {
                name,
                access_modifier,
                parent,
                comment,
                variables,
                subroutines,
            })
        })
        .collect()
}

/// Procedures belonging to one class.
///
/// `enclosing` is the text the class lives in (normally the whole module
/// body); `class_body` is the text between `type ...` and `end type`.
#[must_use]
pub fn resolve_class_procedures(enclosing: &str, class_body: &str) -> IndexSet<Subroutine> {
    resolve_with(&extract_subroutines(enclosing), class_body)
}

/// Bindings with a target match by alias, so every implementation of an
/// overridden name stays reachable from its own type.
fn resolve_with(enclosing: &[Subroutine], class_body: &str) -> IndexSet<Subroutine> {
    let mut owned: IndexSet<Subroutine> = extract_subroutines(class_body).into_iter().collect();

    for binding in find_bindings(class_body) {
        let found = match &binding.target {
            Some(target) => enclosing
                .iter()
                .find(|s| s.alias.as_deref() == Some(target.as_str())),
            None => enclosing
                .iter()
                .find(|s| s.alias.is_none() && s.name == binding.name),
        };
        match found {
            Some(sub) => {
                owned.insert(sub.clone());
            }
            None => tracing::debug!(binding = %binding.name, "no procedure for binding"),
        }
    }

    owned
}

/// Access modifier and parent type from the attribute list of a type header,
/// e.g. `, public, extends(shape)`. The first access keyword wins.
fn parse_type_attributes(attrs: &str) -> (Option<AccessModifier>, Option<String>) {
    let mut access = None;
    let mut parent = None;

    for attr in split_top_level(attrs) {
        let (keyword, argument) = match attr.split_once('(') {
            Some((keyword, rest)) => (keyword.trim(), Some(rest.trim_end_matches(')').trim())),
            None => (attr, None),
        };
        if keyword.eq_ignore_ascii_case("extends") {
            parent = parent.or_else(|| argument.map(str::to_string));
        } else if access.is_none() {
            access = AccessModifier::from_keyword(keyword);
        }
    }

    (access, parent)
}
