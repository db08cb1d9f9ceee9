/// Subroutine and function extraction
///
/// Every `subroutine`/`function` block in the scanned text becomes one
/// [`Subroutine`]. The extractor knows nothing about ownership; the class and
/// module resolvers decide which scope a procedure belongs to.
use super::variable::{extract_variables, split_top_level};
use crate::model::{Argument, Category, Subroutine};
use crate::parser::blocks::{find_blocks_with, Block};
use crate::parser::comments::{clean_declarations, split_comment};
use crate::parser::patterns::{
    BINDING_ITEM_RE, BINDING_RE, ENDFCT_RE, ENDSUBR_RE, PREFIX_WORD_RE, PROCEDURE_RE,
};

/// Prefix words that qualify a procedure without being its return type
const QUALIFIERS: [&str; 6] = [
    "pure",
    "impure",
    "elemental",
    "recursive",
    "non_recursive",
    "module",
];

/// One `procedure :: name [=> target]` item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub target: Option<String>,
}

/// Collect every type-bound procedure binding in `text`, in text order.
///
/// `procedure, pass(self) :: a => a_impl, b` yields two bindings. Items that
/// point at something other than a plain procedure name (`=> null()`) are
/// skipped.
#[must_use]
pub fn find_bindings(text: &str) -> Vec<Binding> {
    let mut bindings = Vec::new();

    for caps in BINDING_RE.captures_iter(text) {
        let Some(list) = caps.name("list") else {
            continue;
        };
        for item in split_top_level(list.as_str()) {
            let Some(item_caps) = BINDING_ITEM_RE.captures(item) else {
                continue;
            };
            if item_caps.get(0).is_some_and(|m| m.end() != item.len()) {
                continue;
            }
            bindings.push(Binding {
                name: item_caps["name"].to_string(),
                target: item_caps.name("target").map(|m| m.as_str().to_string()),
            });
        }
    }

    bindings
}

/// Extract all procedures defined in `text`, one record per header, in
/// source order.
///
/// Nothing is merged here: two types binding `area` to different
/// implementations yield two records named `area`, told apart by `alias`.
/// Scopes collect the records they own into name-keyed sets.
#[must_use]
pub fn extract_subroutines(text: &str) -> Vec<Subroutine> {
    let bindings = find_bindings(text);
    let blocks = find_blocks_with(text, &PROCEDURE_RE, |caps| {
        match caps.name("category").and_then(|m| Category::from_keyword(m.as_str())) {
            Some(Category::Function) => &*ENDFCT_RE,
            _ => &*ENDSUBR_RE,
        }
    });

    blocks
        .iter()
        .filter_map(|block| parse_procedure(block, &bindings))
        .collect()
}

fn parse_procedure(block: &Block<'_>, bindings: &[Binding]) -> Option<Subroutine> {
    let category = Category::from_keyword(block.group("category")?)?;
    let parsed_name = block.group("name")?;
    let result_name = block.group("result").map(str::to_string);

    let (comment, body) = split_comment(block.inner());
    let variables = extract_variables(&clean_declarations(body));

    let (name, alias) = match bindings
        .iter()
        .find(|b| b.target.as_deref() == Some(parsed_name))
    {
        Some(binding) => (binding.name.clone(), Some(parsed_name.to_string())),
        None => (parsed_name.to_string(), None),
    };

    let header_names = block.group("args").map(header_arguments).unwrap_or_default();
    let arguments = bind_arguments(&header_names, &variables);
    if arguments.len() < header_names.len() {
        tracing::debug!(
            procedure = %name,
            declared = arguments.len(),
            expected = header_names.len(),
            "some arguments have no declaration"
        );
    }

    let return_type = match category {
        Category::Subroutine => None,
        Category::Function => header_return_type(block.group("prefix").unwrap_or("")).or_else(
            || {
                let candidates = [result_name.as_deref(), Some(name.as_str()), alias.as_deref()];
                infer_return_type(&candidates, &variables)
            },
        ),
    };
    if category == Category::Function && return_type.is_none() {
        tracing::debug!(procedure = %name, "return type unresolved");
    }

    Some(Subroutine {
        category,
        name,
        alias,
        arguments,
        comment,
        result_name,
        return_type,
    })
}

/// Argument names of a header, continuation markers removed
fn header_arguments(args: &str) -> Vec<&str> {
    args.split(',')
        .map(|arg| arg.trim_matches(|c: char| c == '&' || c.is_whitespace()))
        .filter(|arg| !arg.is_empty())
        .collect()
}

/// Check if a declared variable is `name`, possibly with a dimension suffix
fn declares(variable: &Argument, name: &str) -> bool {
    variable.base_name().eq_ignore_ascii_case(name)
}

/// Bind header names to declarations, keeping header order.
///
/// Each header name takes the first declaration that names it; header names
/// without a declaration are left out.
fn bind_arguments(header_names: &[&str], variables: &[Argument]) -> Vec<Argument> {
    header_names
        .iter()
        .filter_map(|name| variables.iter().find(|v| declares(v, name)))
        .cloned()
        .collect()
}

/// Return type given in the header prefix, e.g. `real(dp)` in
/// `pure real(dp) function norm(v)`
fn header_return_type(prefix: &str) -> Option<String> {
    let words: Vec<&str> = PREFIX_WORD_RE
        .find_iter(prefix)
        .map(|m| m.as_str())
        .filter(|word| !QUALIFIERS.iter().any(|q| word.eq_ignore_ascii_case(q)))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Type of the first candidate name that has a declaration
fn infer_return_type(candidates: &[Option<&str>], variables: &[Argument]) -> Option<String> {
    candidates.iter().flatten().find_map(|candidate| {
        variables
            .iter()
            .find(|v| declares(v, candidate))
            .map(|v| match &v.extras {
                Some(extras) => format!("{} {extras}", v.type_name),
                None => v.type_name.clone(),
            })
    })
}
