/// `use` statement extraction
use crate::parser::patterns::USE_RE;

/// Module name referenced by a `use` line, if the line is one
#[must_use]
pub fn parse_dependency_line(line: &str) -> Option<&str> {
    USE_RE
        .captures(line.trim())
        .and_then(|caps| caps.name("dependency"))
        .map(|m| m.as_str())
}

/// Check if a line is a `use` statement
#[must_use]
pub fn is_dependency_line(line: &str) -> bool {
    parse_dependency_line(line).is_some()
}

/// Collect the modules used anywhere in `text`, first occurrence first
#[must_use]
pub fn extract_dependencies(text: &str) -> Vec<String> {
    let mut dependencies: Vec<String> = Vec::new();
    for name in text.lines().filter_map(parse_dependency_line) {
        if !dependencies.iter().any(|d| d == name) {
            dependencies.push(name.to_string());
        }
    }
    dependencies
}

/// Remove `use` lines so their module names are not read as declarations
#[must_use]
pub fn strip_dependencies(text: &str) -> String {
    text.split('\n')
        .filter(|line| !is_dependency_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependencies_deduplicated_in_order() {
        let text = "use Foo\nuse bar, only: x\n  use Foo\nuse, intrinsic :: iso_fortran_env\n";
        assert_eq!(
            extract_dependencies(text),
            vec!["Foo", "bar", "iso_fortran_env"]
        );
    }

    #[test]
    fn test_is_dependency_line() {
        assert!(is_dependency_line("   use kinds, only: dp"));
        assert!(is_dependency_line("USE, NON_INTRINSIC :: mesh"));
        assert!(!is_dependency_line("! use kinds"));
        assert!(!is_dependency_line("call use_cache(x)"));
    }

    #[test]
    fn test_strip_dependencies() {
        let text = "use kinds\nreal(dp) :: x\n  use mesh, only: node\ninteger :: n";
        assert_eq!(strip_dependencies(text), "real(dp) :: x\ninteger :: n");
    }

    #[test]
    fn test_no_dependencies() {
        assert!(extract_dependencies("program main\nend program main\n").is_empty());
    }
}
