/// Module extraction
use indexmap::IndexSet;

use super::class::extract_classes;
use super::dependency::extract_dependencies;
use super::interface::extract_interfaces;
use super::subroutine::extract_subroutines;
use crate::model::{Class, Module, Subroutine};
use crate::parser::blocks::find_blocks;
use crate::parser::comments::split_comment;
use crate::parser::patterns::{ENDMOD_RE, MOD_RE};

/// Extract every `module <name> ... end module` block of `text`.
///
/// A module body ends at the first following `end module` line.
#[must_use]
pub fn extract_modules(text: &str) -> Vec<Module> {
    find_blocks(text, &MOD_RE, &ENDMOD_RE)
        .iter()
        .filter_map(|block| {
            let name = block.group("name")?.to_string();
            let (comment, rest) = split_comment(block.inner());

            let dependencies = extract_dependencies(rest);
            let classes = extract_classes(rest);
            let subroutines = module_only_subroutines(rest, &classes);
            let interfaces = extract_interfaces(rest);

            tracing::debug!(
                module = %name,
                classes = classes.len(),
                subroutines = subroutines.len(),
                interfaces = interfaces.len(),
                "extracted module"
            );
            Some(Module {
                name,
                comment,
                classes,
                dependencies,
                subroutines,
                interfaces,
            })
        })
        .collect()
}

/// Procedures of `module_text` that no class in `classes` claims.
#[must_use]
pub fn module_only_subroutines(module_text: &str, classes: &[Class]) -> IndexSet<Subroutine> {
    let mut subroutines: IndexSet<Subroutine> =
        extract_subroutines(module_text).into_iter().collect();
    for class in classes {
        subroutines.retain(|sub| !class.subroutines.contains(sub));
    }
    subroutines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubroutineSet;

    const GEOMETRY: &str = "\
module geometry
  ! Points and the distances between them.
  use kinds, only: dp
  use kinds
  implicit none

  type :: point
    real(dp) :: x, y
  contains
    procedure :: dist => point_dist
  end type point

  interface norm
    module procedure norm2d
  end interface norm

contains

  function point_dist(a, b) result(d)
    class(point), intent(in) :: a, b
    real(dp) :: d
  end function point_dist

  function norm2d(p)
    type(point), intent(in) :: p
    real(dp) :: norm2d
  end function norm2d
end module geometry

module empty
end module
";

    #[test]
    fn test_extract_modules() {
        let modules = extract_modules(GEOMETRY);
        assert_eq!(modules.len(), 2);

        let geometry = &modules[0];
        assert_eq!(geometry.name, "geometry");
        assert_eq!(geometry.comment, "Points and the distances between them.");
        assert_eq!(geometry.dependencies, vec!["kinds"]);
        assert_eq!(geometry.classes.len(), 1);
        assert_eq!(geometry.class("point").unwrap().subroutines.names(), vec!["dist"]);
        assert_eq!(geometry.subroutines.names(), vec!["norm2d"]);
        assert_eq!(geometry.interfaces[0].procedure_names, vec!["norm2d"]);

        let empty = &modules[1];
        assert_eq!(empty.name, "empty");
        assert!(empty.classes.is_empty());
        assert!(empty.subroutines.is_empty());
    }

    #[test]
    fn test_module_and_class_procedures_partition_all() {
        let module = &extract_modules(GEOMETRY)[0];
        let all = extract_subroutines(GEOMETRY);

        let mut union: IndexSet<Subroutine> = module.subroutines.clone();
        for class in &module.classes {
            for sub in &class.subroutines {
                assert!(!module.subroutines.contains(sub));
                union.insert(sub.clone());
            }
        }
        assert_eq!(union.len(), all.len());
        assert!(all.iter().all(|s| union.contains(s)));
    }

    #[test]
    fn test_module_procedure_line_is_not_a_module() {
        let text = "module procedure foo\nmodule real_mod\nend module real_mod\n";
        let modules = extract_modules(text);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "real_mod");
    }
}
