/// Named generic interface extraction
use super::variable::split_top_level;
use crate::model::Interface;
use crate::parser::blocks::find_blocks;
use crate::parser::comments::{join_continuations, strip_comment_lines};
use crate::parser::patterns::{ENDINTERFACE_RE, INTERFACE_RE, MODULE_PROCEDURE_RE};

/// Extract every `interface <name> ... end interface` block.
///
/// Procedure names come from the `[module] procedure` statements inside the
/// block, in order. Interfaces that only declare explicit procedure bodies
/// have an empty list.
#[must_use]
pub fn extract_interfaces(text: &str) -> Vec<Interface> {
    find_blocks(text, &INTERFACE_RE, &ENDINTERFACE_RE)
        .iter()
        .filter_map(|block| {
            let name = block.group("name")?.to_string();
            let body = join_continuations(&strip_comment_lines(block.inner()));
            let procedure_names = MODULE_PROCEDURE_RE
                .captures_iter(&body)
                .filter_map(|caps| caps.name("names"))
                .flat_map(|m| split_top_level(m.as_str()))
                .map(str::to_string)
                .collect();
            Some(Interface {
                name,
                procedure_names,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_procedure_list() {
        let text = "\
  interface norm
    module procedure norm_real, norm_complex
  end interface norm
";
        let interfaces = extract_interfaces(text);
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "norm");
        assert_eq!(interfaces[0].procedure_names, vec!["norm_real", "norm_complex"]);
    }

    #[test]
    fn test_several_statements_and_continuations() {
        let text = "\
interface swap
  ! integer kinds
  module procedure :: swap_i4, &
                      swap_i8
  procedure swap_r8
end interface
";
        let interfaces = extract_interfaces(text);
        assert_eq!(
            interfaces[0].procedure_names,
            vec!["swap_i4", "swap_i8", "swap_r8"]
        );
    }

    #[test]
    fn test_interface_without_procedure_clause() {
        let text = "\
interface solve
  subroutine solve_dense(a)
    real :: a(:,:)
  end subroutine solve_dense
end interface solve
";
        let interfaces = extract_interfaces(text);
        assert_eq!(interfaces.len(), 1);
        assert!(interfaces[0].procedure_names.is_empty());
    }

    #[test]
    fn test_unnamed_and_operator_interfaces_are_skipped() {
        let text = "\
interface
  subroutine cb()
  end subroutine cb
end interface
interface operator(+)
  module procedure add_vec
end interface
abstract interface
  subroutine f()
  end subroutine
end interface
";
        assert!(extract_interfaces(text).is_empty());
    }
}
