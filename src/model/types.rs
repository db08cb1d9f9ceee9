/// Records produced by extraction
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde::Serialize;

/// Whether a source unit holds a main `program`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Program,
}

/// Access modifier on a derived type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
    Abstract,
    Private,
    Public,
}

impl AccessModifier {
    /// Parse a modifier keyword, case-insensitively
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "abstract" => Some(AccessModifier::Abstract),
            "private" => Some(AccessModifier::Private),
            "public" => Some(AccessModifier::Public),
            _ => None,
        }
    }
}

/// Procedure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Subroutine,
    Function,
}

impl Category {
    /// Parse `subroutine` / `function`, case-insensitively
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "subroutine" => Some(Category::Subroutine),
            "function" => Some(Category::Function),
            _ => None,
        }
    }
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessModifier::Abstract => "abstract",
            AccessModifier::Private => "private",
            AccessModifier::Public => "public",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Subroutine => "subroutine",
            Category::Function => "function",
        };
        write!(f, "{name}")
    }
}

/// A declared name: a procedure argument or a type component / local variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Declared name, possibly with a dimension suffix such as `x(:)`
    pub name: String,
    /// Type spec, e.g. `real(dp)` or `type(point)`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Attributes joined with commas, e.g. `intent(in),dimension(:)`
    pub extras: Option<String>,
    /// Trailing `!` comment of the declaration line
    pub comment: Option<String>,
}

impl Argument {
    /// Name without any dimension suffix
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name
            .split('(')
            .next()
            .map_or(self.name.as_str(), str::trim_end)
    }
}

/// A subroutine or function.
///
/// Identity is the name alone: two records with the same `name` are equal and
/// hash alike, whatever their other fields hold.
#[derive(Debug, Clone, Serialize)]
pub struct Subroutine {
    pub category: Category,
    /// Canonical name (the binding name when the procedure is aliased)
    pub name: String,
    /// Name as written in the procedure header, when a binding renamed it
    pub alias: Option<String>,
    /// Header arguments that have a declaration, in header order
    pub arguments: Vec<Argument>,
    pub comment: String,
    pub result_name: Option<String>,
    /// Functions only; from the header prefix or inferred from declarations
    pub return_type: Option<String>,
}

impl PartialEq for Subroutine {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Subroutine {}

impl Hash for Subroutine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A named generic interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: String,
    pub procedure_names: Vec<String>,
}

/// A derived type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Class {
    pub name: String,
    pub access_modifier: Option<AccessModifier>,
    /// Name of the extended type; not resolved
    pub parent: Option<String>,
    pub comment: String,
    /// Components declared before `contains`
    pub variables: Vec<Argument>,
    pub subroutines: IndexSet<Subroutine>,
}

/// A Fortran module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub comment: String,
    pub classes: Vec<Class>,
    pub dependencies: Vec<String>,
    /// Procedures owned by the module itself; type-bound ones live on the classes
    pub subroutines: IndexSet<Subroutine>,
    pub interfaces: Vec<Interface>,
}

/// One source file (or main program) worth of extracted records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUnit {
    pub kind: SourceKind,
    pub comment: String,
    pub modules: Vec<Module>,
    pub dependencies: Vec<String>,
    /// Procedures outside any module or type
    pub subroutines: IndexSet<Subroutine>,
}

impl SourceUnit {
    #[must_use]
    pub fn is_program(&self) -> bool {
        self.kind == SourceKind::Program
    }

    /// Find a module by name
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }
}

impl Module {
    /// Find a derived type by name
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// Look up procedures by name, in a name-keyed set or a scanned list
pub trait SubroutineSet {
    /// First procedure called `name`
    fn by_name(&self, name: &str) -> Option<&Subroutine>;
    fn names(&self) -> Vec<&str>;
}

impl SubroutineSet for [Subroutine] {
    fn by_name(&self, name: &str) -> Option<&Subroutine> {
        self.iter().find(|s| s.name == name)
    }

    fn names(&self) -> Vec<&str> {
        self.iter().map(|s| s.name.as_str()).collect()
    }
}

impl SubroutineSet for IndexSet<Subroutine> {
    fn by_name(&self, name: &str) -> Option<&Subroutine> {
        self.iter().find(|s| s.name == name)
    }

    fn names(&self) -> Vec<&str> {
        self.iter().map(|s| s.name.as_str()).collect()
    }
}
