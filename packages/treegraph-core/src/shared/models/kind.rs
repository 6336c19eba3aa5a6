//! Node kinds, capabilities and the explicit kind registry
//!
//! A node's grammar type name (e.g. `function_definition`) is mapped to a
//! closed discriminator (`NodeKind`) plus a capability bitset through an
//! immutable `KindRegistry`. The registry is built once and passed explicitly
//! to tree constructors; there is no process-wide registration.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

/// Discriminator tag for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Module,
    Function,
    Class,
    Statement,
    Expression,
    Identifier,
    Literal,
    Parameter,
    Import,
    Comment,
    Block,
    /// Any grammar type without a registry entry
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Function => "function",
            Self::Class => "class",
            Self::Statement => "statement",
            Self::Expression => "expression",
            Self::Identifier => "identifier",
            Self::Literal => "literal",
            Self::Parameter => "parameter",
            Self::Import => "import",
            Self::Comment => "comment",
            Self::Block => "block",
            Self::Other => "other",
        }
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed capability bitset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    /// Introduces a named scope (functions, classes, modules)
    pub const NAMED_SCOPE: Capabilities = Capabilities(1 << 0);
    /// Can be invoked
    pub const CALLABLE: Capabilities = Capabilities(1 << 1);
    /// Defines a symbol
    pub const DEFINITION: Capabilities = Capabilities(1 << 2);
    /// Binds one or more names
    pub const BINDING: Capabilities = Capabilities(1 << 3);
    /// Holds a body of statements
    pub const CONTAINER: Capabilities = Capabilities(1 << 4);

    pub fn contains(&self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

/// Read-only view of a node handed to registry validators during construction
#[derive(Debug)]
pub struct NodeShape<'a> {
    pub type_name: &'a str,
    pub text: &'a str,
    pub is_named: bool,
    pub field_name: Option<&'a str>,
    pub child_types: Vec<&'a str>,
}

/// Construction-time validator for a grammar type
pub type KindValidator = Arc<dyn Fn(&NodeShape<'_>) -> Result<(), String> + Send + Sync>;

/// Registry entry for one grammar type name
#[derive(Clone)]
pub struct KindSpec {
    pub kind: NodeKind,
    pub capabilities: Capabilities,
    pub validator: Option<KindValidator>,
}

impl KindSpec {
    pub fn new(kind: NodeKind, capabilities: Capabilities) -> Self {
        Self {
            kind,
            capabilities,
            validator: None,
        }
    }
}

impl fmt::Debug for KindSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindSpec")
            .field("kind", &self.kind)
            .field("capabilities", &self.capabilities)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Immutable mapping from grammar type name to kind/capabilities/validator
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    entries: FxHashMap<String, KindSpec>,
}

impl KindRegistry {
    /// Registry with no entries: every node classifies as `NodeKind::Other`
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> KindRegistryBuilder {
        KindRegistryBuilder::default()
    }

    /// Mapping for the tree-sitter Python grammar
    pub fn python() -> Self {
        use Capabilities as C;

        let mut builder = Self::builder()
            .register("module", NodeKind::Module, C::NAMED_SCOPE | C::CONTAINER)
            .register(
                "function_definition",
                NodeKind::Function,
                C::NAMED_SCOPE | C::CALLABLE | C::DEFINITION,
            )
            .register("lambda", NodeKind::Function, C::CALLABLE)
            .register(
                "class_definition",
                NodeKind::Class,
                C::NAMED_SCOPE | C::DEFINITION | C::CONTAINER,
            )
            .register("block", NodeKind::Block, C::CONTAINER)
            .register("identifier", NodeKind::Identifier, C::NONE)
            .register("comment", NodeKind::Comment, C::NONE)
            .register("import_statement", NodeKind::Import, C::BINDING)
            .register("import_from_statement", NodeKind::Import, C::BINDING)
            .register("assignment", NodeKind::Statement, C::BINDING)
            .register("augmented_assignment", NodeKind::Statement, C::BINDING);

        for statement in [
            "expression_statement",
            "return_statement",
            "if_statement",
            "for_statement",
            "while_statement",
            "try_statement",
            "with_statement",
            "pass_statement",
            "break_statement",
            "continue_statement",
            "raise_statement",
            "decorated_definition",
        ] {
            builder = builder.register(statement, NodeKind::Statement, C::NONE);
        }
        for expression in [
            "call",
            "attribute",
            "binary_operator",
            "boolean_operator",
            "comparison_operator",
            "unary_operator",
            "subscript",
            "list",
            "dictionary",
            "tuple",
            "parenthesized_expression",
        ] {
            builder = builder.register(expression, NodeKind::Expression, C::NONE);
        }
        for literal in ["string", "integer", "float", "true", "false", "none"] {
            builder = builder.register(literal, NodeKind::Literal, C::NONE);
        }
        for parameter in [
            "typed_parameter",
            "default_parameter",
            "typed_default_parameter",
            "list_splat_pattern",
            "dictionary_splat_pattern",
        ] {
            builder = builder.register(parameter, NodeKind::Parameter, C::BINDING);
        }

        builder.build()
    }

    pub fn get(&self, type_name: &str) -> Option<&KindSpec> {
        self.entries.get(type_name)
    }

    /// Kind for a grammar type name (`Other` when unregistered)
    pub fn kind_of(&self, type_name: &str) -> NodeKind {
        self.get(type_name).map(|spec| spec.kind).unwrap_or_default()
    }

    /// Capabilities for a grammar type name (empty when unregistered)
    pub fn capabilities_of(&self, type_name: &str) -> Capabilities {
        self.get(type_name)
            .map(|spec| spec.capabilities)
            .unwrap_or_default()
    }

    /// Run the registered validator (if any) for this node shape
    pub fn validate(&self, shape: &NodeShape<'_>) -> Result<(), String> {
        match self.get(shape.type_name).and_then(|spec| spec.validator.as_ref()) {
            Some(validator) => validator(shape),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for `KindRegistry`. Consumed by `build()`, after which the
/// registry cannot change.
#[derive(Debug, Default)]
pub struct KindRegistryBuilder {
    entries: FxHashMap<String, KindSpec>,
}

impl KindRegistryBuilder {
    /// Register a grammar type. Re-registering a name replaces the entry.
    pub fn register(
        mut self,
        type_name: impl Into<String>,
        kind: NodeKind,
        capabilities: Capabilities,
    ) -> Self {
        self.entries
            .insert(type_name.into(), KindSpec::new(kind, capabilities));
        self
    }

    /// Attach a validator to an already-registered type (or register it as `Other`)
    pub fn validator<F>(mut self, type_name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&NodeShape<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.entries
            .entry(type_name.into())
            .or_insert_with(|| KindSpec::new(NodeKind::Other, Capabilities::NONE))
            .validator = Some(Arc::new(validator));
        self
    }

    pub fn build(self) -> KindRegistry {
        KindRegistry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_registry() {
        let registry = KindRegistry::python();
        assert_eq!(registry.kind_of("function_definition"), NodeKind::Function);
        assert_eq!(registry.kind_of("class_definition"), NodeKind::Class);
        assert_eq!(registry.kind_of("integer"), NodeKind::Literal);
        assert_eq!(registry.kind_of("no_such_type"), NodeKind::Other);

        let caps = registry.capabilities_of("function_definition");
        assert!(caps.contains(Capabilities::CALLABLE));
        assert!(caps.contains(Capabilities::CALLABLE | Capabilities::DEFINITION));
        assert!(!caps.contains(Capabilities::CONTAINER));
        assert!(registry.capabilities_of("no_such_type").is_empty());
    }

    #[test]
    fn test_validator_runs_for_registered_type() {
        let registry = KindRegistry::builder()
            .register("identifier", NodeKind::Identifier, Capabilities::NONE)
            .validator("identifier", |shape| {
                if shape.text.is_empty() {
                    Err("identifier must not be empty".to_string())
                } else {
                    Ok(())
                }
            })
            .build();

        let ok = NodeShape {
            type_name: "identifier",
            text: "x",
            is_named: true,
            field_name: None,
            child_types: vec![],
        };
        let bad = NodeShape {
            type_name: "identifier",
            text: "",
            is_named: true,
            field_name: None,
            child_types: vec![],
        };
        assert!(registry.validate(&ok).is_ok());
        assert!(registry.validate(&bad).is_err());
        // Kind survives adding a validator
        assert_eq!(registry.kind_of("identifier"), NodeKind::Identifier);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NodeKind::Function.to_string(), "function");
        assert_eq!(NodeKind::default(), NodeKind::Other);
    }
}
