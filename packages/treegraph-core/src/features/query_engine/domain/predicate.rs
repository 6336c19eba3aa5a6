// Predicate - Composable node tests
//
// Pure, deterministic tests over a SyntaxNode:
// - Built-ins: type name, text (eq / contains / regex), kind, capability,
//   named flag, field name
// - Boolean logic: and, or, not (also `&`, `|`, `!`), short-circuiting
// - Escape hatch: arbitrary function
//
// Predicates are cheap to clone (And/Or/Not share their operands).

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use regex::Regex;

use crate::shared::models::{Capabilities, NodeKind, SyntaxNode};

type NodeFn = dyn Fn(&SyntaxNode) -> bool + Send + Sync;

/// Node predicate
///
/// Example:
/// ```ignore
/// let defs = Predicate::type_name("function_definition")
///     & !Predicate::text_contains("_private");
/// assert!(defs.matches(&node));
/// ```
#[derive(Clone)]
pub enum Predicate {
    /// Always true
    Any,
    TypeName(Arc<str>),
    TextEq(Arc<str>),
    TextContains(Arc<str>),
    TextRegex(Regex),
    Kind(NodeKind),
    HasCapability(Capabilities),
    Named(bool),
    Field(Arc<str>),
    Custom(Arc<NodeFn>),
    And(Arc<Predicate>, Arc<Predicate>),
    Or(Arc<Predicate>, Arc<Predicate>),
    Not(Arc<Predicate>),
    /// Flat conjunction (`Any` semantics when empty)
    AllOf(Arc<[Predicate]>),
    /// Flat disjunction (never matches when empty)
    AnyOf(Arc<[Predicate]>),
}

impl Predicate {
    pub fn any() -> Self {
        Predicate::Any
    }

    pub fn type_name(name: impl AsRef<str>) -> Self {
        Predicate::TypeName(Arc::from(name.as_ref()))
    }

    pub fn text_eq(text: impl AsRef<str>) -> Self {
        Predicate::TextEq(Arc::from(text.as_ref()))
    }

    pub fn text_contains(needle: impl AsRef<str>) -> Self {
        Predicate::TextContains(Arc::from(needle.as_ref()))
    }

    /// Text matches a regular expression (unanchored)
    pub fn text_regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Predicate::TextRegex(Regex::new(pattern)?))
    }

    pub fn kind(kind: NodeKind) -> Self {
        Predicate::Kind(kind)
    }

    /// Node carries every capability in `capabilities`
    pub fn has_capability(capabilities: Capabilities) -> Self {
        Predicate::HasCapability(capabilities)
    }

    pub fn named(is_named: bool) -> Self {
        Predicate::Named(is_named)
    }

    /// Node occupies the given field of its parent
    pub fn field(name: impl AsRef<str>) -> Self {
        Predicate::Field(Arc::from(name.as_ref()))
    }

    /// Arbitrary function. Must be pure: the collection may evaluate it
    /// any number of times.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&SyntaxNode) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom(Arc::new(f))
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Arc::new(self), Arc::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Arc::new(self), Arc::new(other))
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Arc::new(self))
    }

    /// Conjunction of all predicates, evaluated left to right. Stored flat,
    /// so its depth does not grow with the number of operands.
    pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::AllOf(predicates.into_iter().collect())
    }

    /// Disjunction of all predicates, evaluated left to right
    pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::AnyOf(predicates.into_iter().collect())
    }

    /// Evaluate against a node
    pub fn matches(&self, node: &SyntaxNode) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::TypeName(name) => node.type_name() == &**name,
            Predicate::TextEq(text) => node.text() == &**text,
            Predicate::TextContains(needle) => node.text().contains(&**needle),
            Predicate::TextRegex(re) => re.is_match(node.text()),
            Predicate::Kind(kind) => node.kind() == *kind,
            Predicate::HasCapability(caps) => node.has_capability(*caps),
            Predicate::Named(flag) => node.is_named() == *flag,
            Predicate::Field(name) => node.field_name() == Some(&**name),
            Predicate::Custom(f) => f(node),
            Predicate::And(left, right) => left.matches(node) && right.matches(node),
            Predicate::Or(left, right) => left.matches(node) || right.matches(node),
            Predicate::Not(inner) => !inner.matches(node),
            Predicate::AllOf(all) => all.iter().all(|p| p.matches(node)),
            Predicate::AnyOf(any) => any.iter().any(|p| p.matches(node)),
        }
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::Any
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Any => write!(f, "Any"),
            Predicate::TypeName(name) => write!(f, "TypeName({:?})", name),
            Predicate::TextEq(text) => write!(f, "TextEq({:?})", text),
            Predicate::TextContains(text) => write!(f, "TextContains({:?})", text),
            Predicate::TextRegex(re) => write!(f, "TextRegex({:?})", re.as_str()),
            Predicate::Kind(kind) => write!(f, "Kind({})", kind),
            Predicate::HasCapability(caps) => write!(f, "HasCapability({:#b})", caps.bits()),
            Predicate::Named(flag) => write!(f, "Named({})", flag),
            Predicate::Field(name) => write!(f, "Field({:?})", name),
            Predicate::Custom(_) => write!(f, "Custom(<fn>)"),
            Predicate::And(l, r) => write!(f, "({:?} & {:?})", l, r),
            Predicate::Or(l, r) => write!(f, "({:?} | {:?})", l, r),
            Predicate::Not(inner) => write!(f, "!{:?}", inner),
            Predicate::AllOf(all) => f.debug_tuple("AllOf").field(&all).finish(),
            Predicate::AnyOf(any) => f.debug_tuple("AnyOf").field(&any).finish(),
        }
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        self.and(rhs)
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        self.or(rhs)
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        self.negate()
    }
}

impl From<NodeKind> for Predicate {
    fn from(kind: NodeKind) -> Self {
        Predicate::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{KindRegistry, NodeSpec, SyntaxTree};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // def f(x): pass
    fn sample() -> Arc<SyntaxTree> {
        let source = "def f(x): pass";
        let root = NodeSpec::new("module", 0..14).child(
            NodeSpec::new("function_definition", 0..14).children([
                NodeSpec::anonymous("def", 0..3),
                NodeSpec::new("identifier", 4..5).field("name"),
                NodeSpec::new("parameters", 5..8)
                    .field("parameters")
                    .child(NodeSpec::new("identifier", 6..7)),
                NodeSpec::new("block", 10..14)
                    .field("body")
                    .child(NodeSpec::new("pass_statement", 10..14)),
            ]),
        );
        SyntaxTree::build(source, root, &KindRegistry::python()).unwrap()
    }

    fn find(tree: &Arc<SyntaxTree>, type_name: &str) -> SyntaxNode {
        tree.nodes().find(|n| n.type_name() == type_name).unwrap()
    }

    #[test]
    fn test_builtins() {
        let tree = sample();
        let func = find(&tree, "function_definition");
        let name = func.child_by_field_name("name").unwrap();

        assert!(Predicate::type_name("function_definition").matches(&func));
        assert!(Predicate::text_eq("f").matches(&name));
        assert!(Predicate::text_contains("pass").matches(&func));
        assert!(Predicate::text_regex(r"^def \w+").unwrap().matches(&func));
        assert!(Predicate::kind(NodeKind::Function).matches(&func));
        assert!(Predicate::has_capability(Capabilities::CALLABLE).matches(&func));
        assert!(Predicate::field("name").matches(&name));
        assert!(!Predicate::field("body").matches(&name));
        assert!(Predicate::named(false).matches(&find(&tree, "def")));
        assert!(Predicate::any().matches(&name));
    }

    #[test]
    fn test_combinators() {
        let tree = sample();
        let name = find(&tree, "function_definition")
            .child_by_field_name("name")
            .unwrap();

        let ident = Predicate::type_name("identifier");
        let is_f = Predicate::text_eq("f");
        assert!((ident.clone() & is_f.clone()).matches(&name));
        assert!((ident.clone() | Predicate::text_eq("zzz")).matches(&name));
        assert!(!(!ident.clone()).matches(&name));
        assert!(Predicate::all_of([ident.clone(), is_f]).matches(&name));
        assert!(!Predicate::any_of(Vec::new()).matches(&name));
        assert!(Predicate::all_of(Vec::new()).matches(&name));
    }

    #[test]
    fn test_short_circuit() {
        let tree = sample();
        let root = tree.root();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let counting = Predicate::custom(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        let and = Predicate::type_name("nope") & counting.clone();
        assert!(!and.matches(&root));
        let or = Predicate::type_name("module") | counting;
        assert!(or.matches(&root));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wide_conjunction_stays_flat() {
        let tree = sample();
        let root = tree.root();
        let wide = Predicate::all_of((0..100_000).map(|_| Predicate::any()));
        assert!(wide.matches(&root));
        let none = Predicate::any_of((0..100_000).map(|_| Predicate::type_name("nope")));
        assert!(!none.matches(&root));
        drop((wide, none));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(Predicate::text_regex("(").is_err());
    }
}
