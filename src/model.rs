//! Core types for apidiff's structural API model.
//!
//! This module defines the normalized, language-agnostic representation of a
//! module's exported API surface:
//! - [`AnalyzableNode`] - the spine of the model: one node per declaration,
//!   member, parameter or type parameter.
//! - [`ModuleAnalysis`] - the top-level result of analyzing one source file.
//! - [`ChangeDescriptor`] / [`ApiChange`] - the differ's output shape.
//! - [`SourceRange`] - precise source locations carried through to reports.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Terminal color mode, shared by the CLI and renderers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ColorMode {
    /// Detect TTY and colorize if interactive.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use colors (for piping/CI).
    Never,
}

/// Output format requested by the caller.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// A 1-based line/column/offset position within a source file.
///
/// `column` is a code-point offset within the line (not a UTF-16 unit
/// offset), matching the spec's invariant that `SourceRange` stays
/// independent of the host language's string encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// A half-open-by-convention, closed-in-practice source range: `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            (start.line, start.column) <= (end.line, end.column),
            "SourceRange::start must precede end"
        );
        Self { start, end }
    }
}

/// The closed set of node kinds the analyzer can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Function,
    Class,
    Interface,
    TypeAlias,
    Variable,
    Enum,
    Namespace,
    Property,
    Method,
    Parameter,
    TypeParameter,
    EnumMember,
    IndexSignature,
    Getter,
    Setter,
    CallSignature,
    ConstructSignature,
}

impl NodeKind {
    /// True for kinds whose `children` order is part of their identity
    /// (parameters, type parameters, enum members) rather than incidental.
    pub fn is_positional(self) -> bool {
        matches!(
            self,
            NodeKind::Parameter | NodeKind::TypeParameter | NodeKind::EnumMember
        )
    }

    pub fn is_callable(self) -> bool {
        matches!(
            self,
            NodeKind::Function
                | NodeKind::Method
                | NodeKind::CallSignature
                | NodeKind::ConstructSignature
        )
    }
}

/// A declaration modifier. Stored as a set on each node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Readonly,
    Optional,
    Static,
    Abstract,
    Public,
    Protected,
    Private,
    Async,
    Generator,
    Rest,
    Override,
    Declare,
    Export,
    Default,
}

/// A type parameter (`<T extends Base = Default>`), positional within its
/// owner's type-parameter list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterInfo {
    pub name: String,
    pub constraint: Option<String>,
    pub default: Option<String>,
    pub position: usize,
}

/// One call or construct signature (`(a: T, b?: U) => R`), normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub parameters: Vec<ParameterInfo>,
    pub return_type: Option<String>,
    pub type_parameters: Vec<TypeParameterInfo>,
}

/// A function/method/signature parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub position: usize,
    pub optional: bool,
    pub rest: bool,
}

/// A structural property of an object-type-like entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub optional: bool,
    pub readonly: bool,
}

/// An index signature (`[key: string]: T`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSignatureInfo {
    pub key_name: String,
    pub key_type: String,
    pub value_type: String,
}

/// The normalized type information attached to a node.
///
/// `signature` is the canonical, whitespace-collapsed string the front end's
/// checker renders for this node: for values, the type as the checker
/// prints it; for declarations, a declaration-form string (`declare
/// function ...`, `interface X { ... }`) so that equality of `signature`
/// alone already subsumes "no structural change" detection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub signature: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameterInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_signatures: Vec<SignatureInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub construct_signatures: Vec<SignatureInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_signatures: Vec<IndexSignatureInfo>,
}

impl TypeInfo {
    pub fn with_signature(signature: impl Into<String>) -> Self {
        Self {
            signature: normalize_whitespace(&signature.into()),
            ..Default::default()
        }
    }
}

/// Collapse any run of whitespace to a single space and trim the ends - the
/// normalization every emitted `signature` string goes through so that
/// cosmetic reformatting never registers as a change.
pub fn normalize_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !last_was_space && !out.is_empty() {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Doc-comment-derived metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub deprecated: bool,
    pub deprecation_message: Option<String>,
    pub default_value: Option<String>,
    pub release_tag: Option<ReleaseTag>,
}

/// `@public` / `@beta` / `@alpha` / `@internal` doc tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseTag {
    Public,
    Beta,
    Alpha,
    Internal,
}

/// One node in the normalized API tree.
///
/// `path` is a fully-qualified, dotted identifier (`MyClass.method`,
/// `fn.parameterName`, `Enum.MEMBER`) that is unique within its owning
/// `ModuleAnalysis`; every non-root node's path has its parent's path as a
/// prefix. `children` preserves insertion order — positional kinds
/// (parameters, type parameters, enum members) rely on that order, other
/// kinds do not.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzableNode {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub modifiers: BTreeSet<Modifier>,
    pub type_info: TypeInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NodeMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceRange>,
    /// Members, parameters or type parameters, keyed by name.
    #[serde(skip)]
    pub children: Children,
}

/// Insertion-ordered name -> node map. A thin wrapper (rather than a bare
/// `IndexMap`) so call sites read as the spec's own vocabulary.
#[derive(Clone, Debug, Default)]
pub struct Children(Vec<(String, AnalyzableNode)>);

impl Children {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, node: AnalyzableNode) {
        let name = node.name.clone();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = node;
        } else {
            self.0.push((name, node));
        }
    }

    pub fn get(&self, name: &str) -> Option<&AnalyzableNode> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalyzableNode> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }
}

impl AnalyzableNode {
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            modifiers: BTreeSet::new(),
            type_info: TypeInfo::default(),
            extends: Vec::new(),
            implements: Vec::new(),
            metadata: None,
            location: None,
            children: Children::new(),
        }
    }

    pub fn has_modifier(&self, m: Modifier) -> bool {
        self.modifiers.contains(&m)
    }

    pub fn is_deprecated(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.deprecated)
    }
}

/// Opaque per-symbol handle the classifier uses for assignability probes.
/// Not part of the persisted model; never serialized.
#[derive(Clone, Debug)]
pub struct TypeHandle(pub String);

/// The top-level output of analyzing one source file.
///
/// `symbols` and `checker` hold opaque front-end handles used only during
/// classification (assignability probes); they are intentionally omitted
/// from the persisted/serialized model.
#[derive(Clone, Debug, Default)]
pub struct ModuleAnalysis {
    pub exports: IndexMap,
    pub symbols: HashMap<String, TypeHandle>,
    pub errors: Vec<String>,
}

/// Insertion-ordered name -> export map at module top level.
#[derive(Clone, Debug, Default)]
pub struct IndexMap(Vec<(String, AnalyzableNode)>);

impl IndexMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, node: AnalyzableNode) {
        self.0.push((node.name.clone(), node));
    }

    pub fn get(&self, name: &str) -> Option<&AnalyzableNode> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalyzableNode> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What kind of entity a [`ChangeDescriptor`] is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Export,
    Property,
    Method,
    Parameter,
    TypeParameter,
    EnumMember,
    IndexSignature,
    Accessor,
    Constructor,
}

/// What happened to the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Added,
    Removed,
    Modified,
    Renamed,
    Reordered,
}

/// Which facet of a `modified` node changed. Only meaningful when
/// `action == Modified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Aspect {
    Type,
    Optionality,
    Readonly,
    Visibility,
    Staticness,
    Abstractness,
    Deprecation,
    DefaultValue,
    DefaultType,
    Constraint,
    ExtendsClause,
    ImplementsClause,
    EnumValue,
}

/// Semantic direction of a `modified` change. Only meaningful when
/// `action == Modified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    Widening,
    Narrowing,
    Equivalent,
    Unrelated,
    Undetermined,
}

/// Free-form tags a classifier or walker attaches to a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeTag {
    WasRequired,
    NowOptional,
    WasOptional,
    NowRequired,
    HadDefault,
    HasDefault,
    AffectsTypeParameter,
    HasNestedChanges,
    IsNestedChange,
}

/// A tagged description of one change: target + action, plus aspect/impact
/// when the action is `modified`. Modeled as a single struct (rather than a
/// closed sum of variants per the design note) because Rust's exhaustive
/// `match` on `(action, aspect)` pairs already gives the rule engine the
/// same exhaustiveness guarantee with far less boilerplate at call sites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDescriptor {
    pub target: Target,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Aspect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    pub tags: BTreeSet<ChangeTag>,
}

impl ChangeDescriptor {
    pub fn new(target: Target, action: Action) -> Self {
        debug_assert!(
            action != Action::Modified,
            "a modified descriptor needs an aspect/impact; use ChangeDescriptor::modified instead"
        );
        Self {
            target,
            action,
            aspect: None,
            impact: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn modified(target: Target, aspect: Aspect, impact: Impact) -> Self {
        Self {
            target,
            action: Action::Modified,
            aspect: Some(aspect),
            impact: Some(impact),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: ChangeTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = ChangeTag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Returns a copy with `tag` added — descriptors are never mutated in
    /// place once handed to a caller (§5 resource policy).
    pub fn tagged(&self, tag: ChangeTag) -> Self {
        let mut next = self.clone();
        next.tags.insert(tag);
        next
    }

    /// `"target:action"` or `"target:action:aspect"` — the JSON
    /// `changeKind` string, and the key every rule/round-trip test
    /// reconstructs from.
    pub fn change_kind(&self) -> String {
        let target = kebab(&format!("{:?}", self.target));
        let action = kebab(&format!("{:?}", self.action));
        match self.aspect {
            Some(aspect) => format!("{target}:{action}:{}", kebab(&format!("{:?}", aspect))),
            None => format!("{target}:{action}"),
        }
    }
}

fn kebab(pascal: &str) -> String {
    let mut out = String::with_capacity(pascal.len() + 4);
    for (i, ch) in pascal.char_indices() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Extra context a change carries for explanation/rendering, separate from
/// the tagged descriptor proper.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChangeContext {
    pub is_nested: bool,
    pub depth: usize,
    pub ancestors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_type: Option<String>,
}

/// One classified change in the diff tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiChange {
    pub descriptor: ChangeDescriptor,
    pub path: String,
    pub node_kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_location: Option<SourceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_location: Option<SourceRange>,
    #[serde(skip)]
    pub old_node: Option<AnalyzableNode>,
    #[serde(skip)]
    pub new_node: Option<AnalyzableNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_changes: Vec<ApiChange>,
    pub context: ChangeContext,
    pub explanation: String,
}

impl ApiChange {
    /// Depth-first flattening, outer change first then its nested changes,
    /// recursively - used by invariant checks and by renderers that want a
    /// flat list instead of a tree.
    pub fn flatten(&self) -> Vec<&ApiChange> {
        let mut out = vec![self];
        for nested in &self.nested_changes {
            out.extend(nested.flatten());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_round_trips_without_aspect() {
        let d = ChangeDescriptor::new(Target::Export, Action::Added);
        assert_eq!(d.change_kind(), "export:added");
    }

    #[test]
    fn change_kind_round_trips_with_aspect() {
        let d = ChangeDescriptor::modified(Target::Property, Aspect::Type, Impact::Narrowing);
        assert_eq!(d.change_kind(), "property:modified:type");
    }

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("a   b\n\tc"), "a b c");
        assert_eq!(normalize_whitespace("  x  "), "x");
    }

    #[test]
    fn children_preserve_insertion_order() {
        let mut children = Children::new();
        children.insert(AnalyzableNode::new("f.b", "b", NodeKind::Parameter));
        children.insert(AnalyzableNode::new("f.a", "a", NodeKind::Parameter));
        let names: Vec<_> = children.names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn tagged_returns_new_descriptor() {
        let d = ChangeDescriptor::new(Target::Export, Action::Added);
        let tagged = d.tagged(ChangeTag::NowOptional);
        assert!(d.tags.is_empty());
        assert!(tagged.tags.contains(&ChangeTag::NowOptional));
    }
}
