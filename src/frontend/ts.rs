//! Reference TypeScript front end (§4 addendum).
//!
//! Parses a single declaration-style source file with `oxc_parser` and walks
//! the resulting AST to produce a [`ModuleAnalysis`]. Deliberately shallow on
//! type resolution: every `TSType` is rendered by slicing its own source
//! span and collapsing whitespace, the same "signature is whatever the
//! checker prints, normalized" contract the model documents for a front end
//! that has no real checker behind it. Union decomposition therefore falls
//! back to splitting that rendered string on a top-level `|`
//! ([`crate::checker::StringSignatureChecker`]), exactly the fallback the
//! classifier's type-signature step already defines for "no checker info".

use std::collections::HashMap;
use std::sync::LazyLock;

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use regex::Regex;

use crate::model::{
    AnalyzableNode, IndexSignatureInfo, ModuleAnalysis, Modifier, NodeKind, NodeMetadata,
    Position, ReleaseTag, SourceRange, TypeInfo, TypeParameterInfo, normalize_whitespace,
};

/// Front-end knobs (§6 `parseOptions`).
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Extract `metadata` (deprecation, default value, release tag) from
    /// leading doc comments. Disabling this skips the regex scan entirely.
    pub extract_doc_metadata: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_doc_metadata: true,
        }
    }
}

/// Parse `source` as a TypeScript declaration file and build a
/// [`ModuleAnalysis`] of its exported surface. Parse errors are recorded in
/// `errors` and never panic; an export whose declaration shape isn't
/// supported is skipped with an error string rather than aborting the rest
/// of the module (§4.1 failure semantics).
pub fn analyze(source: &str, options: &ParseOptions) -> ModuleAnalysis {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_typescript(true);
    let ret = Parser::new(&allocator, source, source_type).parse();

    let mut errors: Vec<String> = ret
        .errors
        .iter()
        .map(|e| format!("parse error: {e}"))
        .collect();
    let mut exports = crate::model::IndexMap::new();

    for stmt in &ret.program.body {
        match stmt {
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    match build_declaration_nodes(declaration, decl.span.start, source, options) {
                        Ok(nodes) => {
                            for node in nodes {
                                exports.insert(node);
                            }
                        }
                        Err(e) => errors.push(e),
                    }
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                match build_default_declaration_node(&decl.declaration, decl.span.start, source, options) {
                    Some(node) => exports.insert(node),
                    None => errors.push("unsupported default export declaration".to_string()),
                }
            }
            _ => {}
        }
    }

    ModuleAnalysis {
        exports,
        symbols: HashMap::new(),
        errors,
    }
}

fn build_declaration_nodes(
    decl: &Declaration,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> Result<Vec<AnalyzableNode>, String> {
    match decl {
        Declaration::FunctionDeclaration(f) => {
            let name = f
                .id
                .as_ref()
                .map(|i| i.name.to_string())
                .ok_or_else(|| "exported function declaration has no name".to_string())?;
            Ok(vec![build_function_node(&name, &name, f, doc_start, source, options)])
        }
        Declaration::ClassDeclaration(c) => {
            let name = c
                .id
                .as_ref()
                .map(|i| i.name.to_string())
                .ok_or_else(|| "exported class declaration has no name".to_string())?;
            Ok(vec![build_class_node(&name, &name, c, doc_start, source, options)])
        }
        Declaration::TSInterfaceDeclaration(i) => {
            let name = i.id.name.to_string();
            Ok(vec![build_interface_node(&name, i, doc_start, source, options)])
        }
        Declaration::TSTypeAliasDeclaration(t) => {
            let name = t.id.name.to_string();
            Ok(vec![build_type_alias_node(&name, t, doc_start, source, options)])
        }
        Declaration::TSEnumDeclaration(e) => {
            let name = e.id.name.to_string();
            Ok(vec![build_enum_node(&name, e, doc_start, source, options)])
        }
        Declaration::VariableDeclaration(v) => {
            let mut nodes = Vec::new();
            for d in &v.declarations {
                if let Some(name) = binding_name(&d.id) {
                    nodes.push(build_variable_node(&name, &name, d, doc_start, source, options));
                }
            }
            Ok(nodes)
        }
        _ => Err("unsupported top-level export declaration kind".to_string()),
    }
}

fn build_default_declaration_node(
    decl: &ExportDefaultDeclarationKind,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> Option<AnalyzableNode> {
    match decl {
        ExportDefaultDeclarationKind::FunctionDeclaration(f) => {
            let name = f
                .id
                .as_ref()
                .map(|i| i.name.to_string())
                .unwrap_or_else(|| "default".to_string());
            Some(build_function_node("default", &name, f, doc_start, source, options))
        }
        ExportDefaultDeclarationKind::ClassDeclaration(c) => {
            let name = c
                .id
                .as_ref()
                .map(|i| i.name.to_string())
                .unwrap_or_else(|| "default".to_string());
            Some(build_class_node("default", &name, c, doc_start, source, options))
        }
        ExportDefaultDeclarationKind::TSInterfaceDeclaration(i) => {
            Some(build_interface_node("default", i, doc_start, source, options))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------
// Node builders
// ---------------------------------------------------------------------

fn build_function_node(
    path: &str,
    name: &str,
    func: &Function,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> AnalyzableNode {
    let mut node = AnalyzableNode::new(path, name, NodeKind::Function);
    node.location = Some(source_range(source, func.span));
    if func.r#async {
        node.modifiers.insert(Modifier::Async);
    }
    if func.generator {
        node.modifiers.insert(Modifier::Generator);
    }
    if func.declare {
        node.modifiers.insert(Modifier::Declare);
    }
    node.type_info.type_parameters = build_type_parameters(func.type_parameters.as_deref(), source);

    let params = build_parameters(path, &func.params, source);
    let return_type = func
        .return_type
        .as_ref()
        .map(|t| render_type(&t.type_annotation, source))
        .unwrap_or_else(|| "void".to_string());
    node.type_info.signature = callable_signature(&params, &return_type);

    if options.extract_doc_metadata {
        node.metadata = leading_metadata(source, doc_start as usize);
    }
    for p in params {
        node.children.insert(p);
    }
    node
}

fn build_class_node(
    path: &str,
    name: &str,
    decl: &Class,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> AnalyzableNode {
    let mut node = AnalyzableNode::new(path, name, NodeKind::Class);
    node.location = Some(source_range(source, decl.span));
    if decl.r#abstract {
        node.modifiers.insert(Modifier::Abstract);
    }
    if decl.declare {
        node.modifiers.insert(Modifier::Declare);
    }
    node.type_info.type_parameters = build_type_parameters(decl.type_parameters.as_deref(), source);
    if let Some(super_class) = &decl.super_class {
        node.extends.push(span_text_owned(super_class.span(), source));
    }
    node.implements = decl
        .implements
        .iter()
        .map(|i| span_text_owned(i.span, source))
        .collect();
    // Header-only signature: member changes are only surfaced through the
    // nested-change walker, never duplicated as a top-level type change.
    node.type_info.signature = normalize_whitespace(&format!("class {name}"));

    if options.extract_doc_metadata {
        node.metadata = leading_metadata(source, doc_start as usize);
    }
    for el in &decl.body.body {
        if let Some(member) = build_class_member(path, el, source, options) {
            node.children.insert(member);
        }
    }
    node
}

fn build_class_member(
    owner_path: &str,
    el: &ClassElement,
    source: &str,
    options: &ParseOptions,
) -> Option<AnalyzableNode> {
    match el {
        ClassElement::MethodDefinition(m) => {
            let name = property_key_name(&m.key)?;
            let node_kind = match m.kind {
                MethodDefinitionKind::Get => NodeKind::Getter,
                MethodDefinitionKind::Set => NodeKind::Setter,
                _ => NodeKind::Method,
            };
            let path = format!("{owner_path}.{name}");
            let mut node = AnalyzableNode::new(path.clone(), &name, node_kind);
            node.location = Some(source_range(source, m.span));
            if m.r#static {
                node.modifiers.insert(Modifier::Static);
            }
            apply_accessibility(&mut node, m.accessibility);

            let params = build_parameters(&path, &m.value.params, source);
            let return_type = m
                .value
                .return_type
                .as_ref()
                .map(|t| render_type(&t.type_annotation, source))
                .unwrap_or_else(|| "void".to_string());
            node.type_info.type_parameters =
                build_type_parameters(m.value.type_parameters.as_deref(), source);
            node.type_info.signature = callable_signature(&params, &return_type);

            if options.extract_doc_metadata {
                node.metadata = leading_metadata(source, m.span.start as usize);
            }
            for p in params {
                node.children.insert(p);
            }
            Some(node)
        }
        ClassElement::PropertyDefinition(p) => {
            let name = property_key_name(&p.key)?;
            let path = format!("{owner_path}.{name}");
            let mut node = AnalyzableNode::new(path, &name, NodeKind::Property);
            node.location = Some(source_range(source, p.span));
            if p.r#static {
                node.modifiers.insert(Modifier::Static);
            }
            if p.readonly {
                node.modifiers.insert(Modifier::Readonly);
            }
            if p.optional {
                node.modifiers.insert(Modifier::Optional);
            }
            apply_accessibility(&mut node, p.accessibility);

            let ty = p
                .type_annotation
                .as_ref()
                .map(|t| render_type(&t.type_annotation, source))
                .unwrap_or_else(|| "any".to_string());
            node.type_info = TypeInfo::with_signature(ty);

            if options.extract_doc_metadata {
                node.metadata = leading_metadata(source, p.span.start as usize);
            }
            Some(node)
        }
        _ => None,
    }
}

fn build_interface_node(
    path: &str,
    decl: &TSInterfaceDeclaration,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> AnalyzableNode {
    let name = decl.id.name.to_string();
    let mut node = AnalyzableNode::new(path, &name, NodeKind::Interface);
    node.location = Some(source_range(source, decl.span));
    node.type_info.type_parameters = build_type_parameters(decl.type_parameters.as_deref(), source);
    node.extends = decl
        .extends
        .iter()
        .map(|h| span_text_owned(h.span, source))
        .collect();
    node.type_info.signature = normalize_whitespace(&format!("interface {name}"));

    if options.extract_doc_metadata {
        node.metadata = leading_metadata(source, doc_start as usize);
    }
    for sig in &decl.body.body {
        if let Some(member) = build_interface_member(path, sig, source, options) {
            node.children.insert(member);
        }
    }
    node
}

fn build_interface_member(
    owner_path: &str,
    sig: &TSSignature,
    source: &str,
    options: &ParseOptions,
) -> Option<AnalyzableNode> {
    match sig {
        TSSignature::TSPropertySignature(p) => {
            let name = property_key_name(&p.key)?;
            let path = format!("{owner_path}.{name}");
            let mut node = AnalyzableNode::new(path, &name, NodeKind::Property);
            node.location = Some(source_range(source, p.span));
            if p.readonly {
                node.modifiers.insert(Modifier::Readonly);
            }
            if p.optional {
                node.modifiers.insert(Modifier::Optional);
            }
            let ty = p
                .type_annotation
                .as_ref()
                .map(|t| render_type(&t.type_annotation, source))
                .unwrap_or_else(|| "any".to_string());
            node.type_info = TypeInfo::with_signature(ty);
            if options.extract_doc_metadata {
                node.metadata = leading_metadata(source, p.span.start as usize);
            }
            Some(node)
        }
        TSSignature::TSMethodSignature(m) => {
            let name = property_key_name(&m.key)?;
            let node_kind = match m.kind {
                TSMethodSignatureKind::Get => NodeKind::Getter,
                TSMethodSignatureKind::Set => NodeKind::Setter,
                _ => NodeKind::Method,
            };
            let path = format!("{owner_path}.{name}");
            let mut node = AnalyzableNode::new(path.clone(), &name, node_kind);
            node.location = Some(source_range(source, m.span));
            if m.optional {
                node.modifiers.insert(Modifier::Optional);
            }
            let params = build_parameters(&path, &m.params, source);
            let return_type = m
                .return_type
                .as_ref()
                .map(|t| render_type(&t.type_annotation, source))
                .unwrap_or_else(|| "any".to_string());
            node.type_info.type_parameters = build_type_parameters(m.type_parameters.as_deref(), source);
            node.type_info.signature = callable_signature(&params, &return_type);
            if options.extract_doc_metadata {
                node.metadata = leading_metadata(source, m.span.start as usize);
            }
            for p in params {
                node.children.insert(p);
            }
            Some(node)
        }
        TSSignature::TSIndexSignature(idx) => {
            let key_param = idx.parameters.first();
            let key_name = key_param
                .map(|p| p.name.to_string())
                .unwrap_or_else(|| "key".to_string());
            let key_type = key_param
                .map(|p| render_type(&p.type_annotation.type_annotation, source))
                .unwrap_or_else(|| "string".to_string());
            let value_type = render_type(&idx.type_annotation.type_annotation, source);

            let path = format!("{owner_path}.[{key_name}]");
            let mut node = AnalyzableNode::new(path, format!("[{key_name}: {key_type}]"), NodeKind::IndexSignature);
            node.location = Some(source_range(source, idx.span));
            if idx.readonly {
                node.modifiers.insert(Modifier::Readonly);
            }
            node.type_info = TypeInfo::with_signature(value_type.clone());
            node.type_info.index_signatures.push(IndexSignatureInfo {
                key_name,
                key_type,
                value_type,
            });
            Some(node)
        }
        TSSignature::TSCallSignatureDeclaration(c) => {
            let path = format!("{owner_path}.()");
            let mut node = AnalyzableNode::new(path.clone(), "()", NodeKind::CallSignature);
            node.location = Some(source_range(source, c.span));
            let params = build_parameters(&path, &c.params, source);
            let return_type = c
                .return_type
                .as_ref()
                .map(|t| render_type(&t.type_annotation, source))
                .unwrap_or_else(|| "any".to_string());
            node.type_info.type_parameters = build_type_parameters(c.type_parameters.as_deref(), source);
            node.type_info.signature = callable_signature(&params, &return_type);
            for p in params {
                node.children.insert(p);
            }
            Some(node)
        }
        TSSignature::TSConstructSignatureDeclaration(c) => {
            let path = format!("{owner_path}.new()");
            let mut node = AnalyzableNode::new(path.clone(), "new()", NodeKind::ConstructSignature);
            node.location = Some(source_range(source, c.span));
            let params = build_parameters(&path, &c.params, source);
            let return_type = c
                .return_type
                .as_ref()
                .map(|t| render_type(&t.type_annotation, source))
                .unwrap_or_else(|| "any".to_string());
            node.type_info.type_parameters = build_type_parameters(c.type_parameters.as_deref(), source);
            node.type_info.signature = callable_signature(&params, &return_type);
            for p in params {
                node.children.insert(p);
            }
            Some(node)
        }
    }
}

fn build_type_alias_node(
    path: &str,
    decl: &TSTypeAliasDeclaration,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> AnalyzableNode {
    let name = decl.id.name.to_string();
    let mut node = AnalyzableNode::new(path, &name, NodeKind::TypeAlias);
    node.location = Some(source_range(source, decl.span));
    node.type_info.type_parameters = build_type_parameters(decl.type_parameters.as_deref(), source);
    node.type_info.signature = render_type(&decl.type_annotation, source);
    if options.extract_doc_metadata {
        node.metadata = leading_metadata(source, doc_start as usize);
    }
    node
}

fn build_enum_node(
    path: &str,
    decl: &TSEnumDeclaration,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> AnalyzableNode {
    let name = decl.id.name.to_string();
    let mut node = AnalyzableNode::new(path, &name, NodeKind::Enum);
    node.location = Some(source_range(source, decl.span));
    node.type_info.signature = normalize_whitespace(&format!("enum {name}"));
    if options.extract_doc_metadata {
        node.metadata = leading_metadata(source, doc_start as usize);
    }

    for member in &decl.members {
        let member_name = enum_member_name(&member.id);
        let member_path = format!("{path}.{member_name}");
        let mut member_node = AnalyzableNode::new(member_path, &member_name, NodeKind::EnumMember);
        member_node.location = Some(source_range(source, member.span));
        let value = member
            .initializer
            .as_ref()
            .map(|e| span_text_owned(e.span(), source))
            .unwrap_or_else(|| member_name.clone());
        member_node.type_info = TypeInfo::with_signature(value);
        node.children.insert(member_node);
    }
    node
}

fn build_variable_node(
    path: &str,
    name: &str,
    declarator: &VariableDeclarator,
    doc_start: u32,
    source: &str,
    options: &ParseOptions,
) -> AnalyzableNode {
    let mut node = AnalyzableNode::new(path, name, NodeKind::Variable);
    node.location = Some(source_range(source, declarator.span));
    let ty = binding_type_annotation(&declarator.id, source)
        .or_else(|| declarator.init.as_ref().map(|e| format!("typeof {}", span_text_owned(e.span(), source))))
        .unwrap_or_else(|| "unknown".to_string());
    node.type_info = TypeInfo::with_signature(ty);
    if options.extract_doc_metadata {
        node.metadata = leading_metadata(source, doc_start as usize);
    }
    node
}

fn build_parameters(owner_path: &str, params: &FormalParameters, source: &str) -> Vec<AnalyzableNode> {
    let mut nodes = Vec::new();
    for (i, param) in params.items.iter().enumerate() {
        let name = binding_name(&param.pattern).unwrap_or_else(|| format!("arg{i}"));
        let path = format!("{owner_path}.{name}");
        let mut node = AnalyzableNode::new(path, &name, NodeKind::Parameter);
        node.location = Some(source_range(source, param.span));
        if param.pattern.optional {
            node.modifiers.insert(Modifier::Optional);
        }
        if param.readonly {
            node.modifiers.insert(Modifier::Readonly);
        }
        let ty = binding_type_annotation(&param.pattern, source).unwrap_or_else(|| "any".to_string());
        node.type_info = TypeInfo::with_signature(ty);
        nodes.push(node);
    }
    if let Some(rest) = &params.rest {
        let name = binding_name(&rest.argument).unwrap_or_else(|| "rest".to_string());
        let path = format!("{owner_path}.{name}");
        let mut node = AnalyzableNode::new(path, &name, NodeKind::Parameter);
        node.location = Some(source_range(source, rest.span));
        node.modifiers.insert(Modifier::Rest);
        let ty = binding_type_annotation(&rest.argument, source).unwrap_or_else(|| "any".to_string());
        node.type_info = TypeInfo::with_signature(ty);
        nodes.push(node);
    }
    nodes
}

fn build_type_parameters(decl: Option<&TSTypeParameterDeclaration>, source: &str) -> Vec<TypeParameterInfo> {
    let Some(decl) = decl else {
        return Vec::new();
    };
    decl.params
        .iter()
        .enumerate()
        .map(|(i, tp)| TypeParameterInfo {
            name: tp.name.name.to_string(),
            constraint: tp.constraint.as_ref().map(|c| render_type(c, source)),
            default: tp.default.as_ref().map(|d| render_type(d, source)),
            position: i,
        })
        .collect()
}

// ---------------------------------------------------------------------
// Small shared helpers
// ---------------------------------------------------------------------

fn binding_name(pattern: &BindingPattern) -> Option<String> {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
        BindingPatternKind::AssignmentPattern(a) => binding_name(&a.left),
        _ => None,
    }
}

fn binding_type_annotation(pattern: &BindingPattern, source: &str) -> Option<String> {
    pattern
        .type_annotation
        .as_ref()
        .map(|t| render_type(&t.type_annotation, source))
}

fn property_key_name(key: &PropertyKey) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.to_string()),
        PropertyKey::PrivateIdentifier(id) => Some(format!("#{}", id.name)),
        _ => None,
    }
}

fn apply_accessibility(node: &mut AnalyzableNode, accessibility: Option<TSAccessibility>) {
    match accessibility {
        Some(TSAccessibility::Public) => {
            node.modifiers.insert(Modifier::Public);
        }
        Some(TSAccessibility::Protected) => {
            node.modifiers.insert(Modifier::Protected);
        }
        Some(TSAccessibility::Private) => {
            node.modifiers.insert(Modifier::Private);
        }
        None => {}
    }
}

fn enum_member_name(id: &TSEnumMemberName) -> String {
    match id {
        TSEnumMemberName::Identifier(i) => i.name.to_string(),
        TSEnumMemberName::String(s) => s.value.to_string(),
        _ => "member".to_string(),
    }
}

/// `"(a: T, b?: U) => R"` - the call-signature-flavored string every
/// callable kind (function, method, call/construct signature) normalizes
/// its `type_info.signature` to.
fn callable_signature(params: &[AnalyzableNode], return_type: &str) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|p| {
            let rest = if p.has_modifier(Modifier::Rest) { "..." } else { "" };
            let optional = if p.has_modifier(Modifier::Optional) { "?" } else { "" };
            format!("{rest}{}{optional}: {}", p.name, p.type_info.signature)
        })
        .collect();
    normalize_whitespace(&format!("({}) => {return_type}", rendered.join(", ")))
}

/// Render a `TSType` (or any other spanned node) as its own source text,
/// whitespace-normalized. There is no real checker behind this front end,
/// so the "canonical signature string" is simply what the author wrote.
fn render_type(ty: &TSType, source: &str) -> String {
    normalize_whitespace(span_text(ty.span(), source))
}

fn span_text<'s>(span: Span, source: &'s str) -> &'s str {
    let start = (span.start as usize).min(source.len());
    let end = (span.end as usize).min(source.len());
    &source[start.min(end)..end]
}

fn span_text_owned(span: Span, source: &str) -> String {
    normalize_whitespace(span_text(span, source))
}

fn position_at(source: &str, offset: usize) -> Position {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut column = 1;
    for ch in source[..offset].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    Position { line, column, offset }
}

fn source_range(source: &str, span: Span) -> SourceRange {
    SourceRange::new(
        position_at(source, span.start as usize),
        position_at(source, span.end as usize),
    )
}

// ---------------------------------------------------------------------
// Doc-comment metadata extraction
// ---------------------------------------------------------------------

static DOC_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*\*.*?\*/[ \t]*\z").unwrap());
static DEPRECATED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)@deprecated\b([^\n*]*)").unwrap());
static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)@default(?:Value)?\b[ \t]*([^\n*]*)").unwrap());
static RELEASE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(public|beta|alpha|internal)\b").unwrap());

/// Find the `/** ... */` block immediately preceding `node_start`, tolerant
/// of trailing blank lines/indentation between the comment and the
/// declaration it documents.
fn leading_doc_comment(source: &str, node_start: usize) -> Option<&str> {
    let prefix_end = node_start.min(source.len());
    let prefix = &source[..prefix_end];
    let trimmed_end = prefix.trim_end_matches(|c: char| c.is_whitespace());
    let m = DOC_BLOCK_RE.find(trimmed_end)?;
    Some(&trimmed_end[m.start()..m.end()])
}

fn leading_metadata(source: &str, node_start: usize) -> Option<NodeMetadata> {
    let comment = leading_doc_comment(source, node_start)?;

    let deprecated = DEPRECATED_RE.is_match(comment);
    let deprecation_message = DEPRECATED_RE
        .captures(comment)
        .map(|c| c[1].trim().trim_start_matches('-').trim().to_string())
        .filter(|s| !s.is_empty());
    let default_value = DEFAULT_RE
        .captures(comment)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty());
    let release_tag = RELEASE_TAG_RE.captures(comment).and_then(|c| match &c[1] {
        "public" => Some(ReleaseTag::Public),
        "beta" => Some(ReleaseTag::Beta),
        "alpha" => Some(ReleaseTag::Alpha),
        "internal" => Some(ReleaseTag::Internal),
        _ => None,
    });

    if !deprecated && default_value.is_none() && release_tag.is_none() {
        return None;
    }
    Some(NodeMetadata {
        deprecated,
        deprecation_message,
        default_value,
        release_tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exported_function_signature() {
        let source = "export function greet(name: string, prefix?: string): string { return name; }";
        let analysis = analyze(source, &ParseOptions::default());
        let node = analysis.exports.get("greet").expect("greet exported");
        assert_eq!(node.kind, NodeKind::Function);
        assert_eq!(node.type_info.signature, "(name: string, prefix?: string) => string");
        assert_eq!(node.children.len(), 2);
        let prefix = node.children.get("prefix").unwrap();
        assert!(prefix.has_modifier(Modifier::Optional));
    }

    #[test]
    fn parses_interface_properties() {
        let source = "export interface Config { readonly timeout: number; label?: string }";
        let analysis = analyze(source, &ParseOptions::default());
        let node = analysis.exports.get("Config").expect("Config exported");
        assert_eq!(node.kind, NodeKind::Interface);
        assert_eq!(node.type_info.signature, "interface Config");
        let timeout = node.children.get("timeout").expect("timeout property");
        assert!(timeout.has_modifier(Modifier::Readonly));
        assert_eq!(timeout.type_info.signature, "number");
        let label = node.children.get("label").expect("label property");
        assert!(label.has_modifier(Modifier::Optional));
    }

    #[test]
    fn parses_type_alias_union() {
        let source = r#"export type Status = "a" | "b" | "c";"#;
        let analysis = analyze(source, &ParseOptions::default());
        let node = analysis.exports.get("Status").expect("Status exported");
        assert_eq!(node.kind, NodeKind::TypeAlias);
        assert_eq!(node.type_info.signature, "\"a\" | \"b\" | \"c\"");
    }

    #[test]
    fn parses_enum_members_with_values() {
        let source = "export enum Color { Red = \"red\", Blue = \"blue\" }";
        let analysis = analyze(source, &ParseOptions::default());
        let node = analysis.exports.get("Color").expect("Color exported");
        assert_eq!(node.children.len(), 2);
        let red = node.children.get("Red").unwrap();
        assert_eq!(red.type_info.signature, "\"red\"");
    }

    #[test]
    fn extracts_deprecated_doc_tag() {
        let source = "/** @deprecated use g instead */\nexport function f(): void {}";
        let analysis = analyze(source, &ParseOptions::default());
        let node = analysis.exports.get("f").expect("f exported");
        assert!(node.is_deprecated());
        let meta = node.metadata.as_ref().unwrap();
        assert_eq!(meta.deprecation_message.as_deref(), Some("use g instead"));
    }

    #[test]
    fn extracts_default_value_doc_tag() {
        let source = "export class Client {\n  /** @defaultValue 30 */\n  timeout: number;\n}";
        let analysis = analyze(source, &ParseOptions::default());
        let node = analysis.exports.get("Client").expect("Client exported");
        let timeout = node.children.get("timeout").expect("timeout property");
        let meta = timeout.metadata.as_ref().expect("metadata extracted");
        assert_eq!(meta.default_value.as_deref(), Some("30"));
    }

    #[test]
    fn parses_class_with_extends_and_implements() {
        let source = "export class Widget extends Base implements Drawable { render(): void {} }";
        let analysis = analyze(source, &ParseOptions::default());
        let node = analysis.exports.get("Widget").expect("Widget exported");
        assert_eq!(node.extends, vec!["Base".to_string()]);
        assert_eq!(node.implements, vec!["Drawable".to_string()]);
        assert!(node.children.get("render").is_some());
    }

    #[test]
    fn malformed_declaration_is_recorded_as_error_not_panic() {
        let source = "export namespace N { export const x = 1; }";
        let analysis = analyze(source, &ParseOptions::default());
        assert!(!analysis.errors.is_empty());
    }
}
