use std::collections::HashSet;

use tree_sitter::{Node, Parser};

use crate::types::{
    AppError, Declaration, DeclarationDetail, Language, MemberShape, PropertyInfo, TypeParameter,
    VariableKind,
};

use super::languages::get_language_support;
use super::syntax::{
    annotation_text, collapse_whitespace, field_text, first_error, has_token, infer_literal_type,
    leading_docs, literal_value, node_text, trim_quotes,
};

/// Name given to anonymous default exports.
pub const DEFAULT_EXPORT_NAME: &str = "default";

/// Name given to a wildcard re-export (`export * from '...'`).
pub const WILDCARD_EXPORT_NAME: &str = "*";

pub struct Extractor {
    parser: Parser,
}

impl Extractor {
    pub fn new(language: Language) -> crate::Result<Self> {
        let support = get_language_support(language);
        let mut parser = Parser::new();
        parser
            .set_language(&support.get_language())
            .map_err(|e| AppError::Internal(format!("Error loading {} grammar: {}", language, e)))?;

        Ok(Self { parser })
    }

    /// Extract every exported declaration of one file.
    ///
    /// A file whose syntax tree contains errors yields `AppError::FileParse` and no
    /// declarations.
    pub fn extract(
        &mut self,
        content: &str,
        module: &str,
        file: &str,
    ) -> crate::Result<Vec<Declaration>> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| AppError::FileParse {
                file: file.to_string(),
                message: "parser produced no syntax tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error(root) {
                Some(node) => format!(
                    "syntax error at line {}, column {}",
                    node.start_position().row + 1,
                    node.start_position().column + 1
                ),
                None => "syntax error".to_string(),
            };
            return Err(AppError::FileParse {
                file: file.to_string(),
                message,
            });
        }

        let mut walker = DeclarationWalker {
            src: content,
            module,
            file,
            out: Vec::new(),
            overloaded: HashSet::new(),
        };
        walker.walk_program(root);
        Ok(walker.out)
    }
}

/// Namespaces nested deeper than this are indexed without their members.
const MAX_NAMESPACE_DEPTH: usize = 64;

#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: Option<String>,
    /// Inside a `declare` block every member is implicitly exported.
    ambient: bool,
    depth: usize,
}

impl Scope {
    fn qualify(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.to_string(),
        }
    }

    fn ambient(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            ambient: true,
            depth: self.depth,
        }
    }

    fn nested(&self, name: &str, ambient: bool) -> Self {
        Self {
            prefix: Some(self.qualify(name)),
            ambient: self.ambient || ambient,
            depth: self.depth + 1,
        }
    }
}

struct DeclarationWalker<'a> {
    src: &'a str,
    module: &'a str,
    file: &'a str,
    out: Vec<Declaration>,
    /// Qualified names that have overload signatures; their implementation is not indexed.
    overloaded: HashSet<String>,
}

impl<'a> DeclarationWalker<'a> {
    fn walk_program(&mut self, root: Node) {
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            if node.kind() == "export_statement" {
                self.visit_export(node, &Scope::default());
            }
        }
    }

    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.src)
    }

    /// Emit a declaration and return its unqualified name.
    fn emit(
        &mut self,
        scope: &Scope,
        name: &str,
        node: Node,
        docs: Option<String>,
        signature: String,
        detail: DeclarationDetail,
    ) -> String {
        let decl = Declaration::new(
            scope.qualify(name),
            self.module.to_string(),
            self.file.to_string(),
            node.start_position().row as u32 + 1,
            detail,
        )
        .with_signature(signature)
        .with_docs(docs);
        self.out.push(decl);
        name.to_string()
    }

    /// Declaration header up to (not including) its body, whitespace collapsed.
    fn header(&self, node: Node, body: Option<Node>) -> String {
        let mut cursor = node.walk();
        let start = node
            .children(&mut cursor)
            .find(|c| c.kind() != "decorator" && c.kind() != "comment")
            .map(|c| c.start_byte())
            .unwrap_or_else(|| node.start_byte());
        let end = body.map(|b| b.start_byte()).unwrap_or_else(|| node.end_byte());
        let text = self.src.get(start..end).unwrap_or_default();
        collapse_whitespace(text).trim_end_matches(';').trim_end().to_string()
    }

    // ========================================================================
    // Exports
    // ========================================================================

    fn visit_export(&mut self, export: Node, scope: &Scope) -> Vec<String> {
        let docs = leading_docs(export, self.src);

        if let Some(source) = export.child_by_field_name("source") {
            let from = trim_quotes(self.text(source)).to_string();
            return self.visit_reexport(export, Some(from), docs, scope);
        }

        if let Some(decl) = export.child_by_field_name("declaration") {
            return self.visit_declaration(decl, docs, scope);
        }

        if let Some(value) = export.child_by_field_name("value") {
            return self.visit_default_value(export, value, docs, scope);
        }

        let mut cursor = export.walk();
        let has_clause = export
            .named_children(&mut cursor)
            .any(|c| c.kind() == "export_clause");
        if has_clause {
            return self.visit_reexport(export, None, docs, scope);
        }

        // `export = x` and `export as namespace X` introduce no named declaration.
        Vec::new()
    }

    fn visit_declaration(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        match node.kind() {
            "interface_declaration" => self.visit_interface(node, docs, scope),
            "type_alias_declaration" => self.visit_type_alias(node, docs, scope),
            "enum_declaration" => self.visit_enum(node, docs, scope),
            "function_declaration"
            | "generator_function_declaration"
            | "function_signature"
            | "function_expression"
            | "function"
            | "generator_function" => self.visit_function(node, docs, scope),
            "class_declaration" | "abstract_class_declaration" | "class" => {
                self.visit_class(node, docs, scope)
            }
            "lexical_declaration" | "variable_declaration" => {
                self.visit_variables(node, docs, scope)
            }
            "internal_module" | "module" => self.visit_namespace(node, docs, scope),
            "ambient_declaration" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).find(|c| c.kind() != "comment");
                match inner {
                    Some(inner) => self.visit_declaration(inner, docs, &scope.ambient()),
                    None => Vec::new(),
                }
            }
            "expression_statement" => {
                // `namespace Foo {}` nested in an ambient block parses as an expression.
                let mut cursor = node.walk();
                let inner = node
                    .named_children(&mut cursor)
                    .find(|c| matches!(c.kind(), "internal_module" | "module"));
                match inner {
                    Some(inner) => self.visit_namespace(inner, docs, scope),
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn visit_default_value(
        &mut self,
        export: Node,
        value: Node,
        docs: Option<String>,
        scope: &Scope,
    ) -> Vec<String> {
        match value.kind() {
            "function_expression" | "function" | "generator_function" | "class" => {
                self.visit_declaration(value, docs, scope)
            }
            _ => {
                let mut signature = format!(
                    "export default {}",
                    collapse_whitespace(self.text(value))
                );
                if signature.chars().count() > 200 {
                    signature = signature.chars().take(200).collect::<String>() + "…";
                }
                let detail = DeclarationDetail::Variable {
                    declaration_kind: VariableKind::Const,
                    type_annotation: infer_literal_type(value, self.src).map(str::to_string),
                    value: literal_value(value, self.src),
                };
                vec![self.emit(scope, DEFAULT_EXPORT_NAME, export, docs, signature, detail)]
            }
        }
    }

    fn visit_reexport(
        &mut self,
        export: Node,
        from: Option<String>,
        docs: Option<String>,
        scope: &Scope,
    ) -> Vec<String> {
        let statement_type_only = has_token(export, "type");
        let signature = collapse_whitespace(self.text(export))
            .trim_end_matches(';')
            .to_string();

        let mut bindings: Vec<(String, Option<String>, bool)> = Vec::new();
        let mut cursor = export.walk();
        for child in export.named_children(&mut cursor) {
            match child.kind() {
                "export_clause" => {
                    let mut spec_cursor = child.walk();
                    for spec in child.named_children(&mut spec_cursor) {
                        if spec.kind() != "export_specifier" {
                            continue;
                        }
                        let Some(original) = field_text(spec, "name", self.src) else {
                            continue;
                        };
                        let original = trim_quotes(original).to_string();
                        let type_only = statement_type_only || has_token(spec, "type");
                        match field_text(spec, "alias", self.src) {
                            Some(alias) => bindings.push((
                                trim_quotes(alias).to_string(),
                                Some(original),
                                type_only,
                            )),
                            None => bindings.push((original, None, type_only)),
                        }
                    }
                }
                "namespace_export" => {
                    let mut ns_cursor = child.walk();
                    let alias = child
                        .named_children(&mut ns_cursor)
                        .last()
                        .map(|n| trim_quotes(self.text(n)).to_string());
                    if let Some(alias) = alias {
                        bindings.push((
                            alias,
                            Some(WILDCARD_EXPORT_NAME.to_string()),
                            statement_type_only,
                        ));
                    }
                }
                _ => {}
            }
        }

        if bindings.is_empty() && from.is_some() && has_token(export, "*") {
            bindings.push((WILDCARD_EXPORT_NAME.to_string(), None, statement_type_only));
        }

        bindings
            .into_iter()
            .map(|(name, original_name, type_only)| {
                let detail = DeclarationDetail::ReExport {
                    from: from.clone(),
                    original_name,
                    type_only,
                };
                self.emit(scope, &name, export, docs.clone(), signature.clone(), detail)
            })
            .collect()
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn visit_interface(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        let Some(name) = field_text(node, "name", self.src) else {
            return Vec::new();
        };
        let type_parameters = self.type_parameters(node.child_by_field_name("type_parameters"));

        let mut extends: Vec<String> = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "extends_type_clause" {
                let mut clause_cursor = child.walk();
                extends.extend(
                    child
                        .named_children(&mut clause_cursor)
                        .filter(|t| t.kind() != "comment")
                        .map(|t| collapse_whitespace(self.text(t))),
                );
            }
        }

        let body = node.child_by_field_name("body");
        let (properties, methods) = self.object_members(body);
        let signature = self.header(node, body);

        let detail = DeclarationDetail::Interface {
            type_parameters,
            extends,
            properties,
            methods,
        };
        vec![self.emit(scope, name, node, docs, signature, detail)]
    }

    fn visit_type_alias(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        let Some(name) = field_text(node, "name", self.src) else {
            return Vec::new();
        };
        let type_parameters = self.type_parameters(node.child_by_field_name("type_parameters"));
        let value = node.child_by_field_name("value");

        let signature = value
            .map(|v| self.text(v).trim().to_string())
            .unwrap_or_default();

        let mut shape = value;
        while let Some(inner) = shape.filter(|n| n.kind() == "parenthesized_type") {
            shape = inner.named_child(0);
        }
        let (properties, methods) = match shape {
            Some(object) if object.kind() == "object_type" => self.object_members(Some(object)),
            _ => (Vec::new(), Vec::new()),
        };

        let detail = DeclarationDetail::TypeAlias {
            type_parameters,
            properties,
            methods,
        };
        vec![self.emit(scope, name, node, docs, signature, detail)]
    }

    fn visit_enum(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        let Some(name) = field_text(node, "name", self.src) else {
            return Vec::new();
        };
        let body = node.child_by_field_name("body");

        let mut members = Vec::new();
        if let Some(body) = body {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "comment" => {}
                    "enum_assignment" => {
                        if let Some(name) = field_text(member, "name", self.src) {
                            members.push(trim_quotes(name).to_string());
                        }
                    }
                    _ => members.push(trim_quotes(self.text(member)).to_string()),
                }
            }
        }

        let detail = DeclarationDetail::Enum {
            members,
            is_const: has_token(node, "const"),
        };
        let signature = self.header(node, body);
        vec![self.emit(scope, name, node, docs, signature, detail)]
    }

    /// Members of an interface body or object type, split into (properties, methods).
    fn object_members(&self, body: Option<Node>) -> (Vec<PropertyInfo>, Vec<PropertyInfo>) {
        let mut properties = Vec::new();
        let mut methods = Vec::new();
        let Some(body) = body else {
            return (properties, methods);
        };

        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            let info = match member.kind() {
                "property_signature" => self.property_signature(member),
                "method_signature" => self.method_member(member),
                "call_signature" => Some(self.call_member(member, "()", MemberShape::CallSignature)),
                "construct_signature" => {
                    Some(self.call_member(member, "new", MemberShape::ConstructSignature))
                }
                "index_signature" => Some(self.index_signature(member)),
                _ => None,
            };
            let Some(mut info) = info else {
                continue;
            };
            info.docs = leading_docs(member, self.src);
            if info.is_callable() {
                methods.push(info);
            } else {
                properties.push(info);
            }
        }

        (properties, methods)
    }

    fn property_signature(&self, member: Node) -> Option<PropertyInfo> {
        let name = field_text(member, "name", self.src)?;
        let mut info = PropertyInfo::new(trim_quotes(name), MemberShape::Property);
        info.type_text = member
            .child_by_field_name("type")
            .map(|t| annotation_text(t, self.src))
            .unwrap_or_else(|| "any".to_string());
        info.optional = has_token(member, "?");
        info.readonly = has_token(member, "readonly");
        info.is_static = has_token(member, "static");
        Some(info)
    }

    fn method_member(&self, member: Node) -> Option<PropertyInfo> {
        let name = field_text(member, "name", self.src)?;
        let mut info = self.call_member(member, trim_quotes(name), MemberShape::Method);
        info.optional = has_token(member, "?");
        info.is_static = has_token(member, "static");
        Some(info)
    }

    fn call_member(&self, member: Node, name: &str, shape: MemberShape) -> PropertyInfo {
        let mut info = PropertyInfo::new(name, shape);
        info.parameters = self.parameters(member.child_by_field_name("parameters"));
        info.return_type = member
            .child_by_field_name("return_type")
            .or_else(|| member.child_by_field_name("type"))
            .map(|t| annotation_text(t, self.src));
        let type_params = member
            .child_by_field_name("type_parameters")
            .map(|t| collapse_whitespace(self.text(t)))
            .unwrap_or_default();
        info.type_text = format!(
            "{}({}) => {}",
            type_params,
            info.parameters.join(", "),
            info.return_type.as_deref().unwrap_or("void")
        );
        info
    }

    fn index_signature(&self, member: Node) -> PropertyInfo {
        let key_name = field_text(member, "name", self.src).or_else(|| {
            let mut cursor = member.walk();
            let ident = member
                .named_children(&mut cursor)
                .find(|c| c.kind() == "identifier")
                .map(|c| self.text(c));
            ident
        });
        let key = match (key_name, field_text(member, "index_type", self.src)) {
            (Some(name), Some(index_type)) => {
                format!("[{}: {}]", name, collapse_whitespace(index_type))
            }
            _ => {
                let mut cursor = member.walk();
                let clause = member
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "mapped_type_clause")
                    .map(|c| collapse_whitespace(self.text(c)));
                format!("[{}]", clause.unwrap_or_default())
            }
        };
        let mut info = PropertyInfo::new(key, MemberShape::IndexSignature);
        info.type_text = member
            .child_by_field_name("type")
            .map(|t| annotation_text(t, self.src))
            .unwrap_or_else(|| "any".to_string());
        info.readonly = has_token(member, "readonly");
        info
    }

    fn type_parameters(&self, node: Option<Node>) -> Vec<TypeParameter> {
        let Some(node) = node else {
            return Vec::new();
        };
        let mut cursor = node.walk();
        let params = node
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| {
                let name = field_text(p, "name", self.src)?.to_string();
                let inner_type = |field: &str| {
                    p.child_by_field_name(field).map(|c| match c.named_child(0) {
                        Some(t) => collapse_whitespace(self.text(t)),
                        None => collapse_whitespace(self.text(c)),
                    })
                };
                Some(TypeParameter {
                    name,
                    constraint: inner_type("constraint"),
                    default: inner_type("value"),
                })
            })
            .collect();
        params
    }

    fn parameters(&self, node: Option<Node>) -> Vec<String> {
        let Some(node) = node else {
            return Vec::new();
        };
        if node.kind() != "formal_parameters" {
            // Single bare arrow-function parameter: `x => ...`
            return vec![collapse_whitespace(self.text(node))];
        }
        let mut cursor = node.walk();
        let params = node
            .named_children(&mut cursor)
            .filter(|p| p.kind() != "comment")
            .map(|p| collapse_whitespace(self.text(p)))
            .collect();
        params
    }

    // ========================================================================
    // Functions, classes, variables
    // ========================================================================

    fn visit_function(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        let name = field_text(node, "name", self.src)
            .unwrap_or(DEFAULT_EXPORT_NAME)
            .to_string();
        // Overload signatures are the public surface, not the implementation.
        let qualified = scope.qualify(&name);
        if node.kind() == "function_signature" {
            self.overloaded.insert(qualified);
        } else if self.overloaded.contains(&qualified) {
            return Vec::new();
        }
        let type_parameters = self.type_parameters(node.child_by_field_name("type_parameters"));
        let parameters = self.parameters(node.child_by_field_name("parameters"));
        let return_type = node
            .child_by_field_name("return_type")
            .map(|t| annotation_text(t, self.src));
        let signature = self.header(node, node.child_by_field_name("body"));

        let detail = DeclarationDetail::Function {
            type_parameters,
            parameters,
            return_type,
        };
        vec![self.emit(scope, &name, node, docs, signature, detail)]
    }

    fn visit_class(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        let name = field_text(node, "name", self.src)
            .unwrap_or(DEFAULT_EXPORT_NAME)
            .to_string();
        let type_parameters = self.type_parameters(node.child_by_field_name("type_parameters"));

        let mut extends: Vec<String> = Vec::new();
        let mut implements = Vec::new();
        let mut cursor = node.walk();
        for heritage in node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "class_heritage")
        {
            let mut heritage_cursor = heritage.walk();
            for clause in heritage.named_children(&mut heritage_cursor) {
                match clause.kind() {
                    "extends_clause" => {
                        let mut clause_cursor = clause.walk();
                        for part in clause.named_children(&mut clause_cursor) {
                            let text = collapse_whitespace(self.text(part));
                            match (part.kind(), extends.last_mut()) {
                                ("type_arguments", Some(last)) => last.push_str(&text),
                                ("comment", _) => {}
                                _ => extends.push(text),
                            }
                        }
                    }
                    "implements_clause" => {
                        let mut clause_cursor = clause.walk();
                        implements.extend(
                            clause
                                .named_children(&mut clause_cursor)
                                .filter(|t| t.kind() != "comment")
                                .map(|t| collapse_whitespace(self.text(t))),
                        );
                    }
                    "comment" => {}
                    // JavaScript grammar: `class_heritage` holds the expression directly.
                    _ => extends.push(collapse_whitespace(self.text(clause))),
                }
            }
        }

        let body = node.child_by_field_name("body");
        let (properties, methods) = self.class_members(body);
        let signature = self.header(node, body);

        let detail = DeclarationDetail::Class {
            type_parameters,
            extends,
            implements,
            properties,
            methods,
            is_abstract: node.kind() == "abstract_class_declaration",
        };
        vec![self.emit(scope, &name, node, docs, signature, detail)]
    }

    fn is_private_member(&self, member: Node) -> bool {
        let mut cursor = member.walk();
        let private_modifier = member.named_children(&mut cursor).any(|c| {
            c.kind() == "accessibility_modifier" && self.text(c).trim() == "private"
        });
        private_modifier
            || member
                .child_by_field_name("name")
                .is_some_and(|n| n.kind() == "private_property_identifier")
    }

    fn class_members(&self, body: Option<Node>) -> (Vec<PropertyInfo>, Vec<PropertyInfo>) {
        let mut properties = Vec::new();
        let mut methods = Vec::new();
        let Some(body) = body else {
            return (properties, methods);
        };

        // Overloaded methods: the signatures are the public surface, not the implementation.
        let mut overloaded: HashSet<&str> = HashSet::new();

        let mut cursor = body.walk();
        let getters: HashSet<&str> = body
            .named_children(&mut cursor)
            .filter(|m| m.kind() == "method_definition" && has_token(*m, "get"))
            .filter_map(|m| field_text(m, "name", self.src))
            .collect();

        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if self.is_private_member(member) {
                continue;
            }
            let info = match member.kind() {
                "method_signature" | "abstract_method_signature" => {
                    if let Some(name) = field_text(member, "name", self.src) {
                        overloaded.insert(name);
                    }
                    self.method_member(member)
                }
                "method_definition" => {
                    let name = field_text(member, "name", self.src).unwrap_or_default();
                    if overloaded.contains(name) {
                        None
                    } else if has_token(member, "set") {
                        // Paired with a getter, the getter already describes the property.
                        (!getters.contains(name)).then(|| self.setter_property(member, name))
                    } else if has_token(member, "get") {
                        let mut info = PropertyInfo::new(name, MemberShape::Property);
                        info.type_text = member
                            .child_by_field_name("return_type")
                            .map(|t| annotation_text(t, self.src))
                            .unwrap_or_else(|| "any".to_string());
                        info.is_static = has_token(member, "static");
                        Some(info)
                    } else {
                        self.method_member(member)
                    }
                }
                "public_field_definition" | "field_definition" => {
                    self.field_definition(member)
                }
                "index_signature" => Some(self.index_signature(member)),
                _ => None,
            };
            let Some(mut info) = info else {
                continue;
            };
            info.docs = leading_docs(member, self.src);
            if info.is_callable() {
                methods.push(info);
            } else {
                properties.push(info);
            }
        }

        (properties, methods)
    }

    /// Property written through a setter, typed from its single parameter.
    fn setter_property(&self, member: Node, name: &str) -> PropertyInfo {
        let mut info = PropertyInfo::new(name, MemberShape::Property);
        info.type_text = member
            .child_by_field_name("parameters")
            .and_then(|params| {
                let mut cursor = params.walk();
                let first = params
                    .named_children(&mut cursor)
                    .find(|p| p.kind() != "comment");
                first
            })
            .and_then(|param| param.child_by_field_name("type"))
            .map(|t| annotation_text(t, self.src))
            .unwrap_or_else(|| "any".to_string());
        info.is_static = has_token(member, "static");
        info
    }

    fn field_definition(&self, member: Node) -> Option<PropertyInfo> {
        let name_node = member
            .child_by_field_name("name")
            .or_else(|| member.child_by_field_name("property"))?;
        let mut info = PropertyInfo::new(trim_quotes(self.text(name_node)), MemberShape::Property);
        let value = member.child_by_field_name("value");
        info.type_text = member
            .child_by_field_name("type")
            .map(|t| annotation_text(t, self.src))
            .or_else(|| value.and_then(|v| infer_literal_type(v, self.src)).map(str::to_string))
            .unwrap_or_else(|| "any".to_string());
        info.optional = has_token(member, "?");
        info.readonly = has_token(member, "readonly");
        info.is_static = has_token(member, "static");
        Some(info)
    }

    fn visit_variables(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        let declaration_kind = match node
            .child_by_field_name("kind")
            .map(|k| self.text(k))
            .unwrap_or("var")
        {
            "const" => VariableKind::Const,
            "let" => VariableKind::Let,
            _ => VariableKind::Var,
        };

        let mut names = Vec::new();
        let mut cursor = node.walk();
        for declarator in node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "variable_declarator")
        {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            // Destructuring patterns carry no single name to index.
            if name_node.kind() != "identifier" {
                continue;
            }
            let name = self.text(name_node);
            let value = declarator.child_by_field_name("value");

            let type_annotation = declarator
                .child_by_field_name("type")
                .map(|t| annotation_text(t, self.src))
                .or_else(|| value.and_then(|v| self.inferred_type(v)));
            let literal = value.and_then(|v| literal_value(v, self.src));

            let signature = match &type_annotation {
                Some(ty) => format!("{} {}: {}", declaration_kind, name, ty),
                None => format!("{} {}", declaration_kind, name),
            };
            let detail = DeclarationDetail::Variable {
                declaration_kind,
                type_annotation,
                value: literal,
            };
            names.push(self.emit(scope, name, declarator, docs.clone(), signature, detail));
        }
        names
    }

    /// Type of an initializer when it can be read off syntactically.
    fn inferred_type(&self, value: Node) -> Option<String> {
        match value.kind() {
            "arrow_function" | "function_expression" | "function" => {
                let type_params = value
                    .child_by_field_name("type_parameters")
                    .map(|t| collapse_whitespace(self.text(t)))
                    .unwrap_or_default();
                let params = self.parameters(
                    value
                        .child_by_field_name("parameters")
                        .or_else(|| value.child_by_field_name("parameter")),
                );
                let ret = value
                    .child_by_field_name("return_type")
                    .map(|t| annotation_text(t, self.src))
                    .unwrap_or_else(|| "unknown".to_string());
                Some(format!("{}({}) => {}", type_params, params.join(", "), ret))
            }
            _ => infer_literal_type(value, self.src).map(str::to_string),
        }
    }

    // ========================================================================
    // Namespaces
    // ========================================================================

    fn visit_namespace(&mut self, node: Node, docs: Option<String>, scope: &Scope) -> Vec<String> {
        let Some(name) = field_text(node, "name", self.src).map(trim_quotes) else {
            return Vec::new();
        };
        let body = node.child_by_field_name("body");
        let signature = self.header(node, body);

        let slot = self.out.len();
        let detail = DeclarationDetail::Namespace {
            members: Vec::new(),
        };
        self.emit(scope, name, node, docs, signature, detail);

        let inner = scope.nested(name, false);
        let mut members = Vec::new();
        if inner.depth > MAX_NAMESPACE_DEPTH {
            tracing::debug!(
                file = %self.file,
                namespace = %scope.qualify(name),
                "Namespace nesting too deep, members skipped"
            );
        } else if let Some(body) = body {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                let child_docs = leading_docs(child, self.src);
                if child.kind() == "export_statement" {
                    members.extend(self.visit_export(child, &inner));
                } else if inner.ambient {
                    members.extend(self.visit_declaration(child, child_docs, &inner));
                }
            }
        }

        if let DeclarationDetail::Namespace { members: slot_members } = &mut self.out[slot].detail {
            *slot_members = members;
        }
        vec![name.to_string()]
    }
}
