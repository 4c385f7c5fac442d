use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Enum,
    Function,
    Class,
    Variable,
    Namespace,
    ReExport,
}

impl DeclarationKind {
    /// Every kind, in reporting order.
    pub const ALL: [DeclarationKind; 8] = [
        DeclarationKind::Interface,
        DeclarationKind::TypeAlias,
        DeclarationKind::Enum,
        DeclarationKind::Function,
        DeclarationKind::Class,
        DeclarationKind::Variable,
        DeclarationKind::Namespace,
        DeclarationKind::ReExport,
    ];
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclarationKind::Interface => write!(f, "interface"),
            DeclarationKind::TypeAlias => write!(f, "type_alias"),
            DeclarationKind::Enum => write!(f, "enum"),
            DeclarationKind::Function => write!(f, "function"),
            DeclarationKind::Class => write!(f, "class"),
            DeclarationKind::Variable => write!(f, "variable"),
            DeclarationKind::Namespace => write!(f, "namespace"),
            DeclarationKind::ReExport => write!(f, "re_export"),
        }
    }
}

impl std::str::FromStr for DeclarationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interface" => Ok(DeclarationKind::Interface),
            "type" | "type_alias" | "type-alias" | "typealias" => Ok(DeclarationKind::TypeAlias),
            "enum" => Ok(DeclarationKind::Enum),
            "function" | "fn" => Ok(DeclarationKind::Function),
            "class" => Ok(DeclarationKind::Class),
            "variable" | "const" | "constant" => Ok(DeclarationKind::Variable),
            "namespace" => Ok(DeclarationKind::Namespace),
            "re_export" | "re-export" | "reexport" => Ok(DeclarationKind::ReExport),
            other => Err(format!(
                "Unknown declaration kind: {}. Expected one of: interface, type_alias, enum, function, class, variable, namespace, re_export",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberShape {
    #[default]
    Property,
    Method,
    CallSignature,
    ConstructSignature,
    IndexSignature,
}

/// One member of an interface, class or object-like type alias.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    pub shape: MemberShape,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, shape: MemberShape) -> Self {
        Self {
            name: name.into(),
            shape,
            ..Self::default()
        }
    }

    pub fn is_method(&self) -> bool {
        self.shape == MemberShape::Method
    }

    pub fn is_call_signature(&self) -> bool {
        matches!(
            self.shape,
            MemberShape::CallSignature | MemberShape::ConstructSignature
        )
    }

    pub fn is_index_signature(&self) -> bool {
        self.shape == MemberShape::IndexSignature
    }

    /// Whether this member belongs in a `methods` list rather than `properties`.
    pub fn is_callable(&self) -> bool {
        self.is_method() || self.is_call_signature()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Const,
    Let,
    Var,
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableKind::Const => write!(f, "const"),
            VariableKind::Let => write!(f, "let"),
            VariableKind::Var => write!(f, "var"),
        }
    }
}

/// Kind-specific payload of a [`Declaration`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclarationDetail {
    Interface {
        type_parameters: Vec<TypeParameter>,
        extends: Vec<String>,
        properties: Vec<PropertyInfo>,
        methods: Vec<PropertyInfo>,
    },
    TypeAlias {
        type_parameters: Vec<TypeParameter>,
        properties: Vec<PropertyInfo>,
        methods: Vec<PropertyInfo>,
    },
    Enum {
        members: Vec<String>,
        is_const: bool,
    },
    Function {
        type_parameters: Vec<TypeParameter>,
        parameters: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        return_type: Option<String>,
    },
    Class {
        type_parameters: Vec<TypeParameter>,
        extends: Vec<String>,
        implements: Vec<String>,
        properties: Vec<PropertyInfo>,
        methods: Vec<PropertyInfo>,
        is_abstract: bool,
    },
    Variable {
        declaration_kind: VariableKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Namespace {
        members: Vec<String>,
    },
    ReExport {
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        original_name: Option<String>,
        type_only: bool,
    },
}

impl DeclarationDetail {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            DeclarationDetail::Interface { .. } => DeclarationKind::Interface,
            DeclarationDetail::TypeAlias { .. } => DeclarationKind::TypeAlias,
            DeclarationDetail::Enum { .. } => DeclarationKind::Enum,
            DeclarationDetail::Function { .. } => DeclarationKind::Function,
            DeclarationDetail::Class { .. } => DeclarationKind::Class,
            DeclarationDetail::Variable { .. } => DeclarationKind::Variable,
            DeclarationDetail::Namespace { .. } => DeclarationKind::Namespace,
            DeclarationDetail::ReExport { .. } => DeclarationKind::ReExport,
        }
    }
}

/// One exported, top-level named construct extracted from a source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub module: String,
    pub file: String,
    pub line: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,

    pub signature: String,

    #[serde(flatten)]
    pub detail: DeclarationDetail,
}

impl Declaration {
    pub fn new(
        name: String,
        module: String,
        file: String,
        line: u32,
        detail: DeclarationDetail,
    ) -> Self {
        Self {
            name,
            module,
            file,
            line,
            docs: None,
            signature: String::new(),
            detail,
        }
    }

    pub fn with_signature(mut self, signature: String) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_docs(mut self, docs: Option<String>) -> Self {
        self.docs = docs;
        self
    }

    pub fn kind(&self) -> DeclarationKind {
        self.detail.kind()
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        match &self.detail {
            DeclarationDetail::Interface {
                type_parameters, ..
            }
            | DeclarationDetail::TypeAlias {
                type_parameters, ..
            }
            | DeclarationDetail::Function {
                type_parameters, ..
            }
            | DeclarationDetail::Class {
                type_parameters, ..
            } => type_parameters,
            _ => &[],
        }
    }

    pub fn extends(&self) -> &[String] {
        match &self.detail {
            DeclarationDetail::Interface { extends, .. }
            | DeclarationDetail::Class { extends, .. } => extends,
            _ => &[],
        }
    }

    pub fn implements(&self) -> &[String] {
        match &self.detail {
            DeclarationDetail::Class { implements, .. } => implements,
            _ => &[],
        }
    }

    pub fn properties(&self) -> &[PropertyInfo] {
        match &self.detail {
            DeclarationDetail::Interface { properties, .. }
            | DeclarationDetail::TypeAlias { properties, .. }
            | DeclarationDetail::Class { properties, .. } => properties,
            _ => &[],
        }
    }

    pub fn methods(&self) -> &[PropertyInfo] {
        match &self.detail {
            DeclarationDetail::Interface { methods, .. }
            | DeclarationDetail::TypeAlias { methods, .. }
            | DeclarationDetail::Class { methods, .. } => methods,
            _ => &[],
        }
    }

    pub fn members(&self) -> &[String] {
        match &self.detail {
            DeclarationDetail::Enum { members, .. }
            | DeclarationDetail::Namespace { members } => members,
            _ => &[],
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.detail {
            DeclarationDetail::Variable { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    pub fn parameters(&self) -> &[String] {
        match &self.detail {
            DeclarationDetail::Function { parameters, .. } => parameters,
            _ => &[],
        }
    }

    /// Origin module of a re-export, if it names one.
    pub fn reexport_source(&self) -> Option<&str> {
        match &self.detail {
            DeclarationDetail::ReExport { from, .. } => from.as_deref(),
            _ => None,
        }
    }

    /// `extends` followed by `implements`, in declaration order.
    pub fn parents(&self) -> impl Iterator<Item = &String> {
        self.extends().iter().chain(self.implements().iter())
    }

    pub fn member_count(&self) -> usize {
        self.properties().len() + self.methods().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface(name: &str, extends: &[&str]) -> Declaration {
        Declaration::new(
            name.to_string(),
            "core".to_string(),
            "core/index.ts".to_string(),
            1,
            DeclarationDetail::Interface {
                type_parameters: vec![],
                extends: extends.iter().map(|s| s.to_string()).collect(),
                properties: vec![PropertyInfo::new("id", MemberShape::Property)],
                methods: vec![],
            },
        )
    }

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in DeclarationKind::ALL {
            let parsed: DeclarationKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert_eq!(
            "type-alias".parse::<DeclarationKind>().unwrap(),
            DeclarationKind::TypeAlias
        );
        assert!("struct".parse::<DeclarationKind>().is_err());
    }

    #[test]
    fn test_accessors_are_empty_for_unrelated_kinds() {
        let decl = Declaration::new(
            "Color".to_string(),
            "theme".to_string(),
            "theme/color.ts".to_string(),
            3,
            DeclarationDetail::Enum {
                members: vec!["Red".to_string(), "Blue".to_string()],
                is_const: false,
            },
        );
        assert_eq!(decl.kind(), DeclarationKind::Enum);
        assert!(decl.extends().is_empty());
        assert!(decl.properties().is_empty());
        assert_eq!(decl.members(), ["Red", "Blue"]);
        assert!(decl.value().is_none());
    }

    #[test]
    fn test_serializes_with_flat_kind_tag() {
        let decl = interface("Foo", &["Bar"]).with_signature("interface Foo extends Bar".into());
        let json = serde_json::to_value(&decl).unwrap();
        assert_eq!(json["kind"], "interface");
        assert_eq!(json["extends"][0], "Bar");
        assert_eq!(json["properties"][0]["type"], "");
        assert!(json.get("docs").is_none());
    }

    #[test]
    fn test_parents_chain_extends_then_implements() {
        let decl = Declaration::new(
            "Widget".to_string(),
            "ui".to_string(),
            "ui/widget.ts".to_string(),
            10,
            DeclarationDetail::Class {
                type_parameters: vec![],
                extends: vec!["Base".to_string()],
                implements: vec!["Drawable".to_string(), "Sized".to_string()],
                properties: vec![],
                methods: vec![],
                is_abstract: false,
            },
        );
        let parents: Vec<&String> = decl.parents().collect();
        assert_eq!(parents, ["Base", "Drawable", "Sized"]);
    }
}
