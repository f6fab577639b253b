//! `Entity` — a canonical declaration or definition (§3, §4.5).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::digest::{stable_id, Digest};
use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Function,
    Method,
    Class,
    Interface,
    Struct,
    Enum,
    Union,
    TypeAlias,
    Variable,
    Constant,
    Field,
    Import,
    Export,
    Module,
    Macro,
    Annotation,
    Comment,
    Generic,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::TypeAlias => "type-alias",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Field => "field",
            Self::Import => "import",
            Self::Export => "export",
            Self::Module => "module",
            Self::Macro => "macro",
            Self::Annotation => "annotation",
            Self::Comment => "comment",
            Self::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub start_byte: u32,
    pub end_byte: u32,
    pub start_line: u32,
    pub end_line: u32,
}

/// An open map of derived attributes (return type, parameter list, field
/// list, complexity score, …). `serde_json::Value` keeps it open-ended per
/// §3 while still being structurally typed where we construct it.
pub type Properties = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: u64,
    pub kind: EntityKind,
    pub name: String,
    pub location: Location,
    pub language: Language,
    pub content: String,
    pub priority: i32,
    pub modifiers: Vec<String>,
    pub properties: Properties,
}

impl Entity {
    /// `id = H(path, kind, name, start_byte, content_digest)` (§3, §4.5).
    #[must_use]
    pub fn compute_id(
        path: &str,
        kind: EntityKind,
        name: &str,
        start_byte: u32,
        content_digest: Digest,
    ) -> u64 {
        stable_id(&[
            path.as_bytes(),
            kind.as_str().as_bytes(),
            name.as_bytes(),
            &start_byte.to_be_bytes(),
            &content_digest.0,
        ])
    }

    #[must_use]
    pub fn new(
        path: &str,
        kind: EntityKind,
        name: String,
        location: Location,
        language: Language,
        content: String,
    ) -> Self {
        let content_digest = Digest::of_bytes(content.as_bytes());
        let id = Self::compute_id(path, kind, &name, location.start_byte, content_digest);
        Self {
            id,
            kind,
            name,
            location,
            language,
            content,
            priority: 50,
            modifiers: Vec::new(),
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<String>) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}
