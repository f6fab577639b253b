//! The `Language` tag threaded through detection, parsing, queries, caching,
//! and adaptation. Kept as one small `Copy` enum at the base of the module
//! graph so every other module (`parser`, `query`, `cache`, `adapter`,
//! `detect`, `strategy`) can depend on it without a cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Rust,
    Go,
    Java,
    CSharp,
    Python,
    Php,
    JavaScript,
    TypeScript,
    Tsx,
    Html,
    Css,
    Markdown,
    PlainText,
    Xml,
}

impl Language {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Python => "python",
            Self::Php => "php",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Html => "html",
            Self::Css => "css",
            Self::Markdown => "markdown",
            Self::PlainText => "plaintext",
            Self::Xml => "xml",
        }
    }

    /// Languages with a registered tree-sitter grammar — i.e. ones that can
    /// actually produce a `Tree` via the Parser Registry (C1). Markdown,
    /// plaintext, and (generically) xml are handled by text-aware chunk
    /// strategies instead of a concrete-syntax tree.
    #[must_use]
    pub fn has_tree_sitter_grammar(&self) -> bool {
        !matches!(self, Self::Markdown | Self::PlainText | Self::Xml)
    }

    /// Languages whose adapters emit entities/relationships (C5). A language
    /// can have a tree-sitter grammar (for AST chunking) without having an
    /// entity adapter — html/css are chunked structurally but have no
    /// registered `LanguageAdapter`.
    #[must_use]
    pub fn has_entity_adapter(&self) -> bool {
        matches!(
            self,
            Self::Rust
                | Self::Go
                | Self::Java
                | Self::CSharp
                | Self::Python
                | Self::Php
                | Self::JavaScript
                | Self::TypeScript
                | Self::Tsx
        )
    }

    /// "Bracket-friendly" languages per the strategy factory table (§4.7):
    /// C-family/TS/JS/Rust/Go, i.e. anything with brace/paren block
    /// structure simple enough for the byte-level bracket strategy to do a
    /// reasonable job without a tree.
    #[must_use]
    pub fn is_bracket_friendly(&self) -> bool {
        matches!(
            self,
            Self::Rust
                | Self::Go
                | Self::Java
                | Self::CSharp
                | Self::JavaScript
                | Self::TypeScript
                | Self::Tsx
                | Self::Css
        )
    }

    /// Extension table lookup (C1 stage (a): "file extension lookup against
    /// a fixed table"). Returns `None` for unknown/ambiguous extensions, in
    /// which case detection falls through to content heuristics.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Some(match ext.to_ascii_lowercase().as_str() {
            "rs" => Self::Rust,
            "go" => Self::Go,
            "java" => Self::Java,
            "cs" => Self::CSharp,
            "py" | "pyi" => Self::Python,
            "php" => Self::Php,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "md" | "markdown" => Self::Markdown,
            "xml" | "csproj" | "fsproj" | "vbproj" | "props" | "targets" | "svg" => Self::Xml,
            "txt" | "rst" | "log" => Self::PlainText,
            _ => return None,
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
