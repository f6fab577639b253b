//! `Chunk` — a contiguous byte range of source with a chosen strategy label
//! (§3, §4.10). Generalizes the teacher's `models::chunk::Chunk`, which
//! already carried most of these fields (`start_line`/`end_line`, byte
//! range, `kind`, `content`) for a database-backed single-strategy design;
//! here `kind` gains the strategy's own vocabulary (section, generic, …),
//! and a free-form `metadata` map replaces the teacher's fixed optional
//! columns (`parent`, `signature`, `visibility`, …) so any strategy can
//! attach what it knows without widening this struct per language.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::digest::Digest;
use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Function,
    Class,
    Struct,
    Section,
    Generic,
}

impl ChunkKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Section => "section",
            Self::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    Ast,
    Bracket,
    Line,
    Markdown,
    Xml,
    Universal,
    Fallback,
}

impl ChunkStrategy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ast => "ast",
            Self::Bracket => "bracket",
            Self::Line => "line",
            Self::Markdown => "markdown",
            Self::Xml => "xml",
            Self::Universal => "universal",
            Self::Fallback => "fallback",
        }
    }

    /// AST chunks never receive overlap (§4.10 step 5) and are never split
    /// by the rebalancer when they wrap a single indivisible declaration
    /// (§4.10 step 3, §8 scenario 6).
    #[must_use]
    pub fn is_ast(&self) -> bool {
        matches!(self, Self::Ast)
    }
}

pub type ChunkMetadata = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    pub content: String,
    pub path: String,
    pub language: Language,
    pub start_line: u32,
    pub end_line: u32,
    pub start_byte: u32,
    pub end_byte: u32,
    pub kind: ChunkKind,
    pub strategy: ChunkStrategy,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    #[must_use]
    pub fn new(
        content: String,
        path: impl Into<String>,
        language: Language,
        start_line: u32,
        end_line: u32,
        start_byte: u32,
        end_byte: u32,
        kind: ChunkKind,
        strategy: ChunkStrategy,
    ) -> Self {
        Self {
            content,
            path: path.into(),
            language,
            start_line,
            end_line,
            start_byte,
            end_byte,
            kind,
            strategy,
            metadata: ChunkMetadata::new(),
        }
    }

    #[must_use]
    pub fn content_digest(&self) -> Digest {
        Digest::of_bytes(self.content.as_bytes())
    }

    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn has_overlap(&self) -> bool {
        self.metadata
            .get("overlap")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    pub fn mark_overlap(&mut self) {
        self.metadata
            .insert("overlap".to_string(), serde_json::Value::Bool(true));
    }

    #[must_use]
    pub fn is_oversize(&self) -> bool {
        self.metadata
            .get("oversize")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    pub fn mark_oversize(&mut self) {
        self.metadata
            .insert("oversize".to_string(), serde_json::Value::Bool(true));
    }

    /// Byte range as `[start, end)`, used throughout post-processing for
    /// overlap/disjointness/subset checks (§8).
    #[must_use]
    pub fn byte_range(&self) -> std::ops::Range<u32> {
        self.start_byte..self.end_byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Chunk {
        Chunk::new(
            "fn add() {}".into(),
            "f.rs",
            Language::Rust,
            1,
            1,
            0,
            11,
            ChunkKind::Function,
            ChunkStrategy::Ast,
        )
    }

    #[test]
    fn overlap_flag_round_trips() {
        let mut c = sample();
        assert!(!c.has_overlap());
        c.mark_overlap();
        assert!(c.has_overlap());
    }

    #[test]
    fn oversize_flag_round_trips() {
        let mut c = sample();
        assert!(!c.is_oversize());
        c.mark_oversize();
        assert!(c.is_oversize());
    }

    #[test]
    fn content_digest_is_pure_function_of_bytes() {
        let a = sample();
        let mut b = sample();
        b.start_line = 99; // unrelated field changes
        assert_eq!(a.content_digest(), b.content_digest());
    }

    #[test]
    fn ast_strategy_never_receives_overlap_by_construction() {
        assert!(ChunkStrategy::Ast.is_ast());
        assert!(!ChunkStrategy::Bracket.is_ast());
    }
}
