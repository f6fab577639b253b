//! Strategy Registry & Factory (C7) — one capability, `split`, implemented
//! six ways, selected by a fixed decision table (§4.7). Generalizes the
//! pack's `IntelligentChunker::chunk_code` (`marlonsc-mcb`'s
//! `domain/chunking/engine.rs`), which tried tree-sitter first, fell back
//! to a pattern-based per-language extractor, and finally fell back again
//! to `chunk_generic`'s fixed-size line window — the same three-tier shape
//! as this module's fallback chain, generalized from one fixed fallback
//! order to the chosen-strategy's own declared chain.

pub mod ast;
pub mod bracket;
pub mod line;
pub mod markdown;
pub mod universal;
pub mod xml;

use tree_sitter::Tree;

use crate::config::ChunkingConfig;
use crate::detect::{Detection, SizeBand};
use crate::model::chunk::{Chunk, ChunkStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Ast,
    Bracket,
    Line,
    Markdown,
    Xml,
    Universal,
}

impl StrategyKind {
    #[must_use]
    pub fn as_chunk_strategy(&self) -> ChunkStrategy {
        match self {
            Self::Ast => ChunkStrategy::Ast,
            Self::Bracket => ChunkStrategy::Bracket,
            Self::Line => ChunkStrategy::Line,
            Self::Markdown => ChunkStrategy::Markdown,
            Self::Xml => ChunkStrategy::Xml,
            Self::Universal => ChunkStrategy::Universal,
        }
    }

    fn split(
        &self,
        path: &str,
        source: &[u8],
        detection: &Detection,
        tree: Option<&Tree>,
        config: &ChunkingConfig,
    ) -> Vec<Chunk> {
        match self {
            Self::Ast => tree
                .map(|t| ast::split(path, source, t, detection.language, config))
                .unwrap_or_default(),
            Self::Bracket => bracket::split(path, source, detection.language, config),
            Self::Line => line::split(path, source, detection.language, config),
            Self::Markdown => markdown::split(path, source, detection.language, config),
            Self::Xml => xml::split(path, source, detection.language, config),
            Self::Universal => universal::split(path, source, detection.language, config),
        }
    }
}

/// §4.7's decision table, applied top-to-bottom, first match wins (§11
/// decision 1: not reinterpreted). `degraded` is the Guard's
/// `should_use_fallback()` (§4.8/§4.9 step 1), which forces line strategy
/// ahead of every other rule.
#[must_use]
pub fn choose(detection: &Detection, tree_available: bool, degraded: bool) -> Option<StrategyKind> {
    use crate::language::Language;

    if degraded {
        return Some(StrategyKind::Line);
    }
    if detection.is_binary {
        return None;
    }
    if detection.language == Language::Markdown {
        return Some(StrategyKind::Markdown);
    }
    if matches!(detection.language, Language::Xml | Language::Html) {
        return Some(StrategyKind::Xml);
    }
    if detection.is_text && !detection.is_code {
        return Some(StrategyKind::Universal);
    }
    if detection.size_band == SizeBand::Tiny {
        return Some(if tree_available { StrategyKind::Ast } else { StrategyKind::Line });
    }
    if detection.is_code && tree_available {
        return Some(StrategyKind::Ast);
    }
    if detection.is_code && detection.language.is_bracket_friendly() {
        return Some(StrategyKind::Bracket);
    }
    Some(StrategyKind::Line)
}

/// `[chosen, bracket, line]` deduplicated (§4.7).
#[must_use]
pub fn fallback_chain(chosen: StrategyKind) -> Vec<StrategyKind> {
    let mut chain = vec![chosen, StrategyKind::Bracket, StrategyKind::Line];
    let mut seen = Vec::new();
    chain.retain(|k| {
        if seen.contains(k) {
            false
        } else {
            seen.push(*k);
            true
        }
    });
    chain
}

/// Runs the fallback chain for `chosen`: invokes each strategy in turn,
/// continuing past an empty result, stopping at the first non-empty one
/// (§4.7, §4.9 step 5). Returns an empty vec only if every strategy in the
/// chain produced nothing (e.g. a genuinely empty file).
#[must_use]
pub fn split_with_fallback(
    chosen: StrategyKind,
    path: &str,
    source: &[u8],
    detection: &Detection,
    tree: Option<&Tree>,
    config: &ChunkingConfig,
) -> (Vec<Chunk>, StrategyKind) {
    for kind in fallback_chain(chosen) {
        let chunks = kind.split(path, source, detection, tree, config);
        if !chunks.is_empty() {
            return (chunks, kind);
        }
    }
    (Vec::new(), chosen)
}
