//! Chunk Post-Processor (C10) — five fixed steps applied in order after a
//! strategy produces raw chunks (§4.10): validate balance, filter empty,
//! rebalance sizes, deduplicate, overlap. No single teacher file implements
//! this pipeline; it composes primitives already used elsewhere in this
//! crate (`Chunk::byte_range`, `Digest::of_bytes`) into the five-step
//! sequence the design specifies.

use std::collections::HashSet;

use crate::config::ChunkingConfig;
use crate::model::chunk::{Chunk, ChunkStrategy};

/// Runs all five steps. `source` is the full file's bytes, needed by step 1
/// to look ahead past a chunk's boundary when expanding for balance.
#[must_use]
pub fn process(chunks: Vec<Chunk>, source: &[u8], config: &ChunkingConfig) -> Vec<Chunk> {
    let chunks = validate_balance(chunks, source);
    let chunks = filter_empty(chunks);
    let chunks = rebalance_sizes(chunks, config);
    let chunks = deduplicate(chunks);
    apply_overlap(chunks, config)
}

/// Step 1: a chunk with unbalanced brackets/quotes is discarded if another
/// chunk already covers its range, otherwise expanded by lookahead until
/// balanced or the file boundary.
fn validate_balance(mut chunks: Vec<Chunk>, source: &[u8]) -> Vec<Chunk> {
    for i in 0..chunks.len() {
        if is_balanced(&chunks[i].content) {
            continue;
        }
        let covered = chunks.iter().enumerate().any(|(j, other)| {
            j != i
                && other.start_byte <= chunks[i].start_byte
                && chunks[i].end_byte <= other.end_byte
        });
        if covered {
            continue;
        }
        let mut end = chunks[i].end_byte as usize;
        while end < source.len() {
            end += 1;
            if let Ok(text) = std::str::from_utf8(&source[chunks[i].start_byte as usize..end]) {
                if is_balanced(text) {
                    chunks[i].content = text.to_string();
                    chunks[i].end_byte = end as u32;
                    break;
                }
            }
        }
    }
    chunks
}

fn is_balanced(content: &str) -> bool {
    let mut stack = Vec::new();
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    for c in content.chars() {
        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => in_string = Some(c),
            '(' | '[' | '{' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty() && in_string.is_none()
}

/// Step 2: drops chunks whose stripped content is empty, or consists only
/// of a single closing brace/paren/bracket — the `}`-as-chunk pathology
/// (§8 scenario 4).
fn filter_empty(chunks: Vec<Chunk>) -> Vec<Chunk> {
    chunks
        .into_iter()
        .filter(|c| {
            let trimmed = c.content.trim();
            !trimmed.is_empty() && !matches!(trimmed, "}" | ")" | "]")
        })
        .collect()
}

/// Step 3: splits chunks over `max_chunk_bytes` at the best internal
/// boundary (blank line, then statement boundary `;`/`\n`, then raw line
/// boundary); merges adjacent chunks under `min_chunk_bytes` when the merge
/// stays under the ceiling and both share the same kind.
fn rebalance_sizes(chunks: Vec<Chunk>, config: &ChunkingConfig) -> Vec<Chunk> {
    let mut split_chunks = Vec::new();
    for chunk in chunks {
        if chunk.byte_len() > config.max_chunk_bytes {
            split_chunks.extend(split_oversize(chunk, config.max_chunk_bytes));
        } else {
            split_chunks.push(chunk);
        }
    }

    let mut merged: Vec<Chunk> = Vec::new();
    for chunk in split_chunks {
        if let Some(prev) = merged.last() {
            let both_small = prev.byte_len() < config.min_chunk_bytes && chunk.byte_len() < config.min_chunk_bytes;
            let stays_under_ceiling = prev.byte_len() + chunk.byte_len() <= config.max_chunk_bytes;
            let same_kind = prev.kind == chunk.kind;
            let adjacent = prev.end_byte == chunk.start_byte;
            if both_small && stays_under_ceiling && same_kind && adjacent {
                let mut merged_chunk = merged.pop().unwrap();
                merged_chunk.content.push_str(&chunk.content);
                merged_chunk.end_byte = chunk.end_byte;
                merged_chunk.end_line = chunk.end_line;
                merged.push(merged_chunk);
                continue;
            }
        }
        merged.push(chunk);
    }
    merged
}

fn split_oversize(chunk: Chunk, max_bytes: usize) -> Vec<Chunk> {
    // AST chunks that wrap a single indivisible declaration have already
    // been summarized by the strategy (§4.7); re-splitting one further
    // would produce a meaningless partial declaration, so they pass through
    // unchanged instead.
    if chunk.strategy.is_ast() {
        return vec![chunk];
    }

    let boundary = best_boundary(&chunk.content, max_bytes);
    if boundary == 0 || boundary >= chunk.content.len() {
        return vec![chunk];
    }

    let (first, rest) = chunk.content.split_at(boundary);
    let mid_byte = chunk.start_byte + boundary as u32;
    let mid_line = chunk.start_line + first.matches('\n').count() as u32;

    let mut left = Chunk::new(
        first.to_string(),
        chunk.path.clone(),
        chunk.language,
        chunk.start_line,
        mid_line,
        chunk.start_byte,
        mid_byte,
        chunk.kind,
        chunk.strategy,
    );
    left.metadata = chunk.metadata.clone();

    let mut right = Chunk::new(
        rest.to_string(),
        chunk.path.clone(),
        chunk.language,
        mid_line,
        chunk.end_line,
        mid_byte,
        chunk.end_byte,
        chunk.kind,
        chunk.strategy,
    );
    right.metadata = chunk.metadata;

    let mut out = Vec::new();
    out.push(left);
    if right.byte_len() > max_bytes {
        out.extend(split_oversize(right, max_bytes));
    } else {
        out.push(right);
    }
    out
}

/// Prefers a blank line nearest the ceiling, then a statement boundary
/// (`;` or `\n`), then a raw line boundary — in that order (§4.10 step 3).
fn best_boundary(content: &str, max_bytes: usize) -> usize {
    let window = &content[..content.len().min(max_bytes)];
    if let Some(pos) = window.rfind("\n\n") {
        return pos + 2;
    }
    if let Some(pos) = window.rfind(";\n") {
        return pos + 2;
    }
    if let Some(pos) = window.rfind('\n') {
        return pos + 1;
    }
    max_bytes.min(content.len())
}

/// Step 4: drops any chunk whose content hash equals an earlier chunk's,
/// and any chunk whose byte range is a strict subset of an earlier chunk's
/// range.
fn deduplicate(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut seen_digests = HashSet::new();
    let mut kept: Vec<Chunk> = Vec::new();
    for chunk in chunks {
        let digest = chunk.content_digest();
        if !seen_digests.insert(digest) {
            continue;
        }
        let is_subset = kept.iter().any(|other| {
            other.start_byte <= chunk.start_byte
                && chunk.end_byte <= other.end_byte
                && !(other.start_byte == chunk.start_byte && other.end_byte == chunk.end_byte)
        });
        if is_subset {
            continue;
        }
        kept.push(chunk);
    }
    kept
}

/// Step 5: only for chunks produced by a size-based split (tagged via
/// `ChunkStrategy`'s non-AST strategies here, since a split always
/// shares its parent's strategy) whose size exceeds `overlap_trigger_bytes`
/// — prepend up to `overlap_bytes` (never > 30% of the chunk) of the
/// previous chunk's tail, and mark the overlap flag. AST chunks never
/// receive overlap (§11 decision 3: restricted to split chunks by
/// `overlap_split_only`).
fn apply_overlap(mut chunks: Vec<Chunk>, config: &ChunkingConfig) -> Vec<Chunk> {
    if !config.overlap_split_only {
        return chunks;
    }
    for i in 1..chunks.len() {
        let eligible = !chunks[i].strategy.is_ast()
            && chunks[i].byte_len() > config.overlap_trigger_bytes
            && chunks[i - 1].end_byte == chunks[i].start_byte;
        if !eligible {
            continue;
        }
        let prev_content = chunks[i - 1].content.clone();
        let cap = config.overlap_bytes.min((chunks[i].byte_len() * 3) / 10);
        if cap == 0 {
            continue;
        }
        let overlap_start = prev_content.len().saturating_sub(cap);
        let overlap_text = &prev_content[overlap_start..];
        chunks[i].content = format!("{overlap_text}{}", chunks[i].content);
        chunks[i].mark_overlap();
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::model::chunk::ChunkKind;

    fn chunk(content: &str, start: u32, end: u32, kind: ChunkKind, strategy: ChunkStrategy) -> Chunk {
        Chunk::new(content.to_string(), "f.rs", Language::Rust, 1, 1, start, end, kind, strategy)
    }

    #[test]
    fn drops_lone_closing_brace_chunk() {
        let chunks = vec![
            chunk("fn a() {\n1\n}", 0, 12, ChunkKind::Function, ChunkStrategy::Ast),
            chunk("}", 12, 13, ChunkKind::Generic, ChunkStrategy::Ast),
        ];
        let result = filter_empty(chunks);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn dedup_drops_identical_content() {
        let chunks = vec![
            chunk("fn a() {}", 0, 9, ChunkKind::Function, ChunkStrategy::Ast),
            chunk("fn a() {}", 20, 29, ChunkKind::Function, ChunkStrategy::Ast),
        ];
        assert_eq!(deduplicate(chunks).len(), 1);
    }

    #[test]
    fn dedup_drops_strict_subset_range() {
        let chunks = vec![
            chunk("fn a() { 1 }", 0, 12, ChunkKind::Function, ChunkStrategy::Ast),
            chunk("1", 9, 10, ChunkKind::Generic, ChunkStrategy::Ast),
        ];
        assert_eq!(deduplicate(chunks).len(), 1);
    }

    #[test]
    fn ast_chunks_never_receive_overlap() {
        let big_content = "x".repeat(2000);
        let chunks = vec![
            chunk("a".repeat(50).as_str(), 0, 50, ChunkKind::Generic, ChunkStrategy::Ast),
            chunk(&big_content, 50, 2050, ChunkKind::Function, ChunkStrategy::Ast),
        ];
        let config = ChunkingConfig::default();
        let result = apply_overlap(chunks, &config);
        assert!(!result[1].has_overlap());
    }

    #[test]
    fn split_chunks_above_trigger_receive_overlap() {
        let big_content = "x".repeat(2000);
        let chunks = vec![
            chunk("a".repeat(50).as_str(), 0, 50, ChunkKind::Generic, ChunkStrategy::Bracket),
            chunk(&big_content, 50, 2050, ChunkKind::Generic, ChunkStrategy::Bracket),
        ];
        let config = ChunkingConfig::default();
        let result = apply_overlap(chunks, &config);
        assert!(result[1].has_overlap());
        assert!(result[1].content.len() > big_content.len());
    }

    #[test]
    fn rebalance_splits_oversize_chunks() {
        let content = format!("{}\n\n{}", "a".repeat(1000), "b".repeat(1500));
        let chunks = vec![chunk(&content, 0, content.len() as u32, ChunkKind::Generic, ChunkStrategy::Bracket)];
        let config = ChunkingConfig::default();
        let result = rebalance_sizes(chunks, &config);
        assert!(result.len() >= 2);
        for c in &result {
            assert!(c.byte_len() <= config.max_chunk_bytes + 16);
        }
    }

    #[test]
    fn balance_validation_expands_unbalanced_chunk() {
        let source = b"fn a() {\n  1;\n}";
        let chunks = vec![chunk("fn a() {\n  1;", 0, 13, ChunkKind::Function, ChunkStrategy::Bracket)];
        let result = validate_balance(chunks, source);
        assert!(is_balanced(&result[0].content));
    }
}
