//! AST strategy — uses the already-parsed tree (C1/C4). Top-level
//! declarations become chunk candidates; when a top-level declaration is
//! itself oversize, its nested declarations (inner functions, methods inside
//! impls/classes) are extracted whole when they fit under the size ceiling,
//! or summarized to a signature-plus-placeholder when they don't. A
//! top-level declaration with no nested declarations of its own (e.g. a
//! single oversize C function) has nothing to decompose into and is kept
//! whole, flagged oversize (§4.7, §8 scenario 6). Gaps between declarations
//! (comments, top-level statements) attach to the enclosing declaration's
//! chunk. Walks `tree.root_node()`'s direct named children rather than a
//! per-language declaration-kind list, generalizing the teacher's
//! per-language `extract_chunks_from_tree` (`ingest/code/base.rs`) — which
//! is driven by a query per language — into one language-agnostic walk
//! usable before a `LanguageAdapter` even exists for a given grammar.

use tree_sitter::{Node, Tree};

use crate::config::ChunkingConfig;
use crate::language::Language;
use crate::model::chunk::{Chunk, ChunkKind, ChunkStrategy};

#[must_use]
pub fn split(path: &str, source: &[u8], tree: &Tree, language: Language, config: &ChunkingConfig) -> Vec<Chunk> {
    let root = tree.root_node();
    let mut chunks = Vec::new();
    let mut cursor = root.walk();
    let children: Vec<_> = root.children(&mut cursor).collect();

    if children.is_empty() {
        return chunks;
    }

    let mut gap_start = 0u32;
    for (i, node) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let end_byte = if is_last {
            source.len() as u32
        } else {
            children[i + 1].start_byte() as u32
        };
        let start_byte = gap_start;
        gap_start = end_byte;

        if end_byte <= start_byte || start_byte as usize >= source.len() {
            continue;
        }
        let Ok(content) = std::str::from_utf8(&source[start_byte as usize..end_byte as usize]) else {
            continue;
        };
        if content.trim().is_empty() {
            continue;
        }

        let kind = classify(node.kind());

        if content.len() <= config.max_chunk_bytes {
            chunks.push(make_chunk(path, language, source, start_byte, end_byte, kind, false));
            continue;
        }

        let mut nested = Vec::new();
        collect_nested(*node, &mut nested);

        if nested.is_empty() {
            // No nested declaration to decompose into: keep the whole span,
            // content unchanged, flagged oversize rather than truncated, so
            // `content == source[start_byte..end_byte]` still holds.
            let mut chunk = make_chunk(path, language, source, start_byte, end_byte, kind, false);
            chunk.mark_oversize();
            chunks.push(chunk);
            continue;
        }

        let core_start = node.start_byte() as u32;
        if start_byte < core_start {
            let Ok(gap_text) = std::str::from_utf8(&source[start_byte as usize..core_start as usize]) else {
                continue;
            };
            if !gap_text.trim().is_empty() {
                chunks.push(make_chunk(path, language, source, start_byte, core_start, ChunkKind::Generic, false));
            }
        }

        for nested_node in nested {
            let n_start = nested_node.start_byte() as u32;
            let n_end = nested_node.end_byte() as u32;
            let n_kind = classify(nested_node.kind());
            let mut chunk = make_chunk(path, language, source, n_start, n_end, n_kind, true);
            if chunk.byte_len() > config.max_chunk_bytes {
                summarize(&mut chunk, config.max_chunk_bytes);
            }
            chunks.push(chunk);
        }
    }

    chunks
}

fn make_chunk(path: &str, language: Language, source: &[u8], start_byte: u32, end_byte: u32, kind: ChunkKind, nested: bool) -> Chunk {
    let content = std::str::from_utf8(&source[start_byte as usize..end_byte as usize])
        .unwrap_or_default()
        .to_string();
    let start_line = 1 + source[..start_byte as usize].iter().filter(|&&b| b == b'\n').count() as u32;
    let end_idx = (end_byte as usize).min(source.len());
    let end_line = 1 + source[..end_idx].iter().filter(|&&b| b == b'\n').count() as u32;

    let mut chunk = Chunk::new(content, path, language, start_line, end_line, start_byte, end_byte, kind, ChunkStrategy::Ast);
    if nested {
        chunk.metadata.insert("nested".to_string(), serde_json::Value::Bool(true));
    }
    chunk
}

fn classify(node_kind: &str) -> ChunkKind {
    if node_kind.contains("function") || node_kind.contains("method") {
        ChunkKind::Function
    } else if node_kind.contains("class") {
        ChunkKind::Class
    } else if node_kind.contains("struct") || node_kind.contains("impl") || node_kind.contains("interface") {
        ChunkKind::Struct
    } else {
        ChunkKind::Generic
    }
}

/// Collects the first declaration-shaped node found along each path below
/// `node` (not `node` itself), stopping that path's recursion once found —
/// this reaches methods inside a class/impl body without also picking up
/// anything nested further inside those methods (closures, local fns).
fn collect_nested<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_declaration_kind(child.kind()) {
            out.push(child);
        } else {
            collect_nested(child, out);
        }
    }
}

fn is_declaration_kind(node_kind: &str) -> bool {
    node_kind.contains("function")
        || node_kind.contains("method")
        || node_kind.contains("class")
        || node_kind.contains("struct")
        || node_kind.contains("impl")
        || node_kind.contains("interface")
}

/// Reduces a nested declaration to its first line (usually the signature)
/// plus a placeholder rather than dropping it, and shrinks `end_byte` to
/// match the truncated content so `content == source[start_byte..end_byte]`
/// keeps holding (§4.7: "summarized (signature + body placeholder)").
fn summarize(chunk: &mut Chunk, max_bytes: usize) {
    let first_line = chunk.content.lines().next().unwrap_or("").to_string();
    let placeholder = format!("{first_line}\n    /* ... truncated ... */\n}}");
    chunk.content = if placeholder.len() <= max_bytes { placeholder } else { first_line };
    chunk.end_byte = chunk.start_byte + chunk.content.len() as u32;
    chunk
        .metadata
        .insert("summarized".to_string(), serde_json::Value::Bool(true));
    chunk.mark_oversize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn top_level_functions_become_chunks() {
        let registry = ParserRegistry::new();
        let config = ChunkingConfig::default();
        let source = b"fn a() {}\nfn b() {}\n";
        let tree = registry.parse(source, Language::Rust).unwrap();
        let chunks = split("f.rs", source, &tree, Language::Rust, &config);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.kind == ChunkKind::Function));
    }

    #[test]
    fn oversize_leaf_declaration_keeps_full_content_flagged_oversize() {
        let registry = ParserRegistry::new();
        let config = ChunkingConfig {
            max_chunk_bytes: 20,
            ..ChunkingConfig::default()
        };
        let body = "x".repeat(100);
        let source = format!("fn big() {{ {body} }}");
        let tree = registry.parse(source.as_bytes(), Language::Rust).unwrap();
        let chunks = split("f.rs", source.as_bytes(), &tree, Language::Rust, &config);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_oversize());
        assert_eq!(chunks[0].content, source);
        assert_eq!(chunks[0].end_byte - chunks[0].start_byte, chunks[0].content.len() as u32);
    }

    #[test]
    fn oversize_impl_block_decomposes_into_per_method_chunks() {
        let registry = ParserRegistry::new();
        let config = ChunkingConfig {
            max_chunk_bytes: 40,
            ..ChunkingConfig::default()
        };
        let source = "impl Point {\n    fn x(&self) -> i32 { self.x }\n    fn y(&self) -> i32 { self.y }\n}\n";
        let tree = registry.parse(source.as_bytes(), Language::Rust).unwrap();
        let chunks = split("f.rs", source.as_bytes(), &tree, Language::Rust, &config);
        assert!(chunks.iter().any(|c| c.kind == ChunkKind::Function));
        for c in &chunks {
            assert_eq!(c.end_byte - c.start_byte, c.content.len() as u32);
        }
    }

    #[test]
    fn oversize_nested_method_is_summarized_with_matching_byte_range() {
        let registry = ParserRegistry::new();
        let config = ChunkingConfig {
            max_chunk_bytes: 20,
            ..ChunkingConfig::default()
        };
        let body = "x".repeat(200);
        let source = format!("impl Big {{\n    fn huge(&self) {{ {body} }}\n    fn small(&self) {{}}\n}}\n");
        let tree = registry.parse(source.as_bytes(), Language::Rust).unwrap();
        let chunks = split("f.rs", source.as_bytes(), &tree, Language::Rust, &config);
        let summarized = chunks
            .iter()
            .find(|c| c.metadata.get("summarized").and_then(serde_json::Value::as_bool) == Some(true))
            .expect("one nested chunk should be summarized");
        assert!(summarized.is_oversize());
        assert_eq!(summarized.content.len() as u32, summarized.end_byte - summarized.start_byte);
    }

    #[test]
    fn empty_file_produces_no_chunks() {
        let registry = ParserRegistry::new();
        let config = ChunkingConfig::default();
        let tree = registry.parse(b"", Language::Rust).unwrap();
        assert!(split("f.rs", b"", &tree, Language::Rust, &config).is_empty());
    }
}
