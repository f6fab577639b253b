//! Bracket strategy — walks bytes, tracks a balance stack over `()[]{}`
//! and string/template literal state, and splits only at depth 0 and line
//! boundaries, so every output chunk is bracket-balanced by construction
//! (§4.7). No teacher or pack file implements this exact walk; it is built
//! in the idiom of the teacher's byte-oriented scanning (`ingest/scanner.rs`
//! walks raw bytes similarly for binary/backup sniffing) rather than
//! adapted from a single source file.

use crate::config::ChunkingConfig;
use crate::language::Language;
use crate::model::chunk::{Chunk, ChunkKind, ChunkStrategy};

#[derive(Clone, Copy, PartialEq, Eq)]
enum StringState {
    None,
    Single,
    Double,
    Backtick,
}

#[must_use]
pub fn split(path: &str, source: &[u8], language: Language, config: &ChunkingConfig) -> Vec<Chunk> {
    if source.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut depth: i32 = 0;
    let mut string_state = StringState::None;
    let mut escaped = false;

    let mut chunk_start_byte = 0usize;
    let mut chunk_start_line = 1u32;
    let mut line_no = 1u32;
    let mut bytes_since_boundary = 0usize;

    for (i, &b) in source.iter().enumerate() {
        match string_state {
            StringState::None => match b {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth -= 1,
                b'\'' => string_state = StringState::Single,
                b'"' => string_state = StringState::Double,
                b'`' => string_state = StringState::Backtick,
                _ => {}
            },
            _ if escaped => escaped = false,
            _ => match b {
                b'\\' => escaped = true,
                b'\'' if string_state == StringState::Single => string_state = StringState::None,
                b'"' if string_state == StringState::Double => string_state = StringState::None,
                b'`' if string_state == StringState::Backtick => string_state = StringState::None,
                _ => {}
            },
        }

        bytes_since_boundary += 1;

        if b == b'\n' {
            line_no += 1;
            let at_top_level = depth <= 0 && string_state == StringState::None;
            if at_top_level && bytes_since_boundary >= config.min_chunk_bytes.min(config.max_chunk_bytes) {
                let end_byte = i + 1;
                if end_byte > chunk_start_byte {
                    chunks.push(Chunk::new(
                        String::from_utf8_lossy(&source[chunk_start_byte..end_byte]).into_owned(),
                        path,
                        language,
                        chunk_start_line,
                        line_no - 1,
                        chunk_start_byte as u32,
                        end_byte as u32,
                        ChunkKind::Generic,
                        ChunkStrategy::Bracket,
                    ));
                }
                chunk_start_byte = end_byte;
                chunk_start_line = line_no;
                bytes_since_boundary = 0;
                depth = depth.max(0);
            } else if bytes_since_boundary >= config.max_chunk_bytes
                && depth <= 0
                && string_state == StringState::None
            {
                let end_byte = i + 1;
                chunks.push(Chunk::new(
                    String::from_utf8_lossy(&source[chunk_start_byte..end_byte]).into_owned(),
                    path,
                    language,
                    chunk_start_line,
                    line_no - 1,
                    chunk_start_byte as u32,
                    end_byte as u32,
                    ChunkKind::Generic,
                    ChunkStrategy::Bracket,
                ));
                chunk_start_byte = end_byte;
                chunk_start_line = line_no;
                bytes_since_boundary = 0;
            }
        }
    }

    if chunk_start_byte < source.len() {
        chunks.push(Chunk::new(
            String::from_utf8_lossy(&source[chunk_start_byte..]).into_owned(),
            path,
            language,
            chunk_start_line,
            line_no,
            chunk_start_byte as u32,
            source.len() as u32,
            ChunkKind::Generic,
            ChunkStrategy::Bracket,
        ));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_bracket_balanced_chunks() {
        let config = ChunkingConfig {
            min_chunk_bytes: 1,
            max_chunk_bytes: 40,
            ..ChunkingConfig::default()
        };
        let source = b"fn a() {\n  1;\n}\nfn b() {\n  2;\n}\n";
        let chunks = split("f.rs", source, Language::Rust, &config);
        assert!(!chunks.is_empty());
        for c in &chunks {
            let open = c.content.matches('{').count();
            let close = c.content.matches('}').count();
            assert_eq!(open, close, "chunk not balanced: {:?}", c.content);
        }
    }

    #[test]
    fn never_splits_inside_a_string_containing_braces() {
        let config = ChunkingConfig {
            min_chunk_bytes: 1,
            max_chunk_bytes: 5,
            ..ChunkingConfig::default()
        };
        let source = b"let s = \"{\nnot a boundary\n}\";\n";
        let chunks = split("f.rs", source, Language::Rust, &config);
        let joined: String = chunks.iter().map(|c| c.content.clone()).collect();
        assert_eq!(joined.as_bytes(), source);
    }

    #[test]
    fn empty_source_produces_no_chunks() {
        let config = ChunkingConfig::default();
        assert!(split("f.rs", b"", Language::Rust, &config).is_empty());
    }
}
