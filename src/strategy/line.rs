//! Line strategy — fixed-size sliding window over lines, the terminal
//! fallback that always succeeds (§4.7). Grounded on the pack's
//! `IntelligentChunker::chunk_generic` (`marlonsc-mcb`'s
//! `domain/chunking/engine.rs`), which windows `content.lines()` into
//! fixed-size groups and joins them back with `\n`; generalized here to
//! track byte offsets so the resulting `Chunk` carries accurate
//! `start_byte`/`end_byte` spans instead of only line numbers.

use crate::config::ChunkingConfig;
use crate::language::Language;
use crate::model::chunk::{Chunk, ChunkKind, ChunkStrategy};

/// Lines per window, sized so a typical line (~40 bytes) keeps windows near
/// `max_chunk_bytes` without the post-processor immediately re-splitting
/// them in step 3.
fn lines_per_window(config: &ChunkingConfig) -> usize {
    (config.max_chunk_bytes / 40).max(10)
}

#[must_use]
pub fn split(path: &str, source: &[u8], language: Language, config: &ChunkingConfig) -> Vec<Chunk> {
    let Ok(text) = std::str::from_utf8(source) else {
        return Vec::new();
    };
    if text.is_empty() {
        return Vec::new();
    }

    let window = lines_per_window(config);
    let mut chunks = Vec::new();
    let mut byte_offset = 0u32;
    let mut line_no = 1u32;
    let mut lines_iter = text.split_inclusive('\n').peekable();

    while lines_iter.peek().is_some() {
        let group: Vec<&str> = lines_iter.by_ref().take(window).collect();
        if group.is_empty() {
            break;
        }
        let start_byte = byte_offset;
        let start_line = line_no;
        let group_len: u32 = group.iter().map(|l| l.len() as u32).sum();
        let content: String = group.concat();
        let line_count = group.iter().filter(|l| l.ends_with('\n')).count() as u32;

        chunks.push(Chunk::new(
            content,
            path,
            language,
            start_line,
            start_line + line_count.saturating_sub(1).max(0),
            start_byte,
            start_byte + group_len,
            ChunkKind::Generic,
            ChunkStrategy::Line,
        ));

        byte_offset += group_len;
        line_no += line_count.max(1);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_cover_the_whole_file_contiguously() {
        let config = ChunkingConfig {
            max_chunk_bytes: 80,
            ..ChunkingConfig::default()
        };
        let source = (0..50).map(|i| format!("line {i}\n")).collect::<String>();
        let chunks = split("f.txt", source.as_bytes(), Language::PlainText, &config);
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].start_byte, 0);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end_byte, pair[1].start_byte);
        }
        assert_eq!(chunks.last().unwrap().end_byte, source.len() as u32);
    }

    #[test]
    fn empty_source_produces_no_chunks() {
        let config = ChunkingConfig::default();
        assert!(split("f.txt", b"", Language::PlainText, &config).is_empty());
    }
}
