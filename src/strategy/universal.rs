//! Universal-semantic strategy — for unstructured text. Paragraph-aware;
//! breaks only at blank-line boundaries once the size ceiling is reached
//! (§4.7). Grounded on the same `chunk_generic` line-window idiom as
//! `strategy::line`, but grouping by paragraph (blank-line-delimited) runs
//! instead of a fixed line count, since plain text has no bracket/heading
//! structure to anchor on.

use crate::config::ChunkingConfig;
use crate::language::Language;
use crate::model::chunk::{Chunk, ChunkKind, ChunkStrategy};

#[must_use]
pub fn split(path: &str, source: &[u8], language: Language, config: &ChunkingConfig) -> Vec<Chunk> {
    let Ok(text) = std::str::from_utf8(source) else {
        return Vec::new();
    };
    if text.trim().is_empty() {
        return Vec::new();
    }

    let paragraphs = paragraph_spans(text);
    let mut chunks = Vec::new();
    let mut group_start: Option<usize> = None;
    let mut group_end = 0usize;

    for (start, end) in paragraphs {
        if group_start.is_none() {
            group_start = Some(start);
        }
        group_end = end;
        if group_end - group_start.unwrap() >= config.max_chunk_bytes {
            push_chunk(&mut chunks, path, language, text, group_start.unwrap(), group_end);
            group_start = None;
        }
    }
    if let Some(start) = group_start {
        push_chunk(&mut chunks, path, language, text, start, group_end);
    }

    chunks
}

/// Byte spans of each blank-line-delimited paragraph, in source order.
fn paragraph_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0usize;
    let mut blank_run = 0usize;

    for line in text.split_inclusive('\n') {
        let is_blank = line.trim().is_empty();
        if is_blank {
            blank_run += 1;
            if let Some(s) = start {
                if blank_run == 1 {
                    spans.push((s, offset));
                    start = None;
                }
            }
        } else {
            blank_run = 0;
            if start.is_none() {
                start = Some(offset);
            }
        }
        offset += line.len();
    }
    if let Some(s) = start {
        spans.push((s, offset));
    }
    spans
}

fn push_chunk(chunks: &mut Vec<Chunk>, path: &str, language: Language, text: &str, start: usize, end: usize) {
    let slice = text[start..end].trim_end();
    if slice.is_empty() {
        return;
    }
    let start_line = 1 + text[..start].matches('\n').count() as u32;
    let end_line = 1 + text[..end].matches('\n').count() as u32;
    chunks.push(Chunk::new(
        slice.to_string(),
        path,
        language,
        start_line,
        end_line,
        start as u32,
        (start + slice.len()) as u32,
        ChunkKind::Generic,
        ChunkStrategy::Universal,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_small_paragraphs_until_ceiling() {
        let config = ChunkingConfig {
            max_chunk_bytes: 20,
            ..ChunkingConfig::default()
        };
        let source = "one\n\ntwo\n\nthree four five six\n";
        let chunks = split("f.txt", source.as_bytes(), Language::PlainText, &config);
        assert!(chunks.len() >= 2);
    }

    #[test]
    fn never_breaks_mid_paragraph() {
        let config = ChunkingConfig {
            max_chunk_bytes: 5,
            ..ChunkingConfig::default()
        };
        let source = "a very long single paragraph with no blank lines anywhere\n";
        let chunks = split("f.txt", source.as_bytes(), Language::PlainText, &config);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn empty_source_produces_no_chunks() {
        let config = ChunkingConfig::default();
        assert!(split("f.txt", b"", Language::PlainText, &config).is_empty());
    }
}
