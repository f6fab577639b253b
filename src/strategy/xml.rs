//! XML/HTML strategy — splits at top-level element boundaries respecting
//! tag nesting, preserving CDATA as atomic (§4.7). No teacher/pack file
//! implements element-nesting-aware splitting directly; built in the
//! byte-scanning idiom of `strategy::bracket`, tracking angle-bracket depth
//! and tag open/close instead of `()[]{}`.

use crate::config::ChunkingConfig;
use crate::language::Language;
use crate::model::chunk::{Chunk, ChunkKind, ChunkStrategy};

#[must_use]
pub fn split(path: &str, source: &[u8], language: Language, _config: &ChunkingConfig) -> Vec<Chunk> {
    let Ok(text) = std::str::from_utf8(source) else {
        return Vec::new();
    };
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut depth: i32 = 0;
    let mut in_cdata = false;
    let mut chunk_start = 0usize;
    let bytes = text.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if !in_cdata && bytes[i..].starts_with(b"<![CDATA[") {
            in_cdata = true;
            i += 9;
            continue;
        }
        if in_cdata {
            if bytes[i..].starts_with(b"]]>") {
                in_cdata = false;
                i += 3;
                continue;
            }
            i += 1;
            continue;
        }
        if bytes[i..].starts_with(b"</") {
            depth -= 1;
            if let Some(end) = find_byte(&bytes[i..], b'>') {
                i += end + 1;
            } else {
                i += 2;
            }
            if depth <= 0 {
                let boundary = i;
                if boundary > chunk_start {
                    push_chunk(&mut chunks, path, language, text, chunk_start, boundary);
                }
                chunk_start = boundary;
                depth = 0;
            }
            continue;
        }
        if bytes[i] == b'<' && i + 1 < bytes.len() && bytes[i + 1] != b'?' && bytes[i + 1] != b'!' {
            let is_self_closing = find_byte(&bytes[i..], b'>')
                .map(|end| bytes[i..i + end].ends_with(b"/"))
                .unwrap_or(false);
            if let Some(end) = find_byte(&bytes[i..], b'>') {
                i += end + 1;
            } else {
                i += 1;
            }
            if !is_self_closing {
                depth += 1;
            } else if depth <= 0 {
                let boundary = i;
                push_chunk(&mut chunks, path, language, text, chunk_start, boundary);
                chunk_start = boundary;
            }
            continue;
        }
        i += 1;
    }

    if chunk_start < bytes.len() {
        push_chunk(&mut chunks, path, language, text, chunk_start, bytes.len());
    }

    chunks
}

fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

fn push_chunk(chunks: &mut Vec<Chunk>, path: &str, language: Language, text: &str, start: usize, end: usize) {
    let slice = &text[start..end];
    if slice.trim().is_empty() {
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
        end as u32,
        ChunkKind::Section,
        ChunkStrategy::Xml,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_top_level_siblings() {
        let config = ChunkingConfig::default();
        let source = "<a>1</a><b>2</b>";
        let chunks = split("f.xml", source.as_bytes(), Language::Xml, &config);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].content.contains("<a>"));
        assert!(chunks[1].content.contains("<b>"));
    }

    #[test]
    fn cdata_is_not_split() {
        let config = ChunkingConfig::default();
        let source = "<a><![CDATA[</a> not a real close]]></a>";
        let chunks = split("f.xml", source.as_bytes(), Language::Xml, &config);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.contains("CDATA"));
    }

    #[test]
    fn empty_source_produces_no_chunks() {
        let config = ChunkingConfig::default();
        assert!(split("f.xml", b"", Language::Xml, &config).is_empty());
    }
}
