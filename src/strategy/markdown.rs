//! Markdown strategy — splits on heading boundaries (H1–H3), preserving
//! fenced code blocks as atomic so a heading-looking line inside a fence
//! never starts a new section (§4.7). Adapted from the teacher's
//! `MarkdownParser` (`ingest/text/markdown.rs`), which built a
//! `SectionStart` list from `#`-prefixed lines and sliced `lines[start..=end]`
//! per section; generalized here with fence tracking and a configurable
//! heading-level ceiling.

use crate::config::ChunkingConfig;
use crate::language::Language;
use crate::model::chunk::{Chunk, ChunkKind, ChunkStrategy};

const MAX_HEADING_LEVEL: usize = 3;

struct SectionStart {
    line: usize,
    level: usize,
    heading: String,
}

#[must_use]
pub fn split(path: &str, source: &[u8], language: Language, _config: &ChunkingConfig) -> Vec<Chunk> {
    let Ok(text) = std::str::from_utf8(source) else {
        return Vec::new();
    };
    if text.trim().is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut sections = Vec::new();
    let mut in_fence = false;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.starts_with('#') {
            let level = trimmed.chars().take_while(|c| *c == '#').count();
            if level <= MAX_HEADING_LEVEL {
                let heading = trimmed[level..].trim().to_string();
                if !heading.is_empty() {
                    sections.push(SectionStart { line: i, level, heading });
                }
            }
        }
    }

    if sections.is_empty() {
        return vec![Chunk::new(
            text.to_string(),
            path,
            language,
            1,
            lines.len() as u32,
            0,
            source.len() as u32,
            ChunkKind::Section,
            ChunkStrategy::Markdown,
        )];
    }

    let mut chunks = Vec::with_capacity(sections.len());
    for (idx, section) in sections.iter().enumerate() {
        let start_line = section.line;
        let end_line = if idx + 1 < sections.len() {
            sections[idx + 1].line.saturating_sub(1)
        } else {
            lines.len() - 1
        };
        let content = lines[start_line..=end_line].join("\n");
        let start_byte = byte_offset_of_line(text, start_line);
        let end_byte = if end_line + 1 < lines.len() {
            byte_offset_of_line(text, end_line + 1)
        } else {
            source.len()
        };

        let mut chunk = Chunk::new(
            content,
            path,
            language,
            start_line as u32 + 1,
            end_line as u32 + 1,
            start_byte as u32,
            end_byte as u32,
            ChunkKind::Section,
            ChunkStrategy::Markdown,
        );
        chunk.metadata.insert(
            "heading".to_string(),
            serde_json::Value::String(section.heading.clone()),
        );
        chunks.push(chunk);
    }
    chunks
}

fn byte_offset_of_line(source: &str, line_idx: usize) -> usize {
    source.lines().take(line_idx).map(|l| l.len() + 1).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_headings() {
        let config = ChunkingConfig::default();
        let source = "# A\nfoo\n## B\nbar\n";
        let chunks = split("f.md", source.as_bytes(), Language::Markdown, &config);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata["heading"], "A");
        assert_eq!(chunks[1].metadata["heading"], "B");
    }

    #[test]
    fn no_headings_is_one_document_chunk() {
        let config = ChunkingConfig::default();
        let source = "just text\nno headings\n";
        let chunks = split("f.md", source.as_bytes(), Language::Markdown, &config);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, ChunkKind::Section);
    }

    #[test]
    fn heading_like_lines_inside_fences_are_not_section_boundaries() {
        let config = ChunkingConfig::default();
        let source = "# Real\n```\n# not a heading\n```\nmore text\n";
        let chunks = split("f.md", source.as_bytes(), Language::Markdown, &config);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.contains("# not a heading"));
    }

    #[test]
    fn empty_source_produces_no_chunks() {
        let config = ChunkingConfig::default();
        assert!(split("f.md", b"", Language::Markdown, &config).is_empty());
    }
}
