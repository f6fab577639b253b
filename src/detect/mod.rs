//! Detection Service (C6) — classifies a `SourceUnit` before chunking:
//! language, size band, and binary/backup/markup/text/code flags.
//! Generalizes the teacher's `ext_to_lang`/`is_supported_extension`
//! (`ingest/scanner.rs`), which mapped an extension straight to a
//! `&'static str` language tag for a fixed catalog of known extensions;
//! here that becomes one stage of a fallback chain (extension table, then
//! content sniffing) and gains the binary/size classification the teacher
//! folded into its `SkipReason` enum instead of exposing as data (§4.6).

use crate::language::Language;
use crate::model::source::SourceUnit;

/// §4.6: tiny (<20 lines), small (<200), medium (<2k), large (<20k), huge
/// (≥20k).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBand {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl SizeBand {
    #[must_use]
    pub fn for_line_count(lines: usize) -> Self {
        match lines {
            0..=19 => Self::Tiny,
            20..=199 => Self::Small,
            200..=1_999 => Self::Medium,
            2_000..=19_999 => Self::Large,
            _ => Self::Huge,
        }
    }
}

fn count_lines(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        0
    } else {
        bytes.iter().filter(|&&b| b == b'\n').count() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub language: Language,
    pub size_band: SizeBand,
    pub is_binary: bool,
    pub is_backup: bool,
    pub is_markup: bool,
    pub is_text: bool,
    pub is_code: bool,
}

/// A handful of common backup/editor-swap suffixes; full coverage isn't the
/// goal, just enough to keep `~`/`.bak`/`.orig`/swap files out of the code
/// path, same intent as the teacher's `SkipReason::UnsupportedExtension`.
const BACKUP_SUFFIXES: &[&str] = &["~", ".bak", ".orig", ".swp", ".swo"];

/// Detects the language and shape of `unit`. A caller-supplied
/// `language_hint` (§6 input contract) short-circuits extension/content
/// detection for the `language` field only — size/binary/backup flags are
/// always computed from the actual bytes.
#[must_use]
pub fn detect(unit: &SourceUnit) -> Detection {
    let is_backup = BACKUP_SUFFIXES.iter().any(|suf| unit.path.ends_with(suf));
    let is_binary = looks_binary(&unit.bytes);
    let size_band = SizeBand::for_line_count(count_lines(&unit.bytes));

    let language = unit
        .language_hint
        .or_else(|| unit.extension().and_then(Language::from_extension))
        .unwrap_or_else(|| sniff_language(&unit.bytes));

    let is_markup = matches!(language, Language::Html | Language::Xml | Language::Markdown);
    let is_code = language.has_tree_sitter_grammar() && !is_markup;
    let is_text = !is_binary && (is_markup || language == Language::PlainText || is_code);

    Detection {
        language,
        size_band,
        is_binary,
        is_backup,
        is_markup,
        is_text,
        is_code,
    }
}

/// A NUL byte in the first 8 KiB, or a non-UTF-8 prefix, marks a file binary
/// (§4.6) — mirrors the teacher's `NonUtf8` skip reason (a failed UTF-8
/// decode), generalized to also catch the common case of a NUL byte inside
/// an otherwise-valid-UTF-8 early prefix.
fn looks_binary(bytes: &[u8]) -> bool {
    let probe = &bytes[..bytes.len().min(8192)];
    probe.contains(&0) || std::str::from_utf8(probe).is_err()
}

/// Content-based fallback when the extension table (`Language::from_extension`)
/// doesn't recognize the path — e.g. an extensionless script with a shebang.
/// Falls through to `PlainText` rather than failing (§4.6 edge case: unknown
/// files are never rejected outright).
fn sniff_language(bytes: &[u8]) -> Language {
    if let Ok(text) = std::str::from_utf8(&bytes[..bytes.len().min(256)]) {
        let first_line = text.lines().next().unwrap_or("");
        if first_line.starts_with("#!") {
            if first_line.contains("python") {
                return Language::Python;
            }
            if first_line.contains("node") {
                return Language::JavaScript;
            }
        }
        if text.trim_start().starts_with('<') {
            return Language::Xml;
        }
    }
    Language::PlainText
}
