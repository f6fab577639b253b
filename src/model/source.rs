//! `SourceUnit` — the input to one pipeline run (§3).

use crate::digest::Digest;
use crate::language::Language;

/// One file's worth of input to the pipeline. Path plus digest uniquely
/// identify a run: rerunning `run_pipeline` with the same `SourceUnit` must
/// be idempotent (same chunk set and entity set up to stable IDs).
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: String,
    pub bytes: Vec<u8>,
    pub digest: Digest,
    /// Caller-supplied language hint (`hints.language` in §6's input
    /// contract). Detection still runs, but an explicit hint short-circuits
    /// the extension/content heuristics when it names a known language.
    pub language_hint: Option<Language>,
}

impl SourceUnit {
    #[must_use]
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        let digest = Digest::of_bytes(&bytes);
        Self {
            path: path.into(),
            bytes,
            digest,
            language_hint: None,
        }
    }

    #[must_use]
    pub fn with_language_hint(mut self, language: Language) -> Self {
        self.language_hint = Some(language);
        self
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.path.rsplit('.').next().filter(|e| *e != self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_a_pure_function_of_bytes() {
        let a = SourceUnit::new("a.rs", b"fn main() {}".to_vec());
        let b = SourceUnit::new("b.rs", b"fn main() {}".to_vec());
        assert_eq!(a.digest, b.digest);
    }

    #[test]
    fn extension_extracted_from_path() {
        let u = SourceUnit::new("src/lib/foo.rs", vec![]);
        assert_eq!(u.extension(), Some("rs"));
        let u2 = SourceUnit::new("Makefile", vec![]);
        assert_eq!(u2.extension(), None);
    }
}
