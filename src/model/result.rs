//! `PipelineResult` — the single output value of `run_pipeline` (§6).

use serde::Serialize;

use crate::model::chunk::Chunk;
use crate::model::diagnostic::Diagnostic;
use crate::model::entity::Entity;
use crate::model::relationship::Relationship;

#[derive(Debug, Clone, Serialize, Default)]
pub struct PipelineResult {
    pub chunks: Vec<Chunk>,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == crate::model::diagnostic::Severity::Error)
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend_chunks(&mut self, chunks: impl IntoIterator<Item = Chunk>) {
        self.chunks.extend(chunks);
    }

    pub fn extend_entities(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.entities.extend(entities);
    }

    pub fn extend_relationships(&mut self, relationships: impl IntoIterator<Item = Relationship>) {
        self.relationships.extend(relationships);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::diagnostic::Stage;

    #[test]
    fn empty_result_has_no_errors() {
        assert!(!PipelineResult::new().has_errors());
    }

    #[test]
    fn error_diagnostic_flips_has_errors() {
        let mut r = PipelineResult::new();
        r.push_diagnostic(Diagnostic::error(Stage::Parse, "boom"));
        assert!(r.has_errors());
    }

    #[test]
    fn warn_diagnostic_does_not_flip_has_errors() {
        let mut r = PipelineResult::new();
        r.push_diagnostic(Diagnostic::warn(Stage::Split, "minor"));
        assert!(!r.has_errors());
    }
}
