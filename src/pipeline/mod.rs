//! Chunking Coordinator (C9) — drives one file through detection, strategy
//! selection, chunk production, and post-processing (§4.9), plus the
//! Entity/Relationship Pipeline (C11) when a tree is available. This is the
//! crate's single pure-function entry point: `Pipeline::run` is a function
//! of `(bytes, config)` to `PipelineResult`, matching §6's "the core is a
//! pure function from (bytes, config) to PipelineResult, modulo the
//! in-memory cache." No teacher file plays this exact orchestrator role —
//! the closest analogue is the teacher's `Dispatcher` (`ingest/dispatcher.rs`),
//! which picks a parser by language but does not sequence
//! detect→parse→strategy→postprocess→extract the way this does.

pub mod entities;
pub mod postprocess;

use std::time::Duration;

use tracing::warn;

use crate::cache::TreeCache;
use crate::config::PipelineConfig;
use crate::detect::{self, Detection};
use crate::error::{PipelineError, Result};
use crate::guard::GuardCoordinator;
use crate::model::diagnostic::{Diagnostic, Stage};
use crate::model::result::PipelineResult;
use crate::model::source::SourceUnit;
use crate::parser::ParserRegistry;
use crate::strategy::{self, StrategyKind};

pub struct Pipeline {
    parser: ParserRegistry,
    cache: TreeCache,
    guard: GuardCoordinator,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            parser: ParserRegistry::new(),
            cache: TreeCache::new(config.cache.ast_cache_bytes),
            guard: GuardCoordinator::new(config.guard.clone()),
        }
    }

    #[must_use]
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub fn guard_snapshot(&self) -> crate::guard::GuardSnapshot {
        self.guard.snapshot()
    }

    /// The §4.9 sequence for one file. Never returns `Err`: every recoverable
    /// failure downgrades to a `Diagnostic` on the result (§7 error design),
    /// matching "the Guard never throws" and this crate's preference for
    /// local recovery over propagation (see `error` module docs).
    pub fn run(&self, unit: &SourceUnit, config: &PipelineConfig) -> PipelineResult {
        let mut result = PipelineResult::new();

        // Step 1: Guard check.
        self.guard.check_memory(&self.cache);
        let degraded = self.guard.should_use_fallback();

        // Step 2: Detect.
        let detection = detect::detect(unit);
        if detection.is_binary {
            result.push_diagnostic(Diagnostic::info(Stage::Detect, "binary file skipped"));
            self.guard.record_outcome(false);
            return result;
        }

        // Step 3: Parse (via cache), proceeding without a tree on failure.
        let tree = if detection.language.has_tree_sitter_grammar() {
            match self.parse_cached(unit, detection.language) {
                Ok(tree) => Some(tree),
                Err(e) => {
                    result.push_diagnostic(
                        Diagnostic::warn(Stage::Parse, format!("parse failed, proceeding without a tree: {e}"))
                            .with_location(crate::model::entity::Location {
                                path: unit.path.clone(),
                                start_byte: 0,
                                end_byte: unit.bytes.len() as u32,
                                start_line: 1,
                                end_line: 1,
                            }),
                    );
                    None
                }
            }
        } else {
            None
        };

        // Step 4/5: select strategy, run fallback chain.
        let chosen = strategy::choose(&detection, tree.is_some(), degraded);
        let failed = match chosen {
            None => {
                result.push_diagnostic(Diagnostic::info(Stage::Split, "no applicable strategy"));
                true
            }
            Some(kind) => {
                let (raw_chunks, used) =
                    strategy::split_with_fallback(kind, &unit.path, &unit.bytes, &detection, tree.as_ref().map(|v| &**v), &config.chunking);
                if raw_chunks.is_empty() && !unit.bytes.is_empty() {
                    result.push_diagnostic(Diagnostic::warn(Stage::Split, "every strategy in the fallback chain produced no chunks"));
                }
                if used != kind {
                    result.push_diagnostic(Diagnostic::info(
                        Stage::Split,
                        format!("fell back from {} to {}", kind.as_chunk_strategy().as_str(), used.as_chunk_strategy().as_str()),
                    ));
                }

                // Step 6: post-process.
                let chunks = postprocess::process(raw_chunks, &unit.bytes, &config.chunking);
                result.extend_chunks(chunks);

                // C11: entity/relationship extraction, only when a tree exists.
                if let Some(tree) = &tree {
                    let extraction = entities::extract(&unit.path, detection.language, tree, &unit.bytes);
                    result.extend_entities(extraction.entities);
                    result.extend_relationships(extraction.relationships);
                }
                false
            }
        };

        self.guard.record_outcome(failed);
        result
    }

    fn parse_cached(&self, unit: &SourceUnit, language: crate::language::Language) -> Result<std::sync::Arc<tree_sitter::Tree>> {
        let parser = &self.parser;
        self.cache.get_or_parse(language, unit.digest, unit.bytes.len(), || parser.parse(&unit.bytes, language))
    }

    /// Async wrapper around `run` that enforces `timeouts.per_file_timeout_ms`
    /// (§4.9's "suspension points: parse, strategy split, post-process ...
    /// each wraps a timeout"). Runs the synchronous pipeline on a blocking
    /// thread so it doesn't stall the async runtime's worker threads.
    pub async fn run_with_timeout(self: std::sync::Arc<Self>, unit: SourceUnit, config: PipelineConfig) -> Result<PipelineResult> {
        let millis = config.timeouts.per_file_timeout_ms;
        let path = unit.path.clone();
        let pipeline = std::sync::Arc::clone(&self);
        let task = tokio::task::spawn_blocking(move || pipeline.run(&unit, &config));

        match tokio::time::timeout(Duration::from_millis(millis), task).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(join_err)) => Err(PipelineError::Other(format!("pipeline task panicked: {join_err}"))),
            Err(_) => {
                warn!(path, millis, "pipeline run timed out");
                self.guard.record_outcome(true);
                Err(PipelineError::Timeout { stage: "pipeline".into(), path, millis })
            }
        }
    }
}

#[must_use]
pub fn detect_only(unit: &SourceUnit) -> Detection {
    detect::detect(unit)
}

#[must_use]
pub fn strategy_for(detection: &Detection, tree_available: bool) -> Option<StrategyKind> {
    strategy::choose(detection, tree_available, false)
}
