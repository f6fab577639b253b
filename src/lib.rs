// Pedantic lint configuration for the crate.
// - cast_possible_truncation: byte offsets are tracked as u32 (chunk/entity
//   spans) but derived from usize lengths/positions throughout ast.rs,
//   query/engine.rs, and strategy/universal.rs
// - cast_precision_loss: usize -> f64 conversions in the complexity-score
//   formula (adapter::default_complexity_score) and cache hit-rate
// - missing_errors_doc: Result is returned by most of parser/query/cache/
//   pipeline's public API; the error variants are self-evident from
//   `PipelineError`'s own doc comments rather than repeated per call site
// - missing_panics_doc: `Mutex::lock().unwrap()` in cache.rs/guard.rs panics
//   only on a poisoned lock, which is an unrecoverable bug elsewhere, not a
//   documented-per-call-site condition
// - too_many_lines: query/mod.rs's per-(language, QueryName) match is one
//   long catalog by nature, not a function that wants splitting
// - similar_names: start_byte/end_byte, start_line/end_line, and from/to
//   pairs recur throughout the chunk and relationship models
// - fn_params_excessive_bools: strategy::choose's `tree_available`/`degraded`
//   are independent axes of the same decision table, not a CLI flag smell
// - trivially_copy_pass_by_ref: `as_str(&self)` on the small Copy enums
//   (Language, ChunkKind, ChunkStrategy, EntityKind) reads more consistently
//   with the rest of their method sets taking `&self`
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::fn_params_excessive_bools,
    clippy::trivially_copy_pass_by_ref
)]

pub mod adapter;
pub mod cache;
pub mod config;
pub mod detect;
pub mod digest;
pub mod error;
pub mod guard;
pub mod language;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod strategy;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use language::Language;
pub use model::{Chunk, Entity, PipelineResult, Relationship, SourceUnit};
pub use pipeline::Pipeline;
