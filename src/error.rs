//! Crate-wide error type.
//!
//! Most error kinds described in the design are recovered locally and
//! surfaced as a `Diagnostic` on `PipelineResult` rather than propagated —
//! see `model::diagnostic`. A handful still need a typed `Result` at call
//! sites inside the core: query compilation (fatal at registry build time),
//! cache single-flight poisoning, and anything that bubbles out of an `?`
//! before it can be downgraded to a diagnostic.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("unknown language for {path}")]
    UnknownLanguage { path: String },

    #[error("parse error in {path}: {detail}")]
    Parse { path: String, detail: String },

    #[error("query compile error for {language}/{query}: {detail}")]
    QueryCompile {
        language: String,
        query: String,
        detail: String,
    },

    #[error("query execute error for {language}/{query}: {detail}")]
    QueryExecute {
        language: String,
        query: String,
        detail: String,
    },

    #[error("adapter error in {path}: {detail}")]
    Adapter { path: String, detail: String },

    #[error("strategy {strategy} produced no output for {path}")]
    Strategy { strategy: String, path: String },

    #[error("stage {stage} timed out after {millis}ms for {path}")]
    Timeout {
        stage: String,
        path: String,
        millis: u64,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
