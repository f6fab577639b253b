//! Pipeline configuration.
//!
//! All fields are optional from the caller's perspective — every one has a
//! default matching the values named in the design (§4.7/§4.8/§4.10). This
//! mirrors the teacher's `UserSettings` split: defaults live next to the
//! struct via `#[serde(default)]`, and the whole thing round-trips through
//! TOML so a host application can load it the same way the teacher loads
//! `.rlm/config.toml`. Loading from *disk* is the host's job (file-system
//! access is an external collaborator, see spec §1); this module only knows
//! how to parse a TOML string into typed config.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunking: ChunkingConfig,
    pub cache: CacheConfig,
    pub guard: GuardConfig,
    pub timeouts: TimeoutConfig,
    pub concurrency: ConcurrencyConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            cache: CacheConfig::default(),
            guard: GuardConfig::default(),
            timeouts: TimeoutConfig::default(),
            concurrency: ConcurrencyConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a `PipelineConfig` from a TOML document. Unset fields fall back
    /// to their defaults via `#[serde(default)]`.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PipelineError::Config(format!("invalid config toml: {e}")))
    }

    /// Serialize back to a TOML document (round-trip, used by hosts that
    /// want to persist an effective config alongside user overrides).
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("failed to serialize config: {e}")))
    }
}

/// Chunk post-processing bounds (§4.10, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_chunk_bytes: usize,
    pub min_chunk_bytes: usize,
    pub overlap_trigger_bytes: usize,
    pub overlap_bytes: usize,
    /// §11.3: overlap is restricted to size-split chunks by default; a host
    /// that needs the broader teacher-era behavior can opt back in.
    pub overlap_split_only: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: 2048,
            min_chunk_bytes: 100,
            overlap_trigger_bytes: 1000,
            overlap_bytes: 128,
            overlap_split_only: true,
        }
    }
}

/// AST/tree cache sizing (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ast_cache_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ast_cache_bytes: 128 * 1024 * 1024,
        }
    }
}

/// Guard coordinator budgets (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub memory_high_water: usize,
    pub memory_hard_limit: usize,
    pub memory_low_water: usize,
    pub error_window: usize,
    pub error_rate_threshold: f64,
    /// Number of subsequent runs a tripped error budget stays degraded for.
    pub error_degraded_runs: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            memory_high_water: 512 * 1024 * 1024,
            memory_hard_limit: 768 * 1024 * 1024,
            memory_low_water: 384 * 1024 * 1024,
            error_window: 100,
            error_rate_threshold: 0.30,
            error_degraded_runs: 50,
        }
    }
}

/// Per-stage timeouts (§4.9, §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub per_file_timeout_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            per_file_timeout_ms: 30_000,
        }
    }
}

/// Task pool sizing (§5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// `None` means "use available parallelism", matching the teacher's
    /// `workerCount` default of CPU count.
    pub worker_count: Option<usize>,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { worker_count: None }
    }
}

impl ConcurrencyConfig {
    #[must_use]
    pub fn effective_worker_count(&self) -> usize {
        self.worker_count
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(4, |n| n.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.chunking.max_chunk_bytes, 2048);
        assert_eq!(cfg.chunking.min_chunk_bytes, 100);
        assert_eq!(cfg.chunking.overlap_trigger_bytes, 1000);
        assert_eq!(cfg.chunking.overlap_bytes, 128);
        assert_eq!(cfg.cache.ast_cache_bytes, 128 * 1024 * 1024);
        assert_eq!(cfg.guard.memory_high_water, 512 * 1024 * 1024);
        assert_eq!(cfg.guard.memory_hard_limit, 768 * 1024 * 1024);
        assert_eq!(cfg.guard.memory_low_water, 384 * 1024 * 1024);
        assert_eq!(cfg.guard.error_window, 100);
        assert!((cfg.guard.error_rate_threshold - 0.30).abs() < f64::EPSILON);
        assert_eq!(cfg.timeouts.per_file_timeout_ms, 30_000);
    }

    #[test]
    fn partial_toml_overrides_fall_back_to_defaults() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
            [chunking]
            max_chunk_bytes = 4096
        "#,
        )
        .unwrap();
        assert_eq!(cfg.chunking.max_chunk_bytes, 4096);
        assert_eq!(cfg.chunking.min_chunk_bytes, 100);
        assert_eq!(cfg.guard.memory_high_water, 512 * 1024 * 1024);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let result = PipelineConfig::from_toml_str("not = [valid");
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = PipelineConfig::default();
        let s = cfg.to_toml_string().unwrap();
        let back = PipelineConfig::from_toml_str(&s).unwrap();
        assert_eq!(back.chunking.max_chunk_bytes, cfg.chunking.max_chunk_bytes);
    }

    #[test]
    fn effective_worker_count_defaults_to_parallelism() {
        let cfg = ConcurrencyConfig::default();
        assert!(cfg.effective_worker_count() >= 1);
    }

    #[test]
    fn effective_worker_count_honors_override() {
        let cfg = ConcurrencyConfig {
            worker_count: Some(7),
        };
        assert_eq!(cfg.effective_worker_count(), 7);
    }
}
