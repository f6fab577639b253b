//! Canonical data model (§3).

pub mod chunk;
pub mod diagnostic;
pub mod entity;
pub mod relationship;
pub mod result;
pub mod source;

pub use chunk::{Chunk, ChunkKind, ChunkMetadata, ChunkStrategy};
pub use diagnostic::{Diagnostic, Severity, Stage};
pub use entity::{Entity, EntityKind, Location};
pub use relationship::{Relationship, RelationshipCategory, RelationshipType};
pub use result::PipelineResult;
pub use source::SourceUnit;
