//! `Relationship` — a typed, directional edge between two nodes (§3, §4.5).

use serde::Serialize;

use crate::digest::stable_id;
use crate::language::Language;
use crate::model::entity::{Location, Properties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipCategory {
    Call,
    DataFlow,
    ControlFlow,
    Dependency,
    Inheritance,
    Lifecycle,
    Semantic,
    Reference,
    Annotation,
    Concurrency,
}

impl RelationshipCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::DataFlow => "data-flow",
            Self::ControlFlow => "control-flow",
            Self::Dependency => "dependency",
            Self::Inheritance => "inheritance",
            Self::Lifecycle => "lifecycle",
            Self::Semantic => "semantic",
            Self::Reference => "reference",
            Self::Annotation => "annotation",
            Self::Concurrency => "concurrency",
        }
    }
}

/// Category-specific edge label, e.g. `function`, `recursive`, `if`,
/// `nested_struct`, `memory_deallocation` (§3). Kept as a `String` rather
/// than a closed enum because the catalog is genuinely open — each language
/// adapter contributes its own vocabulary, and locking it to an enum would
/// mean editing this module every time a new language ships a new edge type.
pub type RelationshipType = String;

#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    pub id: u64,
    pub category: RelationshipCategory,
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    pub from_node_id: u64,
    pub to_node_id: u64,
    pub directed: bool,
    pub strength: Option<f64>,
    pub weight: Option<f64>,
    pub location: Location,
    pub language: Language,
    pub properties: Properties,
}

impl Relationship {
    /// `id = H(from_node_id, to_node_id, type, start_line)` (§3).
    #[must_use]
    pub fn compute_id(
        from_node_id: u64,
        to_node_id: u64,
        rel_type: &str,
        start_line: u32,
    ) -> u64 {
        stable_id(&[
            &from_node_id.to_be_bytes(),
            &to_node_id.to_be_bytes(),
            rel_type.as_bytes(),
            &start_line.to_be_bytes(),
        ])
    }

    #[must_use]
    pub fn new(
        category: RelationshipCategory,
        rel_type: impl Into<String>,
        from_node_id: u64,
        to_node_id: u64,
        location: Location,
        language: Language,
    ) -> Self {
        let rel_type = rel_type.into();
        let id = Self::compute_id(from_node_id, to_node_id, &rel_type, location.start_line);
        Self {
            id,
            category,
            rel_type,
            from_node_id,
            to_node_id,
            directed: true,
            strength: None,
            weight: None,
            location,
            language,
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength.clamp(0.1, 1.0));
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Base strength plus the per-type adjustment table from §4.5, clamped to
/// `[0.1, 1.0]`.
#[must_use]
pub fn strength_for_type(rel_type: &str) -> f64 {
    let base: f64 = 0.5;
    let adjustment = match rel_type {
        "recursive" => 0.3,
        "macro_call" | "macro" => -0.2,
        "conditional_call" | "conditional" => -0.1,
        "indirect_data_flow" | "indirect" => 0.2,
        "compound_assignment" => 0.1,
        _ => 0.0,
    };
    (base + adjustment).clamp(0.1, 1.0)
}
