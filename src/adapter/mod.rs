//! Language Adapter (C5) — turns query matches (C3) into `Entity`/
//! `Relationship` values for one language. Generalizes the teacher's
//! `LanguageConfig` trait (`ingest/code/base.rs`), which was defined but
//! never actually implemented by any of the teacher's concrete parsers
//! (`rust.rs`, `go.rs`, … each duplicated its own capture-to-chunk mapping
//! inline instead). Here `LanguageAdapter` is the real seam: every
//! per-language file below implements it, and `adapt` (C9's entry point
//! into this module) is the only place that needs to know the trait
//! exists.

pub mod csharp;
pub mod go;
pub mod java;
pub mod javascript;
pub mod php;
pub mod python;
pub mod rust;
pub mod typescript;

use tree_sitter::Tree;

use crate::language::Language;
use crate::model::entity::{Entity, EntityKind, Location};
use crate::model::relationship::{Relationship, RelationshipCategory};
use crate::query::engine::{self, CapturedMatch};
use crate::query::QueryName;

/// Per-language mapping from query captures to domain types. A `LanguageAdapter`
/// is stateless and `Sync`; `adapt_entities`/`adapt_relationships` are pure
/// functions of `(tree, source)` so they can run from any `rayon` worker
/// without synchronization (§4.5, §5).
pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Extracts entities for every registered `QueryName::Entities*`
    /// capability this language has a query for (§4.2's capture-miss
    /// fallback: a missing query source is simply skipped, not an error).
    fn entities(&self, path: &str, tree: &Tree, source: &[u8]) -> Vec<Entity> {
        let mut out = Vec::new();
        for (name, kind) in entity_query_kinds() {
            out.extend(self.entities_for(path, tree, source, name, kind));
        }
        out
    }

    /// Extracts relationships for every registered `QueryName::Relationships*`
    /// capability.
    fn relationships(&self, path: &str, tree: &Tree, source: &[u8], entities: &[Entity]) -> Vec<Relationship> {
        let mut out = Vec::new();
        for (name, category) in relationship_query_categories() {
            out.extend(self.relationships_for(path, tree, source, entities, name, category));
        }
        out
    }

    /// Runs `query_name` against `tree` and maps each match to an `Entity`
    /// of `kind`. The default implementation covers every language that
    /// follows the catalog's `@name`/`@def` capture convention (§4.2); a
    /// language that needs bespoke logic (e.g. Rust's impl-method nesting)
    /// overrides this and falls back to the default for everything else.
    fn entities_for(
        &self,
        path: &str,
        tree: &Tree,
        source: &[u8],
        query_name: QueryName,
        kind: EntityKind,
    ) -> Vec<Entity> {
        let Ok(Some(query)) = crate::query::compile(self.language(), query_name) else {
            return Vec::new();
        };
        engine::execute(&query, tree, source)
            .into_iter()
            .filter_map(|m| entity_from_match(self.language(), path, source, &m, kind))
            .map(|entity| self.with_derived_properties(entity, kind))
            .collect()
    }

    /// Populates `properties` on a freshly-built entity: a complexity score
    /// for every kind, plus `parameterCount`/`returnType` for function-like
    /// kinds when they can be read off the declaration text (§4.5, §8
    /// scenario 2). Query captures only ever tag `name`/`def`, so these are
    /// derived from `entity.content` rather than a dedicated capture.
    fn with_derived_properties(&self, mut entity: Entity, kind: EntityKind) -> Entity {
        let score = self.complexity_score(&entity.content);
        entity = entity.with_property("complexityScore", serde_json::json!(score));
        if matches!(kind, EntityKind::Function | EntityKind::Method) {
            if let Some(count) = parameter_count(&entity.content) {
                entity = entity.with_property("parameterCount", serde_json::json!(count));
            }
            if let Some(return_type) = return_type_hint(&entity.content) {
                entity = entity.with_property("returnType", serde_json::json!(return_type));
            }
        }
        entity
    }

    /// Runs `query_name` against `tree` and maps each match to a
    /// `Relationship` of `category`, resolving `from`/`to` node ids against
    /// `entities` by containing span (closest-enclosing entity, §4.5's
    /// "anchor to the nearest enclosing declaration" rule) when the query
    /// doesn't name both endpoints explicitly.
    fn relationships_for(
        &self,
        path: &str,
        tree: &Tree,
        source: &[u8],
        entities: &[Entity],
        query_name: QueryName,
        category: RelationshipCategory,
    ) -> Vec<Relationship> {
        let Ok(Some(query)) = crate::query::compile(self.language(), query_name) else {
            return Vec::new();
        };
        engine::execute(&query, tree, source)
            .into_iter()
            .filter_map(|m| relationship_from_match(self.language(), path, entities, &m, category))
            .collect()
    }

    /// Complexity score for a captured entity body (§4.5 formula):
    /// `1.0 + params*0.1 + body_lines*0.05 + nesting*0.1 + pointer_or_ref*0.1
    /// + static_or_extern*0.05`, clamped to `[1.0, 100.0]`. Shared default;
    /// languages without the concept of pointers/extern just score 0 for
    /// those terms.
    fn complexity_score(&self, content: &str) -> f64 {
        default_complexity_score(content)
    }
}

fn entity_query_kinds() -> [(QueryName, EntityKind); 6] {
    [
        (QueryName::EntitiesFunction, EntityKind::Function),
        (QueryName::EntitiesClassOrStruct, EntityKind::Class),
        (QueryName::EntitiesVariable, EntityKind::Variable),
        (QueryName::EntitiesImport, EntityKind::Import),
        (QueryName::EntitiesComment, EntityKind::Comment),
        (QueryName::EntitiesAnnotation, EntityKind::Annotation),
    ]
}

fn relationship_query_categories() -> [(QueryName, RelationshipCategory); 8] {
    [
        (QueryName::RelationshipsCall, RelationshipCategory::Call),
        (QueryName::RelationshipsDataFlow, RelationshipCategory::DataFlow),
        (QueryName::RelationshipsControlFlow, RelationshipCategory::ControlFlow),
        (QueryName::RelationshipsInheritance, RelationshipCategory::Inheritance),
        (QueryName::RelationshipsDependency, RelationshipCategory::Dependency),
        (QueryName::RelationshipsLifecycle, RelationshipCategory::Lifecycle),
        (QueryName::RelationshipsSemantic, RelationshipCategory::Semantic),
        (QueryName::RelationshipsConcurrency, RelationshipCategory::Concurrency),
    ]
}

fn entity_from_match(
    language: Language,
    path: &str,
    source: &[u8],
    m: &CapturedMatch,
    kind: EntityKind,
) -> Option<Entity> {
    let def = m.definition()?;
    let name = m
        .capture("name")
        .map(|c| c.text.clone())
        .unwrap_or_else(|| "unnamed".to_string());
    let content = std::str::from_utf8(&source[def.start_byte as usize..def.end_byte as usize])
        .ok()?
        .to_string();
    let location = Location {
        path: path.to_string(),
        start_byte: def.start_byte,
        end_byte: def.end_byte,
        start_line: def.start_line,
        end_line: def.end_line,
    };
    Some(Entity::new(path, kind, name, location, language, content))
}

fn relationship_from_match(
    language: Language,
    path: &str,
    entities: &[Entity],
    m: &CapturedMatch,
    category: RelationshipCategory,
) -> Option<Relationship> {
    let anchor = m.captures.first()?;
    let target_name = m
        .capture("callee")
        .or_else(|| m.capture("dep"))
        .or_else(|| m.capture("parent"))
        .map(|c| c.text.as_str())
        .unwrap_or("<unknown>");

    let from = enclosing_entity(entities, anchor.start_byte)?;
    let to_id = entities
        .iter()
        .find(|e| e.name == target_name)
        .map(|e| e.id)
        .unwrap_or_else(|| crate::digest::stable_id(&[target_name.as_bytes()]));

    let rel_type = category.as_str().replace('-', "_");
    let strength = crate::model::relationship::strength_for_type(&rel_type);
    let location = Location {
        path: path.to_string(),
        start_byte: anchor.start_byte,
        end_byte: anchor.end_byte,
        start_line: anchor.start_line,
        end_line: anchor.end_line,
    };
    Some(
        Relationship::new(category, rel_type, from.id, to_id, location, language)
            .with_strength(strength),
    )
}

fn enclosing_entity(entities: &[Entity], byte_offset: u32) -> Option<&Entity> {
    entities
        .iter()
        .filter(|e| e.location.start_byte <= byte_offset && byte_offset <= e.location.end_byte)
        .min_by_key(|e| e.location.end_byte - e.location.start_byte)
}

/// Parameter count read off the first `(...)` pair in a declaration, empty
/// parens counting as zero. Shared by `default_complexity_score` and entity
/// property derivation so both agree on what a "parameter" is.
#[must_use]
pub fn parameter_count(content: &str) -> Option<usize> {
    let open = content.find('(')?;
    let rest = &content[open..];
    let close = rest.find(')')?;
    let inner = rest[1..close].trim();
    Some(if inner.is_empty() { 0 } else { inner.matches(',').count() + 1 })
}

/// Best-effort return type read off a C-family-style `Type name(...)`
/// prefix (the text before the parameter list, minus the declared name)
/// or a Rust/TypeScript-style `-> Type` suffix. Returns `None` rather than a
/// guess when the prefix is just a keyword (`fn`, `def`, `func`, …) with no
/// type of its own, which covers languages whose return type doesn't live in
/// either of those two positions.
#[must_use]
pub fn return_type_hint(content: &str) -> Option<String> {
    if let Some(arrow) = content.find("->") {
        let after = &content[arrow + 2..];
        let end = after.find('{').unwrap_or(after.len());
        let ty = after[..end].trim();
        if !ty.is_empty() {
            return Some(ty.to_string());
        }
    }
    let paren = content.find('(')?;
    let mut tokens: Vec<&str> = content[..paren].split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    tokens.pop(); // the declared name
    const KEYWORDS: &[&str] = &[
        "fn", "def", "func", "function", "public", "private", "protected", "internal", "static", "async", "pub", "override",
    ];
    while tokens.last().is_some_and(|t| KEYWORDS.contains(t)) {
        tokens.pop();
    }
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

#[must_use]
pub fn default_complexity_score(content: &str) -> f64 {
    let params = parameter_count(content).unwrap_or(0);
    let body_lines = content.lines().count();
    let nesting = content.matches('{').count().max(content.matches(':').count());
    let pointer_or_ref = usize::from(content.contains('&') || content.contains('*'));
    let static_or_extern = usize::from(content.contains("static") || content.contains("extern"));

    let score = 1.0
        + params as f64 * 0.1
        + body_lines as f64 * 0.05
        + nesting as f64 * 0.1
        + pointer_or_ref as f64 * 0.1
        + static_or_extern as f64 * 0.05;
    score.clamp(1.0, 100.0)
}

/// Returns the adapter for `language`, or `None` for languages with no
/// entity/relationship vocabulary (html, css, markdown, plaintext, xml —
/// `Language::has_entity_adapter` is the source of truth this mirrors).
#[must_use]
pub fn for_language(language: Language) -> Option<Box<dyn LanguageAdapter>> {
    Some(match language {
        Language::Rust => Box::new(rust::RustAdapter),
        Language::Go => Box::new(go::GoAdapter),
        Language::Java => Box::new(java::JavaAdapter),
        Language::CSharp => Box::new(csharp::CSharpAdapter),
        Language::Python => Box::new(python::PythonAdapter),
        Language::Php => Box::new(php::PhpAdapter),
        Language::JavaScript => Box::new(javascript::JavaScriptAdapter),
        Language::TypeScript | Language::Tsx => Box::new(typescript::TypeScriptAdapter(language)),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_score_is_clamped_to_expected_range() {
        let tiny = default_complexity_score("fn f() {}");
        assert!((1.0..=100.0).contains(&tiny));
        let huge = default_complexity_score(&"x".repeat(10_000));
        assert!(huge <= 100.0);
    }

    #[test]
    fn languages_without_entity_vocabulary_have_no_adapter() {
        assert!(for_language(Language::Html).is_none());
        assert!(for_language(Language::Markdown).is_none());
    }

    #[test]
    fn every_entity_adapter_language_resolves() {
        for lang in [
            Language::Rust,
            Language::Go,
            Language::Java,
            Language::CSharp,
            Language::Python,
            Language::Php,
            Language::JavaScript,
            Language::TypeScript,
            Language::Tsx,
        ] {
            assert!(for_language(lang).is_some(), "{lang} missing adapter");
        }
    }
}
