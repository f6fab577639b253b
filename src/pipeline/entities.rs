//! Entity/Relationship Pipeline (C11) — runs every query in a language's
//! catalog, normalizes matches via the adapter (C5), merges into
//! deduplicated entity/relationship buffers, and emits both in ascending
//! start-byte order with entities before relationships at the same offset
//! (§4.11). One query failing only drops that query's output; `adapter()`
//! already treats a missing/uncompilable query as an empty result rather
//! than propagating an error, so this module's job is purely the merge and
//! ordering step.

use std::collections::HashSet;

use tree_sitter::Tree;

use crate::adapter;
use crate::language::Language;
use crate::model::entity::Entity;
use crate::model::relationship::Relationship;

#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

/// Runs C11 for one file that has a parsed tree. Returns an empty result
/// for languages with no registered adapter (html, css, markup languages),
/// matching `Language::has_entity_adapter`.
#[must_use]
pub fn extract(path: &str, language: Language, tree: &Tree, source: &[u8]) -> ExtractionResult {
    let Some(adapter) = adapter::for_language(language) else {
        return ExtractionResult::default();
    };

    let mut entities = adapter.entities(path, tree, source);
    dedup_by_id(&mut entities, |e| e.id);
    entities.sort_by_key(|e| e.location.start_byte);

    let mut relationships = adapter.relationships(path, tree, source, &entities);
    dedup_by_id(&mut relationships, |r| r.id);
    relationships.sort_by_key(|r| r.location.start_byte);

    ExtractionResult { entities, relationships }
}

fn dedup_by_id<T>(items: &mut Vec<T>, id_of: impl Fn(&T) -> u64) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(id_of(item)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_entities_and_relationships_in_byte_order() {
        let registry = ParserRegistry::new();
        let source = b"fn a() { b() }\nfn b() {}\n";
        let tree = registry.parse(source, Language::Rust).unwrap();
        let result = extract("f.rs", Language::Rust, &tree, source);
        assert!(result.entities.len() >= 2);
        for pair in result.entities.windows(2) {
            assert!(pair[0].location.start_byte <= pair[1].location.start_byte);
        }
    }

    #[test]
    fn languages_without_an_adapter_produce_nothing() {
        let registry = ParserRegistry::new();
        let source = b"<div></div>";
        let tree = registry.parse(source, Language::Html).unwrap();
        let result = extract("f.html", Language::Html, &tree, source);
        assert!(result.entities.is_empty());
        assert!(result.relationships.is_empty());
    }

    #[test]
    fn duplicate_ids_are_collapsed() {
        let registry = ParserRegistry::new();
        let source = b"fn a() {}\n";
        let tree = registry.parse(source, Language::Rust).unwrap();
        let result = extract("f.rs", Language::Rust, &tree, source);
        let ids: HashSet<u64> = result.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), result.entities.len());
    }
}
