//! Rust adapter, grounded on the teacher's `RustParser`
//! (`ingest/code/rust.rs`) query set, generalized to the trait's shared
//! capture-to-entity mapping instead of a bespoke extraction loop.

use tree_sitter::Tree;

use super::{default_complexity_score, LanguageAdapter};
use crate::language::Language;
use crate::model::entity::{Entity, EntityKind};

pub struct RustAdapter;

impl LanguageAdapter for RustAdapter {
    fn language(&self) -> Language {
        Language::Rust
    }

    /// Rust nests `fn` inside `impl` blocks; the shared default treats every
    /// `EntitiesClassOrStruct` match (which includes `impl_item`) as a
    /// `Class` entity, which is enough to anchor method calls to their
    /// enclosing impl for relationship resolution (§4.5) without a second
    /// nested-method pass.
    fn entities(&self, path: &str, tree: &Tree, source: &[u8]) -> Vec<Entity> {
        let mut out = self.entities_for(path, tree, source, crate::query::QueryName::EntitiesFunction, EntityKind::Function);
        out.extend(self.entities_for(path, tree, source, crate::query::QueryName::EntitiesClassOrStruct, EntityKind::Struct));
        out.extend(self.entities_for(path, tree, source, crate::query::QueryName::EntitiesVariable, EntityKind::Constant));
        out.extend(self.entities_for(path, tree, source, crate::query::QueryName::EntitiesImport, EntityKind::Import));
        out.extend(self.entities_for(path, tree, source, crate::query::QueryName::EntitiesAnnotation, EntityKind::Annotation));
        out.extend(self.entities_for(path, tree, source, crate::query::QueryName::EntitiesComment, EntityKind::Comment));
        out
    }

    fn complexity_score(&self, content: &str) -> f64 {
        default_complexity_score(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_function_entity() {
        let registry = ParserRegistry::new();
        let source = b"fn add(a: i32, b: i32) -> i32 { a + b }";
        let tree = registry.parse(source, Language::Rust).unwrap();
        let entities = RustAdapter.entities("f.rs", &tree, source);
        assert!(entities.iter().any(|e| e.name == "add" && e.kind == EntityKind::Function));
    }

    #[test]
    fn function_entity_carries_parameter_count_return_type_and_complexity() {
        let registry = ParserRegistry::new();
        let source = b"fn add(a: i32, b: i32) -> i32 { a + b }";
        let tree = registry.parse(source, Language::Rust).unwrap();
        let entities = RustAdapter.entities("f.rs", &tree, source);
        let add = entities.iter().find(|e| e.name == "add").unwrap();
        assert_eq!(add.properties.get("parameterCount").and_then(serde_json::Value::as_u64), Some(2));
        assert_eq!(add.properties.get("returnType").and_then(serde_json::Value::as_str), Some("i32"));
        assert!(add.properties.contains_key("complexityScore"));
    }

    #[test]
    fn extracts_a_struct_entity() {
        let registry = ParserRegistry::new();
        let source = b"struct Point { x: i32, y: i32 }";
        let tree = registry.parse(source, Language::Rust).unwrap();
        let entities = RustAdapter.entities("f.rs", &tree, source);
        assert!(entities.iter().any(|e| e.name == "Point"));
    }
}
