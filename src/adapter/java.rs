//! Java adapter, grounded on the teacher's `JavaParser`
//! (`ingest/code/java.rs`).

use crate::adapter::LanguageAdapter;
use crate::language::Language;

pub struct JavaAdapter;

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_class_entity() {
        let registry = ParserRegistry::new();
        let source = b"class Point { int x; int y; }";
        let tree = registry.parse(source, Language::Java).unwrap();
        let entities = JavaAdapter.entities("f.java", &tree, source);
        assert!(entities.iter().any(|e| e.name == "Point"));
    }
}
