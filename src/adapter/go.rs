//! Go adapter, grounded on the teacher's `GoParser` (`ingest/code/go.rs`).

use crate::adapter::LanguageAdapter;
use crate::language::Language;

pub struct GoAdapter;

impl LanguageAdapter for GoAdapter {
    fn language(&self) -> Language {
        Language::Go
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_function_entity() {
        let registry = ParserRegistry::new();
        let source = b"func Add(a int, b int) int { return a + b }";
        let tree = registry.parse(source, Language::Go).unwrap();
        let entities = GoAdapter.entities("f.go", &tree, source);
        assert!(entities.iter().any(|e| e.name == "Add"));
    }
}
