//! JavaScript adapter, grounded on the teacher's `JavaScriptParser`
//! (`ingest/code/javascript.rs`).

use crate::adapter::LanguageAdapter;
use crate::language::Language;

pub struct JavaScriptAdapter;

impl LanguageAdapter for JavaScriptAdapter {
    fn language(&self) -> Language {
        Language::JavaScript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_function_entity() {
        let registry = ParserRegistry::new();
        let source = b"function add(a, b) { return a + b; }";
        let tree = registry.parse(source, Language::JavaScript).unwrap();
        let entities = JavaScriptAdapter.entities("f.js", &tree, source);
        assert!(entities.iter().any(|e| e.name == "add"));
    }
}
