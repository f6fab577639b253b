//! Python adapter, grounded on the teacher's `PythonParser`
//! (`ingest/code/python.rs`).

use crate::adapter::LanguageAdapter;
use crate::language::Language;

pub struct PythonAdapter;

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    /// Python has no pointer/extern vocabulary; indentation-based nesting
    /// substitutes for brace counting in the shared default, which already
    /// falls back to counting `:` when `{` is absent.
    fn complexity_score(&self, content: &str) -> f64 {
        super::default_complexity_score(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_function_entity() {
        let registry = ParserRegistry::new();
        let source = b"def add(a, b):\n    return a + b\n";
        let tree = registry.parse(source, Language::Python).unwrap();
        let entities = PythonAdapter.entities("f.py", &tree, source);
        assert!(entities.iter().any(|e| e.name == "add"));
    }
}
