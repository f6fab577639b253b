//! PHP adapter, grounded on the teacher's `PhpParser`
//! (`ingest/code/php.rs` — not itself retrieved into the pack, inferred
//! from the sibling `rust.rs`/`go.rs`/`java.rs` query-constant pattern).

use crate::adapter::LanguageAdapter;
use crate::language::Language;

pub struct PhpAdapter;

impl LanguageAdapter for PhpAdapter {
    fn language(&self) -> Language {
        Language::Php
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_function_entity() {
        let registry = ParserRegistry::new();
        let source = b"<?php function add($a, $b) { return $a + $b; } ?>";
        let tree = registry.parse(source, Language::Php).unwrap();
        let entities = PhpAdapter.entities("f.php", &tree, source);
        assert!(entities.iter().any(|e| e.name == "add"));
    }
}
