//! TypeScript/TSX adapter, grounded on the teacher's `TypeScriptParser`
//! (`ingest/code/typescript.rs`), which the teacher's dispatcher reused for
//! both the `.ts` and `.tsx` grammars via `new()`/`new_tsx()`. Here the
//! Parser Registry (C1) already picks the right grammar from `Language`, so
//! one adapter struct covers both.

use crate::adapter::LanguageAdapter;
use crate::language::Language;

pub struct TypeScriptAdapter(pub Language);

impl LanguageAdapter for TypeScriptAdapter {
    fn language(&self) -> Language {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_function_entity() {
        let registry = ParserRegistry::new();
        let source = b"function add(a: number, b: number): number { return a + b; }";
        let tree = registry.parse(source, Language::TypeScript).unwrap();
        let entities = TypeScriptAdapter(Language::TypeScript).entities("f.ts", &tree, source);
        assert!(entities.iter().any(|e| e.name == "add"));
    }
}
