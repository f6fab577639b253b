//! C# adapter, grounded on the teacher's `CSharpParser`
//! (`ingest/code/csharp.rs`).

use crate::adapter::LanguageAdapter;
use crate::language::Language;

pub struct CSharpAdapter;

impl LanguageAdapter for CSharpAdapter {
    fn language(&self) -> Language {
        Language::CSharp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    #[test]
    fn extracts_a_class_entity() {
        let registry = ParserRegistry::new();
        let source = b"class Point { int X; int Y; }";
        let tree = registry.parse(source, Language::CSharp).unwrap();
        let entities = CSharpAdapter.entities("f.cs", &tree, source);
        assert!(entities.iter().any(|e| e.name == "Point"));
    }
}
