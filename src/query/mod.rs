//! Query Registry (C2) — a static `(Language, QueryName) -> query source`
//! catalog. Generalizes the teacher's per-file `CHUNK_QUERY_SRC`/
//! `REF_QUERY_SRC` constants (one pair per language file, e.g.
//! `ingest/code/rust.rs`, `ingest/code/go.rs`) into named, per-capability
//! query strings so C5 adapters ask for "give me this language's `call`
//! relationship query" instead of each language file hand-rolling its own
//! monolithic query and capture-name switch. New languages are added purely
//! by filling in a row of this table (§4.2).

pub mod engine;

use crate::error::{PipelineError, Result};
use crate::language::Language;
use tree_sitter::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum QueryName {
    EntitiesFunction,
    EntitiesClassOrStruct,
    EntitiesVariable,
    EntitiesImport,
    EntitiesComment,
    EntitiesAnnotation,
    RelationshipsCall,
    RelationshipsDataFlow,
    RelationshipsControlFlow,
    RelationshipsInheritance,
    RelationshipsDependency,
    RelationshipsLifecycle,
    RelationshipsSemantic,
    RelationshipsConcurrency,
}

impl QueryName {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntitiesFunction => "entities.function",
            Self::EntitiesClassOrStruct => "entities.class_or_struct",
            Self::EntitiesVariable => "entities.variable",
            Self::EntitiesImport => "entities.import",
            Self::EntitiesComment => "entities.comment",
            Self::EntitiesAnnotation => "entities.annotation",
            Self::RelationshipsCall => "relationships.call",
            Self::RelationshipsDataFlow => "relationships.data_flow",
            Self::RelationshipsControlFlow => "relationships.control_flow",
            Self::RelationshipsInheritance => "relationships.inheritance",
            Self::RelationshipsDependency => "relationships.dependency",
            Self::RelationshipsLifecycle => "relationships.lifecycle",
            Self::RelationshipsSemantic => "relationships.semantic",
            Self::RelationshipsConcurrency => "relationships.concurrency",
        }
    }
}

/// Returns `None` when `language` has no query registered under `name` —
/// callers treat a missing query as "this capability doesn't apply to this
/// language" rather than an error (§4.2 capture-miss fallback, carried
/// through to C5's fallback-on-capture-miss logic).
#[must_use]
pub fn source_for(language: Language, name: QueryName) -> Option<&'static str> {
    use Language::*;
    use QueryName::*;
    Some(match (language, name) {
        (Rust, EntitiesFunction) => {
            "(function_item name: (identifier) @name) @def"
        }
        (Rust, EntitiesClassOrStruct) => {
            r"
            (struct_item name: (type_identifier) @name) @def
            (enum_item name: (type_identifier) @name) @def
            (trait_item name: (type_identifier) @name) @def
            (impl_item type: (type_identifier) @name) @def
            "
        }
        (Rust, EntitiesVariable) => {
            r"
            (const_item name: (identifier) @name) @def
            (static_item name: (identifier) @name) @def
            "
        }
        (Rust, EntitiesImport) => "(use_declaration) @def",
        (Rust, EntitiesComment) => "(line_comment) @def (block_comment) @def",
        (Rust, EntitiesAnnotation) => "(attribute_item) @def",
        (Rust, RelationshipsCall) => {
            r"
            (call_expression function: (identifier) @callee) @call
            (call_expression function: (scoped_identifier name: (identifier) @callee)) @call
            (call_expression function: (field_expression field: (field_identifier) @callee)) @call
            "
        }
        (Rust, RelationshipsDataFlow) => {
            "(let_declaration pattern: (identifier) @target value: (_) @source) @flow"
        }
        (Rust, RelationshipsControlFlow) => {
            r"
            (if_expression) @control
            (match_expression) @control
            (while_expression) @control
            (loop_expression) @control
            "
        }
        (Rust, RelationshipsInheritance) => {
            "(impl_item trait: (type_identifier) @trait_name type: (type_identifier) @type_name) @inherit"
        }
        (Rust, RelationshipsDependency) => {
            r"
            (use_declaration argument: (scoped_identifier) @dep)
            (use_declaration argument: (identifier) @dep)
            "
        }
        (Rust, RelationshipsLifecycle) => {
            r#"
            (call_expression function: (identifier) @ctor (#match? @ctor "^(new|default|with_capacity)$")) @lifecycle
            "#
        }
        (Rust, RelationshipsConcurrency) => {
            r#"
            (call_expression function: (scoped_identifier name: (identifier) @op (#match? @op "^(spawn|lock|send|recv)$"))) @concurrency
            "#
        }

        (Go, EntitiesFunction) => {
            r"
            (function_declaration name: (identifier) @name) @def
            (method_declaration name: (field_identifier) @name) @def
            "
        }
        (Go, EntitiesClassOrStruct) => {
            "(type_declaration (type_spec name: (type_identifier) @name)) @def"
        }
        (Go, EntitiesImport) => "(import_declaration) @def",
        (Go, EntitiesComment) => "(comment) @def",
        (Go, RelationshipsCall) => {
            r"
            (call_expression function: (identifier) @callee) @call
            (call_expression function: (selector_expression field: (field_identifier) @callee)) @call
            "
        }
        (Go, RelationshipsDependency) => "(import_spec path: (interpreted_string_literal) @dep)",
        (Go, RelationshipsConcurrency) => {
            r"
            (go_statement) @concurrency
            (send_statement) @concurrency
            "
        }
        (Go, RelationshipsControlFlow) => {
            r"
            (if_statement) @control
            (for_statement) @control
            (select_statement) @control
            "
        }

        (Java, EntitiesFunction) => {
            r"
            (method_declaration name: (identifier) @name) @def
            (constructor_declaration name: (identifier) @name) @def
            "
        }
        (Java, EntitiesClassOrStruct) => {
            r"
            (class_declaration name: (identifier) @name) @def
            (interface_declaration name: (identifier) @name) @def
            (enum_declaration name: (identifier) @name) @def
            "
        }
        (Java, EntitiesImport) => "(import_declaration) @def",
        (Java, EntitiesAnnotation) => "(annotation) @def (marker_annotation) @def",
        (Java, RelationshipsCall) => "(method_invocation name: (identifier) @callee) @call",
        (Java, RelationshipsInheritance) => {
            r"
            (class_declaration superclass: (superclass (type_identifier) @parent)) @inherit
            (class_declaration interfaces: (super_interfaces (type_list (type_identifier) @parent))) @inherit
            "
        }
        (Java, RelationshipsConcurrency) => {
            "(method_invocation name: (identifier) @op (#match? @op \"^(start|run|lock|unlock|notify|wait)$\")) @concurrency"
        }
        (Java, RelationshipsControlFlow) => {
            r"
            (if_statement) @control
            (for_statement) @control
            (while_statement) @control
            (try_statement) @control
            "
        }

        (CSharp, EntitiesFunction) => "(method_declaration name: (identifier) @name) @def",
        (CSharp, EntitiesClassOrStruct) => {
            r"
            (class_declaration name: (identifier) @name) @def
            (struct_declaration name: (identifier) @name) @def
            (interface_declaration name: (identifier) @name) @def
            "
        }
        (CSharp, EntitiesImport) => "(using_directive) @def",
        (CSharp, RelationshipsCall) => "(invocation_expression function: (identifier) @callee) @call",
        (CSharp, RelationshipsInheritance) => {
            "(base_list (identifier) @parent) @inherit"
        }
        (CSharp, RelationshipsConcurrency) => {
            "(invocation_expression function: (identifier) @op (#match? @op \"^(Lock|Wait|Pulse|Start)$\")) @concurrency"
        }

        (Python, EntitiesFunction) => "(function_definition name: (identifier) @name) @def",
        (Python, EntitiesClassOrStruct) => "(class_definition name: (identifier) @name) @def",
        (Python, EntitiesImport) => {
            r"
            (import_statement) @def
            (import_from_statement) @def
            "
        }
        (Python, EntitiesAnnotation) => "(decorator) @def",
        (Python, EntitiesComment) => "(comment) @def",
        (Python, RelationshipsCall) => {
            r"
            (call function: (identifier) @callee) @call
            (call function: (attribute attribute: (identifier) @callee)) @call
            "
        }
        (Python, RelationshipsDependency) => {
            r"
            (import_statement name: (dotted_name) @dep)
            (import_from_statement module_name: (dotted_name) @dep)
            "
        }
        (Python, RelationshipsInheritance) => {
            "(class_definition superclasses: (argument_list (identifier) @parent)) @inherit"
        }
        (Python, RelationshipsConcurrency) => {
            "(call function: (attribute attribute: (identifier) @op (#match? @op \"^(acquire|release|start|join)$\"))) @concurrency"
        }
        (Python, RelationshipsControlFlow) => {
            r"
            (if_statement) @control
            (for_statement) @control
            (while_statement) @control
            (try_statement) @control
            "
        }

        (Php, EntitiesFunction) => {
            r"
            (function_definition name: (name) @name) @def
            (method_declaration name: (name) @name) @def
            "
        }
        (Php, EntitiesClassOrStruct) => {
            r"
            (class_declaration name: (name) @name) @def
            (interface_declaration name: (name) @name) @def
            "
        }
        (Php, EntitiesImport) => "(namespace_use_declaration) @def",
        (Php, RelationshipsCall) => "(function_call_expression function: (name) @callee) @call",
        (Php, RelationshipsInheritance) => {
            "(base_clause (name) @parent) @inherit"
        }

        (JavaScript | TypeScript | Tsx, EntitiesFunction) => {
            r"
            (function_declaration name: (identifier) @name) @def
            (method_definition name: (property_identifier) @name) @def
            "
        }
        (JavaScript | TypeScript | Tsx, EntitiesClassOrStruct) => {
            "(class_declaration name: (identifier) @name) @def"
        }
        (JavaScript | TypeScript | Tsx, EntitiesVariable) => {
            "(variable_declarator name: (identifier) @name value: (_) @value) @def"
        }
        (JavaScript | TypeScript | Tsx, EntitiesImport) => "(import_statement) @def",
        (JavaScript | TypeScript | Tsx, EntitiesComment) => "(comment) @def",
        (JavaScript | TypeScript | Tsx, RelationshipsCall) => {
            r"
            (call_expression function: (identifier) @callee) @call
            (call_expression function: (member_expression property: (property_identifier) @callee)) @call
            "
        }
        (JavaScript | TypeScript | Tsx, RelationshipsInheritance) => {
            "(class_heritage (extends_clause value: (identifier) @parent)) @inherit"
        }
        (JavaScript | TypeScript | Tsx, RelationshipsDependency) => {
            "(import_statement source: (string) @dep)"
        }
        (JavaScript | TypeScript | Tsx, RelationshipsConcurrency) => {
            "(call_expression function: (identifier) @op (#match? @op \"^(setTimeout|setInterval|Promise)$\")) @concurrency"
        }
        (JavaScript | TypeScript | Tsx, RelationshipsControlFlow) => {
            r"
            (if_statement) @control
            (for_statement) @control
            (while_statement) @control
            "
        }

        (Html, EntitiesComment) => "(comment) @def",
        (Css, EntitiesComment) => "(comment) @def",

        _ => return None,
    })
}

/// Compiles `source_for(language, name)`, if registered, into a tree-sitter
/// `Query`. Compile failures are a programmer error in this crate's own
/// catalog, not a runtime condition callers can recover from — surfaced as
/// `PipelineError::QueryCompile` so the failing `(language, name)` pair is
/// visible rather than panicking deep inside adapter code (§4.2).
pub fn compile(language: Language, name: QueryName) -> Result<Option<Query>> {
    let Some(src) = source_for(language, name) else {
        return Ok(None);
    };
    let ts_lang = crate::parser::language_for_query(language)?;
    Query::new(&ts_lang, src)
        .map(Some)
        .map_err(|e| PipelineError::QueryCompile {
            language: language.as_str().to_string(),
            query: name.as_str().to_string(),
            detail: e.to_string(),
        })
}
