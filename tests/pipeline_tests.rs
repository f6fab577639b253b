//! Integration tests driving the public `Pipeline::run` entry point end to
//! end, covering the concrete scenarios the design calls out: an empty
//! file, a short function, a call relationship, the lone-closing-brace
//! pathology, a markdown file with a fenced code block, and an oversize
//! declaration.

use codecore_pipeline::config::PipelineConfig;
use codecore_pipeline::language::Language;
use codecore_pipeline::model::chunk::ChunkStrategy;
use codecore_pipeline::model::relationship::RelationshipCategory;
use codecore_pipeline::{Pipeline, SourceUnit};

fn pipeline() -> (Pipeline, PipelineConfig) {
    let config = PipelineConfig::default();
    (Pipeline::new(&config), config)
}

#[test]
fn empty_file_yields_no_chunks_no_entities_no_errors() {
    let (pipeline, config) = pipeline();
    let unit = SourceUnit::new("empty.rs", Vec::new());
    let result = pipeline.run(&unit, &config);

    assert!(result.chunks.is_empty());
    assert!(result.entities.is_empty());
    assert!(result.relationships.is_empty());
    assert!(!result.has_errors());
}

#[test]
fn single_short_rust_function_is_one_ast_chunk_with_a_matching_entity() {
    let (pipeline, config) = pipeline();
    let source = b"fn greet(name: &str) -> String {\n    format!(\"hi {name}\")\n}\n".to_vec();
    let unit = SourceUnit::new("greet.rs", source);
    let result = pipeline.run(&unit, &config);

    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].strategy, ChunkStrategy::Ast);
    assert!(result.entities.iter().any(|e| e.name == "greet"));
}

#[test]
fn a_call_between_two_functions_produces_a_call_relationship() {
    let (pipeline, config) = pipeline();
    let source = b"fn caller() {\n    callee();\n}\n\nfn callee() {}\n".to_vec();
    let unit = SourceUnit::new("calls.rs", source);
    let result = pipeline.run(&unit, &config);

    assert!(result
        .relationships
        .iter()
        .any(|r| r.category == RelationshipCategory::Call));
}

#[test]
fn go_file_with_dense_short_functions_never_emits_a_lone_closing_brace_chunk() {
    let (pipeline, config) = pipeline();
    let mut source = String::new();
    for i in 0..200 {
        source.push_str(&format!("func f{i}() int {{\n    return {i}\n}}\n\n"));
    }
    let unit = SourceUnit::new("dense.go", source.into_bytes()).with_language_hint(Language::Go);
    let result = pipeline.run(&unit, &config);

    assert!(!result.chunks.iter().any(|c| c.content.trim() == "}"));
    assert!(result.chunks.iter().all(|c| !c.content.trim().is_empty()));
}

#[test]
fn markdown_file_keeps_a_fenced_code_block_intact_in_one_chunk() {
    let (pipeline, config) = pipeline();
    let source = "# Notes\n\nSome prose.\n\n```rust\nfn f() {\n    // still inside the fence\n}\n```\n\nMore prose.\n";
    let unit = SourceUnit::new("notes.md", source.as_bytes().to_vec());
    let result = pipeline.run(&unit, &config);

    assert!(!result.chunks.is_empty());
    let fenced = result.chunks.iter().find(|c| c.content.contains("```rust"));
    let fenced = fenced.expect("a chunk containing the fence open marker");
    assert!(fenced.content.contains("```\n") || fenced.content.trim_end().ends_with("```"));
}

#[test]
fn oversize_leaf_declaration_stays_one_chunk_with_full_byte_coverage() {
    let mut config = PipelineConfig::default();
    config.chunking.max_chunk_bytes = 64;
    let pipeline = Pipeline::new(&config);

    let body = "x".repeat(400);
    let source = format!("fn huge() {{\n    let s = \"{body}\";\n}}\n");
    let unit = SourceUnit::new("huge.rs", source.clone().into_bytes());
    let result = pipeline.run(&unit, &config);

    assert_eq!(result.chunks.len(), 1);
    let chunk = &result.chunks[0];
    assert!(chunk.is_oversize());
    assert_eq!(chunk.content, source);
    assert_eq!(chunk.end_byte - chunk.start_byte, chunk.content.len() as u32);
}

#[test]
fn binary_file_is_skipped_with_no_chunks_and_no_panic() {
    let (pipeline, config) = pipeline();
    let unit = SourceUnit::new("blob.bin", vec![0u8, 159, 146, 150, 1, 2, 3]);
    let result = pipeline.run(&unit, &config);

    assert!(result.chunks.is_empty());
    assert!(result.entities.is_empty());
}

#[test]
fn repeated_runs_on_the_same_bytes_are_idempotent() {
    let (pipeline, config) = pipeline();
    let source = b"fn a() {}\nfn b() { a(); }\n".to_vec();
    let unit = SourceUnit::new("idempotent.rs", source);

    let first = pipeline.run(&unit, &config);
    let second = pipeline.run(&unit, &config);

    assert_eq!(first.chunks.len(), second.chunks.len());
    let mut first_ids: Vec<u64> = first.entities.iter().map(|e| e.id).collect();
    let mut second_ids: Vec<u64> = second.entities.iter().map(|e| e.id).collect();
    first_ids.sort_unstable();
    second_ids.sort_unstable();
    assert_eq!(first_ids, second_ids);

    let stats = pipeline.cache_stats();
    assert!(stats.hits >= 1);
}
