//! Integration tests for the generator pipeline.

use std::fs;
use std::path::PathBuf;

use jqdefs_gen::{GenError, GeneratorConfig, generate_file, generate_source};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn generate(source: &str) -> String {
    generate_source(source, &GeneratorConfig::default()).expect("generation should succeed")
}

/// Lines of the generated map, one per definition name.
fn entry_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| line.starts_with("        (\"")).collect()
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn test_overloads_share_one_entry() {
    let text = generate("def map: .; def map(f): [.[] | f];");
    let entries = entry_lines(&text);
    assert_eq!(entries.len(), 1);

    let line = entries[0];
    assert!(line.starts_with("        (\"map\", vec![FuncDef { name: String::from(\"map\")"));
    let zero_arity = line.find("body: Box::new(Query { func: String::from(\".\")").unwrap();
    let one_arity = line.find("args: vec![String::from(\"f\")]").unwrap();
    assert!(zero_arity < one_arity);
}

#[test]
fn test_entries_sorted_by_name() {
    let text = generate("def zip: 1; def add: 2; def map: 3; def empty: 4;");
    let names: Vec<_> = entry_lines(&text)
        .iter()
        .map(|line| line.trim_start().split(',').next().unwrap())
        .collect();
    assert_eq!(names, ["(\"add\"", "(\"empty\"", "(\"map\"", "(\"zip\""]);
}

#[test]
fn test_output_is_deterministic() {
    let source = fs::read_to_string(fixture("builtin.jq")).unwrap();
    let first = generate(&source);
    for _ in 0..5 {
        assert_eq!(generate(&source), first);
    }
}

#[test]
fn test_symbolic_enum_names() {
    let source = fs::read_to_string(fixture("builtin.jq")).unwrap();
    let text = generate(&source);

    assert!(text.contains("op: Some(Operator::Pipe)"));
    assert!(text.contains("op: Some(Operator::Comma)"));
    assert!(text.contains("op: Some(Operator::Modify)"));
    assert!(text.contains("op: Some(Operator::UpdateAlt)"));
    assert!(text.contains("op: Operator::Sub"));
    assert!(text.contains("kind: TermKind::Reduce"));
    assert!(text.contains("kind: TermKind::Label"));
    assert!(!text.contains("op: Some(1)"));
}

#[test]
fn test_namespace_qualifier_removed() {
    let source = fs::read_to_string(fixture("builtin.jq")).unwrap();
    let text = generate(&source);

    assert!(!text.contains("jqdefs_core::ast::"));
    assert!(text.contains("LazyLock<BTreeMap<&'static str, Vec<FuncDef>>>"));
}

#[test]
fn test_header_and_imports() {
    let config = GeneratorConfig {
        variable: "FUNC_DEFS".to_string(),
        namespace: "crate::syntax".to_string(),
        ..GeneratorConfig::default()
    };
    let text = generate_source("def f: 1;", &config).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("// Code generated by jqdefs-gen; DO NOT EDIT.")
    );
    assert!(text.contains("use crate::syntax::*;"));
    assert!(text.contains("pub static FUNC_DEFS:"));
}

#[test]
fn test_empty_source_generates_empty_table() {
    let text = generate("# nothing here\n");
    assert!(entry_lines(&text).is_empty());
    assert!(text.contains("BTreeMap::from([])"));
}

#[test]
fn test_generated_file_parses_as_rust() {
    let source = fs::read_to_string(fixture("builtin.jq")).unwrap();
    let text = generate(&source);
    syn::parse_file(&text).expect("generated file should be valid Rust");
}

#[test]
fn test_golden_output() {
    let source = fs::read_to_string(fixture("golden.jq")).unwrap();
    let expected = fs::read_to_string(fixture("golden.rs")).unwrap();
    assert_eq!(generate(&source), expected);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_parse_error_reports_location() {
    let err = generate_source("def f: .;\ndef g: (.;", &GeneratorConfig::default()).unwrap_err();
    let GenError::Parse(parse) = &err else {
        panic!("expected parse error, got {err:?}");
    };
    assert_eq!(parse.line, 2);
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("builtin.rs");

    let err = generate_file(
        &dir.path().join("missing.jq"),
        Some(&output),
        &GeneratorConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GenError::Read { .. }));
    assert!(!output.exists());
}

#[test]
fn test_parse_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.jq");
    let output = dir.path().join("builtin.rs");
    fs::write(&input, "def broken: [;").unwrap();

    let err = generate_file(&input, Some(&output), &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, GenError::Parse(_)));
    assert!(!output.exists());
}

#[test]
fn test_generate_file_writes_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("builtin.rs");

    generate_file(&fixture("builtin.jq"), Some(&output), &GeneratorConfig::default()).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    let expected = generate(&fs::read_to_string(fixture("builtin.jq")).unwrap());
    assert_eq!(written, expected);
}
