//! Compiles the checked-in generated table against the AST and compares it
//! with a fresh parse of the source it was generated from.

use std::collections::BTreeMap;

use jqdefs_core::{FuncDef, parse_program};

/// Stands in for the namespace the generated file imports with `crate::ast::*`.
mod ast {
    pub use jqdefs_core::ast::*;
}

mod generated {
    include!("../../jqdefs-gen/tests/fixtures/golden.rs");
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Parses, minifies and groups the golden source by name.
fn parsed_table() -> BTreeMap<String, Vec<FuncDef>> {
    let source = include_str!("../../jqdefs-gen/tests/fixtures/golden.jq");
    let mut table: BTreeMap<String, Vec<FuncDef>> = BTreeMap::new();
    for mut def in parse_program(source).expect("golden source should parse") {
        def.minify();
        table.entry(def.name.clone()).or_default().push(def);
    }
    table
}

#[test]
fn test_generated_table_matches_source() {
    let generated: BTreeMap<String, Vec<FuncDef>> = generated::BUILTIN_FUNC_DEFS
        .iter()
        .map(|(name, defs)| (name.to_string(), defs.clone()))
        .collect();
    assert_eq!(generated, parsed_table());
}

#[test]
fn test_generated_table_keeps_overload_order() {
    let map = &generated::BUILTIN_FUNC_DEFS["map"];
    let arities: Vec<_> = map.iter().map(FuncDef::arity).collect();
    assert_eq!(arities, [0, 1]);
}
