//! Generator for embeddable tables of jq builtin definitions.
//!
//! A run reads a definition source, parses and minifies every definition,
//! groups them by name and prints the table as a Rust `static` that the
//! evaluator crate compiles in place of parsing the source at startup.
//!
//! # Example
//!
//! ```
//! use jqdefs_gen::{GeneratorConfig, generate_source};
//!
//! let text = generate_source("def map(f): [.[] | f];", &GeneratorConfig::default()).unwrap();
//! assert!(text.starts_with("// Code generated by jqdefs-gen; DO NOT EDIT."));
//! assert!(text.contains("(\"map\", vec![FuncDef {"));
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod group;
pub mod render;

use std::fs;
use std::path::Path;

use jqdefs_core::{ToLiteral, parse_program};

pub use config::GeneratorConfig;
pub use emit::{emit, write_output};
pub use error::{GenError, GenResult, RenderError, RenderResult};
pub use group::{DefinitionGroupTable, group_definitions};
pub use render::{EnumFamily, RenderOptions, RenderedLiteral, render_literal};

/// Turns a definition source into the text of the generated file.
pub fn generate_source(source: &str, config: &GeneratorConfig) -> GenResult<String> {
    let mut defs = parse_program(source)?;
    tracing::debug!(count = defs.len(), "parsed definitions");

    for def in &mut defs {
        def.minify();
    }

    let table = group_definitions(defs);
    if table.is_empty() {
        tracing::warn!("no definitions found, generating an empty table");
    }
    tracing::debug!(names = table.len(), "grouped definitions");

    let literal = render_literal(&table.to_literal(), &config.render_options())?;
    Ok(emit(&literal, config))
}

/// Reads `input`, generates the table and writes it to `output`, or to
/// stdout. Nothing is written unless every earlier step succeeds.
pub fn generate_file(
    input: &Path,
    output: Option<&Path>,
    config: &GeneratorConfig,
) -> GenResult<()> {
    let source = fs::read_to_string(input).map_err(|e| GenError::Read {
        path: input.to_path_buf(),
        message: e.to_string(),
    })?;

    let text = generate_source(&source, config)?;
    write_output(&text, output)?;

    match output {
        Some(path) => tracing::info!("wrote {}", path.display()),
        None => tracing::debug!("wrote generated table to stdout"),
    }
    Ok(())
}
