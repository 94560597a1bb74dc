//! Assembly and output of the generated file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::render::RenderedLiteral;

/// Builds the full text of the generated file.
pub fn emit(literal: &RenderedLiteral, config: &GeneratorConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// Code generated by {}; DO NOT EDIT.\n\n",
        config.generator
    ));
    out.push_str("use std::collections::BTreeMap;\n");
    out.push_str("use std::sync::LazyLock;\n\n");
    out.push_str(&format!("use {}::*;\n\n", config.namespace));
    out.push_str("#[rustfmt::skip]\n");
    out.push_str(&format!(
        "pub static {}: LazyLock<{}> = LazyLock::new(|| {{\n",
        config.variable, literal.ty
    ));

    if literal.entries.is_empty() {
        out.push_str("    BTreeMap::from([])\n");
    } else {
        out.push_str("    BTreeMap::from([\n");
        for (key, value) in &literal.entries {
            out.push_str(&format!("        ({key:?}, {value}),\n"));
        }
        out.push_str("    ])\n");
    }
    out.push_str("});\n");
    out
}

/// Writes `text` to `output`, or to stdout when no path is given. The file
/// is only created once the text is complete.
pub fn write_output(text: &str, output: Option<&Path>) -> GenResult<()> {
    match output {
        Some(path) => fs::write(path, text).map_err(|e| GenError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| GenError::Write {
                    path: "<stdout>".into(),
                    message: e.to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(entries: Vec<(&str, &str)>) -> RenderedLiteral {
        RenderedLiteral {
            ty: "BTreeMap<&'static str, Vec<FuncDef>>".to_string(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_emit_layout() {
        let text = emit(
            &literal(vec![("add", "vec![]"), ("map", "vec![]")]),
            &GeneratorConfig::default(),
        );
        let expected = "\
// Code generated by jqdefs-gen; DO NOT EDIT.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::ast::*;

#[rustfmt::skip]
pub static BUILTIN_FUNC_DEFS: LazyLock<BTreeMap<&'static str, Vec<FuncDef>>> = LazyLock::new(|| {
    BTreeMap::from([
        (\"add\", vec![]),
        (\"map\", vec![]),
    ])
});
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_emit_empty_table() {
        let text = emit(&literal(vec![]), &GeneratorConfig::default());
        assert!(text.contains("    BTreeMap::from([])\n});\n"));
    }

    #[test]
    fn test_emit_uses_config_names() {
        let config = GeneratorConfig {
            variable: "DEFS".to_string(),
            namespace: "jq::ast".to_string(),
            ..GeneratorConfig::default()
        };
        let text = emit(&literal(vec![]), &config);
        assert!(text.contains("use jq::ast::*;"));
        assert!(text.contains("pub static DEFS: LazyLock<"));
    }

    #[test]
    fn test_write_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builtin.rs");
        write_output("generated\n", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "generated\n");
    }

    #[test]
    fn test_write_output_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("builtin.rs");
        let err = write_output("x", Some(&path)).unwrap_err();
        assert!(matches!(err, GenError::Write { .. }));
    }
}
