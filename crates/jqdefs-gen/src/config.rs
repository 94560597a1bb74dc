//! Generator configuration.

use jqdefs_core::{NAMESPACE, Operator, TermKind, ToLiteral};

use crate::render::{EnumFamily, RenderOptions};

/// Name of the generated static.
pub const DEFAULT_VARIABLE: &str = "BUILTIN_FUNC_DEFS";

/// Namespace the generated file is compiled into.
pub const DEFAULT_NAMESPACE: &str = "crate::ast";

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Name of the generated static holding the table.
    pub variable: String,
    /// Path imported with a glob by the generated file. The AST types must
    /// be reachable through it unqualified.
    pub namespace: String,
    /// Qualifier removed from rendered paths, including the trailing `::`.
    pub qualifier: String,
    /// Generator name written into the header comment.
    pub generator: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            qualifier: format!("{NAMESPACE}::"),
            generator: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Printer settings: both enum families rendered symbolically and the
    /// AST qualifier stripped.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            strip_qualifier: Some(self.qualifier.clone()),
            enum_families: vec![operator_family(), term_kind_family()],
        }
    }
}

/// `op` and `update_op` fields of any struct hold operator codes.
pub fn operator_family() -> EnumFamily {
    EnumFamily::new(
        Operator::literal_type(),
        &["op", "update_op"],
        None,
        Operator::FIRST.code()..=Operator::LAST.code(),
        |code| Operator::from_code(code).map(|op| format!("{op:?}")),
    )
}

/// The `kind` field of `Term` literals holds term-kind codes.
pub fn term_kind_family() -> EnumFamily {
    EnumFamily::new(
        TermKind::literal_type(),
        &["kind"],
        Some("Term"),
        TermKind::FIRST.code()..=TermKind::LAST.code(),
        |code| TermKind::from_code(code).map(|kind| format!("{kind:?}")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.variable, "BUILTIN_FUNC_DEFS");
        assert_eq!(config.namespace, "crate::ast");
        assert_eq!(config.qualifier, "jqdefs_core::ast::");
        assert_eq!(config.generator, "jqdefs-gen");
    }

    #[test]
    fn test_render_options_strip_qualifier() {
        let options = GeneratorConfig::default().render_options();
        assert_eq!(options.strip_qualifier.as_deref(), Some("jqdefs_core::ast::"));
        assert_eq!(options.enum_families.len(), 2);
    }
}
