//! Printing of literal trees as Rust source.
//!
//! The printer walks an [`Expr`] map and produces one line of source per
//! entry. Two adjustments happen while printing:
//!
//! - Integer codes stored in fields that belong to an [`EnumFamily`] are
//!   printed as the enum variant they encode. Only the listed field names
//!   are considered, and only codes inside the family's range. Anything
//!   else, such as an integer in an unrelated field or a string that looks
//!   like a field, is printed unchanged.
//! - The configured qualifier is removed from every path, so the output can
//!   be compiled inside the namespace that defines the AST types.
//!
//! Every printed entry and the container type are parsed back with `syn`
//! before they are returned.

use std::ops::RangeInclusive;

use jqdefs_core::Expr;
use rustc_hash::FxHashMap;

use crate::error::{RenderError, RenderResult};

/// An enumeration stored as integer codes in the literal tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumFamily {
    /// Fully qualified enum type, e.g. `jqdefs_core::ast::Operator`.
    pub ty: String,
    /// Field names holding codes of this family.
    pub fields: Vec<&'static str>,
    /// Restricts matching to structs whose last path segment is this name.
    pub owner: Option<&'static str>,
    symbols: FxHashMap<i64, String>,
}

impl EnumFamily {
    /// Builds the symbol table by asking `name` for every code in `codes`.
    /// Codes without a name are left numeric.
    pub fn new(
        ty: String,
        fields: &[&'static str],
        owner: Option<&'static str>,
        codes: RangeInclusive<u8>,
        name: impl Fn(u8) -> Option<String>,
    ) -> Self {
        let symbols = codes
            .filter_map(|code| name(code).map(|variant| (i64::from(code), variant)))
            .collect();
        Self {
            ty,
            fields: fields.to_vec(),
            owner,
            symbols,
        }
    }

    fn applies_to(&self, struct_path: &str, field: &str) -> bool {
        if !self.fields.contains(&field) {
            return false;
        }
        match self.owner {
            Some(owner) => last_segment(struct_path) == owner,
            None => true,
        }
    }

    fn symbol(&self, code: i64) -> Option<String> {
        self.symbols
            .get(&code)
            .map(|variant| format!("{}::{}", self.ty, variant))
    }
}

/// Printer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix removed from paths and from the container type.
    pub strip_qualifier: Option<String>,
    /// Enumerations printed by variant name instead of integer code.
    pub enum_families: Vec<EnumFamily>,
}

/// A printed map literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLiteral {
    /// Container type, e.g. `BTreeMap<&'static str, Vec<FuncDef>>`.
    pub ty: String,
    /// Keys in order, each with its printed value expression.
    pub entries: Vec<(String, String)>,
}

/// Prints a map literal.
pub fn render_literal(expr: &Expr, options: &RenderOptions) -> RenderResult<RenderedLiteral> {
    let Expr::Map { ty, entries } = expr else {
        return Err(RenderError::NotAMap);
    };

    let ty = match &options.strip_qualifier {
        Some(qualifier) => strip_nested(ty, qualifier),
        None => ty.clone(),
    };
    syn::parse_str::<syn::Type>(&ty).map_err(|e| RenderError::InvalidType {
        ty: ty.clone(),
        message: e.to_string(),
    })?;

    let printer = Printer { options };
    let mut rendered = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let mut out = String::new();
        printer.write(&mut out, key, value)?;
        syn::parse_str::<syn::Expr>(&out).map_err(|e| RenderError::InvalidEntry {
            key: key.clone(),
            message: e.to_string(),
        })?;
        rendered.push((key.clone(), out));
    }

    tracing::debug!(entries = rendered.len(), ty = %ty, "rendered literal");
    Ok(RenderedLiteral {
        ty,
        entries: rendered,
    })
}

struct Printer<'a> {
    options: &'a RenderOptions,
}

impl Printer<'_> {
    /// Appends `expr` to `out`. `key` names the enclosing map entry.
    fn write(&self, out: &mut String, key: &str, expr: &Expr) -> RenderResult<()> {
        match expr {
            Expr::Int(value) => out.push_str(&value.to_string()),
            Expr::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
            Expr::Str(value) => out.push_str(&format!("{value:?}")),
            Expr::Path(path) => out.push_str(self.path(path)?),
            Expr::Call { func, args } => {
                out.push_str(self.path(func)?);
                out.push('(');
                self.write_list(out, key, args)?;
                out.push(')');
            }
            Expr::Vec(items) => {
                out.push_str("vec![");
                self.write_list(out, key, items)?;
                out.push(']');
            }
            Expr::Struct { path, fields, rest } => {
                out.push_str(self.path(path)?);
                if fields.is_empty() && !rest {
                    out.push_str(" {}");
                    return Ok(());
                }
                out.push_str(" { ");
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    check_ident(name)?;
                    out.push_str(name);
                    out.push_str(": ");
                    match self.symbolic(path, name, value) {
                        Some(symbol) => out.push_str(&symbol),
                        None => self.write(out, key, value)?,
                    }
                }
                if *rest {
                    if !fields.is_empty() {
                        out.push_str(", ");
                    }
                    out.push_str("..Default::default()");
                }
                out.push_str(" }");
            }
            Expr::Map { .. } => {
                return Err(RenderError::NestedMap {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    fn write_list(&self, out: &mut String, key: &str, items: &[Expr]) -> RenderResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write(out, key, item)?;
        }
        Ok(())
    }

    /// Symbolic form of a field value holding an enum code, either bare or
    /// wrapped in `Some`.
    fn symbolic(&self, struct_path: &str, field: &str, value: &Expr) -> Option<String> {
        let family = self
            .options
            .enum_families
            .iter()
            .find(|family| family.applies_to(struct_path, field))?;

        match value {
            Expr::Int(code) => Some(self.strip(&family.symbol(*code)?).to_string()),
            Expr::Call { func, args } if func == "Some" => match args.as_slice() {
                [Expr::Int(code)] => {
                    Some(format!("Some({})", self.strip(&family.symbol(*code)?)))
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn path<'p>(&self, path: &'p str) -> RenderResult<&'p str> {
        syn::parse_str::<syn::Path>(path)
            .map_err(|_| RenderError::InvalidIdent(path.to_string()))?;
        Ok(self.strip(path))
    }

    fn strip<'p>(&self, path: &'p str) -> &'p str {
        match &self.options.strip_qualifier {
            Some(qualifier) => path.strip_prefix(qualifier.as_str()).unwrap_or(path),
            None => path,
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn check_ident(name: &str) -> RenderResult<()> {
    syn::parse_str::<syn::Ident>(name)
        .map(|_| ())
        .map_err(|_| RenderError::InvalidIdent(name.to_string()))
}

/// Removes `qualifier` wherever a path starts with it inside `ty`. A match
/// preceded by an identifier character or `::` belongs to a longer path and
/// is kept.
fn strip_nested(ty: &str, qualifier: &str) -> String {
    let mut out = String::with_capacity(ty.len());
    let mut rest = ty;
    while let Some(pos) = rest.find(qualifier) {
        let before = &rest[..pos];
        let in_path = before.ends_with("::")
            || before
                .chars()
                .next_back()
                .or_else(|| out.chars().next_back())
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        out.push_str(before);
        if in_path {
            out.push_str(qualifier);
        }
        rest = &rest[pos + qualifier.len()..];
    }
    out.push_str(rest);
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
