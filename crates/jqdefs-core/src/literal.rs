//! Structured literal expressions.
//!
//! [`ToLiteral`] converts a value into an [`Expr`] tree describing the Rust
//! expression that reconstructs it. The tree is a neutral description: it
//! carries fully qualified paths and raw enum codes, and leaves formatting
//! decisions to the printer.

use std::collections::{BTreeMap, HashMap};

/// A value-construction expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal.
    Int(i64),
    /// `true` / `false`.
    Bool(bool),
    /// String literal.
    Str(String),
    /// Path expression such as `None` or a unit variant.
    Path(String),
    /// Call of a function path, e.g. `Some(..)` or `Box::new(..)`.
    Call { func: String, args: Vec<Expr> },
    /// `vec![..]`.
    Vec(Vec<Expr>),
    /// Struct literal. `rest` marks omitted fields filled by `Default`.
    Struct {
        path: String,
        fields: Vec<(String, Expr)>,
        rest: bool,
    },
    /// String-keyed map literal with its declared container type.
    Map {
        ty: String,
        entries: Vec<(String, Expr)>,
    },
}

impl Expr {
    /// Call of `func` with the given arguments.
    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: func.into(),
            args,
        }
    }
}

/// Conversion into a structured literal.
pub trait ToLiteral {
    fn to_literal(&self) -> Expr;

    /// Whether the value equals its type's default and may be omitted from
    /// an enclosing struct literal.
    fn is_zero(&self) -> bool {
        false
    }

    /// Rust type of the literal.
    fn literal_type() -> String
    where
        Self: Sized;
}

impl ToLiteral for bool {
    fn to_literal(&self) -> Expr {
        Expr::Bool(*self)
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn literal_type() -> String {
        "bool".to_string()
    }
}

impl ToLiteral for String {
    fn to_literal(&self) -> Expr {
        Expr::call("String::from", vec![Expr::Str(self.clone())])
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn literal_type() -> String {
        "String".to_string()
    }
}

impl<T: ToLiteral> ToLiteral for Box<T> {
    fn to_literal(&self) -> Expr {
        Expr::call("Box::new", vec![(**self).to_literal()])
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn literal_type() -> String {
        format!("Box<{}>", T::literal_type())
    }
}

impl<T: ToLiteral> ToLiteral for Option<T> {
    fn to_literal(&self) -> Expr {
        match self {
            Some(value) => Expr::call("Some", vec![value.to_literal()]),
            None => Expr::Path("None".to_string()),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn literal_type() -> String {
        format!("Option<{}>", T::literal_type())
    }
}

impl<T: ToLiteral> ToLiteral for Vec<T> {
    fn to_literal(&self) -> Expr {
        Expr::Vec(self.iter().map(ToLiteral::to_literal).collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn literal_type() -> String {
        format!("Vec<{}>", T::literal_type())
    }
}

/// Map literals are always declared as `BTreeMap<&'static str, V>` and list
/// their entries sorted by key, whatever the iteration order of the source.
fn map_literal<'a, V: ToLiteral + 'a>(entries: impl Iterator<Item = (&'a String, &'a V)>) -> Expr {
    let mut entries: Vec<(String, Expr)> = entries
        .map(|(key, value)| (key.clone(), value.to_literal()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Expr::Map {
        ty: map_literal_type::<V>(),
        entries,
    }
}

fn map_literal_type<V: ToLiteral>() -> String {
    format!("BTreeMap<&'static str, {}>", V::literal_type())
}

impl<V: ToLiteral, S> ToLiteral for HashMap<String, V, S> {
    fn to_literal(&self) -> Expr {
        map_literal(self.iter())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn literal_type() -> String {
        map_literal_type::<V>()
    }
}

impl<V: ToLiteral> ToLiteral for BTreeMap<String, V> {
    fn to_literal(&self) -> Expr {
        map_literal(self.iter())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn literal_type() -> String {
        map_literal_type::<V>()
    }
}
