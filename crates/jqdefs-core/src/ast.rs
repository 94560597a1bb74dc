//! Syntax tree for jq function definitions.
//!
//! The layout mirrors how the evaluator consumes definitions: a [`Query`] is
//! either a single [`Term`], a reference to a function by name, or a binary
//! operation over two sub-queries. Every node type implements
//! [`ToLiteral`](crate::literal::ToLiteral) so a parsed program can be
//! embedded as Rust source.

use crate::literal::{Expr, ToLiteral};

/// Path of this module, used to qualify generated literals.
pub const NAMESPACE: &str = module_path!();

/// Binary, unary and update-assignment operators.
///
/// Codes are contiguous from [`Operator::FIRST`] to [`Operator::LAST`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Operator {
    Pipe = 1,
    Comma,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
    Alt,
    Assign,
    Modify,
    UpdateAdd,
    UpdateSub,
    UpdateMul,
    UpdateDiv,
    UpdateMod,
    UpdateAlt,
}

/// Associativity of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    None,
}

impl Operator {
    pub const FIRST: Operator = Operator::Pipe;
    pub const LAST: Operator = Operator::UpdateAlt;

    pub const ALL: [Operator; 24] = [
        Operator::Pipe,
        Operator::Comma,
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Mod,
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::And,
        Operator::Or,
        Operator::Alt,
        Operator::Assign,
        Operator::Modify,
        Operator::UpdateAdd,
        Operator::UpdateSub,
        Operator::UpdateMul,
        Operator::UpdateDiv,
        Operator::UpdateMod,
        Operator::UpdateAlt,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.code() == code)
    }

    /// Source spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Pipe => "|",
            Operator::Comma => ",",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Alt => "//",
            Operator::Assign => "=",
            Operator::Modify => "|=",
            Operator::UpdateAdd => "+=",
            Operator::UpdateSub => "-=",
            Operator::UpdateMul => "*=",
            Operator::UpdateDiv => "/=",
            Operator::UpdateMod => "%=",
            Operator::UpdateAlt => "//=",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Pipe => 1,
            Operator::Comma => 2,
            Operator::Alt => 3,
            Operator::Assign
            | Operator::Modify
            | Operator::UpdateAdd
            | Operator::UpdateSub
            | Operator::UpdateMul
            | Operator::UpdateDiv
            | Operator::UpdateMod
            | Operator::UpdateAlt => 4,
            Operator::Or => 5,
            Operator::And => 6,
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Lt
            | Operator::Ge
            | Operator::Le => 7,
            Operator::Add | Operator::Sub => 8,
            Operator::Mul | Operator::Div | Operator::Mod => 9,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self.precedence() {
            1 | 3 => Assoc::Right,
            4 | 7 => Assoc::None,
            _ => Assoc::Left,
        }
    }

    pub fn is_update(self) -> bool {
        self.precedence() == 4
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a [`Term`]; selects which of the term's fields is populated.
///
/// Codes are contiguous from [`TermKind::FIRST`] to [`TermKind::LAST`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TermKind {
    #[default]
    Identity = 1,
    Recurse,
    Null,
    True,
    False,
    Index,
    Func,
    Object,
    Array,
    Number,
    Unary,
    Format,
    String,
    If,
    Try,
    Reduce,
    Foreach,
    Label,
    Break,
    Query,
}

impl TermKind {
    pub const FIRST: TermKind = TermKind::Identity;
    pub const LAST: TermKind = TermKind::Query;

    pub const ALL: [TermKind; 20] = [
        TermKind::Identity,
        TermKind::Recurse,
        TermKind::Null,
        TermKind::True,
        TermKind::False,
        TermKind::Index,
        TermKind::Func,
        TermKind::Object,
        TermKind::Array,
        TermKind::Number,
        TermKind::Unary,
        TermKind::Format,
        TermKind::String,
        TermKind::If,
        TermKind::Try,
        TermKind::Reduce,
        TermKind::Foreach,
        TermKind::Label,
        TermKind::Break,
        TermKind::Query,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }
}

/// A named function definition: `def name(args): body;`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuncDef {
    pub name: String,
    /// Parameter names; value parameters keep their `$` sigil.
    pub args: Vec<String>,
    pub body: Box<Query>,
}

impl FuncDef {
    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A query node.
///
/// Exactly one of `term`, `func`, or the `left`/`op`/`right` triple is set.
/// `func_defs` holds local definitions scoped over the node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub func_defs: Vec<FuncDef>,
    pub term: Option<Box<Term>>,
    pub left: Option<Box<Query>>,
    pub op: Option<Operator>,
    pub right: Option<Box<Query>>,
    /// Name of an argument-less function, set by minification.
    pub func: String,
}

impl Query {
    pub fn from_term(term: Term) -> Self {
        Self {
            term: Some(Box::new(term)),
            ..Default::default()
        }
    }

    pub fn binary(left: Query, op: Operator, right: Query) -> Self {
        Self {
            left: Some(Box::new(left)),
            op: Some(op),
            right: Some(Box::new(right)),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Term {
    pub kind: TermKind,
    pub index: Option<Box<Index>>,
    pub func: Option<Box<Func>>,
    pub object: Option<Box<Object>>,
    pub array: Option<Box<Array>>,
    pub number: String,
    pub unary: Option<Box<Unary>>,
    pub format: String,
    pub str: Option<Box<StringLit>>,
    pub conditional: Option<Box<If>>,
    pub try_catch: Option<Box<Try>>,
    pub reduce: Option<Box<Reduce>>,
    pub foreach: Option<Box<Foreach>>,
    pub label: Option<Box<Label>>,
    pub break_label: String,
    pub query: Option<Box<Query>>,
    pub suffix_list: Vec<Suffix>,
}

impl Term {
    pub fn new(kind: TermKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

/// Field access, index or slice. `.name`, `."str"`, `.[start]`, `.[start:end]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    pub name: String,
    pub str: Option<Box<StringLit>>,
    pub start: Option<Box<Query>>,
    pub end: Option<Box<Query>>,
    pub is_slice: bool,
}

/// Function call or variable reference (`$name`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Func {
    pub name: String,
    pub args: Vec<Query>,
}

/// String literal. Interpolated strings keep their parts in `queries`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringLit {
    pub str: String,
    pub queries: Vec<Query>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub key_vals: Vec<ObjectKeyVal>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectKeyVal {
    pub key: String,
    pub key_string: Option<Box<StringLit>>,
    pub key_query: Option<Box<Query>>,
    pub val: Option<Box<Query>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    pub query: Option<Box<Query>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: Operator,
    pub term: Box<Term>,
}

/// Postfix applied to a term: index, iteration, `?`, or an `as` binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suffix {
    pub index: Option<Box<Index>>,
    pub iter: bool,
    pub optional: bool,
    pub bind: Option<Box<Bind>>,
}

/// `term as $pattern ?// $alt | body`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bind {
    pub patterns: Vec<Pattern>,
    pub body: Box<Query>,
}

/// Destructuring pattern: a variable, an array or an object pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    pub name: String,
    pub array: Vec<Pattern>,
    pub object: Vec<PatternObject>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternObject {
    pub key: String,
    pub key_string: Option<Box<StringLit>>,
    pub key_query: Option<Box<Query>>,
    pub val: Option<Box<Pattern>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct If {
    pub cond: Box<Query>,
    pub then: Box<Query>,
    pub elif: Vec<IfElif>,
    pub else_branch: Option<Box<Query>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IfElif {
    pub cond: Box<Query>,
    pub then: Box<Query>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Try {
    pub body: Box<Query>,
    pub catch: Option<Box<Query>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reduce {
    pub term: Box<Term>,
    pub pattern: Box<Pattern>,
    pub start: Box<Query>,
    pub update: Box<Query>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Foreach {
    pub term: Box<Term>,
    pub pattern: Box<Pattern>,
    pub start: Box<Query>,
    pub update: Box<Query>,
    pub extract: Option<Box<Query>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub ident: String,
    pub body: Box<Query>,
}

// =============================================================================
// Literal conversion
// =============================================================================

impl ToLiteral for Operator {
    fn to_literal(&self) -> Expr {
        Expr::Int(i64::from(self.code()))
    }

    fn literal_type() -> String {
        format!("{NAMESPACE}::Operator")
    }
}

impl ToLiteral for TermKind {
    fn to_literal(&self) -> Expr {
        Expr::Int(i64::from(self.code()))
    }

    fn literal_type() -> String {
        format!("{NAMESPACE}::TermKind")
    }
}

/// Implements [`ToLiteral`] for plain structs. The destructuring keeps the
/// field list exhaustive: adding a field without listing it fails to compile.
macro_rules! impl_struct_literal {
    ($($ty:ident { $($field:ident),* $(,)? })*) => {$(
        impl ToLiteral for $ty {
            fn to_literal(&self) -> Expr {
                let $ty { $($field),* } = self;
                let mut fields = Vec::new();
                let mut rest = false;
                $(
                    if $field.is_zero() {
                        rest = true;
                    } else {
                        fields.push((stringify!($field).to_string(), $field.to_literal()));
                    }
                )*
                Expr::Struct {
                    path: Self::literal_type(),
                    fields,
                    rest,
                }
            }

            fn literal_type() -> String {
                format!("{}::{}", NAMESPACE, stringify!($ty))
            }
        }
    )*};
}

impl_struct_literal! {
    FuncDef { name, args, body }
    Query { func_defs, term, left, op, right, func }
    Term {
        kind, index, func, object, array, number, unary, format, str,
        conditional, try_catch, reduce, foreach, label, break_label, query,
        suffix_list,
    }
    Index { name, str, start, end, is_slice }
    Func { name, args }
    StringLit { str, queries }
    Object { key_vals }
    ObjectKeyVal { key, key_string, key_query, val }
    Array { query }
    Unary { op, term }
    Suffix { index, iter, optional, bind }
    Bind { patterns, body }
    Pattern { name, array, object }
    PatternObject { key, key_string, key_query, val }
    If { cond, then, elif, else_branch }
    IfElif { cond, then }
    Try { body, catch }
    Reduce { term, pattern, start, update }
    Foreach { term, pattern, start, update, extract }
    Label { ident, body }
}
