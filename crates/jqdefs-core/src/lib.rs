//! Core library for jq builtin definitions.
//!
//! This crate provides:
//! - The definition syntax tree ([`ast`]) with its operator and term-kind
//!   enumerations
//! - A lexer and recursive-descent parser for definition sources
//! - In-place minification of parsed definitions
//! - Conversion of parsed values into structured literal expressions
//!   ([`literal`]), used to embed definitions as generated Rust source

pub mod ast;
pub mod error;
pub mod lexer;
pub mod literal;
mod minify;
pub mod parser;

pub use ast::{FuncDef, NAMESPACE, Operator, Query, Term, TermKind};
pub use error::{ParseError, ParseResult};
pub use literal::{Expr, ToLiteral};
pub use parser::{parse_program, parse_query};
