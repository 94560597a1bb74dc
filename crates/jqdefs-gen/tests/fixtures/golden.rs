// Code generated by jqdefs-gen; DO NOT EDIT.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::ast::*;

#[rustfmt::skip]
pub static BUILTIN_FUNC_DEFS: LazyLock<BTreeMap<&'static str, Vec<FuncDef>>> = LazyLock::new(|| {
    BTreeMap::from([
        ("add", vec![FuncDef { name: String::from("add"), body: Box::new(Query { term: Some(Box::new(Term { kind: TermKind::Reduce, reduce: Some(Box::new(Reduce { term: Box::new(Term { kind: TermKind::Identity, suffix_list: vec![Suffix { iter: true, ..Default::default() }], ..Default::default() }), pattern: Box::new(Pattern { name: String::from("$x"), ..Default::default() }), start: Box::new(Query { func: String::from("null"), ..Default::default() }), update: Box::new(Query { left: Some(Box::new(Query { func: String::from("."), ..Default::default() })), op: Some(Operator::Add), right: Some(Box::new(Query { func: String::from("$x"), ..Default::default() })), ..Default::default() }) })), ..Default::default() })), ..Default::default() }), ..Default::default() }]),
        ("map", vec![FuncDef { name: String::from("map"), body: Box::new(Query { func: String::from("."), ..Default::default() }), ..Default::default() }, FuncDef { name: String::from("map"), args: vec![String::from("f")], body: Box::new(Query { term: Some(Box::new(Term { kind: TermKind::Array, array: Some(Box::new(Array { query: Some(Box::new(Query { left: Some(Box::new(Query { term: Some(Box::new(Term { kind: TermKind::Identity, suffix_list: vec![Suffix { iter: true, ..Default::default() }], ..Default::default() })), ..Default::default() })), op: Some(Operator::Pipe), right: Some(Box::new(Query { func: String::from("f"), ..Default::default() })), ..Default::default() })) })), ..Default::default() })), ..Default::default() }) }]),
        ("negate", vec![FuncDef { name: String::from("negate"), body: Box::new(Query { term: Some(Box::new(Term { kind: TermKind::Unary, unary: Some(Box::new(Unary { op: Operator::Sub, term: Box::new(Term { kind: TermKind::Identity, ..Default::default() }) })), ..Default::default() })), ..Default::default() }), ..Default::default() }]),
        ("values", vec![FuncDef { name: String::from("values"), body: Box::new(Query { term: Some(Box::new(Term { kind: TermKind::Func, func: Some(Box::new(Func { name: String::from("select"), args: vec![Query { left: Some(Box::new(Query { func: String::from("."), ..Default::default() })), op: Some(Operator::Ne), right: Some(Box::new(Query { func: String::from("null"), ..Default::default() })), ..Default::default() }] })), ..Default::default() })), ..Default::default() }), ..Default::default() }]),
    ])
});
