//! Recursive-descent parser for jq definition sources.
//!
//! Binary operators are parsed by precedence climbing over
//! [`Operator::precedence`]. `as` bindings, `label` and local `def`s extend
//! as far to the right as possible, as in jq.

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Keyword, SpannedToken, StrPart, Token, lex};

/// Parse a source file consisting only of function definitions.
pub fn parse_program(source: &str) -> ParseResult<Vec<FuncDef>> {
    let result = lex(source, 0).and_then(|tokens| Parser::new(tokens).parse_program());
    result.map_err(|err| err.locate(source))
}

/// Parse a single query.
pub fn parse_query(source: &str) -> ParseResult<Query> {
    parse_query_at(source, 0).map_err(|err| err.locate(source))
}

/// Parse a query embedded at byte `offset` of a larger input. Error
/// positions are absolute and left unresolved.
fn parse_query_at(source: &str, offset: usize) -> ParseResult<Query> {
    let tokens = lex(source, offset)?;
    let mut parser = Parser::new(tokens);
    let query = parser.parse_pipe()?;
    parser.expect_eof()?;
    Ok(query)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |t| &t.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.offset)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected {}", expected.describe())))
        }
    }

    fn expect_eof(&self) -> ParseResult<()> {
        match self.peek() {
            Token::Eof => Ok(()),
            _ => Err(self.unexpected("expected end of query")),
        }
    }

    fn unexpected(&self, context: &str) -> ParseError {
        ParseError::new(
            format!("unexpected {}, {}", self.peek().describe(), context),
            self.offset(),
        )
    }

    fn expect_variable(&mut self) -> ParseResult<String> {
        match self.peek().clone() {
            Token::Variable(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("expected variable")),
        }
    }

    // ── Definitions ────────────────────────────────────────────────

    fn parse_program(&mut self) -> ParseResult<Vec<FuncDef>> {
        let mut defs = Vec::new();
        loop {
            match self.peek() {
                Token::Eof => return Ok(defs),
                Token::Keyword(Keyword::Def) => {
                    let def = self.parse_funcdef()?;
                    tracing::trace!(name = %def.name, arity = def.arity(), "parsed definition");
                    defs.push(def);
                }
                Token::Keyword(Keyword::Import | Keyword::Include) => {
                    return Err(ParseError::new(
                        "module directives are not supported",
                        self.offset(),
                    ));
                }
                _ => return Err(self.unexpected("expected function definition")),
            }
        }
    }

    fn parse_funcdef(&mut self) -> ParseResult<FuncDef> {
        self.expect(&Token::Keyword(Keyword::Def))?;
        let name = match self.peek() {
            Token::Ident(name) => name.clone(),
            Token::Keyword(keyword) => keyword.as_str().to_string(),
            _ => return Err(self.unexpected("expected function name")),
        };
        self.advance();

        let mut args = Vec::new();
        if self.eat(&Token::LParen) {
            loop {
                match self.peek() {
                    Token::Ident(arg) | Token::Variable(arg) => args.push(arg.clone()),
                    _ => return Err(self.unexpected("expected parameter name")),
                }
                self.advance();
                if !self.eat(&Token::Semicolon) {
                    break;
                }
            }
            self.expect(&Token::RParen)?;
        }

        self.expect(&Token::Colon)?;
        let body = self.parse_pipe()?;
        self.expect(&Token::Semicolon)?;

        Ok(FuncDef {
            name,
            args,
            body: Box::new(body),
        })
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Full query, including leading local definitions.
    fn parse_pipe(&mut self) -> ParseResult<Query> {
        if matches!(self.peek(), Token::Keyword(Keyword::Def)) {
            let mut func_defs = Vec::new();
            while matches!(self.peek(), Token::Keyword(Keyword::Def)) {
                func_defs.push(self.parse_funcdef()?);
            }
            let mut query = self.parse_pipe()?;
            func_defs.append(&mut query.func_defs);
            query.func_defs = func_defs;
            return Ok(query);
        }
        self.parse_binary(1)
    }

    fn peek_operator(&self) -> Option<Operator> {
        match self.peek() {
            Token::Op(op) => Some(*op),
            Token::Keyword(Keyword::And) => Some(Operator::And),
            Token::Keyword(Keyword::Or) => Some(Operator::Or),
            _ => None,
        }
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Query> {
        let mut left = self.parse_operand()?;

        while let Some(op) = self.peek_operator() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let right = match op.assoc() {
                _ if op == Operator::Pipe => self.parse_pipe()?,
                Assoc::Right => self.parse_binary(prec)?,
                Assoc::Left | Assoc::None => self.parse_binary(prec + 1)?,
            };
            left = Query::binary(left, op, right);

            if op.assoc() == Assoc::None
                && self.peek_operator().is_some_and(|next| next.precedence() == prec)
            {
                return Err(self.unexpected("non-associative operator"));
            }
        }

        Ok(left)
    }

    /// A term, possibly followed by an `as` binding that owns the rest of
    /// the pipeline.
    fn parse_operand(&mut self) -> ParseResult<Query> {
        let mut term = self.parse_term()?;

        if self.eat(&Token::Keyword(Keyword::As)) {
            let mut patterns = vec![self.parse_pattern()?];
            while self.eat(&Token::AltDestructure) {
                patterns.push(self.parse_pattern()?);
            }
            self.expect(&Token::Op(Operator::Pipe))?;
            let body = self.parse_pipe()?;
            term.suffix_list.push(Suffix {
                bind: Some(Box::new(Bind {
                    patterns,
                    body: Box::new(body),
                })),
                ..Default::default()
            });
        }

        Ok(Query::from_term(term))
    }

    // ── Terms ──────────────────────────────────────────────────────

    fn parse_term(&mut self) -> ParseResult<Term> {
        let mut term = self.parse_primary()?;
        self.parse_suffixes(&mut term)?;
        Ok(term)
    }

    fn parse_primary(&mut self) -> ParseResult<Term> {
        let start = self.pos;
        let term = match self.advance() {
            Token::Dot => match self.peek() {
                Token::Str(_) => {
                    let str = self.parse_string()?;
                    index_term(Index {
                        str: Some(Box::new(str)),
                        ..Default::default()
                    })
                }
                Token::LBracket => {
                    self.advance();
                    match self.parse_bracket()? {
                        Bracket::Iter => {
                            let mut term = Term::new(TermKind::Identity);
                            term.suffix_list.push(Suffix {
                                iter: true,
                                ..Default::default()
                            });
                            term
                        }
                        Bracket::Index(index) => index_term(index),
                    }
                }
                _ => Term::new(TermKind::Identity),
            },
            Token::DotDot => Term::new(TermKind::Recurse),
            Token::Field(name) => index_term(Index {
                name,
                ..Default::default()
            }),
            Token::Number(number) => Term {
                kind: TermKind::Number,
                number,
                ..Default::default()
            },
            Token::Str(parts) => Term {
                kind: TermKind::String,
                str: Some(Box::new(string_from_parts(parts)?)),
                ..Default::default()
            },
            Token::Format(format) => {
                let str = match self.peek() {
                    Token::Str(_) => Some(Box::new(self.parse_string()?)),
                    _ => None,
                };
                Term {
                    kind: TermKind::Format,
                    format,
                    str,
                    ..Default::default()
                }
            }
            Token::Variable(name) => func_term(name, Vec::new()),
            Token::Ident(name) => self.parse_call(name)?,
            Token::LParen => {
                let query = self.parse_pipe()?;
                self.expect(&Token::RParen)?;
                Term {
                    kind: TermKind::Query,
                    query: Some(Box::new(query)),
                    ..Default::default()
                }
            }
            Token::LBracket => {
                let query = if self.eat(&Token::RBracket) {
                    None
                } else {
                    let query = self.parse_pipe()?;
                    self.expect(&Token::RBracket)?;
                    Some(Box::new(query))
                };
                Term {
                    kind: TermKind::Array,
                    array: Some(Box::new(Array { query })),
                    ..Default::default()
                }
            }
            Token::LBrace => self.parse_object()?,
            Token::Op(op @ (Operator::Sub | Operator::Add)) => {
                let operand = self.parse_term()?;
                Term {
                    kind: TermKind::Unary,
                    unary: Some(Box::new(Unary {
                        op,
                        term: Box::new(operand),
                    })),
                    ..Default::default()
                }
            }
            Token::Keyword(Keyword::If) => self.parse_if()?,
            Token::Keyword(Keyword::Try) => self.parse_try()?,
            Token::Keyword(Keyword::Reduce) => self.parse_reduce()?,
            Token::Keyword(Keyword::Foreach) => self.parse_foreach()?,
            Token::Keyword(Keyword::Label) => {
                let ident = self.expect_variable()?;
                self.expect(&Token::Op(Operator::Pipe))?;
                let body = self.parse_pipe()?;
                Term {
                    kind: TermKind::Label,
                    label: Some(Box::new(Label {
                        ident,
                        body: Box::new(body),
                    })),
                    ..Default::default()
                }
            }
            Token::Keyword(Keyword::Break) => Term {
                kind: TermKind::Break,
                break_label: self.expect_variable()?,
                ..Default::default()
            },
            _ => {
                self.pos = start;
                return Err(self.unexpected("expected term"));
            }
        };
        Ok(term)
    }

    fn parse_call(&mut self, name: String) -> ParseResult<Term> {
        if !self.eat(&Token::LParen) {
            let kind = match name.as_str() {
                "null" => Some(TermKind::Null),
                "true" => Some(TermKind::True),
                "false" => Some(TermKind::False),
                _ => None,
            };
            if let Some(kind) = kind {
                return Ok(Term::new(kind));
            }
            return Ok(func_term(name, Vec::new()));
        }

        let mut args = vec![self.parse_pipe()?];
        while self.eat(&Token::Semicolon) {
            args.push(self.parse_pipe()?);
        }
        self.expect(&Token::RParen)?;
        Ok(func_term(name, args))
    }

    fn parse_suffixes(&mut self, term: &mut Term) -> ParseResult<()> {
        loop {
            let suffix = match self.peek().clone() {
                Token::Field(name) => {
                    self.advance();
                    Suffix {
                        index: Some(Box::new(Index {
                            name,
                            ..Default::default()
                        })),
                        ..Default::default()
                    }
                }
                Token::Dot if matches!(self.peek_at(1), Token::Str(_)) => {
                    self.advance();
                    let str = self.parse_string()?;
                    Suffix {
                        index: Some(Box::new(Index {
                            str: Some(Box::new(str)),
                            ..Default::default()
                        })),
                        ..Default::default()
                    }
                }
                Token::Dot if matches!(self.peek_at(1), Token::LBracket) => {
                    self.advance();
                    self.advance();
                    self.bracket_suffix()?
                }
                Token::LBracket => {
                    self.advance();
                    self.bracket_suffix()?
                }
                Token::Question => {
                    self.advance();
                    Suffix {
                        optional: true,
                        ..Default::default()
                    }
                }
                Token::AltDestructure => {
                    // `?//` outside a binding is `?` followed by `//`.
                    self.tokens[self.pos].token = Token::Op(Operator::Alt);
                    Suffix {
                        optional: true,
                        ..Default::default()
                    }
                }
                _ => return Ok(()),
            };
            term.suffix_list.push(suffix);
        }
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        self.tokens
            .get(self.pos + ahead)
            .map_or(&Token::Eof, |t| &t.token)
    }

    fn bracket_suffix(&mut self) -> ParseResult<Suffix> {
        Ok(match self.parse_bracket()? {
            Bracket::Iter => Suffix {
                iter: true,
                ..Default::default()
            },
            Bracket::Index(index) => Suffix {
                index: Some(Box::new(index)),
                ..Default::default()
            },
        })
    }

    /// Contents of `[..]` after the opening bracket.
    fn parse_bracket(&mut self) -> ParseResult<Bracket> {
        if self.eat(&Token::RBracket) {
            return Ok(Bracket::Iter);
        }

        let mut index = Index::default();
        if self.eat(&Token::Colon) {
            index.is_slice = true;
            index.end = Some(Box::new(self.parse_pipe()?));
        } else {
            index.start = Some(Box::new(self.parse_pipe()?));
            if self.eat(&Token::Colon) {
                index.is_slice = true;
                if !matches!(self.peek(), Token::RBracket) {
                    index.end = Some(Box::new(self.parse_pipe()?));
                }
            }
        }
        self.expect(&Token::RBracket)?;
        Ok(Bracket::Index(index))
    }

    // ── Strings ────────────────────────────────────────────────────

    fn parse_string(&mut self) -> ParseResult<StringLit> {
        match self.peek().clone() {
            Token::Str(parts) => {
                self.advance();
                string_from_parts(parts)
            }
            _ => Err(self.unexpected("expected string literal")),
        }
    }

    // ── Objects ────────────────────────────────────────────────────

    fn parse_object(&mut self) -> ParseResult<Term> {
        let mut key_vals = Vec::new();

        while !self.eat(&Token::RBrace) {
            key_vals.push(self.parse_object_key_val()?);
            if !self.eat(&Token::Op(Operator::Comma)) {
                self.expect(&Token::RBrace)?;
                break;
            }
        }

        Ok(Term {
            kind: TermKind::Object,
            object: Some(Box::new(Object { key_vals })),
            ..Default::default()
        })
    }

    fn parse_object_key_val(&mut self) -> ParseResult<ObjectKeyVal> {
        let mut kv = ObjectKeyVal::default();
        match self.peek().clone() {
            Token::Variable(name) => {
                self.advance();
                kv.key = name;
                return Ok(kv);
            }
            Token::Ident(name) => {
                self.advance();
                kv.key = name;
            }
            Token::Keyword(keyword) => {
                self.advance();
                kv.key = keyword.as_str().to_string();
            }
            Token::Str(_) => {
                kv.key_string = Some(Box::new(self.parse_string()?));
            }
            Token::LParen => {
                self.advance();
                kv.key_query = Some(Box::new(self.parse_pipe()?));
                self.expect(&Token::RParen)?;
                self.expect(&Token::Colon)?;
                kv.val = Some(Box::new(self.parse_object_val()?));
                return Ok(kv);
            }
            _ => return Err(self.unexpected("expected object key")),
        }

        if self.eat(&Token::Colon) {
            kv.val = Some(Box::new(self.parse_object_val()?));
        }
        Ok(kv)
    }

    /// Object values are terms joined by `|`; a bare `,` ends the value.
    fn parse_object_val(&mut self) -> ParseResult<Query> {
        let left = Query::from_term(self.parse_term()?);
        if self.eat(&Token::Op(Operator::Pipe)) {
            let right = self.parse_object_val()?;
            return Ok(Query::binary(left, Operator::Pipe, right));
        }
        Ok(left)
    }

    // ── Patterns ───────────────────────────────────────────────────

    fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        let start = self.pos;
        match self.advance() {
            Token::Variable(name) => Ok(Pattern {
                name,
                ..Default::default()
            }),
            Token::LBracket => {
                let mut array = vec![self.parse_pattern()?];
                while self.eat(&Token::Op(Operator::Comma)) {
                    array.push(self.parse_pattern()?);
                }
                self.expect(&Token::RBracket)?;
                Ok(Pattern {
                    array,
                    ..Default::default()
                })
            }
            Token::LBrace => {
                let mut object = vec![self.parse_pattern_object()?];
                while self.eat(&Token::Op(Operator::Comma)) {
                    object.push(self.parse_pattern_object()?);
                }
                self.expect(&Token::RBrace)?;
                Ok(Pattern {
                    object,
                    ..Default::default()
                })
            }
            _ => {
                self.pos = start;
                Err(self.unexpected("expected pattern"))
            }
        }
    }

    fn parse_pattern_object(&mut self) -> ParseResult<PatternObject> {
        let mut entry = PatternObject::default();
        match self.peek().clone() {
            Token::Variable(name) => {
                self.advance();
                entry.key = name;
                if self.eat(&Token::Colon) {
                    entry.val = Some(Box::new(self.parse_pattern()?));
                }
                return Ok(entry);
            }
            Token::Ident(name) => {
                self.advance();
                entry.key = name;
            }
            Token::Keyword(keyword) => {
                self.advance();
                entry.key = keyword.as_str().to_string();
            }
            Token::Str(_) => entry.key_string = Some(Box::new(self.parse_string()?)),
            Token::LParen => {
                self.advance();
                entry.key_query = Some(Box::new(self.parse_pipe()?));
                self.expect(&Token::RParen)?;
            }
            _ => return Err(self.unexpected("expected object pattern key")),
        }
        self.expect(&Token::Colon)?;
        entry.val = Some(Box::new(self.parse_pattern()?));
        Ok(entry)
    }

    // ── Control flow ───────────────────────────────────────────────

    fn parse_if(&mut self) -> ParseResult<Term> {
        let cond = self.parse_pipe()?;
        self.expect(&Token::Keyword(Keyword::Then))?;
        let then = self.parse_pipe()?;

        let mut elif = Vec::new();
        while self.eat(&Token::Keyword(Keyword::Elif)) {
            let cond = self.parse_pipe()?;
            self.expect(&Token::Keyword(Keyword::Then))?;
            let then = self.parse_pipe()?;
            elif.push(IfElif {
                cond: Box::new(cond),
                then: Box::new(then),
            });
        }

        let else_branch = if self.eat(&Token::Keyword(Keyword::Else)) {
            Some(Box::new(self.parse_pipe()?))
        } else {
            None
        };
        self.expect(&Token::Keyword(Keyword::End))?;

        Ok(Term {
            kind: TermKind::If,
            conditional: Some(Box::new(If {
                cond: Box::new(cond),
                then: Box::new(then),
                elif,
                else_branch,
            })),
            ..Default::default()
        })
    }

    /// `try` and `catch` take a postfix term each, binding tighter than
    /// any binary operator.
    fn parse_try(&mut self) -> ParseResult<Term> {
        let body = Query::from_term(self.parse_term()?);
        let catch = if self.eat(&Token::Keyword(Keyword::Catch)) {
            Some(Box::new(Query::from_term(self.parse_term()?)))
        } else {
            None
        };

        Ok(Term {
            kind: TermKind::Try,
            try_catch: Some(Box::new(Try {
                body: Box::new(body),
                catch,
            })),
            ..Default::default()
        })
    }

    fn parse_reduce(&mut self) -> ParseResult<Term> {
        let term = self.parse_term()?;
        self.expect(&Token::Keyword(Keyword::As))?;
        let pattern = self.parse_pattern()?;
        self.expect(&Token::LParen)?;
        let start = self.parse_pipe()?;
        self.expect(&Token::Semicolon)?;
        let update = self.parse_pipe()?;
        self.expect(&Token::RParen)?;

        Ok(Term {
            kind: TermKind::Reduce,
            reduce: Some(Box::new(Reduce {
                term: Box::new(term),
                pattern: Box::new(pattern),
                start: Box::new(start),
                update: Box::new(update),
            })),
            ..Default::default()
        })
    }

    fn parse_foreach(&mut self) -> ParseResult<Term> {
        let term = self.parse_term()?;
        self.expect(&Token::Keyword(Keyword::As))?;
        let pattern = self.parse_pattern()?;
        self.expect(&Token::LParen)?;
        let start = self.parse_pipe()?;
        self.expect(&Token::Semicolon)?;
        let update = self.parse_pipe()?;
        let extract = if self.eat(&Token::Semicolon) {
            Some(Box::new(self.parse_pipe()?))
        } else {
            None
        };
        self.expect(&Token::RParen)?;

        Ok(Term {
            kind: TermKind::Foreach,
            foreach: Some(Box::new(Foreach {
                term: Box::new(term),
                pattern: Box::new(pattern),
                start: Box::new(start),
                update: Box::new(update),
                extract,
            })),
            ..Default::default()
        })
    }
}

enum Bracket {
    Iter,
    Index(Index),
}

fn string_from_parts(parts: Vec<StrPart>) -> ParseResult<StringLit> {
    if let [StrPart::Lit(str)] = parts.as_slice() {
        return Ok(StringLit {
            str: str.clone(),
            queries: Vec::new(),
        });
    }

    let queries = parts
        .into_iter()
        .map(|part| match part {
            StrPart::Lit(str) => Ok(Query::from_term(Term {
                kind: TermKind::String,
                str: Some(Box::new(StringLit {
                    str,
                    queries: Vec::new(),
                })),
                ..Default::default()
            })),
            StrPart::Interp { source, offset } => parse_query_at(&source, offset),
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(StringLit {
        str: String::new(),
        queries,
    })
}

fn index_term(index: Index) -> Term {
    Term {
        kind: TermKind::Index,
        index: Some(Box::new(index)),
        ..Default::default()
    }
}

fn func_term(name: String, args: Vec<Query>) -> Term {
    Term {
        kind: TermKind::Func,
        func: Some(Box::new(Func { name, args })),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term_of(query: &Query) -> &Term {
        query.term.as_deref().expect("expected term query")
    }

    fn func_name(query: &Query) -> &str {
        let term = term_of(query);
        assert_eq!(term.kind, TermKind::Func);
        &term.func.as_ref().unwrap().name
    }

    #[test]
    fn test_parse_program_definitions() {
        let defs = parse_program("def map(f): [.[] | f];\ndef select(f): if f then . else empty end;")
            .unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "map");
        assert_eq!(defs[0].args, ["f"]);
        assert_eq!(defs[1].name, "select");

        let array = term_of(&defs[0].body);
        assert_eq!(array.kind, TermKind::Array);
        let inner = array.array.as_ref().unwrap().query.as_ref().unwrap();
        assert_eq!(inner.op, Some(Operator::Pipe));
        let iter = term_of(inner.left.as_ref().unwrap());
        assert_eq!(iter.kind, TermKind::Identity);
        assert!(iter.suffix_list[0].iter);
    }

    #[test]
    fn test_parse_value_params() {
        let defs = parse_program("def range($from; $upto): $from | .;").unwrap();
        assert_eq!(defs[0].args, ["$from", "$upto"]);
        assert_eq!(defs[0].arity(), 2);
    }

    #[test]
    fn test_parse_precedence() {
        let query = parse_query("1 + 2 * 3, 4 | 5").unwrap();
        assert_eq!(query.op, Some(Operator::Pipe));

        let comma = query.left.as_ref().unwrap();
        assert_eq!(comma.op, Some(Operator::Comma));

        let add = comma.left.as_ref().unwrap();
        assert_eq!(add.op, Some(Operator::Add));
        assert_eq!(add.right.as_ref().unwrap().op, Some(Operator::Mul));
    }

    #[test]
    fn test_parse_left_and_right_associativity() {
        let sub = parse_query("1 - 2 - 3").unwrap();
        assert_eq!(sub.op, Some(Operator::Sub));
        assert_eq!(sub.left.as_ref().unwrap().op, Some(Operator::Sub));

        let alt = parse_query(".a // .b // .c").unwrap();
        assert_eq!(alt.op, Some(Operator::Alt));
        assert_eq!(alt.right.as_ref().unwrap().op, Some(Operator::Alt));
    }

    #[test]
    fn test_parse_non_associative_comparison() {
        let err = parse_query("1 == 2 == 3").unwrap_err();
        assert!(err.message.contains("non-associative"));
        assert!(parse_query("1 == 2 and 3 < 4").is_ok());
    }

    #[test]
    fn test_parse_update_operators() {
        let query = parse_query(".a |= . + 1").unwrap();
        assert_eq!(query.op, Some(Operator::Modify));
        assert_eq!(query.right.as_ref().unwrap().op, Some(Operator::Add));

        let query = parse_query(".a //= 3").unwrap();
        assert_eq!(query.op, Some(Operator::UpdateAlt));
    }

    #[test]
    fn test_parse_binding_extends_right() {
        let query = parse_query(". as [$a, {b: $c}] | $a, $c").unwrap();
        let term = term_of(&query);
        let bind = term.suffix_list[0].bind.as_ref().unwrap();
        assert_eq!(bind.patterns[0].array.len(), 2);
        assert_eq!(bind.patterns[0].array[1].object[0].key, "b");
        assert_eq!(bind.body.op, Some(Operator::Comma));
    }

    #[test]
    fn test_parse_alternative_destructuring() {
        let query = parse_query(". as [$a] ?// $a | $a").unwrap();
        let bind = term_of(&query).suffix_list[0].bind.as_ref().unwrap();
        assert_eq!(bind.patterns.len(), 2);
        assert_eq!(bind.patterns[1].name, "$a");

        let query = parse_query(".a?//1").unwrap();
        assert_eq!(query.op, Some(Operator::Alt));
        assert!(term_of(query.left.as_ref().unwrap()).suffix_list[0].optional);
    }

    #[test]
    fn test_parse_suffixes() {
        let query = parse_query(r#".a.b[0]."c"[1:]?.[]"#).unwrap();
        let term = term_of(&query);
        assert_eq!(term.kind, TermKind::Index);
        assert_eq!(term.index.as_ref().unwrap().name, "a");

        let suffixes = &term.suffix_list;
        assert_eq!(suffixes.len(), 6);
        assert_eq!(suffixes[0].index.as_ref().unwrap().name, "b");
        assert!(suffixes[1].index.as_ref().unwrap().start.is_some());
        assert_eq!(
            suffixes[2].index.as_ref().unwrap().str.as_ref().unwrap().str,
            "c"
        );
        let slice = suffixes[3].index.as_ref().unwrap();
        assert!(slice.is_slice && slice.end.is_none());
        assert!(suffixes[4].optional);
        assert!(suffixes[5].iter);
    }

    #[test]
    fn test_parse_identity_index_and_slice() {
        let query = parse_query(".[:2]").unwrap();
        let index = term_of(&query).index.as_ref().unwrap();
        assert!(index.is_slice);
        assert!(index.start.is_none());
        assert!(index.end.is_some());

        let query = parse_query(r#"."$__loc__""#).unwrap();
        assert_eq!(term_of(&query).kind, TermKind::Index);
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(term_of(&parse_query("null").unwrap()).kind, TermKind::Null);
        assert_eq!(term_of(&parse_query("true").unwrap()).kind, TermKind::True);
        assert_eq!(term_of(&parse_query("..").unwrap()).kind, TermKind::Recurse);

        let number = parse_query("1.5").unwrap();
        assert_eq!(term_of(&number).number, "1.5");

        let negative = parse_query("-1").unwrap();
        let unary = term_of(&negative).unary.as_ref().unwrap();
        assert_eq!(unary.op, Operator::Sub);
        assert_eq!(unary.term.kind, TermKind::Number);
    }

    #[test]
    fn test_parse_string_interpolation() {
        let query = parse_query(r#""a\(.b)c""#).unwrap();
        let str = term_of(&query).str.as_ref().unwrap();
        assert!(str.str.is_empty());
        assert_eq!(str.queries.len(), 3);
        assert_eq!(term_of(&str.queries[1]).index.as_ref().unwrap().name, "b");

        let query = parse_query(r#"@base64 "x\(.)""#).unwrap();
        let term = term_of(&query);
        assert_eq!(term.kind, TermKind::Format);
        assert_eq!(term.format, "@base64");
        assert_eq!(term.str.as_ref().unwrap().queries.len(), 2);
    }

    #[test]
    fn test_parse_interpolation_error_position() {
        let source = "def f: \"a\\(1 +)\";";
        let err = parse_program(source).unwrap_err();
        assert_eq!(err.offset, 14);
        assert_eq!((err.line, err.column), (1, 15));
    }

    #[test]
    fn test_parse_object() {
        let query = parse_query(r#"{a, $b, "c": 1, (.d): .e | f, if: 2, "x\(1)"}"#).unwrap();
        let object = term_of(&query).object.as_ref().unwrap();
        let kvs = &object.key_vals;
        assert_eq!(kvs.len(), 6);
        assert_eq!(kvs[0].key, "a");
        assert!(kvs[0].val.is_none());
        assert_eq!(kvs[1].key, "$b");
        assert_eq!(kvs[2].key_string.as_ref().unwrap().str, "c");
        assert!(kvs[3].key_query.is_some());
        assert_eq!(kvs[3].val.as_ref().unwrap().op, Some(Operator::Pipe));
        assert_eq!(kvs[4].key, "if");
        assert_eq!(kvs[5].key_string.as_ref().unwrap().queries.len(), 2);
    }

    #[test]
    fn test_parse_control_flow() {
        let query = parse_query("if . then 1 elif .a then 2 else 3 end").unwrap();
        let cond = term_of(&query).conditional.as_ref().unwrap();
        assert_eq!(cond.elif.len(), 1);
        assert!(cond.else_branch.is_some());

        let query = parse_query("try error catch . | f").unwrap();
        assert_eq!(query.op, Some(Operator::Pipe));
        let try_catch = term_of(query.left.as_ref().unwrap()).try_catch.as_ref().unwrap();
        assert_eq!(func_name(&try_catch.body), "error");
        assert!(try_catch.catch.is_some());

        let query = parse_query("reduce .[] as $x (0; . + $x)").unwrap();
        let reduce = term_of(&query).reduce.as_ref().unwrap();
        assert_eq!(reduce.pattern.name, "$x");
        assert_eq!(reduce.update.op, Some(Operator::Add));

        let query = parse_query("foreach .[] as $x (0; . + $x; [$x, .])").unwrap();
        assert!(term_of(&query).foreach.as_ref().unwrap().extract.is_some());

        let query = parse_query("label $out | 1, break $out").unwrap();
        let label = term_of(&query).label.as_ref().unwrap();
        assert_eq!(label.ident, "$out");
        let brk = term_of(label.body.right.as_ref().unwrap());
        assert_eq!(brk.kind, TermKind::Break);
        assert_eq!(brk.break_label, "$out");
    }

    #[test]
    fn test_parse_local_definitions() {
        let defs = parse_program("def f: def g: 3; g, g;").unwrap();
        let body = &defs[0].body;
        assert_eq!(body.func_defs.len(), 1);
        assert_eq!(body.func_defs[0].name, "g");
        assert_eq!(body.op, Some(Operator::Comma));
    }

    #[test]
    fn test_parse_call_arguments() {
        let query = parse_query("sub(\"a\"; \"b\"; \"g\")").unwrap();
        let func = term_of(&query).func.as_ref().unwrap();
        assert_eq!(func.name, "sub");
        assert_eq!(func.args.len(), 3);
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_program("def f: .;\n. ").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("expected function definition"));

        let err = parse_program("def f: (1;").unwrap_err();
        assert!(err.message.contains("expected \")\""));

        let err = parse_program("import \"a\" as a;").unwrap_err();
        assert_eq!(err.message, "module directives are not supported");

        assert!(parse_program("def f: 1").is_err());
        assert!(parse_query("1 +").is_err());
        assert!(parse_query("1 2").is_err());
    }

    #[test]
    fn test_parse_empty_program() {
        assert!(parse_program("# nothing here\n").unwrap().is_empty());
    }
}
