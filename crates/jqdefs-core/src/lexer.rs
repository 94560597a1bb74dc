//! Tokenizer for jq definition sources.

use crate::ast::Operator;
use crate::error::{ParseError, ParseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Def,
    As,
    If,
    Then,
    Elif,
    Else,
    End,
    And,
    Or,
    Try,
    Catch,
    Reduce,
    Foreach,
    Label,
    Break,
    Import,
    Include,
}

impl Keyword {
    fn from_ident(ident: &str) -> Option<Self> {
        let keyword = match ident {
            "def" => Keyword::Def,
            "as" => Keyword::As,
            "if" => Keyword::If,
            "then" => Keyword::Then,
            "elif" => Keyword::Elif,
            "else" => Keyword::Else,
            "end" => Keyword::End,
            "and" => Keyword::And,
            "or" => Keyword::Or,
            "try" => Keyword::Try,
            "catch" => Keyword::Catch,
            "reduce" => Keyword::Reduce,
            "foreach" => Keyword::Foreach,
            "label" => Keyword::Label,
            "break" => Keyword::Break,
            "import" => Keyword::Import,
            "include" => Keyword::Include,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Def => "def",
            Keyword::As => "as",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::End => "end",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Try => "try",
            Keyword::Catch => "catch",
            Keyword::Reduce => "reduce",
            Keyword::Foreach => "foreach",
            Keyword::Label => "label",
            Keyword::Break => "break",
            Keyword::Import => "import",
            Keyword::Include => "include",
        }
    }
}

/// Piece of a string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum StrPart {
    Lit(String),
    /// Source of a `\(..)` interpolation and its byte offset.
    Interp { source: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Keyword(Keyword),
    /// `.name`
    Field(String),
    /// `$name`, sigil included.
    Variable(String),
    /// `@name`, sigil included.
    Format(String),
    Number(String),
    Str(Vec<StrPart>),
    Op(Operator),

    Dot,
    DotDot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Semicolon,
    Question,
    /// `?//`
    AltDestructure,

    Eof,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier {name:?}"),
            Token::Keyword(keyword) => format!("keyword {:?}", keyword.as_str()),
            Token::Field(name) => format!("field .{name}"),
            Token::Variable(name) | Token::Format(name) => name.clone(),
            Token::Number(number) => format!("number {number}"),
            Token::Str(_) => "string literal".to_string(),
            Token::Op(op) => format!("{:?}", op.as_str()),
            Token::Dot => "\".\"".to_string(),
            Token::DotDot => "\"..\"".to_string(),
            Token::LParen => "\"(\"".to_string(),
            Token::RParen => "\")\"".to_string(),
            Token::LBracket => "\"[\"".to_string(),
            Token::RBracket => "\"]\"".to_string(),
            Token::LBrace => "\"{\"".to_string(),
            Token::RBrace => "\"}\"".to_string(),
            Token::Colon => "\":\"".to_string(),
            Token::Semicolon => "\";\"".to_string(),
            Token::Question => "\"?\"".to_string(),
            Token::AltDestructure => "\"?//\"".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    /// Absolute byte offset of the token start.
    pub offset: usize,
}

/// Tokenize `source`. `base` is the absolute offset of `source` within the
/// enclosing input, so nested interpolations report real positions.
pub fn lex(source: &str, base: usize) -> ParseResult<Vec<SpannedToken>> {
    Lexer::new(source, base).tokenize()
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, base: usize) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            base,
        }
    }

    fn error(&self, message: impl Into<String>, pos: usize) -> ParseError {
        ParseError::new(message, self.base + pos)
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn tokenize(mut self) -> ParseResult<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let start = self.pos;
            let Some(ch) = self.peek_at(0) else {
                tokens.push(SpannedToken {
                    token: Token::Eof,
                    offset: self.base + start,
                });
                return Ok(tokens);
            };

            let token = match ch {
                b'.' => self.lex_dot(),
                b'$' => {
                    self.pos += 1;
                    let name = self.lex_ident_body();
                    if name.is_empty() {
                        return Err(self.error("expected variable name after \"$\"", start));
                    }
                    Token::Variable(format!("${name}"))
                }
                b'@' => {
                    self.pos += 1;
                    let name = self.lex_ident_body();
                    if name.is_empty() {
                        return Err(self.error("expected format name after \"@\"", start));
                    }
                    Token::Format(format!("@{name}"))
                }
                b'"' => {
                    self.pos += 1;
                    Token::Str(self.lex_string(start)?)
                }
                b'0'..=b'9' => self.lex_number(),
                c if is_ident_start(c) => {
                    let ident = self.lex_ident_body();
                    match Keyword::from_ident(&ident) {
                        Some(keyword) => Token::Keyword(keyword),
                        None => Token::Ident(ident),
                    }
                }
                b'(' => self.single(Token::LParen),
                b')' => self.single(Token::RParen),
                b'[' => self.single(Token::LBracket),
                b']' => self.single(Token::RBracket),
                b'{' => self.single(Token::LBrace),
                b'}' => self.single(Token::RBrace),
                b':' => self.single(Token::Colon),
                b';' => self.single(Token::Semicolon),
                b',' => self.single(Token::Op(Operator::Comma)),
                b'?' => {
                    if self.peek_at(1) == Some(b'/') && self.peek_at(2) == Some(b'/') {
                        self.pos += 3;
                        Token::AltDestructure
                    } else {
                        self.single(Token::Question)
                    }
                }
                _ => match self.lex_operator() {
                    Some(op) => Token::Op(op),
                    None => {
                        let ch = self.source[start..].chars().next().unwrap_or('?');
                        return Err(self.error(format!("unexpected character {ch:?}"), start));
                    }
                },
            };

            tokens.push(SpannedToken {
                token,
                offset: self.base + start,
            });
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek_at(0) {
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                b'#' => {
                    while let Some(ch) = self.peek_at(0) {
                        if ch == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_dot(&mut self) -> Token {
        match self.peek_at(1) {
            Some(b'.') => {
                self.pos += 2;
                Token::DotDot
            }
            Some(c) if c.is_ascii_digit() => self.lex_number(),
            Some(c) if is_ident_start(c) => {
                self.pos += 1;
                Token::Field(self.lex_ident_body())
            }
            _ => self.single(Token::Dot),
        }
    }

    /// Identifier characters, including `::` module separators.
    fn lex_ident_body(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_at(0) {
            if is_ident_continue(ch) {
                self.pos += 1;
            } else if ch == b':'
                && self.peek_at(1) == Some(b':')
                && self.peek_at(2).is_some_and(is_ident_start)
            {
                self.pos += 2;
            } else {
                break;
            }
        }
        self.source[start..self.pos].to_string()
    }

    fn lex_number(&mut self) -> Token {
        let start = self.pos;
        while self.peek_at(0).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek_at(0) == Some(b'.') && self.peek_at(1) != Some(b'.') {
            self.pos += 1;
            while self.peek_at(0).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek_at(0), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some(b'+' | b'-')));
            if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1 + sign;
                while self.peek_at(0).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        Token::Number(self.source[start..self.pos].to_string())
    }

    fn lex_operator(&mut self) -> Option<Operator> {
        const OPERATORS: [(&str, Operator); 20] = [
            ("//=", Operator::UpdateAlt),
            ("|=", Operator::Modify),
            ("+=", Operator::UpdateAdd),
            ("-=", Operator::UpdateSub),
            ("*=", Operator::UpdateMul),
            ("/=", Operator::UpdateDiv),
            ("%=", Operator::UpdateMod),
            ("==", Operator::Eq),
            ("!=", Operator::Ne),
            ("<=", Operator::Le),
            (">=", Operator::Ge),
            ("//", Operator::Alt),
            ("|", Operator::Pipe),
            ("+", Operator::Add),
            ("-", Operator::Sub),
            ("*", Operator::Mul),
            ("/", Operator::Div),
            ("%", Operator::Mod),
            ("<", Operator::Lt),
            (">", Operator::Gt),
        ];

        let rest = &self.source[self.pos..];
        if rest.starts_with('=') && !rest.starts_with("==") {
            self.pos += 1;
            return Some(Operator::Assign);
        }
        let (text, op) = OPERATORS.iter().find(|(text, _)| rest.starts_with(text))?;
        self.pos += text.len();
        Some(*op)
    }

    /// Lex the body of a string literal; the opening quote is consumed.
    fn lex_string(&mut self, start: usize) -> ParseResult<Vec<StrPart>> {
        let mut parts = Vec::new();
        let mut current = String::new();

        loop {
            let Some(ch) = self.source[self.pos..].chars().next() else {
                return Err(self.error("unterminated string literal", start));
            };
            match ch {
                '"' => {
                    self.pos += 1;
                    break;
                }
                '\\' => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    let Some(escaped) = self.peek_at(0) else {
                        return Err(self.error("unterminated string literal", start));
                    };
                    self.pos += 1;
                    match escaped {
                        b'"' => current.push('"'),
                        b'\\' => current.push('\\'),
                        b'/' => current.push('/'),
                        b'b' => current.push('\u{8}'),
                        b'f' => current.push('\u{c}'),
                        b'n' => current.push('\n'),
                        b'r' => current.push('\r'),
                        b't' => current.push('\t'),
                        b'u' => current.push(self.lex_unicode_escape(escape_start)?),
                        b'(' => {
                            if !current.is_empty() {
                                parts.push(StrPart::Lit(std::mem::take(&mut current)));
                            }
                            let inner_start = self.pos;
                            self.skip_interpolation(escape_start)?;
                            parts.push(StrPart::Interp {
                                source: self.source[inner_start..self.pos - 1].to_string(),
                                offset: self.base + inner_start,
                            });
                        }
                        other => {
                            return Err(self.error(
                                format!("invalid escape sequence \"\\{}\"", other as char),
                                escape_start,
                            ));
                        }
                    }
                }
                _ => {
                    current.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }

        if !current.is_empty() || parts.is_empty() {
            parts.push(StrPart::Lit(current));
        }
        Ok(parts)
    }

    fn lex_unicode_escape(&mut self, escape_start: usize) -> ParseResult<char> {
        let high = self.lex_hex4(escape_start)?;
        if (0xD800..0xDC00).contains(&high) {
            if self.source[self.pos..].starts_with("\\u") {
                self.pos += 2;
                let low = self.lex_hex4(escape_start)?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            return Ok(char::REPLACEMENT_CHARACTER);
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn lex_hex4(&mut self, escape_start: usize) -> ParseResult<u32> {
        let digits = self
            .source
            .get(self.pos..self.pos + 4)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid unicode escape", escape_start))?;
        self.pos += 4;
        u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid unicode escape", escape_start))
    }

    /// Skip to the `)` closing an interpolation, leaving `pos` after it.
    fn skip_interpolation(&mut self, start: usize) -> ParseResult<()> {
        let mut depth = 1usize;
        while let Some(ch) = self.peek_at(0) {
            match ch {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                b'"' => {
                    let string_start = self.pos;
                    self.pos += 1;
                    self.skip_string(string_start)?;
                    continue;
                }
                b'#' => {
                    self.skip_whitespace_and_comments();
                    continue;
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.error("unterminated string interpolation", start))
    }

    /// Skip a nested string literal whose opening quote is consumed.
    fn skip_string(&mut self, start: usize) -> ParseResult<()> {
        while let Some(ch) = self.peek_at(0) {
            match ch {
                b'"' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'\\' => {
                    if self.peek_at(1) == Some(b'(') {
                        let escape_start = self.pos;
                        self.pos += 2;
                        self.skip_interpolation(escape_start)?;
                    } else {
                        self.pos += 2;
                    }
                }
                _ => self.pos += 1,
            }
        }
        Err(self.error("unterminated string literal", start))
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}
