//! Type-expression lexer and parser.
//!
//! Parameter types arrive in the manifest as host-language source text such as
//! `global::System.Collections.Generic.List<int>` or `(int a, string b)[]`. This module turns
//! that text into a [`TypeExpr`] tree with byte spans, so that later validation can point at the
//! offending part of the expression.
//!
//! Grammar:
//!
//! ```text
//! type     := primary suffix*
//! primary  := '(' element (',' element)* ')' | named
//! element  := type IDENT?
//! named    := ('global' '::')? segment ('.' segment)*
//! segment  := IDENT ('<' type (',' type)* '>')?
//! suffix   := '?' | '[' ','* ']'
//! ```

use std::fmt;

/// Source location span (byte offsets into the type expression)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Parsed type expression with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExprKind {
    /// A possibly qualified, possibly generic name: `global::A.B<int>.C`.
    Named { global: bool, segments: Vec<NameSegment> },
    /// At least two elements (single-element and empty tuples are syntax errors).
    Tuple(Vec<TupleElementExpr>),
    Nullable(Box<TypeExpr>),
    /// `rank` is the number of dimensions: `int[]` is 1, `int[,]` is 2.
    Array { element: Box<TypeExpr>, rank: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    pub name: String,
    pub args: Vec<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleElementExpr {
    pub ty: TypeExpr,
    /// Element name as written (may carry the verbatim `@` prefix) and its span.
    pub name: Option<(String, Span)>,
}

/// Syntax error inside a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSyntaxError {
    pub message: String,
    pub span: Span,
}

impl TypeSyntaxError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for TypeSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for TypeSyntaxError {}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    ColonColon,
    Dot,
    Comma,
    LParen,
    RParen,
    Lt,
    Gt,
    LBracket,
    RBracket,
    Question,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "'{name}'"),
            TokenKind::ColonColon => write!(f, "'::'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    span: Span,
}

fn lex(source: &str) -> Result<Vec<Token>, TypeSyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '@' || c == '_' || c.is_alphabetic() {
            let mut end = start + c.len_utf8();
            chars.next();
            while let Some(&(i, c)) = chars.peek() {
                if c == '_' || c.is_alphanumeric() {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &source[start..end];
            if text == "@" {
                return Err(TypeSyntaxError::new("expected an identifier after '@'", Span::new(start, end)));
            }
            tokens.push(Token {
                kind: TokenKind::Ident(text.to_string()),
                span: Span::new(start, end),
            });
            continue;
        }

        chars.next();
        let single = |kind| Token {
            kind,
            span: Span::new(start, start + 1),
        };
        let token = match c {
            ':' => match chars.peek() {
                Some(&(_, ':')) => {
                    chars.next();
                    Token {
                        kind: TokenKind::ColonColon,
                        span: Span::new(start, start + 2),
                    }
                }
                _ => return Err(TypeSyntaxError::new("expected '::'", Span::new(start, start + 1))),
            },
            '.' => single(TokenKind::Dot),
            ',' => single(TokenKind::Comma),
            '(' => single(TokenKind::LParen),
            ')' => single(TokenKind::RParen),
            '<' => single(TokenKind::Lt),
            '>' => single(TokenKind::Gt),
            '[' => single(TokenKind::LBracket),
            ']' => single(TokenKind::RBracket),
            '?' => single(TokenKind::Question),
            other => {
                return Err(TypeSyntaxError::new(
                    format!("unexpected character '{other}'"),
                    Span::new(start, start + other.len_utf8()),
                ));
            }
        };
        tokens.push(token);
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(source.len(), source.len()),
    });
    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// Parse one complete type expression.
///
/// ## Errors
/// Returns a [`TypeSyntaxError`] for empty input, unbalanced brackets, empty or single-element
/// tuples, and trailing tokens.
pub fn parse_type_expr(source: &str) -> Result<TypeExpr, TypeSyntaxError> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    if parser.is_at_end() {
        return Err(TypeSyntaxError::new("empty type expression", Span::new(0, source.len())));
    }
    let ty = parser.type_expr()?;
    if !parser.is_at_end() {
        let token = parser.peek();
        return Err(TypeSyntaxError::new(
            format!("unexpected {} after type", token.kind),
            token.span,
        ));
    }
    Ok(ty)
}

/// Deepest nesting of type arguments, tuple elements and `?`/`[]` suffixes a type may use.
pub const MAX_NESTING_DEPTH: usize = 128;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> &'a Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos - 1]
    }

    fn previous_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].span.end
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<&'a Token, TypeSyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(TypeSyntaxError::new(
                format!("{message}, found {}", token.kind),
                token.span,
            ))
        }
    }

    fn identifier(&mut self) -> Result<(String, Span), TypeSyntaxError> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name.clone(), token.span))
            }
            other => Err(TypeSyntaxError::new(
                format!("expected a type name, found {other}"),
                token.span,
            )),
        }
    }

    fn too_deep(&self) -> TypeSyntaxError {
        TypeSyntaxError::new("type expression nested too deeply", self.peek().span)
    }

    fn type_expr(&mut self) -> Result<TypeExpr, TypeSyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = self.suffixed();
        self.depth -= 1;
        result
    }

    fn suffixed(&mut self) -> Result<TypeExpr, TypeSyntaxError> {
        let mut ty = self.primary()?;
        let mut wrappers = 0;
        loop {
            let is_suffix = self.check(&TokenKind::Question) || self.check(&TokenKind::LBracket);
            if is_suffix {
                wrappers += 1;
                if self.depth + wrappers > MAX_NESTING_DEPTH {
                    return Err(self.too_deep());
                }
            }
            if self.check(&TokenKind::Question) {
                let span = ty.span.merge(self.advance().span);
                ty = TypeExpr {
                    kind: TypeExprKind::Nullable(Box::new(ty)),
                    span,
                };
            } else if self.match_token(&TokenKind::LBracket) {
                let mut rank = 1;
                while self.match_token(&TokenKind::Comma) {
                    rank += 1;
                }
                let close = self.expect(&TokenKind::RBracket, "expected ']' after array rank")?;
                let span = ty.span.merge(close.span);
                ty = TypeExpr {
                    kind: TypeExprKind::Array {
                        element: Box::new(ty),
                        rank,
                    },
                    span,
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn primary(&mut self) -> Result<TypeExpr, TypeSyntaxError> {
        if self.check(&TokenKind::LParen) {
            self.tuple()
        } else {
            self.named()
        }
    }

    fn tuple(&mut self) -> Result<TypeExpr, TypeSyntaxError> {
        let start = self.advance().span.start;
        if self.check(&TokenKind::RParen) {
            let end = self.advance().span.end;
            return Err(TypeSyntaxError::new("empty tuple type", Span::new(start, end)));
        }

        let mut elements = Vec::new();
        loop {
            let ty = self.type_expr()?;
            let name = match &self.peek().kind {
                TokenKind::Ident(_) => Some(self.identifier()?),
                _ => None,
            };
            elements.push(TupleElementExpr { ty, name });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RParen, "expected ')' after tuple elements")?.span.end;
        let span = Span::new(start, end);

        if elements.len() < 2 {
            return Err(TypeSyntaxError::new("tuple type needs at least two elements", span));
        }
        Ok(TypeExpr {
            kind: TypeExprKind::Tuple(elements),
            span,
        })
    }

    fn named(&mut self) -> Result<TypeExpr, TypeSyntaxError> {
        let start = self.peek().span.start;
        let mut global = false;
        if let TokenKind::Ident(name) = &self.peek().kind {
            if name == "global" && matches!(self.tokens.get(self.pos + 1), Some(t) if t.kind == TokenKind::ColonColon) {
                self.advance();
                self.advance();
                global = true;
            }
        }

        let mut segments = vec![self.segment()?];
        while self.match_token(&TokenKind::Dot) {
            segments.push(self.segment()?);
        }
        Ok(TypeExpr {
            kind: TypeExprKind::Named { global, segments },
            span: Span::new(start, self.previous_end()),
        })
    }

    fn segment(&mut self) -> Result<NameSegment, TypeSyntaxError> {
        let (name, name_span) = self.identifier()?;
        let mut args = Vec::new();
        if self.match_token(&TokenKind::Lt) {
            loop {
                args.push(self.type_expr()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::Gt, "expected '>' after type arguments")?;
        }
        Ok(NameSegment {
            name,
            args,
            span: Span::new(name_span.start, self.previous_end()),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
