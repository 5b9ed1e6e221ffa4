//! Recursive-descent parser producing a [`Node`] tree.
//!
//! ```text
//! type         := intersection ( '|' intersection )*
//! intersection := primary ( '&' primary )*
//! primary      := '(' type ')'
//!               | INT | STRING
//!               | 'callable' '(' params ')' ':' primary
//!               | 'array' '{' entries '}'
//!               | IDENT [ '<' type ( ',' type )* '>' ]
//! ```
//!
//! Both binary operators are left-associative. A callable's return type is
//! a `primary`, so `callable(): int | null` is a union whose left side is
//! the callable.

use std::ops::Range;

use indexmap::IndexMap;

use crate::lexer::{Token, lex, unescape};
use crate::{CallableParameter, Node, StructMember};

/// Nesting depth accepted before the parser gives up.
pub const DEFAULT_RECURSION_FUEL: u32 = 256;

/// Syntax error with the byte span it was found at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {span:?}")]
pub struct ParseError {
    pub message: String,
    pub span: Range<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    input: &'src str,
    depth: u32,
    recursion_fuel: u32,
}

impl<'src> Parser<'src> {
    pub fn new(input: &'src str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: lex(input)?,
            pos: 0,
            input,
            depth: 0,
            recursion_fuel: DEFAULT_RECURSION_FUEL,
        })
    }

    pub fn with_recursion_fuel(mut self, limit: u32) -> Self {
        self.recursion_fuel = limit;
        self
    }

    /// Parses the whole input as a single type.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        let node = self.parse_type()?;
        if let Some(token) = self.peek() {
            return Err(ParseError::new(
                format!("unexpected {token:?} after type"),
                self.current_span(),
            ));
        }
        Ok(node)
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'src>> {
        self.tokens.get(self.pos + n).map(|(t, _)| *t)
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: Token<'src>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.clone())
            .unwrap_or(self.input.len()..self.input.len())
    }

    fn expect(&mut self, expected: Token<'src>) -> Result<(), ParseError> {
        let span = self.current_span();
        match self.advance() {
            Some(t) if t == expected => Ok(()),
            Some(t) => Err(ParseError::new(
                format!("expected {expected:?}, got {t:?}"),
                span,
            )),
            None => Err(ParseError::new(
                format!("expected {expected:?}, got EOF"),
                span,
            )),
        }
    }

    fn parse_type(&mut self) -> Result<Node, ParseError> {
        self.nested(Self::parse_union)
    }

    /// Runs `parse` one nesting level deeper, charging recursion fuel.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Node, ParseError> {
        if self.depth >= self.recursion_fuel {
            return Err(ParseError::new(
                "recursion limit exceeded",
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_union(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_intersection()?;
        while self.eat(Token::Pipe) {
            let right = self.parse_intersection()?;
            node = Node::union(node, right);
        }
        Ok(node)
    }

    fn parse_intersection(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_primary()?;
        while self.eat(Token::Amp) {
            let right = self.parse_primary()?;
            node = Node::intersection(node, right);
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let span = self.current_span();
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let node = self.parse_type()?;
                self.expect(Token::RParen)?;
                Ok(node)
            }
            Some(Token::Int(text)) => {
                self.advance();
                parse_int(text, span).map(Node::IntLiteral)
            }
            Some(Token::Str(quoted)) => {
                self.advance();
                Ok(Node::StringLiteral(unescape(quoted)))
            }
            Some(Token::Ident("callable")) if self.peek_nth(1) == Some(Token::LParen) => {
                self.advance();
                self.parse_callable()
            }
            Some(Token::Ident("array")) if self.peek_nth(1) == Some(Token::LBrace) => {
                self.advance();
                self.parse_shape()
            }
            Some(Token::Ident(name)) => {
                self.advance();
                let type_parameters = if self.eat(Token::LAngle) {
                    self.parse_type_parameters()?
                } else {
                    Vec::new()
                };
                Ok(Node::generic(name, type_parameters))
            }
            Some(t) => Err(ParseError::new(format!("expected type, got {t:?}"), span)),
            None => Err(ParseError::new("expected type, got EOF", span)),
        }
    }

    /// Parses the list after `<` up to and including `>`.
    fn parse_type_parameters(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut parameters = vec![self.parse_type()?];
        while self.eat(Token::Comma) {
            parameters.push(self.parse_type()?);
        }
        self.expect(Token::RAngle)?;
        Ok(parameters)
    }

    fn parse_callable(&mut self) -> Result<Node, ParseError> {
        self.expect(Token::LParen)?;
        let mut parameters = Vec::new();

        loop {
            if self.eat(Token::RParen) {
                break;
            }

            let ty = self.parse_type()?;
            if self.eat(Token::Eq) {
                parameters.push(CallableParameter::optional(ty));
            } else {
                parameters.push(CallableParameter::required(ty));
            }

            if !self.eat(Token::Comma) {
                self.expect(Token::RParen)?;
                break;
            }
        }

        self.expect(Token::Colon)?;
        let return_type = self.nested(Self::parse_primary)?;
        Ok(Node::callable(return_type, parameters))
    }

    /// Parses `{ ... }` after `array`: keyed entries make a struct,
    /// positional ones a tuple. An empty shape is an empty struct.
    fn parse_shape(&mut self) -> Result<Node, ParseError> {
        self.expect(Token::LBrace)?;
        let mut members = IndexMap::new();
        let mut elements = Vec::new();

        loop {
            if self.eat(Token::RBrace) {
                break;
            }

            let span = self.current_span();
            if let Some(name) = self.struct_key() {
                if !elements.is_empty() {
                    return Err(ParseError::new(
                        "cannot mix keyed and positional entries in array shape",
                        span,
                    ));
                }
                if name.is_empty() {
                    return Err(ParseError::new("array shape key must not be empty", span));
                }
                let optional = self.eat(Token::Question);
                self.expect(Token::Colon)?;
                let ty = self.parse_type()?;
                if members.contains_key(&name) {
                    return Err(ParseError::new(
                        format!("duplicate array shape key '{name}'"),
                        span,
                    ));
                }
                let member = if optional {
                    StructMember::optional(ty)
                } else {
                    StructMember::required(ty)
                };
                members.insert(name, member);
            } else {
                if !members.is_empty() {
                    return Err(ParseError::new(
                        "cannot mix keyed and positional entries in array shape",
                        span,
                    ));
                }
                elements.push(self.parse_type()?);
            }

            if !self.eat(Token::Comma) {
                self.expect(Token::RBrace)?;
                break;
            }
        }

        if elements.is_empty() {
            Ok(Node::Struct(members))
        } else {
            Ok(Node::Tuple(elements))
        }
    }

    /// Consumes a shape key if the next tokens are `key:` or `key?:`.
    fn struct_key(&mut self) -> Option<String> {
        if !matches!(
            self.peek_nth(1),
            Some(Token::Colon) | Some(Token::Question)
        ) {
            return None;
        }
        let name = match self.peek()? {
            Token::Ident(name) | Token::Int(name) => name.to_string(),
            Token::Str(quoted) => unescape(quoted),
            _ => return None,
        };
        self.advance();
        Some(name)
    }
}

fn parse_int(text: &str, span: Range<usize>) -> Result<i64, ParseError> {
    text.parse()
        .map_err(|_| ParseError::new(format!("integer literal out of range: {text}"), span))
}
