//! Recursive-descent parser for shape and signature text.
//!
//! ```text
//! shape     := bool | char | i8 | u8 | i16 | u16 | i32 | u32 | i64 | u64
//!            | addr | string | empty | error
//!            | seq<shape> | map<shape,shape> | tuple<[shape {, shape}]>
//!            | expected<shape>
//! signature := shape ( [shape {, shape}] )
//! ```
//!
//! Whitespace between tokens is ignored.

use std::str::FromStr;

use crate::config::SigConfig;
use crate::error::{Result, SigError};
use crate::shape::WireShape;
use crate::signature::Signature;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, config: &SigConfig) -> Self {
        Self {
            input,
            pos: 0,
            max_depth: config.max_depth,
        }
    }

    fn error(&self, message: impl Into<String>) -> SigError {
        SigError::Parse {
            position: self.pos,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(match self.peek() {
                Some(found) => self.error(format!("expected '{expected}', found '{found}'")),
                None => self.error(format!("expected '{expected}', found end of input")),
            })
        }
    }

    fn ident(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a shape name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn shape(&mut self, depth: usize) -> Result<WireShape> {
        if depth > self.max_depth {
            return Err(self.error(format!("shape nested deeper than {}", self.max_depth)));
        }
        self.skip_whitespace();
        let start = self.pos;
        let name = self.ident()?;
        let shape = match name {
            "bool" => WireShape::Bool,
            "char" => WireShape::Char,
            "i8" => WireShape::I8,
            "u8" => WireShape::U8,
            "i16" => WireShape::I16,
            "u16" => WireShape::U16,
            "i32" => WireShape::I32,
            "u32" => WireShape::U32,
            "i64" => WireShape::I64,
            "u64" => WireShape::U64,
            "addr" => WireShape::Address,
            "string" => WireShape::String,
            "empty" => WireShape::Empty,
            "error" => WireShape::Error,
            "seq" => {
                self.expect('<')?;
                let inner = self.shape(depth + 1)?;
                self.expect('>')?;
                WireShape::Sequence(Box::new(inner))
            }
            "map" => {
                self.expect('<')?;
                let key = self.shape(depth + 1)?;
                self.expect(',')?;
                let value = self.shape(depth + 1)?;
                self.expect('>')?;
                WireShape::Map(Box::new(key), Box::new(value))
            }
            "tuple" => {
                self.expect('<')?;
                let members = self.list('>', depth + 1)?;
                WireShape::Tuple(members)
            }
            "expected" => {
                self.expect('<')?;
                let inner = self.shape(depth + 1)?;
                self.expect('>')?;
                WireShape::Expected(Box::new(inner))
            }
            other => {
                self.pos = start;
                return Err(self.error(format!("unknown shape '{other}'")));
            }
        };
        Ok(shape)
    }

    /// Comma-separated shapes up to and including `close`.
    fn list(&mut self, close: char, depth: usize) -> Result<Vec<WireShape>> {
        let mut shapes = Vec::new();
        if self.eat(close) {
            return Ok(shapes);
        }
        loop {
            shapes.push(self.shape(depth)?);
            if self.eat(close) {
                return Ok(shapes);
            }
            self.expect(',')?;
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(found) => Err(self.error(format!("unexpected '{found}' after shape"))),
        }
    }
}

impl WireShape {
    /// Parse shape text with explicit limits.
    pub fn parse_with_config(input: &str, config: &SigConfig) -> Result<Self> {
        let mut parser = Parser::new(input, config);
        let shape = parser.shape(1)?;
        parser.finish()?;
        Ok(shape)
    }
}

impl FromStr for WireShape {
    type Err = SigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with_config(s, &SigConfig::default())
    }
}

impl Signature {
    /// Parse signature text with explicit limits.
    pub fn parse_with_config(input: &str, config: &SigConfig) -> Result<Self> {
        let mut parser = Parser::new(input, config);
        let ret = parser.shape(1)?;
        parser.expect('(')?;
        let args = parser.list(')', 2)?;
        parser.finish()?;
        Ok(Signature::new(ret, args))
    }
}

impl FromStr for Signature {
    type Err = SigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with_config(s, &SigConfig::default())
    }
}
