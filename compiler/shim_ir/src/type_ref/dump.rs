//! Dump-backed type symbols.
//!
//! The textual dump spells a type reference the way C# source does:
//!
//! ```text
//! Outer.Inner<int, List<string>>[]*
//! ```
//!
//! Nested names are separated by `.`, generic arguments are comma-separated
//! at bracket depth zero, and any number of `[]`/`[,]`, `*` and `&`
//! suffixes may follow. Arguments written on a declaring segment
//! (`Dictionary<K, V>.Entry`) are carried by the innermost name, the way the
//! runtime metadata stores them.

use std::fmt;

use thiserror::Error;

use super::RefKind;
use crate::Primitive;

/// A type symbol read from the dump whose text could not be understood.
///
/// Fatal for the one declaration that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed type symbol `{text}` at offset {position}: {reason}")]
pub struct ParseFormatError {
    pub text: String,
    pub position: usize,
    pub reason: &'static str,
}

/// Reference decoration applied after the name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Suffix {
    Array { rank: u8 },
    Pointer,
    ByRef,
}

/// Structural identity of a dump type reference.
///
/// Equality is structural, so two textual occurrences of the same symbol
/// compare equal regardless of incidental whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DumpSymbol {
    namespace: String,
    path: Vec<String>,
    arguments: Vec<DumpSymbol>,
    suffixes: Vec<Suffix>,
    definition: bool,
}

impl DumpSymbol {
    /// Parse a type reference as it appears in a member signature.
    pub fn parse(namespace: &str, text: &str) -> Result<Self, ParseFormatError> {
        Parser::new(text).parse_complete(namespace)
    }

    /// Parse the symbol that heads a type declaration. Its generic arguments
    /// are the declaration's generic parameters.
    pub fn parse_definition(namespace: &str, text: &str) -> Result<Self, ParseFormatError> {
        let mut symbol = Self::parse(namespace, text)?;
        symbol.definition = true;
        Ok(symbol)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Nesting path, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn arguments(&self) -> &[DumpSymbol] {
        &self.arguments
    }

    pub fn suffixes(&self) -> &[Suffix] {
        &self.suffixes
    }

    pub fn is_definition(&self) -> bool {
        self.definition
    }

    pub(crate) fn kind(&self) -> RefKind {
        match self.suffixes.last() {
            Some(Suffix::Array { rank }) => RefKind::Array { rank: *rank },
            Some(Suffix::Pointer) => RefKind::Pointer,
            Some(Suffix::ByRef) => RefKind::ByRef,
            None => RefKind::Named,
        }
    }

    pub(crate) fn is_generic(&self) -> bool {
        self.suffixes.is_empty() && !self.arguments.is_empty()
    }

    /// Simple name as stored on the node: the innermost segment for named
    /// types, the decorated element text for pointers and arrays.
    pub(crate) fn display_name(&self) -> String {
        if self.suffixes.is_empty() {
            self.path.last().cloned().unwrap_or_default()
        } else {
            let mut text = String::new();
            write_symbol(&mut text, self, false);
            text
        }
    }

    /// The symbol with its outermost decoration removed.
    pub(crate) fn element(&self) -> Option<DumpSymbol> {
        if self.suffixes.is_empty() {
            return None;
        }
        let mut element = self.clone();
        element.suffixes.pop();
        element.definition = false;
        Some(element)
    }

    /// The enclosing type of a nested symbol.
    pub(crate) fn declaring(&self) -> Option<DumpSymbol> {
        if !self.suffixes.is_empty() || self.path.len() < 2 {
            return None;
        }
        Some(DumpSymbol {
            namespace: self.namespace.clone(),
            path: self.path[..self.path.len() - 1].to_vec(),
            arguments: Vec::new(),
            suffixes: Vec::new(),
            definition: self.definition,
        })
    }
}

impl fmt::Display for DumpSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        write_symbol(&mut text, self, true);
        f.write_str(&text)
    }
}

fn write_symbol(out: &mut String, symbol: &DumpSymbol, with_namespace: bool) {
    if with_namespace && !symbol.namespace.is_empty() {
        out.push_str(&symbol.namespace);
        out.push('.');
    }
    out.push_str(&symbol.path.join("."));
    if !symbol.arguments.is_empty() {
        out.push('<');
        for (i, arg) in symbol.arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_symbol(out, arg, with_namespace);
        }
        out.push('>');
    }
    for suffix in &symbol.suffixes {
        match suffix {
            Suffix::Array { rank } => {
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            Suffix::Pointer => out.push('*'),
            Suffix::ByRef => out.push('&'),
        }
    }
}

/// Deepest generic argument nesting a symbol may carry.
pub(crate) const MAX_GENERIC_NESTING: usize = 256;

/// Recursive-descent reader over one symbol's text.
struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, reason: &'static str) -> ParseFormatError {
        ParseFormatError {
            text: self.text.to_owned(),
            position: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_complete(mut self, namespace: &str) -> Result<DumpSymbol, ParseFormatError> {
        let symbol = self.parse_type(namespace)?;
        self.skip_whitespace();
        if self.pos != self.bytes.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(symbol)
    }

    fn parse_type(&mut self, namespace: &str) -> Result<DumpSymbol, ParseFormatError> {
        self.skip_whitespace();
        let mut path = vec![self.ident()?];
        let mut arguments = Vec::new();
        loop {
            match self.peek() {
                Some(b'.') => {
                    self.pos += 1;
                    path.push(self.ident()?);
                }
                Some(b'<') => {
                    if !arguments.is_empty() && !self.follows_ident() {
                        return Err(self.error("generic argument list repeated"));
                    }
                    self.pos += 1;
                    self.arguments(&mut arguments)?;
                }
                _ => break,
            }
        }

        let suffixes = self.suffixes()?;

        let mut namespace = namespace.to_owned();
        if path.len() == 1 && arguments.is_empty() {
            if let Some(system_name) = Primitive::keyword_alias(&path[0]) {
                namespace = Primitive::NAMESPACE.to_owned();
                path[0] = system_name.to_owned();
            }
        }

        Ok(DumpSymbol {
            namespace,
            path,
            arguments,
            suffixes,
            definition: false,
        })
    }

    /// Whether the byte before the cursor ends an identifier.
    fn follows_ident(&self) -> bool {
        self.pos > 0 && !is_delimiter(self.bytes[self.pos - 1])
    }

    fn ident(&mut self) -> Result<String, ParseFormatError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| !is_delimiter(b)) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok(self.text[start..self.pos].to_owned())
    }

    fn arguments(&mut self, out: &mut Vec<DumpSymbol>) -> Result<(), ParseFormatError> {
        if self.depth >= MAX_GENERIC_NESTING {
            return Err(self.error("generic nesting too deep"));
        }
        self.depth += 1;
        let result = self.argument_list(out);
        self.depth -= 1;
        result
    }

    fn argument_list(&mut self, out: &mut Vec<DumpSymbol>) -> Result<(), ParseFormatError> {
        loop {
            out.push(self.parse_type("")?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(());
                }
                None => return Err(self.error("unclosed generic argument list")),
                Some(_) => return Err(self.error("expected `,` or `>`")),
            }
        }
    }

    fn suffixes(&mut self) -> Result<Vec<Suffix>, ParseFormatError> {
        let mut suffixes = Vec::new();
        loop {
            match self.peek() {
                Some(b'[') => {
                    self.pos += 1;
                    let mut rank: u8 = 1;
                    loop {
                        match self.peek() {
                            Some(b',') => {
                                rank = rank.saturating_add(1);
                                self.pos += 1;
                            }
                            Some(b']') => {
                                self.pos += 1;
                                break;
                            }
                            _ => return Err(self.error("unclosed array rank")),
                        }
                    }
                    suffixes.push(Suffix::Array { rank });
                }
                Some(b'*') => {
                    self.pos += 1;
                    suffixes.push(Suffix::Pointer);
                }
                Some(b'&') => {
                    self.pos += 1;
                    suffixes.push(Suffix::ByRef);
                }
                _ => return Ok(suffixes),
            }
        }
    }
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'<' | b'>' | b'[' | b']' | b',' | b'*' | b'&' | b'.') || b.is_ascii_whitespace()
}
