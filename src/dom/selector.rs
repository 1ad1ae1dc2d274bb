//! Selector parsing and matching.
//!
//! Supports the subset of CSS selectors the page behaviors use:
//!
//! - type (`section`), universal (`*`), class (`.tab-btn`), id (`#phone`)
//! - attributes: `[required]`, `[data-category="x"]`, `[href^="#"]`
//! - compounds (`input[required]`, `.form-group.error`)
//! - descendant combinator (`.form-group.error input`)
//! - selector lists (`.service-card, .stat`)
//!
//! Anything else is a [`SiteError::Selector`].

use std::str::FromStr;

use super::document::Document;
use crate::error::{Result, SiteError};
use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// Attribute test inside `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// `[name]`
    Exists,
    /// `[name="value"]`
    Equals(String),
    /// `[name^="value"]`
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub op: AttrMatch,
}

/// One compound selector: every part must match the same element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrSelector>,
}

/// Compounds joined by descendant combinators, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    parts: Vec<Compound>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

// =============================================================================
// MATCHING
// =============================================================================

impl Compound {
    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        if let Some(tag) = &self.tag {
            if !doc.tag(el).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if doc.attribute(el, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(el, c)) {
            return false;
        }
        self.attrs.iter().all(|attr| match (&attr.op, doc.attribute(el, &attr.name)) {
            (_, None) => false,
            (AttrMatch::Exists, Some(_)) => true,
            (AttrMatch::Equals(want), Some(v)) => v == want,
            (AttrMatch::Prefix(want), Some(v)) => v.starts_with(want.as_str()),
        })
    }
}

impl Complex {
    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        let Some((last, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(doc, el) {
            return false;
        }

        // Nearest-ancestor greedy walk is exact for descendant-only chains.
        let mut remaining = ancestors.iter().rev().peekable();
        let mut cursor = doc.parent(el);
        while let Some(part) = remaining.peek() {
            match cursor {
                None => return false,
                Some(node) => {
                    if part.matches(doc, node) {
                        remaining.next();
                    }
                    cursor = doc.parent(node);
                }
            }
        }
        true
    }
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse_list()
    }

    /// Whether `el` matches any alternative in the list.
    pub fn matches(&self, doc: &Document, el: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, el))
    }
}

impl FromStr for Selector {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> SiteError {
        SiteError::selector(self.source, reason)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(self.error(format!("expected `{want}`, found `{c}`"))),
            None => Err(self.error(format!("expected `{want}`, found end of input"))),
        }
    }

    fn ident(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error(format!("expected identifier at offset {start}")));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_list(&mut self) -> Result<Selector> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.parse_complex()?);
            self.skip_ws();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex> {
        let mut parts = vec![self.parse_compound()?];
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some(_) if had_ws => parts.push(self.parse_compound()?),
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            }
        }
        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut any = false;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                any = true;
            }
            Some(c) if c.is_ascii_alphabetic() => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
                any = true;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                _ => break,
            }
            any = true;
        }

        if !any {
            return Err(match self.peek() {
                Some(c) => self.error(format!("unexpected `{c}`")),
                None => self.error("empty selector"),
            });
        }
        Ok(compound)
    }

    fn parse_attr(&mut self) -> Result<AttrSelector> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrSelector {
                    name,
                    op: AttrMatch::Exists,
                });
            }
            Some('=') => {
                self.pos += 1;
                AttrMatch::Equals(String::new())
            }
            Some('^') => {
                self.pos += 1;
                self.expect('=')?;
                AttrMatch::Prefix(String::new())
            }
            Some(c) => return Err(self.error(format!("unexpected `{c}` in attribute selector"))),
            None => return Err(self.error("unterminated attribute selector")),
        };
        self.skip_ws();
        let value = self.attr_value()?;
        self.skip_ws();
        self.expect(']')?;

        let op = match op {
            AttrMatch::Prefix(_) => AttrMatch::Prefix(value),
            _ => AttrMatch::Equals(value),
        };
        Ok(AttrSelector { name, op })
    }

    fn attr_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.expect(quote)?;
                Ok(value)
            }
            _ => self.ident(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
