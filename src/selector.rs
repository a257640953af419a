//! Compound CSS selectors, enough for the page's selector contract.
//!
//! Supported: a selector list (`a, b`) of compound selectors made of an
//! optional tag (or `*`), `#id`, `.class`, `[attr]`, `[attr=value]` and
//! `[attr^=value]` (values optionally quoted). Combinators are rejected.

use crate::dom::Element;
use crate::error::{PageError, PageResult};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    op: AttrMatch,
}

impl AttrCondition {
    fn matches(&self, element: &Element) -> bool {
        match (element.attribute(&self.name), &self.op) {
            (None, _) => false,
            (Some(_), AttrMatch::Exists) => true,
            (Some(actual), AttrMatch::Equals(expected)) => actual == expected,
            (Some(actual), AttrMatch::Prefix(prefix)) => {
                !prefix.is_empty() && actual.starts_with(prefix.as_str())
            }
        }
    }
}

/// One compound selector, e.g. `a.nav-link[href^="#"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrCondition>,
}

impl CompoundSelector {
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
            && self.attributes.iter().all(|attr| attr.matches(element))
    }
}

/// Comma-separated list of compound selectors; matches when any member does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<CompoundSelector>);

impl SelectorList {
    pub fn parse(input: &str) -> PageResult<Self> {
        let parts = split_list(input)?;
        let selectors = parts
            .iter()
            .map(|part| Parser::new(part, input).compound())
            .collect::<PageResult<Vec<_>>>()?;
        Ok(SelectorList(selectors))
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.0.iter().any(|selector| selector.matches(element))
    }
}

impl FromStr for SelectorList {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SelectorList::parse(s)
    }
}

fn invalid(selector: &str, reason: impl Into<String>) -> PageError {
    PageError::Selector {
        selector: selector.to_string(),
        reason: reason.into(),
    }
}

/// Split on commas that are not inside quotes or brackets.
fn split_list(input: &str) -> PageResult<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_brackets = false;

    for c in input.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '[') => {
                in_brackets = true;
                current.push(c);
            }
            (None, ']') => {
                in_brackets = false;
                current.push(c);
            }
            (None, ',') if !in_brackets => {
                parts.push(std::mem::take(&mut current).trim().to_string());
            }
            (None, c) => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(invalid(input, "unterminated quote"));
    }
    parts.push(current.trim().to_string());

    if parts.iter().any(|part| part.is_empty()) {
        return Err(invalid(input, "empty selector"));
    }
    Ok(parts)
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn new(part: &str, source: &'a str) -> Self {
        Parser {
            chars: part.chars().collect(),
            pos: 0,
            source,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn required_ident(&mut self, what: &str) -> PageResult<String> {
        let ident = self.ident();
        if ident.is_empty() {
            Err(invalid(self.source, format!("expected {} name", what)))
        } else {
            Ok(ident)
        }
    }

    fn value(&mut self) -> PageResult<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == q {
                        let value = self.chars[start..self.pos].iter().collect();
                        self.pos += 1;
                        return Ok(value);
                    }
                    self.pos += 1;
                }
                Err(invalid(self.source, "unterminated quote"))
            }
            _ => self.required_ident("attribute value"),
        }
    }

    fn expect(&mut self, expected: char) -> PageResult<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(invalid(self.source, format!("expected '{}'", expected)))
        }
    }

    fn attribute(&mut self) -> PageResult<AttrCondition> {
        let name = self.required_ident("attribute")?.to_lowercase();
        let op = match self.peek() {
            Some(']') => AttrMatch::Exists,
            Some('=') => {
                self.pos += 1;
                AttrMatch::Equals(self.value()?)
            }
            Some('^') => {
                self.pos += 1;
                self.expect('=')?;
                AttrMatch::Prefix(self.value()?)
            }
            _ => return Err(invalid(self.source, "unsupported attribute operator")),
        };
        self.expect(']')?;
        Ok(AttrCondition { name, op })
    }

    fn compound(mut self) -> PageResult<CompoundSelector> {
        let mut selector = CompoundSelector::default();

        if self.peek() == Some('*') {
            self.pos += 1;
        } else {
            let tag = self.ident();
            if !tag.is_empty() {
                selector.tag = Some(tag.to_lowercase());
            }
        }

        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '#' => selector.id = Some(self.required_ident("id")?),
                '.' => selector.classes.push(self.required_ident("class")?),
                '[' => selector.attributes.push(self.attribute()?),
                c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                    return Err(invalid(self.source, "combinators are not supported"));
                }
                c => {
                    return Err(invalid(
                        self.source,
                        format!("unexpected character '{}'", c),
                    ))
                }
            }
        }
        Ok(selector)
    }
}
