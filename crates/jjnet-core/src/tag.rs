//! Tags, properties, and the tag expression language.
//!
//! Every addressable network element carries a [`Tags`] container: a sorted
//! set of labels plus an insertion-ordered `name → value` property map.
//! Elements are selected with boolean expressions over that container,
//! following the grammar in `tag.pest`:
//!
//! ```text
//! tag        ::= '*' | (letter | digit | '-' | '_')+
//! propcmp    ::= identifier '=' literal
//! group      ::= '(' expression ')'
//! factor     ::= group | propcmp | tag
//! term       ::= factor ('&' factor)*
//! expression ::= term ('|' term)*
//! ```
//!
//! Whitespace between tokens is ignored. `*` matches any element with at
//! least one tag. Expressions compile once into a [`TagExpr`] and can be
//! evaluated against many elements.
//!
//! ```
//! use jjnet_core::tag::{TagExpr, Tags, Tagged};
//!
//! let mut tags = Tags::default();
//! tags.add_tag("x");
//! tags.set_prop("row", 3);
//!
//! let expr = TagExpr::parse("(x | y) & row=3").unwrap();
//! assert!(expr.matches(&tags));
//! ```

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;

use crate::error::{ParseError, ParseErrorKind};

use self::grammar::{Rule, TagParser};

/// Label set and property map embedded in contacts and circuits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags {
    tags: BTreeSet<String>,
    props: IndexMap<String, String>,
}

impl Tags {
    /// Iterate tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the tag set is empty. Properties are not counted.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate `(name, value)` property pairs in insertion order.
    pub fn props(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Anything that carries a [`Tags`] container.
///
/// Implementors only supply the two accessors; all tag and property
/// operations are provided.
pub trait Tagged {
    /// The element's tag container.
    fn tags(&self) -> &Tags;

    /// Mutable access to the element's tag container.
    fn tags_mut(&mut self) -> &mut Tags;

    /// Add a tag. Adding an existing tag is a no-op.
    fn add_tag(&mut self, tag: &str) {
        self.tags_mut().tags.insert(tag.to_string());
    }

    /// Remove a tag if present.
    fn remove_tag(&mut self, tag: &str) {
        self.tags_mut().tags.remove(tag);
    }

    /// Whether `tag` is present. `"*"` is treated as a wildcard and is
    /// always true.
    fn has_tag(&self, tag: &str) -> bool {
        tag == "*" || self.tags().contains(tag)
    }

    /// Set a property, storing the value's `Display` rendering.
    fn set_prop(&mut self, name: &str, value: impl fmt::Display)
    where
        Self: Sized,
    {
        self.tags_mut()
            .props
            .insert(name.to_string(), value.to_string());
    }

    /// The stored string value of property `name`.
    fn prop(&self, name: &str) -> Option<&str> {
        self.tags().props.get(name).map(String::as_str)
    }

    /// Remove a property, returning its previous value.
    fn remove_prop(&mut self, name: &str) -> Option<String> {
        self.tags_mut().props.shift_remove(name)
    }

    /// Parse `expression` and evaluate it against this element.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for malformed or empty expressions.
    fn matches(&self, expression: &str) -> Result<bool, ParseError> {
        Ok(TagExpr::parse(expression)?.matches(self.tags()))
    }
}

impl Tagged for Tags {
    fn tags(&self) -> &Tags {
        self
    }

    fn tags_mut(&mut self) -> &mut Tags {
        self
    }
}

/// A compiled tag expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagExpr {
    /// `*`: the element has at least one tag.
    Any,
    /// A bare tag name.
    Tag(String),
    /// `name=value` property comparison.
    Prop {
        /// Property name.
        name: String,
        /// Expected string value.
        value: String,
    },
    /// All sub-expressions hold.
    All(Vec<TagExpr>),
    /// At least one sub-expression holds.
    AnyOf(Vec<TagExpr>),
}

impl TagExpr {
    /// Compile an expression string.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the string is empty, malformed, or has
    /// trailing input after a complete expression.
    pub fn parse(expression: &str) -> Result<Self, ParseError> {
        if expression.trim().is_empty() {
            return Err(ParseError::new(expression, 0, ParseErrorKind::Empty));
        }
        let pairs = TagParser::parse(Rule::tag_expr, expression)
            .map_err(|e| classify(expression, &e))?;
        Ok(pairs
            .filter(|p| p.as_rule() == Rule::expression)
            .map(build_expression)
            .next()
            .unwrap_or(Self::AnyOf(Vec::new())))
    }

    /// Evaluate against an element's tags.
    pub fn matches(&self, tags: &Tags) -> bool {
        match self {
            Self::Any => !tags.is_empty(),
            Self::Tag(name) => tags.contains(name),
            Self::Prop { name, value } => tags.props.get(name).is_some_and(|v| v == value),
            Self::All(terms) => terms.iter().all(|t| t.matches(tags)),
            Self::AnyOf(terms) => terms.iter().any(|t| t.matches(tags)),
        }
    }
}

// ── Grammar ────────────────────────────────────────────────────────

mod grammar {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "tag.pest"]
    pub(super) struct TagParser;
}

fn build_expression(pair: Pair<'_, Rule>) -> TagExpr {
    let terms = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::term)
        .map(build_term)
        .collect();
    collapse(terms, TagExpr::AnyOf)
}

fn build_term(pair: Pair<'_, Rule>) -> TagExpr {
    let factors = pair
        .into_inner()
        .filter(|p| p.as_rule() != Rule::and)
        .map(build_factor)
        .collect();
    collapse(factors, TagExpr::All)
}

fn build_factor(pair: Pair<'_, Rule>) -> TagExpr {
    match pair.as_rule() {
        Rule::group => pair
            .into_inner()
            .filter(|p| p.as_rule() == Rule::expression)
            .map(build_expression)
            .next()
            .unwrap_or(TagExpr::AnyOf(Vec::new())),
        Rule::propcmp => {
            let mut inner = pair.into_inner();
            let name = inner.next().map(|p| p.as_str()).unwrap_or_default();
            let value = inner.next().map(|p| p.as_str()).unwrap_or_default();
            TagExpr::Prop {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
        Rule::any => TagExpr::Any,
        _ => TagExpr::Tag(pair.as_str().to_string()),
    }
}

fn collapse(mut items: Vec<TagExpr>, wrap: fn(Vec<TagExpr>) -> TagExpr) -> TagExpr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}

// ── Error mapping ──────────────────────────────────────────────────

fn parses(input: &str) -> bool {
    TagParser::parse(Rule::tag_expr, input).is_ok()
}

/// Turn a grammar failure into a [`ParseError`].
///
/// A missing `)` is reported at the innermost open paren. Leftover input
/// after a complete expression is `NotFullyConsumed`.
fn classify(input: &str, err: &pest::error::Error<Rule>) -> ParseError {
    let pos = match err.location {
        InputLocation::Pos(p) => p,
        InputLocation::Span((p, _)) => p,
    };

    let mut open = Vec::new();
    for (i, c) in input.char_indices() {
        match c {
            '(' => open.push(i),
            ')' => {
                open.pop();
            }
            _ => {}
        }
    }
    if let Some(&innermost) = open.last() {
        let closed = format!("{input}{}", ")".repeat(open.len()));
        if parses(&closed) {
            return ParseError::new(input, innermost, ParseErrorKind::UnterminatedGroup);
        }
    }

    match input.get(pos..).and_then(|rest| rest.chars().next()) {
        None => ParseError::new(input, pos, ParseErrorKind::UnexpectedEnd),
        Some(_) if parses(&input[..pos]) => {
            ParseError::new(input, pos, ParseErrorKind::NotFullyConsumed)
        }
        Some(c) => ParseError::new(input, pos, ParseErrorKind::UnexpectedChar(c)),
    }
}
