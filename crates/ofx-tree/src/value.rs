//! Entry and scalar value types for OFX documents.
//!
//! Every parsed tag occurrence becomes an [`Entry`]. An entry is either a
//! leaf (its `value` is present) or a container (its structure lives in
//! `children`); serialization and traversal dispatch on `value` presence,
//! never on whether `children` happens to be empty.

use chrono::NaiveDate;
use ofx_parse::Span;
use rust_decimal::Decimal;

/// One node in the parsed document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Tag name, case-preserving.
    pub tag: String,
    /// Typed value; present exactly for leaf entries.
    pub value: Option<Scalar>,
    /// Ordered children. Insertion order is document order and governs
    /// array grouping at serialization time.
    pub children: Vec<Entry>,
    /// Span of the opening tag (None if programmatically constructed).
    pub span: Option<Span>,
}

/// A typed leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Untyped text (the fallback for unbound tags).
    Text(String),
    /// Decimal amount, locale-invariant.
    Amount(Decimal),
    /// Calendar date, normalized to midnight with no zone.
    Date(NaiveDate),
    /// A bound coercer produced no value (e.g. an unparseable amount).
    /// The entry stays a leaf; renders as JSON null downstream.
    Empty,
}

impl Entry {
    /// Create a container entry.
    pub fn container(tag: impl Into<String>) -> Self {
        Entry {
            tag: tag.into(),
            value: None,
            children: Vec::new(),
            span: None,
        }
    }

    /// Create a leaf entry.
    pub fn leaf(tag: impl Into<String>, value: Scalar) -> Self {
        Entry {
            tag: tag.into(),
            value: Some(value),
            children: Vec::new(),
            span: None,
        }
    }

    fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub(crate) fn container_at(tag: impl Into<String>, span: Span) -> Self {
        Self::container(tag).with_span(span)
    }

    pub(crate) fn leaf_at(tag: impl Into<String>, value: Scalar, span: Span) -> Self {
        Self::leaf(tag, value).with_span(span)
    }

    /// Whether this entry is a leaf (has a coerced value).
    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    /// Whether this entry is a container (no value).
    pub fn is_container(&self) -> bool {
        self.value.is_none()
    }

    /// First child with the given tag, if any.
    pub fn get(&self, tag: &str) -> Option<&Entry> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag, in document order.
    pub fn get_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entry> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Text of this entry's value, if it is a text leaf.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Some(Scalar::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Amount of this entry's value, if it is an amount leaf.
    pub fn as_amount(&self) -> Option<Decimal> {
        match &self.value {
            Some(Scalar::Amount(amount)) => Some(*amount),
            _ => None,
        }
    }

    /// Date of this entry's value, if it is a date leaf.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match &self.value {
            Some(Scalar::Date(date)) => Some(*date),
            _ => None,
        }
    }
}
