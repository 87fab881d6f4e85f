//! Path-based access into nested records.
//!
//! Sorting and filtering work on column paths such as `price.change.percent`.
//! A [`Record`] exposes its fields one level at a time; nested structures are
//! returned as [`FieldValue::Node`] and resolved further by
//! [`get_nested_value`].

use badam_shared_models::CurrencyMap;
use itertools::Itertools;
use std::borrow::Cow;

#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
    Numbers(&'a [f64]),
    Node(&'a dyn Record),
}

impl<'a> FieldValue<'a> {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&'a dyn Record> {
        match self {
            FieldValue::Node(node) => Some(*node),
            _ => None,
        }
    }

    /// Lists and nodes, as opposed to plain numbers and text.
    pub fn is_composite(&self) -> bool {
        matches!(self, FieldValue::Numbers(_) | FieldValue::Node(_))
    }

    /// Text form used when values of different kinds are compared.
    /// Nodes have no meaningful text form and all coerce to the same string.
    pub fn coerce_text(&self) -> Cow<'a, str> {
        match self {
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Text(s) => Cow::Borrowed(*s),
            FieldValue::Numbers(values) => Cow::Owned(values.iter().join(",")),
            FieldValue::Node(_) => Cow::Borrowed("[object]"),
        }
    }
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            FieldValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            FieldValue::Numbers(values) => f.debug_tuple("Numbers").field(values).finish(),
            FieldValue::Node(node) => f.debug_tuple("Node").field(&node.keys()).finish(),
        }
    }
}

pub trait Record {
    /// Top-level field names, in display order.
    fn keys(&self) -> &'static [&'static str];

    fn field(&self, key: &str) -> Option<FieldValue<'_>>;
}

/// Resolves a dotted path by successive field lookup. Any missing step, or a
/// step into a non-node value, yields `None`.
pub fn get_nested_value<'a>(record: &'a dyn Record, path: &str) -> Option<FieldValue<'a>> {
    let mut current = FieldValue::Node(record);
    for key in path.split('.') {
        let node = current.as_node()?;
        current = node.field(key)?;
    }
    Some(current)
}

/// How sort and filter read a column out of a record.
pub trait ValueAccessor<T> {
    fn value<'r>(&self, record: &'r T, path: &str) -> Option<FieldValue<'r>>;
}

/// Default accessor: dotted-path lookup through [`Record`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedValue;

impl<T: Record> ValueAccessor<T> for NestedValue {
    fn value<'r>(&self, record: &'r T, path: &str) -> Option<FieldValue<'r>> {
        get_nested_value(record, path)
    }
}

/// Resolves a currency code to its human-facing ticker.
pub trait TickerLookup {
    fn ticker(&self, code: &str) -> Option<&str>;
}

impl TickerLookup for CurrencyMap {
    fn ticker(&self, code: &str) -> Option<&str> {
        self.get(code).map(|currency| currency.ticker.as_str())
    }
}
