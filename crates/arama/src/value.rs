//! Runtime field values and record access.
//!
//! The [`FieldValue`] enum represents the value of a single record field at
//! evaluation time, borrowed from the record. Records expose their fields
//! through the [`Record`] trait; nested records are reached with dot paths
//! via [`resolve_path`].

use std::borrow::Cow;
use std::fmt;

/// Trait for types whose fields can be searched, filtered and sorted.
///
/// Implementations answer for their *immediate* fields only; nested
/// structures are exposed with [`FieldValue::Nested`] and traversed by
/// [`resolve_path`].
///
/// # Example
///
/// ```
/// use arama::{FieldValue, Record};
///
/// struct Member {
///     name: String,
///     age: u32,
///     active: bool,
/// }
///
/// impl Record for Member {
///     fn field(&self, name: &str) -> FieldValue<'_> {
///         match name {
///             "name" => FieldValue::Text(&self.name),
///             "age" => FieldValue::Number(self.age as f64),
///             "active" => FieldValue::Bool(self.active),
///             _ => FieldValue::Null,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`FieldValue::Null`] if the field
    /// does not exist or is unset.
    fn field(&self, name: &str) -> FieldValue<'_>;
}

/// Runtime value of a record field, borrowed from the record.
#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Instant in time, milliseconds since the Unix epoch.
    Timestamp(i64),
    /// Nested record, reachable through a dot path segment.
    Nested(&'a dyn Record),
    /// Field absent or unset.
    Null,
}

impl<'a> FieldValue<'a> {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Extracts the text value, if present.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric coercion used by the ordering and range operators.
    ///
    /// Numbers pass through, numeric strings parse, booleans map to 0/1 and
    /// timestamps yield their epoch milliseconds. `Nested` and `Null` (and
    /// unparseable text) have no numeric form.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Timestamp(ms) => Some(*ms as f64),
            FieldValue::Nested(_) | FieldValue::Null => None,
        }
    }

    /// String coercion used by the substring operators and the sort
    /// fallback. Borrows when the value already is text.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            FieldValue::Timestamp(ms) => Some(Cow::Owned(ms.to_string())),
            FieldValue::Nested(_) | FieldValue::Null => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            FieldValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Timestamp(ms) => f.debug_tuple("Timestamp").field(ms).finish(),
            FieldValue::Nested(_) => f.write_str("Nested(..)"),
            FieldValue::Null => f.write_str("Null"),
        }
    }
}

impl PartialEq for FieldValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a == b,
            (FieldValue::Null, FieldValue::Null) => true,
            // Nested records have no value identity.
            _ => false,
        }
    }
}

/// Resolves a dot path (`"address.city"`) against a record.
///
/// Each segment except the last must resolve to [`FieldValue::Nested`];
/// anything else short-circuits to [`FieldValue::Null`].
pub fn resolve_path<'a>(record: &'a dyn Record, path: &str) -> FieldValue<'a> {
    let mut current = record;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let value = current.field(segment);
        if segments.peek().is_none() {
            return value;
        }
        match value {
            FieldValue::Nested(inner) => current = inner,
            _ => return FieldValue::Null,
        }
    }
    FieldValue::Null
}
