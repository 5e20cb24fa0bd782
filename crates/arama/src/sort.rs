//! Stable, type-aware, locale-aware sorting.
//!
//! The comparator resolves both sides through dot-path lookup and compares
//! by runtime type: texts collate (Turkish alphabet order when selected),
//! numbers compare arithmetically, timestamps by instant, and anything else
//! falls back to string coercion. Null values sort last in *both*
//! directions; only the comparison between two present values is flipped by
//! `desc`.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::value::{resolve_path, FieldValue, Record};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Direction {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Direction::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Direction::Desc)
    }

    /// Applies this direction to an ordering: unchanged for `Asc`,
    /// reversed for `Desc`.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(ParseError::UnknownDirection(other.to_string())),
        }
    }
}

/// A sort specification: field path and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Dot path of the field to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: Direction,
}

impl SortSpec {
    /// Creates a sort spec with the given direction.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        SortSpec {
            field: field.into(),
            direction,
        }
    }

    /// Creates an ascending sort spec.
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Direction::Asc)
    }

    /// Creates a descending sort spec.
    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Direction::Desc)
    }
}

/// Text collation used when comparing string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collation {
    /// Case-insensitive code point order.
    #[default]
    Simple,
    /// Turkish alphabet order: ç, ğ, ı, i, ö, ş, ü rank at their alphabet
    /// positions, and I/İ lowercase to ı/i.
    Turkish,
}

impl Collation {
    /// Compares two strings under this collation.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Simple => {
                let a = a.to_lowercase();
                let b = b.to_lowercase();
                a.cmp(&b)
            }
            Collation::Turkish => {
                let mut lhs = a.chars().map(turkish_lower);
                let mut rhs = b.chars().map(turkish_lower);
                loop {
                    match (lhs.next(), rhs.next()) {
                        (Some(x), Some(y)) => {
                            let ord = turkish_rank(x).cmp(&turkish_rank(y));
                            if ord != Ordering::Equal {
                                return ord;
                            }
                        }
                        (None, Some(_)) => return Ordering::Less,
                        (Some(_), None) => return Ordering::Greater,
                        (None, None) => return Ordering::Equal,
                    }
                }
            }
        }
    }
}

/// Turkish-aware lowercasing: dotless I stays dotless, dotted İ gains no
/// combining mark.
fn turkish_lower(c: char) -> char {
    match c {
        'I' => 'ı',
        'İ' => 'i',
        other => other.to_lowercase().next().unwrap_or(other),
    }
}

/// Rank of a character in the Turkish alphabet. Characters outside the
/// alphabet sort after all letters, by code point.
fn turkish_rank(c: char) -> u32 {
    const ALPHABET: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";
    match ALPHABET.chars().position(|letter| letter == c) {
        Some(index) => index as u32,
        None => 0x11000 + c as u32,
    }
}

/// Compares two records by a sort spec.
///
/// Null placement is absolute: a record whose field resolves to null sorts
/// after one with a value, in ascending *and* descending order.
pub fn compare_records<T: Record>(
    a: &T,
    b: &T,
    spec: &SortSpec,
    collation: Collation,
) -> Ordering {
    let lhs = resolve_path(a, &spec.field);
    let rhs = resolve_path(b, &spec.field);

    match (lhs.is_null(), rhs.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let ordering = match (&lhs, &rhs) {
        (FieldValue::Text(x), FieldValue::Text(y)) => collation.compare(x, y),
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(y),
        _ => {
            let x = lhs.to_text().unwrap_or(std::borrow::Cow::Borrowed(""));
            let y = rhs.to_text().unwrap_or(std::borrow::Cow::Borrowed(""));
            collation.compare(&x, &y)
        }
    };

    spec.direction.apply(ordering)
}

/// Sorts a slice by a sort spec, returning references in order.
///
/// Stable and non-mutating. An empty field path returns the original order.
pub fn sort_records<'a, T: Record>(
    items: &'a [T],
    spec: &SortSpec,
    collation: Collation,
) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    if spec.field.is_empty() {
        return sorted;
    }
    sorted.sort_by(|a, b| compare_records(*a, *b, spec, collation));
    sorted
}
