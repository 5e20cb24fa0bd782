//! Arama - in-memory search, filter, sort and pagination primitives.
//!
//! Arama provides the synchronous core of a list-view query engine: the
//! pieces that decide *which* records match and in *what order* they are
//! shown. It supports:
//!
//! - Locale-aware text normalization with Turkish case folding
//! - Substring and fuzzy-subsequence query matching
//! - A table of filter operators: equality, ordering, substring,
//!   membership, range
//! - Stable, type-aware sorting with Turkish collation and absolute
//!   nulls-last placement
//! - Page-window computation with ellipsis-collapsed page numbers
//!
//! Everything here is pure and total; the asynchronous orchestration
//! (debounce, cancellation, state ownership) lives in the companion engine
//! crate.
//!
//! # Quick Start
//!
//! ```rust
//! use arama::{
//!     sort_records, Collation, FieldValue, Filter, FilterOp, Record, SortSpec, TextMatcher,
//! };
//!
//! struct Member {
//!     name: String,
//!     city: String,
//!     age: u32,
//! }
//!
//! impl Record for Member {
//!     fn field(&self, name: &str) -> FieldValue<'_> {
//!         match name {
//!             "name" => FieldValue::Text(&self.name),
//!             "city" => FieldValue::Text(&self.city),
//!             "age" => FieldValue::Number(self.age as f64),
//!             _ => FieldValue::Null,
//!         }
//!     }
//! }
//!
//! let members = vec![
//!     Member { name: "Ayşe Yıldız".into(), city: "İstanbul".into(), age: 34 },
//!     Member { name: "Mehmet Demir".into(), city: "Ankara".into(), age: 41 },
//!     Member { name: "Ali Çelik".into(), city: "İzmir".into(), age: 29 },
//! ];
//!
//! // Text matching folds Turkish characters: "yildiz" finds "Yıldız".
//! let matcher = TextMatcher::new(false, true);
//! assert!(matcher.matches("yildiz", &members[0].name));
//!
//! // Filters evaluate against resolved field values.
//! let adults_over_30 = Filter::new("age", FilterOp::Gt, 30);
//! let matching: Vec<&Member> = members
//!     .iter()
//!     .filter(|m| adults_over_30.matches(&m.field("age")))
//!     .collect();
//! assert_eq!(matching.len(), 2);
//!
//! // Sorting collates Turkish text correctly: Çelik before Demir.
//! let sorted = sort_records(&members, &SortSpec::asc("name"), Collation::Turkish);
//! assert_eq!(sorted[0].name, "Ali Çelik");
//! ```
//!
//! # Matching Semantics
//!
//! A query matches in substring mode when the normalized target contains
//! the normalized query contiguously; fuzzy mode relaxes this to an
//! in-order subsequence, so every substring match is also a fuzzy match.
//! The empty query matches everything.
//!
//! # Filter Operator Table
//!
//! | Operator | Semantics |
//! |----------|-----------|
//! | `eq` / `ne` | strict, type-matched equality / its negation |
//! | `gt` `gte` `lt` `lte` | numeric comparison after coercion |
//! | `contains` / `startsWith` / `endsWith` | case-insensitive text |
//! | `in` | membership in a list operand |
//! | `between` | inclusive `[min, max]` numeric range |
//!
//! Null field values never match any operator.

mod error;
mod filter;
mod paginate;
mod sort;
mod text;
mod value;

// Re-export public API
pub use error::ParseError;
pub use filter::{Filter, FilterOp, FilterOperand};
pub use paginate::{page_numbers, page_slice, PageInfo, PageToken};
pub use sort::{compare_records, sort_records, Collation, Direction, SortSpec};
pub use text::{fuzzy_match, normalize, normalize_text, TextMatcher};
pub use value::{resolve_path, FieldValue, Record};
