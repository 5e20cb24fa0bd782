//! Arama engine - debounced, cancellation-safe query execution.
//!
//! This crate orchestrates the [`arama`] core primitives into the query
//! executor behind a list view: it owns the mutable search state, coalesces
//! rapid-fire input through a debounce window, evaluates queries locally or
//! through an injected remote delegate, and guarantees that only the most
//! recently *started* execution ever commits results.
//!
//! # Architecture
//!
//! ```text
//! mutator ──► state update ──► debounce ──► evaluator ──► commit ──► watch
//!   (set_query, filters, sort)    timer    (local/remote)  (generation
//!                                                            checked)
//! ```
//!
//! Every mutation advances a generation counter and cancels whatever was
//! pending; an execution captures the generation at start and may commit
//! only while it is still current. Completion order is irrelevant — a slow
//! early query can never overwrite a fast later one.
//!
//! Errors never escape the mutator API: a failing delegate clears the
//! result set, the error goes to the configured report hook (or a warn
//! log), and the engine stays usable for the next query.
//!
//! # Choosing a strategy
//!
//! - [`SearchEngine::local`] evaluates in memory: matcher over the
//!   searchable fields, filter conjunction, sort, page slice.
//! - [`SearchEngine::remote`] hands the request to an async delegate along
//!   with a cancellation token.
//!
//! The orchestration is identical for both; see [`Evaluator`] for the seam.

mod config;
mod debounce;
mod engine;
mod error;
mod evaluator;
mod state;

// Re-export public API
pub use config::SearchConfig;
pub use debounce::Debouncer;
pub use engine::{ErrorHook, SearchEngine};
pub use error::SearchError;
pub use evaluator::{
    Evaluator, LocalEvaluator, RemoteEvaluator, RemoteSearchFn, SearchPage, SearchRequest,
};
pub use state::SearchState;
