//! Executor integration harness.
//!
//! # What this covers
//!
//! The ordering and cancellation guarantees of the query executor, driven
//! end-to-end over tokio's virtual clock:
//!
//! - **Race freedom**: commits are ordered by start generation, not
//!   completion order. A slow early delegate must never clobber a fast
//!   later one.
//! - **Debounce collapsing**: a typing burst inside the quiet period runs
//!   exactly one execution, for the final query.
//! - **Load-more appending**: subsequent pages concatenate onto the
//!   committed results and `has_more` flips off at the end.
//! - **Error absorption**: a failing delegate empties the state, reports
//!   through the hook, and leaves the engine usable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::sleep;

use arama::{FieldValue, Filter, FilterOp, Record, SortSpec};
use arama_engine::{SearchConfig, SearchEngine, SearchPage, SearchState};

#[derive(Debug, Clone, PartialEq)]
struct Member {
    id: u32,
    name: &'static str,
    city: &'static str,
}

impl Record for Member {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Number(self.id as f64),
            "name" => FieldValue::Text(self.name),
            "city" => FieldValue::Text(self.city),
            _ => FieldValue::Null,
        }
    }
}

fn members() -> Vec<Member> {
    vec![
        Member { id: 1, name: "Ayşe Yıldız", city: "İstanbul" },
        Member { id: 2, name: "Mehmet Demir", city: "Ankara" },
        Member { id: 3, name: "Ali Çelik", city: "İzmir" },
        Member { id: 4, name: "Zeynep Yılmaz", city: "İstanbul" },
        Member { id: 5, name: "Ahmet Yıldırım", city: "Bursa" },
    ]
}

fn config() -> SearchConfig {
    SearchConfig::new(["name", "city"])
        .with_turkish(true)
        .with_default_sort(SortSpec::asc("id"))
        .with_debounce_ms(100)
}

/// Waits until the predicate holds for a published state, or panics after
/// the virtual-time budget elapses.
async fn settled<T, F>(engine: &SearchEngine<T>, predicate: F) -> SearchState<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&SearchState<T>) -> bool,
{
    for _ in 0..200 {
        let state = engine.state();
        if predicate(&state) {
            return state;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("state never settled");
}

// ---------------------------------------------------------------------------
// Local pipeline end to end
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn local_query_commits_after_debounce() {
    let engine = SearchEngine::local(config(), members());
    engine.set_query("yildiz");

    let state = settled(&engine, |s| s.last_search_time.is_some()).await;
    assert_eq!(state.total_items, 1);
    assert_eq!(state.results[0].name, "Ayşe Yıldız");
    assert!(!state.is_loading);
    assert!(state.has_results());
}

#[tokio::test(start_paused = true)]
async fn filters_and_query_compose() {
    let engine = SearchEngine::local(config(), members());
    engine.set_query("y");
    engine.add_filter(Filter::new("city", FilterOp::Eq, "İstanbul"));

    let state = settled(&engine, |s| s.last_search_time.is_some()).await;
    // "y" matches Yıldız, Yılmaz and Yıldırım; the filter keeps the two
    // İstanbul members.
    assert_eq!(state.total_items, 2);
    assert!(state.has_active_filters());
}

#[tokio::test(start_paused = true)]
async fn empty_outcome_flags_is_empty() {
    let engine = SearchEngine::local(config(), members());
    engine.set_query("no such member");

    let state = settled(&engine, |s| s.last_search_time.is_some()).await;
    assert_eq!(state.total_items, 0);
    assert!(state.is_empty());
    assert!(!state.has_results());
}

// ---------------------------------------------------------------------------
// Debounce collapsing
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn typing_burst_runs_one_execution() {
    let executions = Arc::new(AtomicUsize::new(0));
    let seen_queries = Arc::new(Mutex::new(Vec::new()));

    let counter = Arc::clone(&executions);
    let queries = Arc::clone(&seen_queries);
    let engine: SearchEngine<Member> = SearchEngine::remote(config(), move |request, _cancel| {
        counter.fetch_add(1, Ordering::SeqCst);
        queries.lock().unwrap().push(request.query.clone());
        Box::pin(async move {
            Ok(SearchPage {
                items: Vec::new(),
                total: 0,
            })
        })
    });

    // Three keystrokes inside the 100ms quiet period.
    engine.set_query("a");
    sleep(Duration::from_millis(30)).await;
    engine.set_query("ab");
    sleep(Duration::from_millis(30)).await;
    engine.set_query("abc");

    settled(&engine, |s| s.last_search_time.is_some()).await;
    sleep(Duration::from_millis(300)).await;

    assert_eq!(executions.load(Ordering::SeqCst), 1);
    assert_eq!(seen_queries.lock().unwrap().as_slice(), ["abc"]);
}

#[tokio::test(start_paused = true)]
async fn pauses_longer_than_the_window_run_separately() {
    let executions = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&executions);
    let engine: SearchEngine<Member> = SearchEngine::remote(config(), move |_request, _cancel| {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            Ok(SearchPage {
                items: Vec::new(),
                total: 0,
            })
        })
    });

    engine.set_query("a");
    sleep(Duration::from_millis(200)).await;
    engine.set_query("ab");
    sleep(Duration::from_millis(200)).await;

    assert_eq!(executions.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Race freedom
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn slow_early_query_loses_to_fast_late_query() {
    let engine: SearchEngine<Member> =
        SearchEngine::remote(config().with_debounce_ms(0), |request, _cancel| {
            Box::pin(async move {
                // The shorter query resolves much later in wall-clock time.
                let (delay, id) = if request.query == "a" {
                    (Duration::from_millis(100), 1)
                } else {
                    (Duration::from_millis(10), 2)
                };
                sleep(delay).await;
                Ok(SearchPage {
                    items: vec![Member {
                        id,
                        name: if id == 1 { "stale" } else { "fresh" },
                        city: "",
                    }],
                    total: 1,
                })
            })
        });

    engine.set_query("a");
    sleep(Duration::from_millis(5)).await;
    engine.set_query("ab");

    // Give both delegate futures ample time to resolve.
    sleep(Duration::from_millis(500)).await;

    let state = engine.state();
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.results[0].name, "fresh");
    assert_eq!(state.query, "ab");
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn superseded_execution_receives_cancellation() {
    let cancelled = Arc::new(AtomicUsize::new(0));

    let observed = Arc::clone(&cancelled);
    let engine: SearchEngine<Member> =
        SearchEngine::remote(config().with_debounce_ms(0), move |request, cancel| {
            let observed = Arc::clone(&observed);
            Box::pin(async move {
                if request.query == "slow" {
                    cancel.cancelled().await;
                    observed.fetch_add(1, Ordering::SeqCst);
                    anyhow::bail!("aborted");
                }
                Ok(SearchPage {
                    items: Vec::new(),
                    total: 42,
                })
            })
        });

    engine.set_query("slow");
    sleep(Duration::from_millis(20)).await;
    engine.set_query("fast");
    sleep(Duration::from_millis(100)).await;

    // The superseded delegate saw its token fire, and its error was
    // discarded rather than clearing the fresh commit.
    assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    assert_eq!(engine.state().total_items, 42);
}

// ---------------------------------------------------------------------------
// Load more
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn load_more_appends_pages() {
    let engine = SearchEngine::local(config().with_items_per_page(2), members());

    engine.refresh();
    let state = settled(&engine, |s| s.last_search_time.is_some()).await;
    assert_eq!(state.results.len(), 2);
    assert_eq!(state.total_items, 5);
    assert_eq!(state.total_pages, 3);
    assert!(state.has_more);

    engine.load_more();
    let state = settled(&engine, |s| s.results.len() == 4).await;
    assert_eq!(state.current_page, 2);
    assert!(state.has_more);

    engine.load_more();
    let state = settled(&engine, |s| s.results.len() == 5).await;
    assert_eq!(state.current_page, 3);
    assert!(!state.has_more);

    // Exhausted: further calls are no-ops.
    engine.load_more();
    sleep(Duration::from_millis(200)).await;
    assert_eq!(engine.state().results.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn load_more_is_ignored_while_loading() {
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let engine: SearchEngine<Member> = SearchEngine::remote(
        config().with_debounce_ms(0).with_items_per_page(1),
        move |request, _cancel| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                sleep(Duration::from_millis(50)).await;
                Ok(SearchPage {
                    items: vec![Member {
                        id: request.page as u32,
                        name: "row",
                        city: "",
                    }],
                    total: 10,
                })
            })
        });

    engine.set_query("q");
    sleep(Duration::from_millis(100)).await;
    assert_eq!(engine.state().results.len(), 1);

    engine.load_more();
    // Still in flight: these must be dropped.
    engine.load_more();
    engine.load_more();

    sleep(Duration::from_millis(200)).await;
    assert_eq!(engine.state().results.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Error absorption
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn delegate_error_clears_state_and_reports() {
    let reported = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&reported);
    let engine: SearchEngine<Member> =
        SearchEngine::remote(config().with_debounce_ms(0), |request, _cancel| {
            Box::pin(async move {
                if request.query == "boom" {
                    anyhow::bail!("backend unavailable");
                }
                Ok(SearchPage {
                    items: Vec::new(),
                    total: 3,
                })
            })
        })
        .with_error_hook(move |error| {
            sink.lock().unwrap().push(error.to_string());
        });

    engine.set_query("fine");
    settled(&engine, |s| s.total_items == 3).await;

    engine.set_query("boom");
    let state = settled(&engine, |s| s.total_items == 0 && !s.is_loading).await;
    assert!(state.results.is_empty());
    assert_eq!(state.total_pages, 1);

    let reports = reported.lock().unwrap().clone();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].contains("backend unavailable"));

    // The engine survives the failure and serves the next query.
    engine.set_query("fine again");
    settled(&engine, |s| s.total_items == 3).await;
}

#[tokio::test(start_paused = true)]
async fn watch_subscribers_observe_loading_transitions() {
    let engine: SearchEngine<Member> =
        SearchEngine::remote(config().with_debounce_ms(0), |_request, _cancel| {
            Box::pin(async move {
                sleep(Duration::from_millis(50)).await;
                Ok(SearchPage {
                    items: Vec::new(),
                    total: 1,
                })
            })
        });
    let mut updates = engine.subscribe();

    engine.set_query("ayşe");

    let mut saw_loading = false;
    loop {
        updates.changed().await.unwrap();
        let state = updates.borrow_and_update().clone();
        if state.is_loading {
            saw_loading = true;
        }
        if state.last_search_time.is_some() && !state.is_loading {
            assert_eq!(state.total_items, 1);
            break;
        }
    }
    assert!(saw_loading);
}
