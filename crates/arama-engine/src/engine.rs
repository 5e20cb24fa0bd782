//! The query executor.
//!
//! [`SearchEngine`] owns the search state for one list view and runs the
//! debounce → execute → commit loop. Every mutation supersedes whatever was
//! pending: the debounce timer is rescheduled, any in-flight execution's
//! token is cancelled, and the generation counter advances. An execution may
//! only commit results while its generation is still current, so commits are
//! totally ordered by *start* generation — a slow early query can never
//! clobber a fast later one, no matter which delegate resolves first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use arama::{Filter, PageInfo, Record, SortSpec};

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::evaluator::{Evaluator, LocalEvaluator, RemoteEvaluator, SearchPage, SearchRequest};
use crate::state::SearchState;

/// Callback receiving errors the engine absorbs.
pub type ErrorHook = Arc<dyn Fn(&SearchError) + Send + Sync>;

/// Debounced, cancellation-safe query executor for one list view.
///
/// Construct with [`SearchEngine::local`] for in-memory data or
/// [`SearchEngine::remote`] for delegated search; the orchestration is
/// identical for both. All methods take `&self`; mutators must be called
/// from within a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use arama::{FieldValue, Record};
/// use arama_engine::{SearchConfig, SearchEngine};
///
/// #[derive(Clone)]
/// struct Member { name: String }
///
/// impl Record for Member {
///     fn field(&self, name: &str) -> FieldValue<'_> {
///         match name {
///             "name" => FieldValue::Text(&self.name),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// # async fn demo(members: Vec<Member>) {
/// let config = SearchConfig::new(["name"]).with_turkish(true);
/// let engine = SearchEngine::local(config, members);
/// let mut updates = engine.subscribe();
///
/// engine.set_query("yıldız");
/// // ... await updates.changed() and render engine.state()
/// # }
/// ```
pub struct SearchEngine<T> {
    shared: Arc<Shared<T>>,
    debounce: Mutex<Debouncer>,
}

struct Shared<T> {
    config: SearchConfig,
    evaluator: Box<dyn Evaluator<T>>,
    state: Mutex<SearchState<T>>,
    publisher: watch::Sender<SearchState<T>>,
    generation: AtomicU64,
    inflight: Mutex<Option<CancellationToken>>,
    error_hook: Mutex<Option<ErrorHook>>,
}

impl<T> SearchEngine<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    /// Creates an engine evaluating queries locally over `data`.
    pub fn local(config: SearchConfig, data: Vec<T>) -> Self {
        let evaluator = LocalEvaluator::new(&config, data);
        Self::with_evaluator(config, Box::new(evaluator))
    }
}

impl<T> SearchEngine<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an engine delegating evaluation to an async search function.
    ///
    /// The delegate receives the request and a cancellation token; honoring
    /// the token only saves work, stale results are discarded either way.
    pub fn remote<F>(config: SearchConfig, delegate: F) -> Self
    where
        F: Fn(SearchRequest, CancellationToken) -> BoxFuture<'static, anyhow::Result<SearchPage<T>>>
            + Send
            + Sync
            + 'static,
    {
        Self::with_evaluator(config, Box::new(RemoteEvaluator::new(delegate)))
    }

    /// Creates an engine with an explicit evaluation strategy.
    pub fn with_evaluator(config: SearchConfig, evaluator: Box<dyn Evaluator<T>>) -> Self {
        let state = SearchState::initial(&config);
        let (publisher, _) = watch::channel(state.clone());
        SearchEngine {
            shared: Arc::new(Shared {
                config,
                evaluator,
                state: Mutex::new(state),
                publisher,
                generation: AtomicU64::new(0),
                inflight: Mutex::new(None),
                error_hook: Mutex::new(None),
            }),
            debounce: Mutex::new(Debouncer::new()),
        }
    }

    /// Installs a callback receiving absorbed errors. Without one, absorbed
    /// errors are logged at warn level.
    pub fn with_error_hook(self, hook: impl Fn(&SearchError) + Send + Sync + 'static) -> Self {
        *self.shared.error_hook.lock().unwrap() = Some(Arc::new(hook));
        self
    }

    /// Seeds the query before the first execution.
    pub fn with_initial_query(self, query: impl Into<String>) -> Self {
        self.seed(|state| state.query = query.into());
        self
    }

    /// Seeds the filter list before the first execution.
    pub fn with_initial_filters(self, filters: Vec<Filter>) -> Self {
        self.seed(|state| state.filters = filters);
        self
    }

    /// Seeds the sort before the first execution.
    pub fn with_initial_sort(self, sort: SortSpec) -> Self {
        self.seed(|state| state.sort = sort);
        self
    }

    fn seed(&self, apply: impl FnOnce(&mut SearchState<T>)) {
        let mut state = self.shared.state.lock().unwrap();
        apply(&mut state);
        self.shared.publish(&state);
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Sets the free-text query and schedules a debounced execution.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.mutate(move |state| state.query = query);
    }

    /// Replaces the filter list.
    pub fn set_filters(&self, filters: Vec<Filter>) {
        self.mutate(move |state| state.filters = filters);
    }

    /// Adds a filter; a filter already on the field is replaced in place.
    pub fn add_filter(&self, filter: Filter) {
        self.mutate(move |state| state.upsert_filter(filter));
    }

    /// Removes the filter on a field.
    pub fn remove_filter(&self, field: &str) {
        let field = field.to_string();
        self.mutate(move |state| state.remove_filter(&field));
    }

    /// Removes all filters.
    pub fn clear_filters(&self) {
        self.mutate(|state| state.filters.clear());
    }

    /// Sets the sort.
    pub fn set_sort(&self, sort: SortSpec) {
        self.mutate(move |state| state.sort = sort);
    }

    /// Executes immediately, bypassing the debounce window. Used for the
    /// initial population of a view.
    pub fn refresh(&self) {
        self.debounce.lock().unwrap().cancel();
        let generation = self.shared.supersede();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.execute(generation, None, false).await;
        });
    }

    /// Fetches the next page and appends it to the committed results.
    ///
    /// A no-op unless more pages exist and no execution is in flight.
    pub fn load_more(&self) {
        let next_page = {
            let state = self.shared.state.lock().unwrap();
            if !state.has_more || state.is_loading {
                return;
            }
            state.current_page + 1
        };

        self.debounce.lock().unwrap().cancel();
        let generation = self.shared.supersede();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.execute(generation, Some(next_page), true).await;
        });
    }

    /// Cancels all pending work and restores the configured defaults with
    /// an empty result set. No execution is scheduled.
    pub fn reset(&self) {
        self.debounce.lock().unwrap().cancel();
        self.shared.supersede();

        let mut state = self.shared.state.lock().unwrap();
        state.query.clear();
        state.filters.clear();
        state.sort = self.shared.config.default_sort.clone();
        state.current_page = 1;
        state.is_loading = false;
        state.last_search_time = None;
        state.clear_results();
        self.shared.publish(&state);
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SearchState<T> {
        self.shared.state.lock().unwrap().clone()
    }

    /// Subscribes to state snapshots. The receiver always holds the latest
    /// published state.
    pub fn subscribe(&self) -> watch::Receiver<SearchState<T>> {
        self.shared.publisher.subscribe()
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.shared.config
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    fn mutate(&self, apply: impl FnOnce(&mut SearchState<T>)) {
        {
            let mut state = self.shared.state.lock().unwrap();
            apply(&mut state);
            // A changed query, filter set or sort invalidates the page
            // position.
            state.current_page = 1;
            self.shared.publish(&state);
        }
        self.schedule();
    }

    fn schedule(&self) {
        let generation = self.shared.supersede();
        let shared = Arc::clone(&self.shared);
        let delay = self.shared.config.debounce();
        // The timer task only *starts* the execution. Once spawned, an
        // execution is never forcibly interrupted; superseding it works
        // through the generation check and its cancellation token.
        self.debounce.lock().unwrap().schedule(delay, async move {
            tokio::spawn(shared.execute(generation, None, false));
        });
    }
}

impl<T> Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn publish(&self, state: &SearchState<T>) {
        self.publisher.send_replace(state.clone());
    }

    /// Invalidates pending work: advances the generation and cancels the
    /// in-flight execution's token. Returns the new current generation.
    fn supersede(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(token) = self.inflight.lock().unwrap().take() {
            token.cancel();
        }
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn execute(
        self: Arc<Self>,
        generation: u64,
        page_override: Option<usize>,
        append: bool,
    ) {
        if !self.is_current(generation) {
            return;
        }

        let cancel = CancellationToken::new();
        *self.inflight.lock().unwrap() = Some(cancel.clone());

        let request = {
            let mut state = self.state.lock().unwrap();
            state.is_loading = true;
            self.publish(&state);
            SearchRequest {
                query: state.query.clone(),
                filters: state.filters.clone(),
                sort: state.sort.clone(),
                page: page_override.unwrap_or(state.current_page),
                per_page: state.items_per_page,
            }
        };
        let requested_page = request.page;

        tracing::debug!(generation, page = requested_page, query = %request.query, "executing search");

        let outcome = self.evaluator.run(request, cancel.clone()).await;

        let mut state = self.state.lock().unwrap();
        if !self.is_current(generation) {
            // Superseded while running: a newer execution owns the state.
            return;
        }

        match outcome {
            Ok(found) => {
                let info = PageInfo::compute(found.total, state.items_per_page, requested_page);
                if append {
                    state.results.extend(found.items);
                } else {
                    state.results = found.items;
                }
                state.total_items = found.total;
                state.total_pages = info.total_pages;
                state.current_page = info.current_page;
                state.has_more = info.has_more();
                state.is_loading = false;
                state.last_search_time = Some(Utc::now());
                self.publish(&state);
            }
            Err(source) => {
                if cancel.is_cancelled() {
                    // Cancellation surfacing as a delegate error is not a
                    // failure.
                    return;
                }
                state.clear_results();
                state.is_loading = false;
                self.publish(&state);
                drop(state);

                let error = SearchError::Delegate(source);
                let hook = self.error_hook.lock().unwrap().clone();
                match hook {
                    Some(hook) => (*hook)(&error),
                    None => tracing::warn!(%error, "search failed; results cleared"),
                }
            }
        }
    }
}
