//! Evaluation strategies: local pipeline or remote delegation.
//!
//! The engine drives one [`Evaluator`], chosen at construction. The local
//! strategy runs the full matcher → filter → sort → paginate pipeline over
//! an in-memory collection and never suspends; the remote strategy hands the
//! request to an injected asynchronous delegate together with a cancellation
//! token the delegate is expected to honor.

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use arama::{resolve_path, Collation, Filter, PageInfo, Record, SortSpec, TextMatcher};

use crate::config::SearchConfig;

/// One query execution's inputs, captured from the state at start.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Active filters.
    pub filters: Vec<Filter>,
    /// Active sort.
    pub sort: SortSpec,
    /// Requested page, 1-based.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<T> {
    /// The items on the requested page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: usize,
}

/// Signature of an injected remote-search delegate.
pub type RemoteSearchFn<T> = dyn Fn(SearchRequest, CancellationToken) -> BoxFuture<'static, anyhow::Result<SearchPage<T>>>
    + Send
    + Sync;

/// A query evaluation strategy.
pub trait Evaluator<T>: Send + Sync {
    /// Evaluates one request, producing the requested page.
    ///
    /// The token is cancelled when a newer execution supersedes this one;
    /// honoring it only saves work — the engine discards stale results
    /// regardless.
    fn run(
        &self,
        request: SearchRequest,
        cancel: CancellationToken,
    ) -> BoxFuture<'_, anyhow::Result<SearchPage<T>>>;
}

/// Evaluates queries over an in-memory collection.
///
/// Pipeline order: free-text match over the searchable fields, filter
/// conjunction, sort, page slice. Fully synchronous.
pub struct LocalEvaluator<T> {
    data: Vec<T>,
    searchable_fields: Vec<String>,
    matcher: TextMatcher,
    collation: Collation,
}

impl<T> LocalEvaluator<T>
where
    T: Record + Clone + Send + Sync,
{
    /// Creates a local evaluator over a collection.
    pub fn new(config: &SearchConfig, data: Vec<T>) -> Self {
        LocalEvaluator {
            data,
            searchable_fields: config.searchable_fields.clone(),
            matcher: config.matcher(),
            collation: config.collation(),
        }
    }

    /// Runs the synchronous pipeline for one request.
    pub fn evaluate(&self, request: &SearchRequest) -> SearchPage<T> {
        let text_matched: Vec<&T> = if self.matcher.normalize(&request.query).is_empty() {
            self.data.iter().collect()
        } else {
            self.data
                .iter()
                .filter(|record| self.matches_query(*record, &request.query))
                .collect()
        };

        let filtered: Vec<&T> = if request.filters.is_empty() {
            text_matched
        } else {
            text_matched
                .into_iter()
                .filter(|record| {
                    request.filters.iter().all(|filter| {
                        filter.matches(&resolve_path(*record as &dyn Record, &filter.field))
                    })
                })
                .collect()
        };

        let sorted = sort_refs(filtered, &request.sort, self.collation);

        let total = sorted.len();
        let info = PageInfo::compute(total, request.per_page, request.page);
        let items = info.slice(&sorted).iter().map(|r| (*r).clone()).collect();

        SearchPage { items, total }
    }

    fn matches_query(&self, record: &T, query: &str) -> bool {
        self.searchable_fields.iter().any(|field| {
            let value = resolve_path(record as &dyn Record, field);
            match value.to_text() {
                Some(text) => self.matcher.matches(query, &text),
                None => false,
            }
        })
    }
}

impl<T> Evaluator<T> for LocalEvaluator<T>
where
    T: Record + Clone + Send + Sync,
{
    fn run(
        &self,
        request: SearchRequest,
        _cancel: CancellationToken,
    ) -> BoxFuture<'_, anyhow::Result<SearchPage<T>>> {
        // Local evaluation is synchronous and short-lived; it completes
        // before any suspension point, so cancellation never applies.
        let page = self.evaluate(&request);
        Box::pin(async move { Ok(page) })
    }
}

/// Stable sort over references, preserving input order for an empty field.
fn sort_refs<'a, T: Record>(
    mut items: Vec<&'a T>,
    sort: &SortSpec,
    collation: Collation,
) -> Vec<&'a T> {
    if sort.field.is_empty() {
        return items;
    }
    items.sort_by(|a, b| arama::compare_records(*a, *b, sort, collation));
    items
}

/// Delegates evaluation to an injected asynchronous search function.
pub struct RemoteEvaluator<T> {
    delegate: Box<RemoteSearchFn<T>>,
}

impl<T> RemoteEvaluator<T> {
    /// Wraps a remote-search delegate.
    pub fn new<F>(delegate: F) -> Self
    where
        F: Fn(SearchRequest, CancellationToken) -> BoxFuture<'static, anyhow::Result<SearchPage<T>>>
            + Send
            + Sync
            + 'static,
    {
        RemoteEvaluator {
            delegate: Box::new(delegate),
        }
    }
}

impl<T: Send> Evaluator<T> for RemoteEvaluator<T> {
    fn run(
        &self,
        request: SearchRequest,
        cancel: CancellationToken,
    ) -> BoxFuture<'_, anyhow::Result<SearchPage<T>>> {
        (self.delegate)(request, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arama::{FieldValue, FilterOp, FilterOperand};

    #[derive(Debug, Clone, PartialEq)]
    struct Donation {
        donor: String,
        amount: f64,
        kind: String,
    }

    impl Record for Donation {
        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "donor" => FieldValue::Text(&self.donor),
                "amount" => FieldValue::Number(self.amount),
                "kind" => FieldValue::Text(&self.kind),
                _ => FieldValue::Null,
            }
        }
    }

    fn donations() -> Vec<Donation> {
        vec![
            Donation {
                donor: "Ayşe Yıldız".to_string(),
                amount: 250.0,
                kind: "cash".to_string(),
            },
            Donation {
                donor: "Mehmet Demir".to_string(),
                amount: 1000.0,
                kind: "zakat".to_string(),
            },
            Donation {
                donor: "Ali Çelik".to_string(),
                amount: 50.0,
                kind: "cash".to_string(),
            },
            Donation {
                donor: "Zeynep Yılmaz".to_string(),
                amount: 500.0,
                kind: "fitre".to_string(),
            },
        ]
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            filters: Vec::new(),
            sort: SortSpec::asc("donor"),
            page: 1,
            per_page: 20,
        }
    }

    fn evaluator(fuzzy: bool) -> LocalEvaluator<Donation> {
        let config = SearchConfig::new(["donor", "kind"])
            .with_fuzzy(fuzzy)
            .with_turkish(true);
        LocalEvaluator::new(&config, donations())
    }

    #[test]
    fn empty_query_returns_everything() {
        let page = evaluator(false).evaluate(&request(""));
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 4);
    }

    #[test]
    fn query_matches_any_searchable_field() {
        // "yil" folds to match both Yıldız and Yılmaz; "zakat" matches kind.
        let page = evaluator(false).evaluate(&request("yil"));
        assert_eq!(page.total, 2);

        let page = evaluator(false).evaluate(&request("zakat"));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].donor, "Mehmet Demir");
    }

    #[test]
    fn fuzzy_widens_the_match() {
        let substring = evaluator(false).evaluate(&request("ayz"));
        assert_eq!(substring.total, 0);

        let fuzzy = evaluator(true).evaluate(&request("ayz"));
        assert!(fuzzy.total >= 1);
        assert!(fuzzy.items.iter().any(|d| d.donor == "Ayşe Yıldız"));
    }

    #[test]
    fn filters_conjoin_after_text_match() {
        let mut req = request("");
        req.filters = vec![
            Filter::new("kind", FilterOp::Eq, "cash"),
            Filter::new("amount", FilterOp::Gte, 100),
        ];
        let page = evaluator(false).evaluate(&req);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].donor, "Ayşe Yıldız");
    }

    #[test]
    fn results_are_sorted_with_turkish_collation() {
        let page = evaluator(false).evaluate(&request(""));
        let donors: Vec<&str> = page.items.iter().map(|d| d.donor.as_str()).collect();
        // Turkish order: Ali Çelik, Ayşe Yıldız, Mehmet Demir, Zeynep Yılmaz.
        assert_eq!(
            donors,
            vec!["Ali Çelik", "Ayşe Yıldız", "Mehmet Demir", "Zeynep Yılmaz"]
        );
    }

    #[test]
    fn pagination_slices_after_sort() {
        let mut req = request("");
        req.per_page = 3;
        req.page = 2;
        let page = evaluator(false).evaluate(&req);
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].donor, "Zeynep Yılmaz");
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let mut req = request("");
        req.per_page = 3;
        req.page = 99;
        let page = evaluator(false).evaluate(&req);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn between_filter_on_amount() {
        let mut req = request("");
        req.filters = vec![Filter::new(
            "amount",
            FilterOp::Between,
            FilterOperand::range(100.0, 600.0),
        )];
        let page = evaluator(false).evaluate(&req);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn remote_evaluator_forwards_request() {
        let remote: RemoteEvaluator<Donation> = RemoteEvaluator::new(|request, _cancel| {
            Box::pin(async move {
                assert_eq!(request.query, "kumbara");
                Ok(SearchPage {
                    items: Vec::new(),
                    total: 7,
                })
            })
        });

        let page = remote
            .run(request("kumbara"), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(page.total, 7);
    }
}
