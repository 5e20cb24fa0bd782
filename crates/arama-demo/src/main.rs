//! Worked example: a member list backed by the arama engine.
//!
//! Builds a small in-memory member roster, then walks through the
//! interactions a list view would drive: free-text search with Turkish
//! folding, filtering, sorting, and paging. Run with:
//!
//! ```sh
//! cargo run -p arama-demo
//! ```

use anyhow::Result;
use tracing::info;

use arama::{page_numbers, FieldValue, Filter, FilterOp, FilterOperand, Record, SortSpec};
use arama_engine::{SearchConfig, SearchEngine, SearchState};

#[derive(Debug, Clone)]
struct Member {
    id: u32,
    name: String,
    city: String,
    membership: &'static str,
    dues_balance: f64,
}

impl Record for Member {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Number(self.id as f64),
            "name" => FieldValue::Text(&self.name),
            "city" => FieldValue::Text(&self.city),
            "membership" => FieldValue::Text(self.membership),
            "duesBalance" => FieldValue::Number(self.dues_balance),
            _ => FieldValue::Null,
        }
    }
}

fn roster() -> Vec<Member> {
    let raw: [(&str, &str, &str, f64); 8] = [
        ("Ayşe Yıldız", "İstanbul", "premium", 0.0),
        ("Mehmet Demir", "Ankara", "standard", 150.0),
        ("Ali Çelik", "İzmir", "student", 50.0),
        ("Zeynep Yılmaz", "İstanbul", "standard", 0.0),
        ("Ahmet Yıldırım", "Bursa", "corporate", 1200.0),
        ("Fatma Şahin", "İstanbul", "senior", 0.0),
        ("İbrahim Öztürk", "Ankara", "standard", 75.0),
        ("Elif Çetin", "İzmir", "premium", 300.0),
    ];

    raw.into_iter()
        .enumerate()
        .map(|(index, (name, city, membership, dues_balance))| Member {
            id: index as u32 + 1,
            name: name.to_string(),
            city: city.to_string(),
            membership,
            dues_balance,
        })
        .collect()
}

fn print_page(label: &str, state: &SearchState<Member>) {
    info!(
        total = state.total_items,
        pages = state.total_pages,
        "{label}"
    );
    for member in &state.results {
        println!("  #{:<2} {:<16} {:<9} {}", member.id, member.name, member.city, member.membership);
    }
}

/// Waits for the first commit newer than `after`.
async fn settle(
    engine: &SearchEngine<Member>,
    after: Option<chrono::DateTime<chrono::Utc>>,
) -> SearchState<Member> {
    let mut updates = engine.subscribe();
    loop {
        let state = updates.borrow_and_update().clone();
        if !state.is_loading && state.last_search_time > after {
            return state;
        }
        updates.changed().await.expect("engine dropped");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = SearchConfig::new(["name", "city"])
        .with_turkish(true)
        .with_fuzzy(true)
        .with_default_sort(SortSpec::asc("name"))
        .with_items_per_page(3)
        .with_debounce_ms(50);

    let engine = SearchEngine::local(config, roster());

    // Initial population.
    engine.refresh();
    let state = settle(&engine, None).await;
    print_page("full roster, first page", &state);
    println!(
        "  window: {:?}",
        page_numbers(state.current_page, state.total_pages, 1, 1)
    );

    // Folded free-text search: plain ASCII finds Turkish names.
    engine.set_query("yildiz");
    let state = settle(&engine, state.last_search_time).await;
    print_page("query \"yildiz\"", &state);

    // Filters compose with the query; mutations inside the debounce window
    // collapse into a single execution.
    engine.set_query("");
    engine.add_filter(Filter::new("city", FilterOp::Eq, "İstanbul"));
    engine.add_filter(Filter::new(
        "duesBalance",
        FilterOp::Between,
        FilterOperand::range(0.0, 100.0),
    ));
    let state = settle(&engine, state.last_search_time).await;
    print_page("İstanbul members with dues under 100", &state);

    // Sort by dues, highest first; nulls would sort last either way.
    engine.clear_filters();
    engine.set_sort(SortSpec::desc("duesBalance"));
    let state = settle(&engine, state.last_search_time).await;
    print_page("by outstanding dues", &state);

    // Page through the rest.
    engine.load_more();
    let state = settle(&engine, state.last_search_time).await;
    info!(loaded = state.results.len(), has_more = state.has_more, "after load_more");

    Ok(())
}
