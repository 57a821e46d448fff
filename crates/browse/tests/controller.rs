use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cinescope_browse::{
    BrowseConfig, BrowseController, BrowseHandle, BrowseView, DetailStatus, FETCH_FAILED_MESSAGE,
};
use cinescope_catalog::{
    CatalogError, CatalogFetcher, CatalogRequest, CatalogTransport, DetailStrategy, DetailsLookup,
    Endpoint, RawResponse,
};
use serde_json::json;
use tokio::time::Instant;

/// In-process catalog. Search ids are `page * 100 + query length`, popular
/// ids are `900 + page`. Queries can be slowed down or made to fail.
#[derive(Default)]
struct FakeCatalog {
    log: Mutex<Vec<(Instant, CatalogRequest)>>,
    delays: HashMap<String, Duration>,
    failing: Vec<String>,
}

impl FakeCatalog {
    fn searches(&self) -> Vec<(Instant, String)> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| r.is_search())
            .map(|(at, r)| (*at, r.get("query").unwrap_or_default().to_string()))
            .collect()
    }

    fn search_pages(&self) -> Vec<(String, u32)> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| r.is_search())
            .map(|(_, r)| {
                (
                    r.get("query").unwrap_or_default().to_string(),
                    r.page().unwrap_or(1),
                )
            })
            .collect()
    }

    fn last_path(&self) -> String {
        self.log.lock().unwrap().last().unwrap().1.path()
    }
}

#[async_trait::async_trait]
impl CatalogTransport for FakeCatalog {
    fn name(&self) -> &str {
        "fake"
    }

    async fn execute(&self, request: &CatalogRequest) -> Result<RawResponse, CatalogError> {
        self.log
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));

        let page = request.page().unwrap_or(1) as u64;
        let body = match &request.endpoint {
            Endpoint::Search { .. } => {
                let query = request.get("query").unwrap_or_default().to_string();
                if let Some(delay) = self.delays.get(&query) {
                    tokio::time::sleep(*delay).await;
                }
                if self.failing.contains(&query) {
                    return Ok(RawResponse::new(500, "{}"));
                }
                json!({
                    "page": page,
                    "total_pages": 3,
                    "results": [{
                        "id": page * 100 + query.len() as u64,
                        "title": format!("{query} p{page}"),
                        "vote_average": 6.5
                    }]
                })
            }
            Endpoint::Discover { .. } => json!({
                "page": page,
                "total_pages": 3,
                "results": [{ "id": 900 + page, "title": format!("Popular p{page}"), "vote_average": 7.0 }]
            }),
            Endpoint::Detail { id, .. } => json!({
                "id": id,
                "genres": [{ "id": 18, "name": "Drama" }],
                "credits": { "cast": [{ "id": 1, "name": "Lead", "character": "Hero" }] }
            }),
            _ => json!({}),
        };
        Ok(RawResponse::new(200, body.to_string()))
    }
}

fn start(catalog: Arc<FakeCatalog>, config: BrowseConfig) -> BrowseHandle {
    let fetcher = CatalogFetcher::new(catalog);
    let details = DetailsLookup::new(fetcher.clone(), DetailStrategy::DetailWithCredits);
    BrowseController::new(fetcher, details, config).spawn()
}

async fn wait_until(handle: &BrowseHandle, pred: impl FnMut(&BrowseView) -> bool) -> BrowseView {
    let mut rx = handle.subscribe();
    let view = tokio::time::timeout(Duration::from_secs(60), rx.wait_for(pred))
        .await
        .expect("condition not reached")
        .expect("controller stopped");
    view.clone()
}

async fn settled(handle: &BrowseHandle, query: &str) -> BrowseView {
    let query = query.to_string();
    wait_until(handle, move |v| {
        v.search.debounced_query == query && !v.search.is_loading
    })
    .await
}

fn titles(view: &BrowseView) -> Vec<String> {
    view.search.results.iter().map(|i| i.title.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn loads_default_listing_on_start() {
    let catalog = Arc::new(FakeCatalog::default());
    let handle = start(catalog.clone(), BrowseConfig::default());

    let view = wait_until(&handle, |v| !v.search.is_loading && !v.search.results.is_empty()).await;
    assert_eq!(titles(&view), vec!["Popular p1"]);
    assert_eq!(catalog.last_path(), "/discover/movie");
    assert_eq!(view.page_window().pages, vec![1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn typing_burst_fires_one_search_after_quiet_period() {
    let catalog = Arc::new(FakeCatalog::default());
    let handle = start(catalog.clone(), BrowseConfig::default());
    wait_until(&handle, |v| !v.search.results.is_empty()).await;

    handle.input("b").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.input("ba").unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.input("bat").unwrap();
    let last_input = Instant::now();

    let view = settled(&handle, "bat").await;
    assert_eq!(titles(&view), vec!["bat p1"]);

    let searches = catalog.searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].1, "bat");
    assert!(searches[0].0 >= last_input + Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn next_page_appends_to_results() {
    let catalog = Arc::new(FakeCatalog::default());
    let handle = start(catalog.clone(), BrowseConfig::default());

    handle.input("batman").unwrap();
    let view = settled(&handle, "batman").await;
    assert_eq!(view.search.page, 1);

    handle.next_page().unwrap();
    let view = wait_until(&handle, |v| v.search.page == 2 && !v.search.is_loading).await;
    assert_eq!(titles(&view), vec!["batman p1", "batman p2"]);
    assert_eq!(view.search.error, None);
}

#[tokio::test(start_paused = true)]
async fn late_response_for_superseded_query_is_discarded() {
    let catalog = Arc::new(FakeCatalog {
        delays: HashMap::from([("slow".to_string(), Duration::from_secs(3))]),
        ..FakeCatalog::default()
    });
    let handle = start(catalog.clone(), BrowseConfig::default());

    handle.input("slow").unwrap();
    wait_until(&handle, |v| v.search.debounced_query == "slow" && v.search.is_loading).await;

    handle.input("fast").unwrap();
    settled(&handle, "fast").await;

    // Let the slow search complete.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let view = handle.current();
    assert_eq!(titles(&view), vec!["fast p1"]);
    assert_eq!(view.search.debounced_query, "fast");
    assert_eq!(catalog.searches().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn blank_query_returns_to_default_listing() {
    let catalog = Arc::new(FakeCatalog::default());
    let handle = start(catalog.clone(), BrowseConfig::default());

    handle.input("batman").unwrap();
    settled(&handle, "batman").await;

    handle.input("").unwrap();
    let view = settled(&handle, "").await;
    assert_eq!(titles(&view), vec!["Popular p1"]);
    assert_eq!(catalog.last_path(), "/discover/movie");
}

#[tokio::test(start_paused = true)]
async fn failed_search_keeps_previous_results() {
    let catalog = Arc::new(FakeCatalog {
        failing: vec!["boom".to_string()],
        ..FakeCatalog::default()
    });
    let handle = start(catalog, BrowseConfig::default());
    wait_until(&handle, |v| !v.search.results.is_empty()).await;

    handle.input("boom").unwrap();
    let view = settled(&handle, "boom").await;
    assert_eq!(view.search.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(titles(&view), vec!["Popular p1"]);
}

#[tokio::test(start_paused = true)]
async fn next_page_is_ignored_while_a_page_is_loading() {
    let catalog = Arc::new(FakeCatalog {
        delays: HashMap::from([("batman".to_string(), Duration::from_secs(1))]),
        ..FakeCatalog::default()
    });
    let handle = start(catalog.clone(), BrowseConfig::default());

    handle.input("batman").unwrap();
    settled(&handle, "batman").await;

    handle.next_page().unwrap();
    wait_until(&handle, |v| v.search.page == 2 && v.search.is_loading).await;
    handle.next_page().unwrap();
    handle.next_page().unwrap();
    wait_until(&handle, |v| v.search.page == 2 && !v.search.is_loading).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let view = handle.current();
    assert_eq!(view.search.page, 2);
    assert_eq!(titles(&view), vec!["batman p1", "batman p2"]);
    assert_eq!(
        catalog.search_pages(),
        vec![("batman".to_string(), 1), ("batman".to_string(), 2)]
    );
}

#[tokio::test(start_paused = true)]
async fn next_page_after_failed_search_retries_first_page() {
    let catalog = Arc::new(FakeCatalog {
        failing: vec!["boom".to_string()],
        ..FakeCatalog::default()
    });
    let handle = start(catalog.clone(), BrowseConfig::default());
    wait_until(&handle, |v| !v.search.results.is_empty()).await;

    handle.input("boom").unwrap();
    settled(&handle, "boom").await;

    handle.next_page().unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    let view = handle.current();
    assert_eq!(view.search.page, 1);
    assert!(!view.search.is_loading);
    assert_eq!(view.search.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(titles(&view), vec!["Popular p1"]);
    assert_eq!(
        catalog.search_pages(),
        vec![("boom".to_string(), 1), ("boom".to_string(), 1)]
    );
}

#[tokio::test(start_paused = true)]
async fn select_loads_details_and_close_discards_them() {
    let catalog = Arc::new(FakeCatalog::default());
    let config = BrowseConfig {
        embed_base: Some("https://player.test/embed".into()),
        ..BrowseConfig::default()
    };
    let handle = start(catalog, config);
    let view = wait_until(&handle, |v| !v.search.results.is_empty()).await;

    let item = view.search.results[0].clone();
    handle.select(item).unwrap();
    let view = wait_until(&handle, |v| matches!(v.details.status, DetailStatus::Loaded(_))).await;
    let info = view.details.info().unwrap();
    assert_eq!(info.genres[0].name, "Drama");
    assert_eq!(info.cast[0].character, "Hero");
    assert_eq!(
        view.details.player_url.as_deref(),
        Some("https://player.test/embed/movie/901")
    );

    handle.close_details().unwrap();
    let view = wait_until(&handle, |v| !v.details.is_open()).await;
    assert_eq!(view.details.status, DetailStatus::Closed);
}
