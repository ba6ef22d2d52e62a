//! Paginated browsing end to end: HTTP pages into the accumulator, then filters.

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

use eat_where_la_client::error::ApiError;
use eat_where_la_client::listing::{
    BrowseContext, ListingBrowser, LoadState, PageOutcome, PageQuery, PageSource, RatingBucket,
    ScrollTrigger, ViewportMetrics,
};
use eat_where_la_client::models::restaurant::Restaurant;
use eat_where_la_client::repositories::api_repo::RestoApiRepo;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn restaurants_json(ids: impl Iterator<Item = i64>) -> Value {
    Value::Array(
        ids.map(|id| {
            json!({
                "id": id,
                "name": format!("Resto {}", id),
                "place": "Jakarta",
                "star": 3.0 + (id % 3) as f64,
            })
        })
        .collect(),
    )
}

async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/resto"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn bottom() -> ViewportMetrics {
    ViewportMetrics::scrolled_to_bottom(2000.0, 900.0)
}

#[tokio::test]
async fn short_second_page_exhausts_the_listing() {
    let server = MockServer::start().await;
    mount_page(&server, 1, restaurants_json(1..=10)).await;
    mount_page(&server, 2, restaurants_json(11..=14)).await;
    let repo = RestoApiRepo::new(server.uri(), None, Duration::from_secs(5)).unwrap();
    let mut browser = ListingBrowser::new(10, ScrollTrigger::default());

    let first = browser.load_next(&repo).await;
    assert_eq!(first, Some(PageOutcome::Merged { page: 1, added: 10 }));
    assert!(browser.has_more());

    let ticket = browser.on_scroll(&bottom()).unwrap();
    let second = browser.resolve(&repo, ticket).await;
    assert_eq!(second, PageOutcome::Merged { page: 2, added: 4 });

    assert!(!browser.has_more());
    assert_eq!(browser.state(), LoadState::Exhausted);
    assert_eq!(browser.items().len(), 14);
    assert!(browser.on_scroll(&bottom()).is_none());
}

#[tokio::test]
async fn http_failure_aborts_pagination_without_retry() {
    let server = MockServer::start().await;
    mount_page(&server, 1, restaurants_json(1..=10)).await;
    Mock::given(method("GET"))
        .and(path("/resto"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    let repo = RestoApiRepo::new(server.uri(), None, Duration::from_secs(5)).unwrap();
    let mut browser = ListingBrowser::new(10, ScrollTrigger::default());

    browser.load_next(&repo).await;
    let outcome = browser.load_next(&repo).await;

    assert_eq!(outcome, Some(PageOutcome::Failed));
    assert_eq!(browser.state(), LoadState::Failed);
    assert_eq!(browser.load_next(&repo).await, None);
    assert_eq!(browser.items().len(), 10);
}

#[tokio::test]
async fn filters_recompute_without_refetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(restaurants_json(1..=6)))
        .expect(1)
        .mount(&server)
        .await;
    let repo = RestoApiRepo::new(server.uri(), None, Duration::from_secs(5)).unwrap();
    let mut browser = ListingBrowser::new(10, ScrollTrigger::default());
    browser.load_next(&repo).await;

    browser.filters_mut().toggle_rating(RatingBucket::new(5).unwrap());
    let top: Vec<i64> = browser.visible().iter().map(|restaurant| restaurant.id).collect();
    browser.filters_mut().clear();
    let all = browser.visible().len();

    // star = 3 + id % 3, so ids 2 and 5 are rated 5.0
    assert_eq!(top, vec![2, 5]);
    assert_eq!(all, 6);
}

/// Serves canned pages and records every query it was asked for.
struct ScriptedSource {
    pages: Vec<Vec<Restaurant>>,
    queries: RefCell<Vec<PageQuery>>,
}

impl ScriptedSource {
    fn new(pages: Vec<Vec<Restaurant>>) -> Self {
        Self {
            pages,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl PageSource for ScriptedSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Restaurant>, ApiError> {
        self.queries.borrow_mut().push(query.clone());
        let index = (query.page as usize - 1).min(self.pages.len() - 1);
        Ok(self.pages[index].clone())
    }
}

fn restaurant(id: i64) -> Restaurant {
    serde_json::from_value(json!({ "id": id, "name": format!("Resto {}", id) })).unwrap()
}

fn page(ids: std::ops::RangeInclusive<i64>) -> Vec<Restaurant> {
    ids.map(restaurant).collect()
}

#[tokio::test]
async fn repeated_last_page_stops_pagination() {
    // Out-of-range pages repeat the last full page.
    let source = ScriptedSource::new(vec![page(1..=5), page(6..=10)]);
    let mut browser = ListingBrowser::new(5, ScrollTrigger::default());

    while browser.load_next(&source).await.is_some() {}

    assert_eq!(source.queries.borrow().len(), 3);
    assert_eq!(browser.items().len(), 10);
    assert_eq!(browser.state(), LoadState::Exhausted);
}

#[tokio::test]
async fn order_is_kept_and_ids_stay_unique_across_overlapping_pages() {
    let source = ScriptedSource::new(vec![page(1..=4), page(3..=6), page(5..=8), page(9..=9)]);
    let mut browser = ListingBrowser::new(4, ScrollTrigger::default());

    while browser.load_next(&source).await.is_some() {}

    let ids: Vec<i64> = browser.items().iter().map(|restaurant| restaurant.id).collect();
    assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    let unique: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test]
async fn new_category_starts_again_from_page_one() {
    let source = ScriptedSource::new(vec![page(1..=3), page(4..=6)]);
    let mut browser = ListingBrowser::new(3, ScrollTrigger::default());
    browser.load_next(&source).await;
    browser.load_next(&source).await;

    browser.set_context(BrowseContext::new(Some("seafood".to_string()), None));
    assert!(browser.items().is_empty());
    browser.load_next(&source).await;

    let queries = source.queries.borrow();
    let last = queries.last().unwrap();
    assert_eq!(last.page, 1);
    assert_eq!(last.category.as_deref(), Some("seafood"));
    assert_eq!(browser.items().len(), 3);
}

#[tokio::test]
async fn search_term_narrows_the_visible_listing() {
    let mut named = page(1..=3);
    named[1].name = "Nasi Padang Sederhana".to_string();
    let source = ScriptedSource::new(vec![named]);
    let mut browser = ListingBrowser::new(10, ScrollTrigger::default());
    browser.set_context(BrowseContext::new(None, Some("padang".to_string())));

    browser.load_next(&source).await;

    let visible: Vec<i64> = browser.visible().iter().map(|restaurant| restaurant.id).collect();
    assert_eq!(visible, vec![2]);
    assert_eq!(browser.items().len(), 3);
}
