use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::listing::accumulator::Accumulator;
use crate::listing::filter::{visible_listing, FilterState};
use crate::listing::scroll::{ScrollTrigger, ViewportMetrics};
use crate::listing::{PageQuery, PageSource};
use crate::models::restaurant::{Coordinate, Restaurant};

/// What "page 1" means: the category being browsed and the search term.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrowseContext {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl BrowseContext {
    pub fn new(category: Option<String>, search: Option<String>) -> Self {
        Self { category, search }
    }
}

/// A page request issued under a given context version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageTicket {
    version: u64,
    page: u32,
}

impl PageTicket {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Exhausted,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageOutcome {
    Merged { page: u32, added: usize },
    /// The response belonged to a context that has since been replaced.
    Stale,
    Failed,
}

/// Drives paginated browsing for one screen.
///
/// At most one page is in flight. Every context switch bumps `version`, and
/// a response is only merged if its ticket still carries the current version.
#[derive(Debug)]
pub struct ListingBrowser {
    context: BrowseContext,
    version: u64,
    limit: u32,
    next_page: u32,
    in_flight: Option<PageTicket>,
    failed: bool,
    accumulator: Accumulator,
    filters: FilterState,
    location: Option<Coordinate>,
    trigger: ScrollTrigger,
}

impl ListingBrowser {
    pub fn new(limit: u32, trigger: ScrollTrigger) -> Self {
        Self {
            context: BrowseContext::default(),
            version: 0,
            limit: limit.max(1),
            next_page: 1,
            in_flight: None,
            failed: false,
            accumulator: Accumulator::new(),
            filters: FilterState::default(),
            location: None,
            trigger,
        }
    }

    pub fn context(&self) -> &BrowseContext {
        &self.context
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Switches to another category or search term. Returns `false` when the
    /// context is unchanged and nothing was reset.
    pub fn set_context(&mut self, context: BrowseContext) -> bool {
        if context == self.context {
            return false;
        }
        self.version += 1;
        info!(
            version = self.version,
            category = ?context.category,
            search = ?context.search,
            "Switching browsing context"
        );
        self.context = context;
        self.accumulator.reset();
        self.filters.clear();
        self.next_page = 1;
        self.in_flight = None;
        self.failed = false;
        true
    }

    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    pub fn set_location(&mut self, location: Option<Coordinate>) {
        self.location = location;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn items(&self) -> &[Restaurant] {
        self.accumulator.items()
    }

    pub fn state(&self) -> LoadState {
        if self.failed {
            LoadState::Failed
        } else if self.in_flight.is_some() {
            LoadState::Loading
        } else if self.accumulator.is_exhausted() {
            LoadState::Exhausted
        } else {
            LoadState::Idle
        }
    }

    pub fn has_more(&self) -> bool {
        !self.failed && !self.accumulator.is_exhausted()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn begin_next_page(&mut self) -> Option<PageTicket> {
        if self.in_flight.is_some() || !self.has_more() {
            return None;
        }
        let ticket = PageTicket {
            version: self.version,
            page: self.next_page,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    pub fn on_scroll(&mut self, metrics: &ViewportMetrics) -> Option<PageTicket> {
        if !self
            .trigger
            .should_request(metrics, self.in_flight.is_some(), self.has_more())
        {
            return None;
        }
        self.begin_next_page()
    }

    pub fn query_for(&self, ticket: &PageTicket) -> PageQuery {
        PageQuery {
            page: ticket.page,
            limit: self.limit,
            location: self.location.map(|location| location.to_query_value()),
            category: self.context.category.clone(),
        }
    }

    /// Settles a ticket with the result of its fetch.
    pub fn complete<E: Display>(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<Restaurant>, E>,
    ) -> PageOutcome {
        if ticket.version != self.version || self.in_flight != Some(ticket) {
            debug!(
                ticket_version = ticket.version,
                current_version = self.version,
                page = ticket.page,
                "Discarding stale page"
            );
            return PageOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let added = if ticket.page == 1 {
                    self.accumulator.replace(page, self.limit)
                } else {
                    self.accumulator.merge(page, self.limit)
                };
                self.next_page += 1;
                debug!(page = ticket.page, added, total = self.accumulator.len(), "Merged page");
                PageOutcome::Merged {
                    page: ticket.page,
                    added,
                }
            }
            Err(e) => {
                warn!("Failed to load restaurant page {} due to: {}", ticket.page, e);
                self.failed = true;
                self.accumulator.mark_exhausted();
                PageOutcome::Failed
            }
        }
    }

    pub async fn resolve<S: PageSource>(&mut self, source: &S, ticket: PageTicket) -> PageOutcome {
        let query = self.query_for(&ticket);
        let result = source.fetch_page(&query).await;
        self.complete(ticket, result)
    }

    /// Fetches the next page if one may be requested right now.
    pub async fn load_next<S: PageSource>(&mut self, source: &S) -> Option<PageOutcome> {
        let ticket = self.begin_next_page()?;
        Some(self.resolve(source, ticket).await)
    }

    pub fn visible(&self) -> Vec<&Restaurant> {
        visible_listing(
            self.accumulator.items(),
            &self.filters,
            self.location,
            self.context.search.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: std::ops::RangeInclusive<i64>) -> Vec<Restaurant> {
        ids.map(|id| Restaurant {
            id,
            name: format!("Resto {}", id),
            place: String::new(),
            star: None,
            coordinate: None,
            price_range: None,
            logo: None,
        })
        .collect()
    }

    fn browser() -> ListingBrowser {
        ListingBrowser::new(10, ScrollTrigger::default())
    }

    fn bottom() -> ViewportMetrics {
        ViewportMetrics::scrolled_to_bottom(4000.0, 800.0)
    }

    #[test]
    fn only_one_page_is_in_flight() {
        let mut browser = browser();

        let first = browser.on_scroll(&bottom());
        let second = browser.on_scroll(&bottom());

        assert_eq!(first.map(|ticket| ticket.page()), Some(1));
        assert_eq!(second, None);
        assert_eq!(browser.state(), LoadState::Loading);
    }

    #[test]
    fn next_page_follows_a_merged_page() {
        let mut browser = browser();
        let ticket = browser.begin_next_page().unwrap();
        browser.complete(ticket, Ok::<_, String>(page(1..=10)));

        let next = browser.on_scroll(&bottom()).unwrap();

        assert_eq!(next.page(), 2);
    }

    #[test]
    fn stale_response_is_discarded_after_context_switch() {
        let mut browser = browser();
        let old = browser.begin_next_page().unwrap();

        browser.set_context(BrowseContext::new(Some("padang".to_string()), None));
        let outcome = browser.complete(old, Ok::<_, String>(page(1..=10)));

        assert_eq!(outcome, PageOutcome::Stale);
        assert!(browser.items().is_empty());

        let fresh = browser.begin_next_page().unwrap();
        assert_eq!(fresh.page(), 1);
        assert_eq!(fresh.version(), old.version() + 1);
    }

    #[test]
    fn context_switch_resets_before_the_new_first_page() {
        let mut browser = browser();
        let ticket = browser.begin_next_page().unwrap();
        browser.complete(ticket, Ok::<_, String>(page(1..=10)));
        browser.filters_mut().set_min_price(Some("10000".to_string()));

        assert!(browser.set_context(BrowseContext::new(Some("sunda".to_string()), None)));

        assert!(browser.items().is_empty());
        assert!(browser.filters().is_empty());
        assert_eq!(browser.state(), LoadState::Idle);
    }

    #[test]
    fn same_context_does_not_reset() {
        let mut browser = browser();
        let ticket = browser.begin_next_page().unwrap();
        browser.complete(ticket, Ok::<_, String>(page(1..=10)));

        assert!(!browser.set_context(BrowseContext::default()));
        assert_eq!(browser.items().len(), 10);
    }

    #[test]
    fn failure_stops_pagination() {
        let mut browser = browser();
        let ticket = browser.begin_next_page().unwrap();

        let outcome = browser.complete(ticket, Err::<Vec<Restaurant>, _>("timeout"));

        assert_eq!(outcome, PageOutcome::Failed);
        assert_eq!(browser.state(), LoadState::Failed);
        assert!(browser.on_scroll(&bottom()).is_none());
    }

    #[test]
    fn query_carries_location_and_category() {
        let mut browser = browser();
        browser.set_context(BrowseContext::new(Some("bakso".to_string()), None));
        browser.set_location(Some(Coordinate::new(-6.5, 106.75)));
        let ticket = browser.begin_next_page().unwrap();

        let query = browser.query_for(&ticket);

        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.location.as_deref(), Some("-6.5,106.75"));
        assert_eq!(query.category.as_deref(), Some("bakso"));
    }
}
