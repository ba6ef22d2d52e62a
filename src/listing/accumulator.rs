use std::collections::HashSet;

use tracing::debug;

use crate::models::restaurant::Restaurant;

/// Restaurants fetched so far for one browsing context, unique by id and in
/// arrival order.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    items: Vec<Restaurant>,
    seen: HashSet<i64>,
    pages_merged: u32,
    exhausted: bool,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Restaurant] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pages_merged(&self) -> u32 {
        self.pages_merged
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Marks the context as having no further pages, e.g. after a failed fetch.
    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.pages_merged = 0;
        self.exhausted = false;
    }

    /// Drops everything and starts over with `page` as the first page.
    pub fn replace(&mut self, page: Vec<Restaurant>, limit: u32) -> usize {
        self.reset();
        self.merge(page, limit)
    }

    /// Appends the restaurants of `page` that are not already present and
    /// returns how many were added.
    ///
    /// The listing is exhausted once a page comes back shorter than `limit`,
    /// or once a later page adds nothing new. Some backends answer
    /// out-of-range page numbers by repeating the last page.
    pub fn merge(&mut self, page: Vec<Restaurant>, limit: u32) -> usize {
        let fetched = page.len();
        let before = self.items.len();

        for restaurant in page {
            if self.seen.insert(restaurant.id) {
                self.items.push(restaurant);
            }
        }
        let added = self.items.len() - before;

        if fetched < limit as usize {
            debug!(fetched, limit, "Short page, listing exhausted");
            self.exhausted = true;
        } else if added == 0 && self.pages_merged > 0 {
            debug!(fetched, "Page added nothing new, listing exhausted");
            self.exhausted = true;
        }
        self.pages_merged += 1;

        added
    }
}
