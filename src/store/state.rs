//! Pagination and search state plus list request/outcome types.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_count: u32,
    pub items_per_page: u32,
    pub item_count: u64,
}

impl Pagination {
    pub fn new(items_per_page: u32) -> Self {
        Pagination {
            current_page: 1,
            page_count: 0,
            items_per_page: items_per_page.max(1),
            item_count: 0,
        }
    }

    /// Record a page result. Keeps `current_page` within `[0, page_count]`, and at 0 when nothing matched.
    pub(crate) fn apply(&mut self, requested_page: u32, items_per_page: u32, item_count: u64) {
        self.items_per_page = items_per_page.max(1);
        self.item_count = item_count;
        self.page_count = page_count_for(item_count, self.items_per_page);
        self.current_page = if self.page_count == 0 {
            0
        } else {
            requested_page.clamp(1, self.page_count)
        };
    }
}

pub fn page_count_for(item_count: u64, items_per_page: u32) -> u32 {
    if items_per_page == 0 {
        return 0;
    }
    u32::try_from(item_count.div_ceil(u64::from(items_per_page))).unwrap_or(u32::MAX)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Free-text filter; empty means no filter.
    pub query: String,
    pub ordering: Option<String>,
    /// Send the query as an advanced (structured) search.
    pub advanced_enabled: bool,
    /// Restrict to records created by the logged user.
    pub own_records: bool,
}

/// Arguments of `list_items`. `None` fields fall back to the store's current state;
/// `query: Some("")` clears the stored filter.
#[derive(Clone, Debug, Default)]
pub struct ListRequest {
    pub page: Option<u32>,
    pub query: Option<String>,
    pub page_size: Option<u32>,
    pub extra_params: Vec<(String, String)>,
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra_params.push((key.into(), value.to_string()));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListOutcome {
    /// The response was stored; carries the new pagination.
    Applied(Pagination),
    /// A newer `list_items` call was issued before this one settled; its response was dropped.
    Superseded,
}

impl ListOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ListOutcome::Applied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count_for(0, 10), 0);
        assert_eq!(page_count_for(25, 10), 3);
        assert_eq!(page_count_for(30, 10), 3);
        assert_eq!(page_count_for(1, 25), 1);
    }

    #[test]
    fn apply_clamps_current_page() {
        let mut p = Pagination::new(25);
        p.apply(2, 10, 25);
        assert_eq!((p.current_page, p.page_count), (2, 3));

        p.apply(9, 10, 25);
        assert_eq!(p.current_page, 3);

        p.apply(4, 10, 0);
        assert_eq!((p.current_page, p.page_count, p.item_count), (0, 0, 0));
    }
}
