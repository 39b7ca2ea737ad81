//! Lazy pagination over the hosting API's listing endpoints.
//!
//! Listing endpoints (pull request commits, organization repositories,
//! repository hooks) page their results. [`Pager`] produces pages on demand
//! and stops when the remote signals no further page, keeping the callers
//! focused on policy instead of cursor bookkeeping. A caller that finds what
//! it needs can stop early without fetching the remaining pages.

use std::future::Future;

/// Page size used for every paginated listing.
pub const PAGE_SIZE: u8 = 10;

/// One fetched page plus whether the remote reports more after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> PageOf<T> {
    /// Builds a page from a raw item array, inferring `has_more` the way the
    /// array endpoints signal it: a short page is the last page.
    pub fn from_items(items: Vec<T>, per_page: u8) -> Self {
        let has_more = items.len() == per_page as usize;
        PageOf { items, has_more }
    }
}

/// A lazy cursor over a paged listing.
///
/// `fetch` is invoked once per page with the 1-based page number. The cursor
/// is restartable in the sense that each page fetch is independent; dropping
/// the cursor mid-listing holds no remote state.
pub struct Pager<F> {
    fetch: F,
    next: Option<u32>,
}

impl<F> Pager<F> {
    /// Creates a cursor positioned at page 1.
    pub fn new(fetch: F) -> Self {
        Pager {
            fetch,
            next: Some(1),
        }
    }

    /// Fetches the next page, or returns `None` once the listing is
    /// exhausted.
    pub async fn next_page<T, E, Fut>(&mut self) -> Result<Option<Vec<T>>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<PageOf<T>, E>>,
    {
        let Some(page) = self.next else {
            return Ok(None);
        };

        let fetched = (self.fetch)(page).await?;
        self.next = fetched.has_more.then_some(page + 1);
        Ok(Some(fetched.items))
    }

    /// Drains every remaining page into one sequence, preserving page order.
    pub async fn collect_all<T, E, Fut>(mut self) -> Result<Vec<T>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<PageOf<T>, E>>,
    {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}
