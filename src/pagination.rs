use std::future::Future;

use crate::mangadex::Paginated;

/// Accumulates catalog pages behind an advancing offset. Items are appended
/// in fetch order and never re-sorted. A page shorter than the requested
/// size marks the end; `load_more` is a no-op from then on. Taking
/// `&mut self` keeps overlapping loads from interleaving.
pub struct PagedList<T> {
    items: Vec<T>,
    offset: u32,
    page_size: u32,
    has_more: bool,
    loading: bool,
}

impl<T> PagedList<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            page_size,
            has_more: true,
            loading: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Fetches the next page via `fetch(limit, offset)` and appends it.
    /// Returns how many items arrived; 0 without a call once exhausted. On
    /// error nothing is appended and the offset stays put.
    pub async fn load_more<F, Fut, E>(&mut self, fetch: F) -> Result<usize, E>
    where
        F: FnOnce(u32, u32) -> Fut,
        Fut: Future<Output = Result<Paginated<T>, E>>,
    {
        if !self.has_more {
            return Ok(0);
        }

        self.loading = true;
        let result = fetch(self.page_size, self.offset).await;
        self.loading = false;

        let page = result?;
        let fetched = page.data.len();
        if (fetched as u32) < self.page_size {
            self.has_more = false;
        }
        self.offset += fetched as u32;
        self.items.extend(page.data);
        Ok(fetched)
    }
}
