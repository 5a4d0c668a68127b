//! Filtered, paginated reads of deployment metadata.
//!
//! The full filtered set is fetched once and paged locally. That set is also
//! the cache unit, so invalidation never has to care which page was viewed.

use crate::backend::MetaQuerier;
use crate::cache::{CacheKey, MetaCache};
use crate::error::QueryError;
use crate::types::{DeploymentMeta, Filter};
use serde::{Deserialize, Serialize};

/// Default number of deployments per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<DeploymentMeta>,
    /// 1-based. Always within `[1, total_pages]` when there is at least one page.
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl Page {
    /// Cut page `requested` out of `all`, clamping out-of-range requests.
    ///
    /// An empty set yields page 1 of 0 with no items.
    pub fn paginate(all: &[DeploymentMeta], requested: i64, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = all.len();
        let total_pages = total_items.div_ceil(page_size);

        let current_page = if total_pages == 0 {
            1
        } else {
            requested.clamp(1, total_pages as i64) as usize
        };

        let start = (current_page - 1) * page_size;
        let items = all.iter().skip(start).take(page_size).cloned().collect();

        Self {
            items,
            current_page,
            total_pages,
            total_items,
            page_size,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Page number "next" navigates to; stays put on the last page.
    pub fn next_page(&self) -> usize {
        if self.has_next() {
            self.current_page + 1
        } else {
            self.current_page
        }
    }

    /// Page number "prev" navigates to; stays put on the first page.
    pub fn prev_page(&self) -> usize {
        if self.has_prev() {
            self.current_page - 1
        } else {
            self.current_page
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cache-aware listing over a [`MetaQuerier`].
pub struct QueryClient<'a, Q: MetaQuerier> {
    querier: &'a Q,
    cache: &'a MetaCache,
    page_size: usize,
}

impl<'a, Q: MetaQuerier> QueryClient<'a, Q> {
    pub fn new(querier: &'a Q, cache: &'a MetaCache, page_size: usize) -> Self {
        Self {
            querier,
            cache,
            page_size,
        }
    }

    /// List deployments matching `filters` and return page `page`.
    ///
    /// Served from cache while the entry is fresh; a stale or missing entry
    /// triggers a refetch. A failed refetch is reported, and the stale entry
    /// stays for the next attempt.
    pub async fn list(&self, filters: &[Filter], page: i64) -> Result<Page, QueryError> {
        let all = self.fetch_all(filters).await?;
        Ok(Page::paginate(&all, page, self.page_size))
    }

    async fn fetch_all(&self, filters: &[Filter]) -> Result<Vec<DeploymentMeta>, QueryError> {
        let key = CacheKey::metas(filters);
        if let Some(items) = self.cache.fresh(&key) {
            tracing::trace!(items = items.len(), "metas served from cache");
            return Ok(items);
        }

        // Taken before the query so a write committing mid-flight is noticed.
        let generation = self.cache.generation(key.resource);
        let items: Vec<DeploymentMeta> = self
            .querier
            .query_metas(filters)
            .await?
            .into_iter()
            .filter(|meta| filters.iter().all(|f| f.matches(meta)))
            .collect();

        tracing::debug!(items = items.len(), "metas fetched");
        self.cache.store_at(key, items.clone(), generation);
        Ok(items)
    }
}
