//! Pagination: request parameters, result page, and the slicing helper the
//! store adapters share.

use std::cmp::Ordering;

use crate::config::TrackerConfig;
use crate::domain::{TaskRecord, User};

/// Zero-based page request. `size` is always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Build from optional caller input, applying the configured default
    /// and upper bound.
    pub fn from_params(page: Option<u32>, size: Option<u32>, config: &TrackerConfig) -> Self {
        Self::new(page.unwrap_or(0), size.unwrap_or(config.default_page_size)).clamp_to(config.max_page_size)
    }

    pub fn clamp_to(self, max_size: u32) -> Self {
        Self::new(self.page, self.size.min(max_size.max(1)))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, crate::config::DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches across all pages.
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: request.page(),
            size: request.size(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

/// Cut one page out of an already ordered match list.
pub fn paginate<T>(ordered: Vec<T>, request: PageRequest) -> Page<T> {
    let total = ordered.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let items = ordered
        .into_iter()
        .skip(offset)
        .take(request.size() as usize)
        .collect();
    Page {
        items,
        total,
        page: request.page(),
        size: request.size(),
    }
}

/// Task list order: newest first, then id ascending.
pub fn task_order(a: &TaskRecord, b: &TaskRecord) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
}

/// User list order: oldest first, then id ascending.
pub fn user_order(a: &User, b: &User) -> Ordering {
    a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
}
