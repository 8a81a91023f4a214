//! Pagination contract for drone and medication listings

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::limits;

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: limits::DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, DispatchError> {
        let req = Self { page, limit };
        req.validate()?;
        Ok(req)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.page < 1 {
            return Err(DispatchError::Validation("page must be at least 1".into()));
        }
        if self.limit < 1 || self.limit > limits::MAX_PAGE_LIMIT {
            return Err(DispatchError::Validation(format!(
                "limit must be between 1 and {}",
                limits::MAX_PAGE_LIMIT
            )));
        }
        Ok(())
    }

    fn offset(&self) -> usize {
        (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(self.limit as usize)
    }

    /// Cut one page out of an already ordered result set
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let meta = PageMeta::new(self.page, self.limit, items.len() as u64);
        let items = items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();
        Page { items, meta }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(limit.max(1)));
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next_page: u64::from(page) < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}
