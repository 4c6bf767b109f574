use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::error::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 50;
/// Highest page whose offset still fits a signed 64-bit `OFFSET`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

pub fn default_page() -> u64 {
    1
}

pub fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Page numbers are clamped to `1..=MAX_PAGE`, the size to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: u64, page: PageRequest) -> Self {
        Self {
            count,
            page: page.page,
            page_size: page.page_size,
            total_pages: count.div_ceil(page.page_size),
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Parsed `ordering` query value: `field` or `-field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn parse(
        raw: Option<&str>,
        allowed: &[&str],
        default: &str,
    ) -> Result<Self, ServiceError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(default);
        let (field, descending) = match raw.strip_prefix('-') {
            Some(field) => (field, true),
            None => (raw, false),
        };

        if !allowed.contains(&field) {
            return Err(ServiceError::validation(format!(
                "Cannot order by '{field}'. Allowed fields: {}.",
                allowed.join(", ")
            )));
        }

        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }

    pub fn order(&self) -> sea_orm::Order {
        if self.descending {
            sea_orm::Order::Desc
        } else {
            sea_orm::Order::Asc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(PageRequest::new(1, 500).page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn huge_page_numbers_keep_a_valid_offset() {
        let page = PageRequest::new(u64::MAX, MAX_PAGE_SIZE);
        assert_eq!(page.page, MAX_PAGE);
        assert!(page.offset() <= i64::MAX as u64);

        let built_by_hand = PageRequest {
            page: u64::MAX,
            page_size: u64::MAX,
        };
        assert_eq!(built_by_hand.offset(), u64::MAX);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2], 41, PageRequest::new(3, 20));
        assert_eq!(page.total_pages, 3);

        let empty: Paginated<u8> = Paginated::new(vec![], 0, PageRequest::default());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn ordering_accepts_descending_prefix() {
        let ordering = Ordering::parse(Some("-title"), &["title", "created_at"], "-created_at")
            .unwrap();
        assert_eq!(ordering.field, "title");
        assert!(ordering.descending);

        let fallback = Ordering::parse(None, &["title", "created_at"], "-created_at").unwrap();
        assert_eq!(fallback.field, "created_at");
    }

    #[test]
    fn ordering_rejects_unknown_field() {
        assert!(Ordering::parse(Some("password"), &["title"], "title").is_err());
    }
}
