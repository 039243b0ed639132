//! Walking server-side paged collections
//!
//! Seyren pages report their own `start`, `items` and `total`. Those values
//! are the only valid cursor: the next page starts at `start + items` as the
//! server reported them, which stays correct when the server clamps the
//! requested page size.

use serde::Deserialize;
use std::future::Future;

use crate::error::{Result, SeyrenError};

/// One page of a paged collection
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub items: u64,
    pub start: u64,
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

/// Cursor state for a single retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub start: u64,
    pub items: u64,
    pub total: u64,
}

impl Cursor {
    /// `total` starts at 1 so the first page is always requested
    pub fn new(start: u64, items: u64) -> Self {
        Self {
            start,
            items,
            total: 1,
        }
    }

    /// Move past `page` using the server-reported offsets
    pub fn advance<T>(&mut self, page: &Page<T>) -> Result<()> {
        self.start = page
            .start
            .checked_add(page.items)
            .ok_or_else(|| SeyrenError::MalformedResponse("page cursor overflows".to_string()))?;
        self.total = page.total;
        self.items = page.items;
        Ok(())
    }
}

/// Fetch every page starting at `start` and convert each record.
///
/// Stops once the collected count reaches the reported total, or when a page
/// comes back empty. Any failed fetch or conversion aborts the whole
/// retrieval; a partial result is never returned.
pub async fn fetch_all<T, R, F, Fut, C>(
    start: u64,
    items: u64,
    mut fetch: F,
    mut convert: C,
) -> Result<Vec<T>>
where
    F: FnMut(u64, u64) -> Fut,
    Fut: Future<Output = Result<Page<R>>>,
    C: FnMut(&R) -> Result<T>,
{
    if items == 0 {
        return Err(SeyrenError::InvalidArgument(
            "page size must be at least 1".to_string(),
        ));
    }

    let mut cursor = Cursor::new(start, items);
    let mut records = Vec::new();

    while (records.len() as u64) < cursor.total {
        let page = fetch(cursor.start, cursor.items).await?;
        tracing::debug!(
            start = page.start,
            items = page.items,
            total = page.total,
            received = page.values.len(),
            "Fetched page"
        );

        for value in &page.values {
            records.push(convert(value)?);
        }

        if page.values.is_empty() || page.items == 0 {
            break;
        }
        cursor.advance(&page)?;
    }

    Ok(records)
}
