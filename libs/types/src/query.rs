//! Listing query parameters
//!
//! Raw query-string values ([`ListingParams`]) are validated into a
//! [`ListingQuery`] before any arithmetic happens. Rules:
//! - `n` is required and must be an integer >= 1
//! - `page` defaults to 1 and must be an integer >= 1 when given
//! - `minPrice`/`maxPrice` are non-negative decimals with min <= max
//! - `order` is `asc` or `desc` (case-insensitive)
//! - sorting applies only when both `sort` and `order` are present
//!
//! Empty values are treated as absent, except for `n`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use crate::errors::QueryError;

/// Query string of the listing endpoint, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub n: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
}

/// Requested number of products (>= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductCount(u64);

impl ProductCount {
    pub fn new(n: u64) -> Result<Self, QueryError> {
        if n == 0 {
            return Err(QueryError::InvalidCount);
        }
        Ok(Self(n))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber(u64);

impl PageNumber {
    pub fn new(page: u64) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::InvalidPage);
        }
        Ok(Self(page))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self(1)
    }
}

/// Optional price bounds forwarded to upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Result<Self, QueryError> {
        let negative = |d: &Option<Decimal>| d.is_some_and(|v| v < Decimal::ZERO);
        if negative(&min) || negative(&max) {
            return Err(QueryError::InvalidPriceRange);
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(QueryError::InvalidPriceRange);
            }
        }
        Ok(Self { min, max })
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(QueryError::InvalidSortOrder)
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Sort key (a numeric product field) and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

/// Contiguous half-open slice `[offset, offset + len)` of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub len: usize,
}

impl PageWindow {
    /// Window for `page` with `per_page` items per page.
    ///
    /// An offset that overflows `usize` saturates, which selects nothing.
    pub fn new(page: PageNumber, per_page: usize) -> Self {
        let index = usize::try_from(page.get() - 1).unwrap_or(usize::MAX);
        Self {
            offset: index.saturating_mul(per_page),
            len: per_page,
        }
    }

    /// Take the window out of `items`; empty when out of range
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.len).collect()
    }
}

/// Validated listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub count: ProductCount,
    pub price_range: PriceRange,
    pub sort: Option<SortSpec>,
    pub page: PageNumber,
}

impl ListingQuery {
    /// Validate raw parameters
    pub fn parse(params: &ListingParams) -> Result<Self, QueryError> {
        let count = params
            .n
            .as_deref()
            .ok_or(QueryError::InvalidCount)
            .and_then(|n| parse_saturating(n, QueryError::InvalidCount))
            .and_then(ProductCount::new)?;

        let page = match non_empty(&params.page) {
            None => PageNumber::default(),
            Some(p) => parse_saturating(p, QueryError::InvalidPage).and_then(PageNumber::new)?,
        };

        let price_range = PriceRange::new(
            parse_price(&params.min_price)?,
            parse_price(&params.max_price)?,
        )?;

        // Order is validated even when `sort` is absent
        let order = non_empty(&params.order)
            .map(SortOrder::from_str)
            .transpose()?;
        let sort = match (non_empty(&params.sort), order) {
            (Some(field), Some(order)) => Some(SortSpec {
                field: field.to_string(),
                order,
            }),
            _ => None,
        };

        Ok(Self {
            count,
            price_range,
            sort,
            page,
        })
    }

    /// Products per page: the requested count capped at `max_page_size`
    pub fn page_size(&self, max_page_size: usize) -> usize {
        usize::try_from(self.count.get())
            .unwrap_or(usize::MAX)
            .min(max_page_size)
    }

    pub fn window(&self, max_page_size: usize) -> PageWindow {
        PageWindow::new(self.page, self.page_size(max_page_size))
    }
}

/// Unsigned integer; values past `u64::MAX` saturate instead of failing
fn parse_saturating(value: &str, err: QueryError) -> Result<u64, QueryError> {
    match value.trim().parse::<u64>() {
        Ok(v) => Ok(v),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(u64::MAX),
        Err(_) => Err(err),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(value: &Option<String>) -> Result<Option<Decimal>, QueryError> {
    non_empty(value)
        .map(|v| Decimal::from_str(v).map_err(|_| QueryError::InvalidPriceRange))
        .transpose()
}
