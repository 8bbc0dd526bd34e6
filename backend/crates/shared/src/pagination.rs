//! Pagination
//!
//! Raw `pageNumber` / `pageSize` / `sortBy` / `sortDirection` query
//! parameters are accepted as strings and resolved leniently: anything that
//! does not parse falls back to its default instead of rejecting the request.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only `asc` selects ascending order
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sortable columns of a collection
pub trait SortField: Copy + Default {
    /// `None` for unknown names, which then fall back to the default
    fn parse(name: &str) -> Option<Self>;
}

/// Query-string parameters as sent by the client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

impl PageParams {
    pub fn resolve<F: SortField>(&self) -> PageQuery<F> {
        PageQuery {
            page_number: positive_or(self.page_number.as_deref(), DEFAULT_PAGE_NUMBER),
            page_size: positive_or(self.page_size.as_deref(), DEFAULT_PAGE_SIZE),
            sort_by: self
                .sort_by
                .as_deref()
                .and_then(F::parse)
                .unwrap_or_default(),
            sort_direction: SortDirection::parse(self.sort_direction.as_deref()),
        }
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

/// Resolved pagination and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery<F> {
    pub page_number: u64,
    pub page_size: u64,
    pub sort_by: F,
    pub sort_direction: SortDirection,
}

impl<F: SortField> Default for PageQuery<F> {
    fn default() -> Self {
        PageParams::default().resolve()
    }
}

impl<F> PageQuery<F> {
    pub fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Offset clamped for SQL `OFFSET`
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// Page size clamped for SQL `LIMIT`
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.page_size).unwrap_or(i64::MAX)
    }

    /// Cut the requested page out of an already sorted collection
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(size).collect()
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginator<T> {
    pub pages_count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> Paginator<T> {
    pub fn new<F>(query: &PageQuery<F>, total_count: u64, items: Vec<T>) -> Self {
        Self {
            pages_count: total_count.div_ceil(query.page_size),
            page: query.page_number,
            page_size: query.page_size,
            total_count,
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginator<U> {
        Paginator {
            pages_count: self.pages_count,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

// ============================================================================
// Search terms
// ============================================================================

/// Case-insensitive substring match used by the in-memory stores
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\` escaped
pub fn ilike_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Blank search terms are treated as absent
pub fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
