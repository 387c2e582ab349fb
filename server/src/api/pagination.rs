//! Page-number pagination shared by the list endpoints.
//!
//! Lists return `{count, next, previous, results}`. `next`/`previous` are the
//! request path and query with `page` rewritten, or `null` at either end.

use super::ApiError;
use crate::config::MAX_PAGE_SIZE;
use axum::http::Uri;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number (default: 1)
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Items per page (default: configured page size, max: 100)
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl PageParams {
    /// A malformed or non-positive page is an invalid page, as is one whose
    /// offset would not fit in an `i64`. A malformed limit falls back to the
    /// default.
    pub fn resolve(&self, default_size: i64) -> Result<Page, ApiError> {
        let number = match self.page.as_deref() {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(ApiError::InvalidPage),
            },
        };

        let size = self
            .limit
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|n| *n >= 1)
            .map(|n| n.min(MAX_PAGE_SIZE))
            .unwrap_or(default_size);

        if (number - 1).checked_mul(size).is_none() {
            return Err(ApiError::InvalidPage);
        }

        Ok(Page { number, size })
    }
}

impl Page {
    /// Rows to skip. Cannot overflow for a page built by [`PageParams::resolve`].
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    /// Wrap one page of results.
    ///
    /// An empty page other than the first means the page is past the end.
    pub fn wrap<T>(self, count: i64, results: Vec<T>, uri: &Uri) -> Result<Paginated<T>, ApiError> {
        if results.is_empty() && self.number > 1 {
            return Err(ApiError::InvalidPage);
        }

        let next = (self.offset() + (results.len() as i64) < count)
            .then(|| page_link(uri, Some(self.number + 1)));
        let previous = match self.number {
            1 => None,
            2 => Some(page_link(uri, None)),
            n => Some(page_link(uri, Some(n - 1))),
        };

        Ok(Paginated {
            count,
            next,
            previous,
            results,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    /// Total number of items across all pages
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Rebuild `uri` with its `page` parameter replaced (or removed for `None`).
fn page_link(uri: &Uri, page: Option<i64>) -> String {
    let mut params: Vec<String> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|p| !p.is_empty() && *p != "page" && !p.starts_with("page="))
        .map(str::to_string)
        .collect();

    if let Some(page) = page {
        params.push(format!("page={}", page));
    }

    if params.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let page = params(None, None).resolve(6).unwrap();
        assert_eq!(page, Page { number: 1, size: 6 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_resolve_clamps_limit() {
        assert_eq!(params(Some("3"), Some("1000")).resolve(6).unwrap().size, MAX_PAGE_SIZE);
        assert_eq!(params(None, Some("abc")).resolve(6).unwrap().size, 6);
        assert_eq!(params(None, Some("0")).resolve(6).unwrap().size, 6);
        assert_eq!(params(Some("3"), Some("10")).resolve(6).unwrap().offset(), 20);
    }

    #[test]
    fn test_resolve_rejects_bad_page() {
        assert!(matches!(params(Some("0"), None).resolve(6), Err(ApiError::InvalidPage)));
        assert!(matches!(params(Some("x"), None).resolve(6), Err(ApiError::InvalidPage)));
    }

    #[test]
    fn test_resolve_rejects_page_beyond_offset_range() {
        let max = i64::MAX.to_string();
        assert!(matches!(
            params(Some(&max), None).resolve(6),
            Err(ApiError::InvalidPage)
        ));
        assert!(matches!(
            params(Some("99999999999999999999"), None).resolve(6),
            Err(ApiError::InvalidPage)
        ));

        // Largest page whose offset still fits
        let last = (i64::MAX / 6 + 1).to_string();
        let page = params(Some(&last), None).resolve(6).unwrap();
        assert_eq!(page.offset(), (i64::MAX / 6) * 6);
    }

    #[test]
    fn test_wrap_links() {
        let uri: Uri = "/api/recipes/?tags=lunch&page=2&limit=2".parse().unwrap();
        let page = Page { number: 2, size: 2 };
        let wrapped = page.wrap(5, vec![3, 4], &uri).unwrap();

        assert_eq!(wrapped.count, 5);
        assert_eq!(
            wrapped.next.as_deref(),
            Some("/api/recipes/?tags=lunch&limit=2&page=3")
        );
        assert_eq!(
            wrapped.previous.as_deref(),
            Some("/api/recipes/?tags=lunch&limit=2")
        );
    }

    #[test]
    fn test_wrap_last_page_has_no_next() {
        let uri: Uri = "/api/users/?page=3".parse().unwrap();
        let wrapped = Page { number: 3, size: 2 }.wrap(5, vec![5], &uri).unwrap();
        assert!(wrapped.next.is_none());
        assert_eq!(wrapped.previous.as_deref(), Some("/api/users/?page=2"));
    }

    #[test]
    fn test_wrap_past_end_is_invalid() {
        let uri: Uri = "/api/users/?page=4".parse().unwrap();
        let result = Page { number: 4, size: 2 }.wrap::<i32>(0, vec![], &uri);
        assert!(matches!(result, Err(ApiError::InvalidPage)));
    }

    #[test]
    fn test_wrap_empty_first_page() {
        let uri: Uri = "/api/users/".parse().unwrap();
        let wrapped = Page { number: 1, size: 6 }.wrap::<i32>(0, vec![], &uri).unwrap();
        assert_eq!(wrapped.count, 0);
        assert!(wrapped.next.is_none());
        assert!(wrapped.previous.is_none());
    }
}
