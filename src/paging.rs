//! Paging utilities for GtR API responses.
//!
//! The server reports paging out of band: the record and page totals come
//! in the `Link-Records` and `Link-Pages` headers and the cursors for the
//! first, previous, next and last pages come in a standard `Link` header.
//! The current page is never reported directly, so it is derived from the
//! cursors.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// Header carrying the total number of records in a list resource.
pub const LINK_RECORDS_HEADER: &str = "link-records";
/// Header carrying the total number of pages in a list resource.
pub const LINK_PAGES_HEADER: &str = "link-pages";
/// Query parameter selecting the page (1-indexed).
pub const PAGE_PARAM: &str = "page";
/// Query parameter selecting the page size.
pub const PAGE_SIZE_PARAM: &str = "fetchSize";

/// Smallest page size the server accepts.
pub const MIN_PAGE_SIZE: u32 = 25;
/// Largest page size the server accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Paging state of one page of a list resource.
///
/// A `Paging` is built fresh from every response that carries paging
/// headers and is replaced wholesale on every page transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paging {
    /// Total number of records across all pages.
    pub record_count: u64,
    /// Total number of pages.
    pub pages: u32,
    /// Cursor URL of the first page.
    pub first: Option<String>,
    /// Cursor URL of the previous page.
    pub previous: Option<String>,
    /// Cursor URL of the next page.
    pub next: Option<String>,
    /// Cursor URL of the last page.
    pub last: Option<String>,
}

impl Paging {
    /// Create paging state from totals and cursor URLs.
    #[must_use]
    pub fn new(
        record_count: u64,
        pages: u32,
        first: Option<String>,
        previous: Option<String>,
        next: Option<String>,
        last: Option<String>,
    ) -> Self {
        Self {
            record_count,
            pages,
            first,
            previous,
            next,
            last,
        }
    }

    /// Extract paging state from response headers.
    ///
    /// Returns `None` unless the record count, the page count and the
    /// `Link` header are all present and parseable.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let record_count = header_str(headers, LINK_RECORDS_HEADER)?
            .trim()
            .parse()
            .ok()?;
        let pages = header_str(headers, LINK_PAGES_HEADER)?
            .trim()
            .parse()
            .ok()?;
        let link = header_str(headers, reqwest::header::LINK.as_str())?;

        let cursors = LinkCursors::parse(link);
        Some(Self::new(
            record_count,
            pages,
            cursors.first,
            cursors.previous,
            cursors.next,
            cursors.last,
        ))
    }

    /// The current page number (1-indexed).
    ///
    /// Derived from the cursors: no previous page means page 1, no next page
    /// means the last page, otherwise the neighbouring cursors' `page`
    /// parameters are consulted. Returns `None` when the page cannot be
    /// determined.
    #[must_use]
    pub fn current_page(&self) -> Option<u32> {
        let Some(previous) = non_blank(&self.previous) else {
            return Some(1);
        };
        let Some(next) = non_blank(&self.next) else {
            return Some(self.pages);
        };

        parsed_param(previous, PAGE_PARAM)
            .and_then(|page| page.checked_add(1))
            .or_else(|| parsed_param(next, PAGE_PARAM).and_then(|page| page.checked_sub(1)))
    }

    /// The page size, read from the `fetchSize` parameter of the first-page
    /// cursor. Returns `None` when it cannot be determined.
    #[must_use]
    pub fn current_page_size(&self) -> Option<u32> {
        non_blank(&self.first).and_then(|first| parsed_param(first, PAGE_SIZE_PARAM))
    }

    /// Whether a next-page cursor is present.
    #[must_use]
    pub fn has_next(&self) -> bool {
        non_blank(&self.next).is_some()
    }

    /// Whether a previous-page cursor is present.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        non_blank(&self.previous).is_some()
    }
}

/// Cursor URLs parsed out of a `Link` header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct LinkCursors {
    first: Option<String>,
    previous: Option<String>,
    next: Option<String>,
    last: Option<String>,
}

impl LinkCursors {
    /// Parse `<url>; rel=name, <url>; rel=name, ...`.
    fn parse(header: &str) -> Self {
        let mut cursors = Self::default();

        for entry in header.split(',') {
            let mut segments = entry.split(';');
            let Some(target) = segments.next() else {
                continue;
            };
            let target = target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string();

            let rel = segments
                .filter_map(|param| param.trim().strip_prefix("rel="))
                .map(|rel| rel.trim_matches('"'))
                .next();

            match rel {
                Some("first") => cursors.first = Some(target),
                Some("previous" | "prev") => cursors.previous = Some(target),
                Some("next") => cursors.next = Some(target),
                Some("last") => cursors.last = Some(target),
                _ => {}
            }
        }

        cursors
    }
}

/// Query parameters for paginated requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page.
    #[serde(rename = "fetchSize", skip_serializing_if = "Option::is_none")]
    pub fetch_size: Option<u32>,
}

impl PaginationParams {
    /// Create pagination params for a specific page and page size.
    ///
    /// The page size is clamped into the range the server accepts.
    #[must_use]
    pub fn new(page: Option<u32>, fetch_size: Option<u32>) -> Self {
        Self {
            page,
            fetch_size: constrain_page_size(fetch_size),
        }
    }

    /// Write the params into a URL, replacing any existing values.
    pub fn apply(&self, url: &mut Url) {
        if let Some(page) = self.page {
            set_query_param(url, PAGE_PARAM, &page.to_string());
        }
        if let Some(size) = self.fetch_size {
            set_query_param(url, PAGE_SIZE_PARAM, &size.to_string());
        }
    }
}

/// Clamp a requested page size into `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
///
/// An unset size stays unset so that the server default applies.
#[must_use]
pub fn constrain_page_size(page_size: Option<u32>) -> Option<u32> {
    page_size.map(|size| size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE))
}

/// Read a query parameter from a URL string.
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value.into_owned())
}

/// Set a query parameter on a URL, replacing every existing occurrence.
pub fn set_query_param(url: &mut Url, name: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key.as_ref() != name)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (key, value) in &kept {
        pairs.append_pair(key, value);
    }
    pairs.append_pair(name, value);
}

fn parsed_param(url: &str, name: &str) -> Option<u32> {
    query_param(url, name)?.trim().parse().ok()
}

fn non_blank(cursor: &Option<String>) -> Option<&str> {
    cursor.as_deref().filter(|c| !c.trim().is_empty())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const BASE: &str = "https://gtr.example.org/project";

    fn cursor(page: u32) -> Option<String> {
        Some(format!("{BASE}?page={page}&fetchSize=25"))
    }

    fn paging(previous: Option<String>, next: Option<String>) -> Paging {
        Paging::new(250, 10, cursor(1), previous, next, cursor(10))
    }

    #[test]
    fn test_constrain_page_size() {
        assert_eq!(constrain_page_size(None), None);
        assert_eq!(constrain_page_size(Some(0)), Some(25));
        assert_eq!(constrain_page_size(Some(25)), Some(25));
        assert_eq!(constrain_page_size(Some(60)), Some(60));
        assert_eq!(constrain_page_size(Some(100)), Some(100));
        assert_eq!(constrain_page_size(Some(5000)), Some(100));
    }

    #[test]
    fn test_current_page_without_previous_is_first() {
        assert_eq!(paging(None, cursor(2)).current_page(), Some(1));
        assert_eq!(paging(Some(String::new()), cursor(2)).current_page(), Some(1));
    }

    #[test]
    fn test_current_page_without_next_is_last() {
        assert_eq!(paging(cursor(9), None).current_page(), Some(10));
        assert_eq!(paging(cursor(9), Some("  ".into())).current_page(), Some(10));
    }

    #[test]
    fn test_current_page_from_neighbours() {
        let p = paging(cursor(3), cursor(5));
        assert_eq!(p.current_page(), Some(4));

        // previous unparseable, fall back to next
        let p = paging(Some(format!("{BASE}?page=abc")), cursor(5));
        assert_eq!(p.current_page(), Some(4));

        // both unparseable
        let p = paging(Some(format!("{BASE}?page=abc")), Some(format!("{BASE}?x=1")));
        assert_eq!(p.current_page(), None);
    }

    #[test]
    fn test_current_page_size() {
        assert_eq!(paging(None, cursor(2)).current_page_size(), Some(25));

        let mut p = paging(None, cursor(2));
        p.first = Some(format!("{BASE}?page=1&fetchSize=lots"));
        assert_eq!(p.current_page_size(), None);

        p.first = None;
        assert_eq!(p.current_page_size(), None);
    }

    #[test]
    fn test_link_header_parsing() {
        let header = format!(
            "<{BASE}?page=1>; rel=first, <{BASE}?page=2>; rel=previous, \
             <{BASE}?page=4>; rel=\"next\", <{BASE}?page=9>; rel=last"
        );
        let cursors = LinkCursors::parse(&header);

        assert_eq!(cursors.first.as_deref(), Some(&*format!("{BASE}?page=1")));
        assert_eq!(cursors.previous.as_deref(), Some(&*format!("{BASE}?page=2")));
        assert_eq!(cursors.next.as_deref(), Some(&*format!("{BASE}?page=4")));
        assert_eq!(cursors.last.as_deref(), Some(&*format!("{BASE}?page=9")));
    }

    #[test]
    fn test_from_headers_requires_all_three() {
        let mut headers = HeaderMap::new();
        headers.insert(LINK_RECORDS_HEADER, HeaderValue::from_static("120"));
        headers.insert(LINK_PAGES_HEADER, HeaderValue::from_static("5"));
        assert!(Paging::from_headers(&headers).is_none());

        headers.insert(
            "link",
            HeaderValue::from_static("<https://gtr.example.org/project?page=2>; rel=next"),
        );
        let paging = Paging::from_headers(&headers).unwrap();
        assert_eq!(paging.record_count, 120);
        assert_eq!(paging.pages, 5);
        assert!(paging.has_next());
        assert!(!paging.has_previous());

        headers.insert(LINK_PAGES_HEADER, HeaderValue::from_static("five"));
        assert!(Paging::from_headers(&headers).is_none());
    }

    #[test]
    fn test_pagination_params_replace_existing() {
        let mut url =
            Url::parse("https://gtr.example.org/project?page=3&fetchSize=25&q=x").unwrap();
        PaginationParams::new(Some(7), Some(500)).apply(&mut url);

        assert_eq!(query_param(url.as_str(), "page").as_deref(), Some("7"));
        assert_eq!(query_param(url.as_str(), "fetchSize").as_deref(), Some("100"));
        assert_eq!(query_param(url.as_str(), "q").as_deref(), Some("x"));
        assert_eq!(url.query_pairs().filter(|(k, _)| k == "page").count(), 1);
    }
}
