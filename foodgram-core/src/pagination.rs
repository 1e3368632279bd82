//! Page-number pagination arithmetic shared by the list endpoints.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated page request: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamp raw query values; anything missing or out of range falls back
    /// to page 1 and `default_limit`.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        let limit = match limit {
            Some(l) if l > 0 => l.min(MAX_PAGE_SIZE),
            _ => default_limit.clamp(1, MAX_PAGE_SIZE),
        };
        // Keeps offset + limit within i64
        let max_page = i64::MAX / limit - 1;
        let page = page.filter(|p| *p > 0).unwrap_or(1).min(max_page);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Count and neighbour links of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageLinks {
    /// Build links for `request` given the total row count.
    ///
    /// `url` is the absolute URL of the list endpoint without query string and
    /// `query` is the original query string, whose other parameters are kept.
    pub fn build(request: PageRequest, count: i64, url: &str, query: Option<&str>) -> Self {
        let has_next = request.offset().saturating_add(request.limit) < count;
        let next = has_next.then(|| page_url(url, query, request.page.saturating_add(1)));
        let previous = (request.page > 1).then(|| page_url(url, query, request.page - 1));
        Self {
            count,
            next,
            previous,
        }
    }
}

/// Rewrite the `page` parameter of a query string. Page 1 drops it.
pub fn page_url(url: &str, query: Option<&str>, page: i64) -> String {
    let mut params: Vec<String> = query
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty() && *pair != "page" && !pair.starts_with("page="))
        .map(str::to_string)
        .collect();
    if page > 1 {
        params.push(format!("page={}", page));
    }

    if params.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, params.join("&"))
    }
}

/// Parse a `recipes_limit` value. Anything that isn't a non-negative integer
/// means "no cap".
pub fn parse_recipes_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|l| *l >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost/api/recipes/";

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(
            PageRequest::new(None, None, DEFAULT_PAGE_SIZE),
            PageRequest { page: 1, limit: 6 }
        );
        assert_eq!(PageRequest::new(Some(0), Some(-3), 6), PageRequest { page: 1, limit: 6 });
        assert_eq!(PageRequest::new(Some(3), Some(1000), 6).limit, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(3), Some(10), 6).offset(), 20);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let request = PageRequest::new(Some(i64::MAX), Some(2), 6);
        assert!(request.offset().checked_add(request.limit).is_some());

        let links = PageLinks::build(request, 5, URL, Some("page=9223372036854775807&limit=2"));
        assert_eq!(links.count, 5);
        assert_eq!(links.next, None);
        assert!(links.previous.is_some());

        let max = PageRequest::new(Some(i64::MAX), Some(MAX_PAGE_SIZE), 6);
        assert!(max.offset().checked_add(max.limit).is_some());
    }

    #[test]
    fn test_links_middle_page() {
        let request = PageRequest::new(Some(2), Some(2), 6);
        let links = PageLinks::build(request, 5, URL, Some("page=2&limit=2&tags=breakfast"));
        assert_eq!(links.count, 5);
        assert_eq!(
            links.next.as_deref(),
            Some("http://localhost/api/recipes/?limit=2&tags=breakfast&page=3")
        );
        assert_eq!(
            links.previous.as_deref(),
            Some("http://localhost/api/recipes/?limit=2&tags=breakfast")
        );
    }

    #[test]
    fn test_links_single_page() {
        let links = PageLinks::build(PageRequest::new(None, None, 6), 4, URL, None);
        assert_eq!(links.next, None);
        assert_eq!(links.previous, None);
    }

    #[test]
    fn test_links_first_of_many() {
        let links = PageLinks::build(PageRequest::new(None, Some(6), 6), 7, URL, None);
        assert_eq!(links.next.as_deref(), Some("http://localhost/api/recipes/?page=2"));
        assert_eq!(links.previous, None);
    }

    #[test]
    fn test_recipes_limit() {
        assert_eq!(parse_recipes_limit(Some("3")), Some(3));
        assert_eq!(parse_recipes_limit(Some("0")), Some(0));
        assert_eq!(parse_recipes_limit(Some("-1")), None);
        assert_eq!(parse_recipes_limit(Some("abc")), None);
        assert_eq!(parse_recipes_limit(None), None);
    }
}
