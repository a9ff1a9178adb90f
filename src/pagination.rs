use serde::Deserialize;
use shelf_db::Page;
use shelf_kernel::settings::PaginationSettings;

/// Raw `page` / `limit` query values, kept as text so that junk input falls
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Non-numeric, zero, or negative values use the defaults; `limit` is
    /// clamped to the configured maximum.
    pub fn resolve(&self, settings: &PaginationSettings) -> Page {
        let number = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(settings.default_limit)
            .min(settings.max_limit.max(1));
        Page::new(number, limit)
    }
}

/// Digit strings too large for `u32` saturate, so an oversized page lands
/// past the end instead of back on the first page.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let digits = raw?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    (value > 0).then_some(value)
}

/// Cache key for one list page, e.g. `getAllAuthors-2-3`.
pub fn list_cache_key(resource: &str, page: Page) -> String {
    format!("getAll{}-{}-{}", resource, page.number, page.limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn missing_values_use_defaults() {
        let page = query(None, None).resolve(&PaginationSettings::default());
        assert_eq!(page, Page::new(1, 3));
    }

    #[test]
    fn junk_zero_and_negative_values_fall_back() {
        let settings = PaginationSettings::default();
        assert_eq!(query(Some("abc"), Some("x")).resolve(&settings), Page::new(1, 3));
        assert_eq!(query(Some("0"), Some("0")).resolve(&settings), Page::new(1, 3));
        assert_eq!(query(Some("-2"), Some("-5")).resolve(&settings), Page::new(1, 3));
    }

    #[test]
    fn valid_values_are_kept_and_limit_is_clamped() {
        let settings = PaginationSettings::default();
        assert_eq!(query(Some("4"), Some("10")).resolve(&settings), Page::new(4, 10));
        assert_eq!(query(Some(" 2 "), Some("5000")).resolve(&settings), Page::new(2, 100));
    }

    #[test]
    fn oversized_values_saturate() {
        let settings = PaginationSettings::default();
        assert_eq!(
            query(Some("99999999999999999999"), None).resolve(&settings),
            Page::new(u32::MAX, 3)
        );
        assert_eq!(
            query(Some("2"), Some("4294967296")).resolve(&settings),
            Page::new(2, 100)
        );
        assert_eq!(query(Some("+3"), None).resolve(&settings), Page::new(1, 3));
    }

    #[test]
    fn cache_key_uses_normalized_values() {
        let page = query(Some("junk"), None).resolve(&PaginationSettings::default());
        assert_eq!(list_cache_key("Books", page), "getAllBooks-1-3");
    }
}
