use crate::config::{PAGE_PREFIX, VIEWS_PREFIX};
use crate::utils::strip_non_digits;

/// a single `page=`/`views=` observation pulled out of a log line
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PageView {
    pub page: String,
    pub views: u128,
}

impl PageView {
    pub fn new<T: Into<String>>(page: T, views: u128) -> Self {
        Self {
            page: page.into(),
            views,
        }
    }

    /// extracts the page id and view count from a free-form log line.
    ///
    /// the first `page=` token and the first `views=` token win. the page id is
    /// taken as-is, the view count has every non-digit stripped before parsing.
    /// returns `None` when either field is missing or empty, or when the count
    /// doesn't fit a `u128`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut page = None;
        let mut raw_views = None;

        for token in line.split_whitespace() {
            if page.is_none()
                && let Some(p) = token.strip_prefix(PAGE_PREFIX)
            {
                page = Some(p);
            } else if raw_views.is_none()
                && let Some(v) = token.strip_prefix(VIEWS_PREFIX)
            {
                raw_views = Some(v);
            }

            if page.is_some() && raw_views.is_some() {
                break;
            }
        }

        let page = page.unwrap_or_default();
        let views = strip_non_digits(raw_views.unwrap_or_default());

        if page.is_empty() || views.is_empty() {
            return None;
        }

        // only digits are left here, so this only trips on overflow
        let views = views.parse::<u128>().ok()?;

        Some(Self::new(page, views))
    }
}
