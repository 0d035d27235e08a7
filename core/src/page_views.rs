use crate::log_file_iter::LogFileIterator;
use crate::log_line::PageView;
use crate::utils::to_pretty_json;
use anyhow::Result;
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// what a single log line did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// no page view on the line
    Skipped,
    /// a page view that didn't beat the stored count
    Unchanged,
    /// a page view that raised the stored count
    Raised,
}

/// highest view count observed per page, in first-seen page order
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageViewTable {
    views: IndexMap<String, u128>,
}

impl PageViewTable {
    /// constructs an empty table
    pub fn new() -> Self {
        Self {
            views: IndexMap::new(),
        }
    }

    /// records `views` for `page`, keeping the larger of the stored and new count.
    /// a page seen for the first time starts at 0. returns true if the stored
    /// count went up
    pub fn record(&mut self, page: &str, views: u128) -> bool {
        let idx = match self.views.get_index_of(page) {
            Some(idx) => idx,
            None => self.views.insert_full(page.to_owned(), 0).0,
        };
        let stored = &mut self.views[idx];

        if views > *stored {
            *stored = views;
            true
        } else {
            false
        }
    }

    /// parses `line` and records the page view it carries, if any
    pub fn process_line(&mut self, line: &str) -> LineOutcome {
        let Some(PageView { page, views }) = PageView::parse(line) else {
            return LineOutcome::Skipped;
        };

        if self.record(&page, views) {
            debug!("updated page {page} with {views}");
            LineOutcome::Raised
        } else {
            LineOutcome::Unchanged
        }
    }

    /// gets the stored count for `page`, if present
    pub fn get(&self, page: &str) -> Option<u128> {
        self.views.get(page).copied()
    }

    /// gets the stored count for `page`, 0 if never seen
    pub fn get_or_zero(&self, page: &str) -> u128 {
        self.get(page).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> {
        self.views.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// renders the table as a json object indented with four spaces
    pub fn to_pretty_json(&self) -> Result<String> {
        to_pretty_json(self)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl<'a> Extend<&'a str> for PageViewTable {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, lines: I) {
        for line in lines {
            self.process_line(line);
        }
    }
}

/// scans the log dump at `path` and returns the max view count per page
pub fn aggregate_file(path: impl AsRef<Path>) -> Result<PageViewTable> {
    let path = path.as_ref();
    let mut table = PageViewTable::new();
    let mut lines = 0usize;
    let mut skipped = 0usize;

    for line in LogFileIterator::new(path)? {
        let line = line?;
        lines += 1;
        if table.process_line(&line) == LineOutcome::Skipped {
            skipped += 1;
        }
    }

    debug!("skipped {skipped} of {lines} lines without a page view");
    info!(
        "aggregated {} pages from {lines} lines of {}",
        table.len(),
        path.display()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::{LineOutcome, PageViewTable, aggregate_file};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_max_per_page() {
        let mut table = PageViewTable::new();
        table.extend(["page=A views=5", "page=A views=9", "page=B views=3"]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(9));
        assert_eq!(table.get("B"), Some(3));
        assert_eq!(
            table.to_pretty_json().unwrap(),
            "{\n    \"A\": 9,\n    \"B\": 3\n}"
        );
    }

    #[test]
    fn test_lower_count_does_not_overwrite() {
        let mut table = PageViewTable::new();
        assert!(table.record("A", 10));
        assert!(!table.record("A", 7));
        assert!(!table.record("A", 10));
        assert_eq!(table.get("A"), Some(10));
    }

    #[test]
    fn test_zero_views_still_listed() {
        let mut table = PageViewTable::new();
        assert_eq!(table.process_line("page=A views=0"), LineOutcome::Unchanged);
        assert_eq!(table.get("A"), Some(0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_get_or_zero() {
        let mut table = PageViewTable::new();
        table.record("A", 4);
        assert_eq!(table.get_or_zero("A"), 4);
        assert_eq!(table.get_or_zero("missing"), 0);
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn test_invalid_lines_leave_table_unchanged() {
        let mut table = PageViewTable::new();
        table.record("A", 5);
        let before = table.clone();

        for line in [
            "views=100",
            "page=A",
            "page=A views=",
            "page=A views=n/a",
            "page= views=100",
            "random noise",
            "",
        ] {
            assert_eq!(table.process_line(line), LineOutcome::Skipped);
        }

        assert_eq!(table, before);
    }

    #[test]
    fn test_reprocessing_is_noop() {
        let mut table = PageViewTable::new();
        assert_eq!(table.process_line("page=A views=12"), LineOutcome::Raised);
        let before = table.clone();
        assert_eq!(table.process_line("page=A views=12"), LineOutcome::Unchanged);
        assert_eq!(table, before);
    }

    #[test]
    fn test_first_seen_order() {
        let mut table = PageViewTable::new();
        table.extend([
            "page=zeta views=1",
            "page=alpha views=2",
            "page=mid views=3",
            "page=zeta views=10",
        ]);

        let pages: Vec<&str> = table.iter().map(|(p, _)| p).collect();
        assert_eq!(pages, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut table = PageViewTable::new();
        table.extend([
            "x page=Nezhinskiy views=186",
            "x page=foo.github.io views=1,234",
            "x page=Nezhinskiy views=200",
        ]);

        let json = table.to_pretty_json().unwrap();
        let parsed = PageViewTable::from_json(&json).unwrap();
        assert_eq!(parsed, table);

        let order: Vec<&str> = parsed.iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec!["Nezhinskiy", "foo.github.io"]);
        assert_eq!(parsed.get("foo.github.io"), Some(1234));
    }

    #[test]
    fn test_wide_counts_kept() {
        let mut table = PageViewTable::new();
        table.extend([
            "page=A views=123456789012345678901234",
            "page=A views=99",
        ]);
        assert_eq!(table.get("A"), Some(123456789012345678901234));

        let json = table.to_pretty_json().unwrap();
        assert_eq!(json, "{\n    \"A\": 123456789012345678901234\n}");
        assert_eq!(PageViewTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn test_non_ascii_pages_escaped() {
        let mut table = PageViewTable::new();
        table.extend(["page=caf\u{e9} views=3"]);

        let json = table.to_pretty_json().unwrap();
        assert_eq!(json, "{\n    \"caf\\u00e9\": 3\n}");
        assert_eq!(PageViewTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn test_aggregate_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "2023-05-01 GET /badge page=A views=5").unwrap();
        writeln!(file, "2023-05-01 GET /badge page=B views=20").unwrap();
        writeln!(file, "2023-05-01 GET /ping").unwrap();
        writeln!(file, "2023-05-02 GET /badge page=A views=9").unwrap();
        writeln!(file, "2023-05-02 GET /badge page=B views=1a").unwrap();

        let table = aggregate_file(file.path()).unwrap();
        assert_eq!(table.get("A"), Some(9));
        assert_eq!(table.get("B"), Some(20));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_aggregate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(aggregate_file(dir.path().join("filtered.dump")).is_err());
    }
}
