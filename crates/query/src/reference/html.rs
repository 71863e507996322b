//! Minimal HTML table extraction for reference articles.
//!
//! Only what the reference pages need: `<table>` blocks, their rows and the
//! text of each cell. Nested tables are not supported.

use std::sync::LazyLock;

use regex::Regex;

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").expect("Invalid regex"));

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("Invalid regex"));

static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<t([hd])\b[^>]*>(.*?)</t[hd]>").expect("Invalid regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("Invalid regex"));

/// Footnote markers such as `[1]` or `[a]`.
static FOOTNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]{1,3}\]").expect("Invalid regex"));

static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// A table's header labels and body rows as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlTable {
    /// Labels from the first all-header row.
    pub headers: Vec<String>,
    /// Remaining rows, header cells included.
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Index of the first header containing `fragment`, case-insensitively.
    #[must_use]
    pub fn column(&self, fragment: &str) -> Option<usize> {
        let fragment = fragment.to_lowercase();
        self.headers
            .iter()
            .position(|h| h.to_lowercase().contains(&fragment))
    }

    /// Indexes of every header containing `fragment`.
    #[must_use]
    pub fn columns(&self, fragment: &str) -> Vec<usize> {
        let fragment = fragment.to_lowercase();
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.to_lowercase().contains(&fragment))
            .map(|(i, _)| i)
            .collect()
    }

    /// Cells of one column, skipping rows too short to have it.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index).map(String::as_str))
    }
}

/// Every table in `html`, in document order.
#[must_use]
pub fn extract_tables(html: &str) -> Vec<HtmlTable> {
    TABLE_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|body| parse_table(body.as_str()))
        .collect()
}

fn parse_table(body: &str) -> HtmlTable {
    let mut table = HtmlTable::default();
    for row in ROW_RE.captures_iter(body).filter_map(|c| c.get(1)) {
        let mut all_header = true;
        let mut cells = Vec::new();
        for cell in CELL_RE.captures_iter(row.as_str()) {
            all_header &= cell.get(1).is_some_and(|k| k.as_str().eq_ignore_ascii_case("h"));
            cells.push(cell_text(cell.get(2).map_or("", |m| m.as_str())));
        }
        if cells.is_empty() {
            continue;
        }
        if all_header && table.headers.is_empty() && table.rows.is_empty() {
            table.headers = cells;
        } else if !all_header || !table.rows.is_empty() {
            table.rows.push(cells);
        }
    }
    table
}

fn cell_text(raw: &str) -> String {
    let text = TAG_RE.replace_all(raw, " ");
    let text = decode_entities(&text);
    let text = FOOTNOTE_RE.replace_all(&text, "");
    SPACE_RE.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&#8211;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="infobox"><tr><th>Sign</th><th>Symbol</th></tr></table>
        <table class="wikitable">
          <tr><th>Start date</th><th>End date</th><th>Element</th></tr>
          <tr><td>13 February 1907</td><td>1 February 1908</td><td>Fire</td></tr>
          <tr><td><a href="/x">1 February 1919</a><sup>[3]</sup></td><td>19 February 1920</td><td>Earth</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_extract_tables_in_order() {
        let tables = extract_tables(PAGE);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Sign", "Symbol"]);
        assert!(tables[0].rows.is_empty());
    }

    #[test]
    fn test_cells_are_plain_text() {
        let tables = extract_tables(PAGE);
        let dates = &tables[1];
        let start = dates.column("start date").unwrap();
        let values: Vec<&str> = dates.column_values(start).collect();
        assert_eq!(values, vec!["13 February 1907", "1 February 1919"]);
    }

    #[test]
    fn test_row_header_cells_kept_in_body() {
        let html = "<table>\
            <tr><th>Sign</th><th>Sun (tropical)</th></tr>\
            <tr><th>Libra</th><td>23&nbsp;September</td></tr>\
            </table>";
        let table = extract_tables(html).pop().unwrap();
        assert_eq!(table.rows, vec![vec!["Libra".to_string(), "23 September".to_string()]]);
        assert_eq!(table.columns("sun"), vec![1]);
    }

    #[test]
    fn test_no_tables() {
        assert!(extract_tables("<p>nothing here</p>").is_empty());
    }
}
