use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::debug;

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").expect("valid cell selector"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Cell text of the first row, as the page has it.
    pub headers: Vec<String>,
    /// Every following row. Lengths may differ from `headers`.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Split extracted rows into header + data. No rows → empty table.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let headers = rows.remove(0);
        Self { headers, rows }
    }

    pub fn ragged_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.len() != self.headers.len())
            .count()
    }
}

/// Collect the trimmed text of every `th`/`td` in every `tr` of `table`.
pub fn extract_rows(table: ElementRef<'_>) -> RawTable {
    let rows: Vec<Vec<String>> = table
        .select(&ROW)
        .map(|tr| {
            tr.select(&CELL)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect();

    let raw = RawTable::from_rows(rows);
    debug!(
        columns = raw.headers.len(),
        rows = raw.rows.len(),
        ragged = raw.ragged_rows(),
        "extracted rows"
    );
    raw
}
