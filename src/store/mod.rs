#[cfg(test)]
pub mod failing;
pub mod memory;
pub mod sqlite;

use std::fmt;
use std::sync::Arc;

use crate::app::Result;

pub use memory::MemoryTableStore;
pub use sqlite::SqliteTableStore;

/// A row as the store sees it: one string per column, in column order.
pub type Row = Vec<String>;

pub type SharedStore = Arc<dyn TableStore + Send + Sync>;

/// Physical row number of the header. Data rows start right after it.
pub const HEADER_ROW: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Articles,
    Feeds,
}

impl Table {
    pub const ALL: [Table; 2] = [Table::Articles, Table::Feeds];

    /// Column names in storage order. This is also the header row.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Articles => &[
                "id",
                "url",
                "title",
                "added_date",
                "last_checked",
                "content_hash",
                "is_read",
                "tags",
            ],
            Table::Feeds => &["feed_url", "last_checked"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Table::Articles => "Articles",
            Table::Feeds => "Feeds",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a 0-based position in the `list_rows` output to the physical,
/// header-inclusive row number used by `set_cell` and `delete_row`.
pub fn physical_row(data_index: usize) -> usize {
    data_index + HEADER_ROW + 1
}

/// Spreadsheet-style access to the two tables.
///
/// Rows and columns are 1-based and row 1 is the header, so the first data
/// row is row 2. There is no transactional guarantee between calls.
pub trait TableStore {
    /// All data rows in storage order, header excluded.
    fn list_rows(&self, table: Table) -> Result<Vec<Row>>;
    fn append_row(&self, table: Table, row: Row) -> Result<()>;
    fn set_cell(&self, table: Table, row: usize, column: usize, value: &str) -> Result<()>;
    fn delete_row(&self, table: Table, row: usize) -> Result<()>;
}

/// Pads or truncates `row` to the table's width.
pub(crate) fn fit_row(table: Table, mut row: Row) -> Row {
    row.resize(table.columns().len(), String::new());
    row
}
