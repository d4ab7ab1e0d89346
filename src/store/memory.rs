use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::app::{Result, StackdockError};
use crate::store::{fit_row, Row, Table, TableStore, HEADER_ROW};

/// Tables held in memory, header included as the first row of each sheet.
pub struct MemoryTableStore {
    sheets: Mutex<HashMap<Table, Vec<Row>>>,
}

impl Default for MemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTableStore {
    pub fn new() -> Self {
        let sheets = Table::ALL
            .into_iter()
            .map(|table| {
                let header = table.columns().iter().map(|c| c.to_string()).collect();
                (table, vec![header])
            })
            .collect();

        Self {
            sheets: Mutex::new(sheets),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Table, Vec<Row>>>> {
        self.sheets
            .lock()
            .map_err(|e| StackdockError::Other(format!("Table store poisoned: {}", e)))
    }

    /// Converts a physical row number into an index into the sheet vector,
    /// refusing the header and anything past the last row.
    fn data_slot(table: Table, sheet: &[Row], row: usize) -> Result<usize> {
        if row <= HEADER_ROW || row > sheet.len() {
            return Err(StackdockError::RowOutOfRange { table, row });
        }
        Ok(row - 1)
    }
}

impl TableStore for MemoryTableStore {
    fn list_rows(&self, table: Table) -> Result<Vec<Row>> {
        let sheets = self.lock()?;
        let rows = sheets
            .get(&table)
            .map(|sheet| sheet.iter().skip(HEADER_ROW).cloned().collect())
            .unwrap_or_default();
        Ok(rows)
    }

    fn append_row(&self, table: Table, row: Row) -> Result<()> {
        let mut sheets = self.lock()?;
        sheets.entry(table).or_default().push(fit_row(table, row));
        Ok(())
    }

    fn set_cell(&self, table: Table, row: usize, column: usize, value: &str) -> Result<()> {
        if column == 0 || column > table.columns().len() {
            return Err(StackdockError::ColumnOutOfRange { table, column });
        }

        let mut sheets = self.lock()?;
        let sheet = sheets.entry(table).or_default();
        let slot = Self::data_slot(table, sheet, row)?;
        sheet[slot][column - 1] = value.to_string();
        Ok(())
    }

    fn delete_row(&self, table: Table, row: usize) -> Result<()> {
        let mut sheets = self.lock()?;
        let sheet = sheets.entry(table).or_default();
        let slot = Self::data_slot(table, sheet, row)?;
        sheet.remove(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_row(url: &str) -> Row {
        vec![url.to_string(), String::new()]
    }

    #[test]
    fn test_header_is_not_listed() {
        let store = MemoryTableStore::new();
        assert!(store.list_rows(Table::Articles).unwrap().is_empty());
        assert!(store.list_rows(Table::Feeds).unwrap().is_empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let store = MemoryTableStore::new();
        store.append_row(Table::Feeds, feed_row("a")).unwrap();
        store.append_row(Table::Feeds, feed_row("b")).unwrap();

        let rows = store.list_rows(Table::Feeds).unwrap();
        assert_eq!(rows[0][0], "a");
        assert_eq!(rows[1][0], "b");
    }

    #[test]
    fn test_set_cell_uses_physical_rows() {
        let store = MemoryTableStore::new();
        store.append_row(Table::Feeds, feed_row("a")).unwrap();
        store.append_row(Table::Feeds, feed_row("b")).unwrap();

        store.set_cell(Table::Feeds, 3, 2, "checked").unwrap();

        let rows = store.list_rows(Table::Feeds).unwrap();
        assert_eq!(rows[0][1], "");
        assert_eq!(rows[1][1], "checked");
    }

    #[test]
    fn test_header_and_out_of_range_rejected() {
        let store = MemoryTableStore::new();
        store.append_row(Table::Feeds, feed_row("a")).unwrap();

        assert!(matches!(
            store.set_cell(Table::Feeds, 1, 1, "x"),
            Err(StackdockError::RowOutOfRange { row: 1, .. })
        ));
        assert!(matches!(
            store.delete_row(Table::Feeds, 3),
            Err(StackdockError::RowOutOfRange { row: 3, .. })
        ));
        assert!(matches!(
            store.set_cell(Table::Feeds, 2, 3, "x"),
            Err(StackdockError::ColumnOutOfRange { column: 3, .. })
        ));
    }

    #[test]
    fn test_delete_row_shifts_following_rows() {
        let store = MemoryTableStore::new();
        for url in ["a", "b", "c"] {
            store.append_row(Table::Feeds, feed_row(url)).unwrap();
        }

        store.delete_row(Table::Feeds, 3).unwrap();

        let urls: Vec<_> = store
            .list_rows(Table::Feeds)
            .unwrap()
            .into_iter()
            .map(|r| r[0].clone())
            .collect();
        assert_eq!(urls, vec!["a", "c"]);
    }
}
