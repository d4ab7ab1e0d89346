use crate::app::{Result, StackdockError};
use crate::store::{MemoryTableStore, Row, Table, TableStore};

/// A memory store whose cell writes to one physical row always fail.
pub struct FailingStore {
    inner: MemoryTableStore,
    table: Table,
    row: usize,
}

impl FailingStore {
    pub fn failing_on(table: Table, row: usize) -> Self {
        Self {
            inner: MemoryTableStore::new(),
            table,
            row,
        }
    }

    pub fn inner(&self) -> &MemoryTableStore {
        &self.inner
    }
}

impl TableStore for FailingStore {
    fn list_rows(&self, table: Table) -> Result<Vec<Row>> {
        self.inner.list_rows(table)
    }

    fn append_row(&self, table: Table, row: Row) -> Result<()> {
        self.inner.append_row(table, row)
    }

    fn set_cell(&self, table: Table, row: usize, column: usize, value: &str) -> Result<()> {
        if table == self.table && row == self.row {
            return Err(StackdockError::Other("disk full".into()));
        }
        self.inner.set_cell(table, row, column, value)
    }

    fn delete_row(&self, table: Table, row: usize) -> Result<()> {
        self.inner.delete_row(table, row)
    }
}
