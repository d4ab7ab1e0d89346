use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, StackdockError};
use crate::store::{fit_row, Row, Table, TableStore, HEADER_ROW};

/// Durable table store. Each sheet is a SQLite table whose hidden
/// `position` column keeps rows in insertion order.
pub struct SqliteTableStore {
    conn: Mutex<Connection>,
}

impl SqliteTableStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| StackdockError::Other(format!("Migration failed: {}", e)))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            StackdockError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn sql_table(table: Table) -> &'static str {
        match table {
            Table::Articles => "articles",
            Table::Feeds => "feeds",
        }
    }

    /// Finds the `position` key of a physical (header-inclusive) row.
    fn position_of(conn: &Connection, table: Table, row: usize) -> Result<i64> {
        if row <= HEADER_ROW {
            return Err(StackdockError::RowOutOfRange { table, row });
        }

        let offset = (row - HEADER_ROW - 1) as i64;
        let sql = format!(
            "SELECT position FROM {} ORDER BY position LIMIT 1 OFFSET ?1",
            Self::sql_table(table)
        );

        conn.query_row(&sql, params![offset], |r| r.get(0))
            .optional()?
            .ok_or(StackdockError::RowOutOfRange { table, row })
    }
}

impl TableStore for SqliteTableStore {
    fn list_rows(&self, table: Table) -> Result<Vec<Row>> {
        let conn = self.conn()?;
        let columns = table.columns();

        let sql = format!(
            "SELECT {} FROM {} ORDER BY position",
            columns.join(", "),
            Self::sql_table(table)
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], |r| {
                (0..columns.len())
                    .map(|i| r.get::<_, String>(i))
                    .collect::<std::result::Result<Row, _>>()
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn append_row(&self, table: Table, row: Row) -> Result<()> {
        let conn = self.conn()?;
        let columns = table.columns();

        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            Self::sql_table(table),
            columns.join(", "),
            placeholders
        );

        conn.execute(&sql, params_from_iter(fit_row(table, row)))?;
        Ok(())
    }

    fn set_cell(&self, table: Table, row: usize, column: usize, value: &str) -> Result<()> {
        let name = column
            .checked_sub(1)
            .and_then(|i| table.columns().get(i))
            .ok_or(StackdockError::ColumnOutOfRange { table, column })?;

        let conn = self.conn()?;
        let position = Self::position_of(&conn, table, row)?;

        let sql = format!(
            "UPDATE {} SET {} = ?1 WHERE position = ?2",
            Self::sql_table(table),
            name
        );
        conn.execute(&sql, params![value, position])?;
        Ok(())
    }

    fn delete_row(&self, table: Table, row: usize) -> Result<()> {
        let conn = self.conn()?;
        let position = Self::position_of(&conn, table, row)?;

        let sql = format!("DELETE FROM {} WHERE position = ?1", Self::sql_table(table));
        conn.execute(&sql, params![position])?;
        Ok(())
    }
}
