//! Table definitions for customers and their phones.
//!
//! # Invariants
//! - `customers` must exist before `phones` (foreign key target).
//! - Declared `VARCHAR(n)` widths are enforced by `CHECK` constraints,
//!   since SQLite does not enforce them on its own.
//! - `AUTOINCREMENT` keeps ids monotonic; deleted ids are never reused.

use rusqlite::Connection;

/// `customers(id, first_name, last_name, email UNIQUE)`.
pub const CUSTOMERS_TABLE_SQL: &str = include_str!("customers.sql");

/// `phones(id, customer_id -> customers ON DELETE CASCADE, phone_number)`.
pub const PHONES_TABLE_SQL: &str = include_str!("phones.sql");

pub const CUSTOMERS_TABLE: &str = "customers";
pub const PHONES_TABLE: &str = "phones";

/// Returns whether a table with `name` exists in the main schema.
pub fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Reads `PRAGMA foreign_keys` for this connection.
pub fn foreign_keys_enabled(conn: &Connection) -> rusqlite::Result<bool> {
    let enabled: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    Ok(enabled == 1)
}
