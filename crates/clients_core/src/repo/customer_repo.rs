//! Customer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide schema setup and CRUD/search APIs over `customers`/`phones`.
//! - Keep SQL details inside the core persistence boundary.
//! - Translate SQLite constraint failures into semantic error kinds.
//!
//! # Invariants
//! - Every operation runs inside its own transaction: commit on success,
//!   rollback on every error path. No transaction outlives a call.
//! - Writes never check affected-row counts for existence; callers get the
//!   count back and decide.
//! - Search is exact, case-sensitive equality OR-combined over first name,
//!   last name, email and phone number.

use crate::db::schema::{foreign_keys_enabled, CUSTOMERS_TABLE_SQL, PHONES_TABLE_SQL};
use crate::db::DbError;
use crate::model::customer::{Customer, CustomerId, CustomerRow, Phone, PhoneId};
use log::{debug, error, info, warn};
use rusqlite::ffi;
use rusqlite::{params, Connection, ErrorCode, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CUSTOMER_ROW_SELECT_SQL: &str = "SELECT
    c.id,
    c.first_name,
    c.last_name,
    c.email,
    p.phone_number
FROM customers c
LEFT JOIN phones p ON c.id = p.customer_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Which database constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Duplicate value in a `UNIQUE` column (customer email).
    Unique,
    /// Reference to a customer that does not exist.
    ForeignKey,
    /// Value wider than the declared column length.
    Check,
    NotNull,
    PrimaryKey,
    Other,
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::Check => "check",
            Self::NotNull => "not null",
            Self::PrimaryKey => "primary key",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Repository error for customer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Constraint {
        kind: ConstraintKind,
        message: String,
    },
    ForeignKeysDisabled,
    InvalidData(String),
}

impl RepoError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Constraint { .. })
    }

    /// Constraint kind when this error is a constraint violation.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_error",
            Self::Constraint { .. } => "constraint_violation",
            Self::ForeignKeysDisabled => "foreign_keys_disabled",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Constraint { kind, message } => {
                write!(f, "{kind} constraint violation: {message}")
            }
            Self::ForeignKeysDisabled => {
                write!(f, "connection does not enforce foreign keys (PRAGMA foreign_keys = OFF)")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted customer data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Constraint { .. } => None,
            Self::ForeignKeysDisabled => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match constraint_kind_of(&value) {
            Some(kind) => Self::Constraint {
                kind,
                message: value.to_string(),
            },
            None => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Repository interface for customer/phone operations.
pub trait CustomerRepository {
    fn create_customer_table(&self) -> RepoResult<()>;
    fn create_phone_table(&self) -> RepoResult<()>;
    fn add_customer(&self, first_name: &str, last_name: &str, email: &str)
        -> RepoResult<CustomerId>;
    fn add_phone(&self, customer_id: CustomerId, phone_number: &str) -> RepoResult<PhoneId>;
    /// Overwrites all mutable fields. Returns affected rows (0 or 1).
    fn update_customer(
        &self,
        id: CustomerId,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepoResult<usize>;
    /// Deletes every phone row matching both fields. Returns affected rows.
    fn remove_phone(&self, customer_id: CustomerId, phone_number: &str) -> RepoResult<usize>;
    /// Deletes a customer and, by cascade, its phones. Returns affected rows.
    fn remove_customer(&self, id: CustomerId) -> RepoResult<usize>;
    fn find_customer(&self, term: &str) -> RepoResult<Vec<CustomerRow>>;
    fn list_customers(&self) -> RepoResult<Vec<CustomerRow>>;
    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    fn list_phones(&self, customer_id: CustomerId) -> RepoResult<Vec<Phone>>;
}

/// SQLite-backed customer repository over one borrowed connection.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a connection that enforces foreign keys.
    ///
    /// Connections from `db::open_*` always qualify. Connections that ran
    /// `PRAGMA foreign_keys = OFF` are rejected.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !foreign_keys_enabled(conn)? {
            return Err(RepoError::ForeignKeysDisabled);
        }
        Ok(Self { conn })
    }

    /// Runs `op` inside a transaction scoped to this call.
    ///
    /// Commits when `op` succeeds. On error the transaction is dropped, which
    /// rolls it back.
    fn with_transaction<T>(
        &self,
        event: &'static str,
        behavior: TransactionBehavior,
        op: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let result = Transaction::new_unchecked(self.conn, behavior)
            .map_err(RepoError::from)
            .and_then(|tx| {
                let value = op(&tx)?;
                tx.commit()?;
                Ok(value)
            });

        if let Err(err) = &result {
            error!(
                "event={event} module=repo status=error error_code={} error={}",
                err.error_code(),
                err
            );
        }
        result
    }

    fn write<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        self.with_transaction(event, TransactionBehavior::Immediate, op)
    }

    fn read<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        self.with_transaction(event, TransactionBehavior::Deferred, op)
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn create_customer_table(&self) -> RepoResult<()> {
        self.write("customer_table_create", |tx| {
            tx.execute_batch(CUSTOMERS_TABLE_SQL)?;
            Ok(())
        })?;
        info!("event=customer_table_create module=repo status=ok");
        Ok(())
    }

    fn create_phone_table(&self) -> RepoResult<()> {
        self.write("phone_table_create", |tx| {
            tx.execute_batch(PHONES_TABLE_SQL)?;
            Ok(())
        })?;
        info!("event=phone_table_create module=repo status=ok");
        Ok(())
    }

    fn add_customer(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepoResult<CustomerId> {
        let id = self.write("customer_add", |tx| {
            tx.execute(
                "INSERT INTO customers (first_name, last_name, email)
                 VALUES (?1, ?2, ?3);",
                params![first_name, last_name, email],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        info!("event=customer_add module=repo status=ok customer_id={id}");
        Ok(id)
    }

    fn add_phone(&self, customer_id: CustomerId, phone_number: &str) -> RepoResult<PhoneId> {
        let id = self.write("phone_add", |tx| {
            tx.execute(
                "INSERT INTO phones (customer_id, phone_number)
                 VALUES (?1, ?2);",
                params![customer_id, phone_number],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        info!("event=phone_add module=repo status=ok customer_id={customer_id} phone_id={id}");
        Ok(id)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepoResult<usize> {
        let changed = self.write("customer_update", |tx| {
            Ok(tx.execute(
                "UPDATE customers
                 SET first_name = ?1, last_name = ?2, email = ?3
                 WHERE id = ?4;",
                params![first_name, last_name, email, id],
            )?)
        })?;
        log_write_outcome("customer_update", id, changed);
        Ok(changed)
    }

    fn remove_phone(&self, customer_id: CustomerId, phone_number: &str) -> RepoResult<usize> {
        let changed = self.write("phone_remove", |tx| {
            Ok(tx.execute(
                "DELETE FROM phones WHERE customer_id = ?1 AND phone_number = ?2;",
                params![customer_id, phone_number],
            )?)
        })?;
        log_write_outcome("phone_remove", customer_id, changed);
        Ok(changed)
    }

    fn remove_customer(&self, id: CustomerId) -> RepoResult<usize> {
        let changed = self.write("customer_remove", |tx| {
            Ok(tx.execute("DELETE FROM customers WHERE id = ?1;", [id])?)
        })?;
        log_write_outcome("customer_remove", id, changed);
        Ok(changed)
    }

    fn find_customer(&self, term: &str) -> RepoResult<Vec<CustomerRow>> {
        let rows = self.read("customer_find", |tx| {
            let mut stmt = tx.prepare(&format!(
                "{CUSTOMER_ROW_SELECT_SQL}
                 WHERE c.first_name = ?1
                    OR c.last_name = ?1
                    OR c.email = ?1
                    OR p.phone_number = ?1
                 ORDER BY c.id ASC, p.id ASC;"
            ))?;
            let mut rows = stmt.query([term])?;
            collect_customer_rows(&mut rows)
        })?;
        debug!("event=customer_find module=repo status=ok rows={}", rows.len());
        Ok(rows)
    }

    fn list_customers(&self) -> RepoResult<Vec<CustomerRow>> {
        let rows = self.read("customer_list", |tx| {
            let mut stmt = tx.prepare(&format!(
                "{CUSTOMER_ROW_SELECT_SQL}
                 ORDER BY c.id ASC, p.id ASC;"
            ))?;
            let mut rows = stmt.query([])?;
            collect_customer_rows(&mut rows)
        })?;
        debug!("event=customer_list module=repo status=ok rows={}", rows.len());
        Ok(rows)
    }

    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        self.read("customer_get", |tx| {
            let mut stmt = tx.prepare(
                "SELECT id, first_name, last_name, email
                 FROM customers
                 WHERE id = ?1;",
            )?;
            let mut rows = stmt.query([id])?;
            let customer = match rows.next()? {
                Some(row) => Some(parse_customer(row)?),
                None => None,
            };
            Ok(customer)
        })
    }

    fn list_phones(&self, customer_id: CustomerId) -> RepoResult<Vec<Phone>> {
        self.read("phone_list", |tx| {
            let mut stmt = tx.prepare(
                "SELECT id, customer_id, phone_number
                 FROM phones
                 WHERE customer_id = ?1
                 ORDER BY id ASC;",
            )?;
            let mut rows = stmt.query([customer_id])?;
            let mut phones = Vec::new();
            while let Some(row) = rows.next()? {
                phones.push(Phone {
                    id: row.get("id")?,
                    customer_id: row.get("customer_id")?,
                    phone_number: required_text(row, "phone_number")?,
                });
            }
            Ok(phones)
        })
    }
}

fn log_write_outcome(event: &str, id: CustomerId, changed: usize) {
    if changed == 0 {
        warn!("event={event} module=repo status=noop customer_id={id} affected=0");
    } else {
        info!("event={event} module=repo status=ok customer_id={id} affected={changed}");
    }
}

fn collect_customer_rows(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<CustomerRow>> {
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        result.push(CustomerRow {
            customer: parse_customer(row)?,
            phone_number: row.get("phone_number")?,
        });
    }
    Ok(result)
}

fn parse_customer(row: &Row<'_>) -> RepoResult<Customer> {
    Ok(Customer {
        id: row.get("id")?,
        first_name: required_text(row, "first_name")?,
        last_name: required_text(row, "last_name")?,
        email: required_text(row, "email")?,
    })
}

// Columns are nullable in the schema; the store never writes NULL into them.
fn required_text(row: &Row<'_>, column: &'static str) -> RepoResult<String> {
    row.get::<_, Option<String>>(column)?
        .ok_or_else(|| RepoError::InvalidData(format!("unexpected NULL in column `{column}`")))
}

fn constraint_kind_of(err: &rusqlite::Error) -> Option<ConstraintKind> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }

    let kind = match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
        ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
        ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
        _ => ConstraintKind::Other,
    };
    Some(kind)
}
