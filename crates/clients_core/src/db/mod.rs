//! SQLite storage bootstrap and schema definitions.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the customer store.
//! - Own the `customers`/`phones` table definitions.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON`; phone ownership and
//!   cascading delete depend on it.
//! - Schema creation is create-if-absent and safe to repeat.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_database, open_db, open_db_in_memory, MEMORY_TARGET};

pub type DbResult<T> = Result<T, DbError>;

/// Connection-level failure: the database cannot be opened or used.
#[derive(Debug)]
pub enum DbError {
    Open {
        target: String,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "failed to open database `{target}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
