//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract of the customer store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs separate constraint violations from transport errors.
//! - A search miss is an empty result, never an error.

pub mod customer_repo;
