//! Customer/phone domain model.
//!
//! # Responsibility
//! - Define the records the store writes and the read models it returns.
//!
//! # Invariants
//! - Identifiers are assigned by the database and never reused.
//! - A phone belongs to exactly one customer.

pub mod customer;
