//! Customer and phone records plus joined read models.
//!
//! # Responsibility
//! - Carry customer/phone data between the repository and its callers.
//! - Fold one-row-per-phone join results into per-customer groups.
//!
//! # Invariants
//! - `CustomerRow` mirrors one row of `customers LEFT JOIN phones`.
//! - Grouping preserves input order and only merges adjacent rows.

use serde::{Deserialize, Serialize};

/// Database-assigned customer identifier.
pub type CustomerId = i64;

/// Database-assigned phone identifier.
pub type PhoneId = i64;

/// Persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all customers.
    pub email: String,
}

impl Customer {
    /// `"{first_name} {last_name}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Persisted phone record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: PhoneId,
    pub customer_id: CustomerId,
    pub phone_number: String,
}

/// One row of the customer/phone left join.
///
/// Customers without phones appear once with `phone_number = None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub customer: Customer,
    pub phone_number: Option<String>,
}

/// A customer with all of its phone numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerWithPhones {
    pub customer: Customer,
    pub phones: Vec<String>,
}

/// Result of an exact-match customer search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<CustomerRow>),
    NotFound,
}

impl SearchOutcome {
    pub fn from_rows(rows: Vec<CustomerRow>) -> Self {
        if rows.is_empty() {
            Self::NotFound
        } else {
            Self::Found(rows)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Matching rows; empty for `NotFound`.
    pub fn rows(&self) -> &[CustomerRow] {
        match self {
            Self::Found(rows) => rows,
            Self::NotFound => &[],
        }
    }
}

/// Folds join rows into per-customer groups.
///
/// Rows must already be ordered so that rows of one customer are adjacent,
/// which holds for every query ordered by customer id.
pub fn group_rows(rows: impl IntoIterator<Item = CustomerRow>) -> Vec<CustomerWithPhones> {
    let mut groups: Vec<CustomerWithPhones> = Vec::new();

    for row in rows {
        match groups.last_mut() {
            Some(group) if group.customer.id == row.customer.id => {
                group.phones.extend(row.phone_number);
            }
            _ => groups.push(CustomerWithPhones {
                customer: row.customer,
                phones: row.phone_number.into_iter().collect(),
            }),
        }
    }

    groups
}
