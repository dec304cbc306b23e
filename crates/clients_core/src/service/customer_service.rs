//! Customer store use-case service.
//!
//! # Responsibility
//! - Provide the stable customer/phone entry points for core callers.
//! - Shape repository rows into search outcomes and per-customer groups.
//!
//! # Invariants
//! - Service APIs never bypass repository transactions.
//! - Service layer remains storage-agnostic.

use crate::model::customer::{
    group_rows, Customer, CustomerId, CustomerRow, CustomerWithPhones, Phone, PhoneId,
    SearchOutcome,
};
use crate::repo::customer_repo::{CustomerRepository, RepoResult};
use log::info;

/// The customer store: schema setup plus customer/phone CRUD and search.
pub struct CustomerStore<R: CustomerRepository> {
    repo: R,
}

impl<R: CustomerRepository> CustomerStore<R> {
    /// Creates a store over the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates the `customers` table if absent.
    pub fn create_customer_table(&self) -> RepoResult<()> {
        self.repo.create_customer_table()
    }

    /// Creates the `phones` table if absent. Requires `customers`.
    pub fn create_phone_table(&self) -> RepoResult<()> {
        self.repo.create_phone_table()
    }

    /// Creates both tables in dependency order.
    pub fn create_schema(&self) -> RepoResult<()> {
        self.create_customer_table()?;
        self.create_phone_table()?;
        info!("event=schema_create module=service status=ok");
        Ok(())
    }

    /// Inserts a customer and returns its database-assigned id.
    ///
    /// # Errors
    /// - `Unique` constraint violation when `email` is already taken.
    pub fn add_customer(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepoResult<CustomerId> {
        self.repo.add_customer(first_name, last_name, email)
    }

    /// Attaches a phone number to an existing customer.
    ///
    /// # Errors
    /// - `ForeignKey` constraint violation when `customer_id` does not exist.
    pub fn add_phone(&self, customer_id: CustomerId, phone_number: &str) -> RepoResult<PhoneId> {
        self.repo.add_phone(customer_id, phone_number)
    }

    /// Overwrites name and email of customer `id`.
    ///
    /// A missing id is not an error; the returned count is then 0.
    pub fn update_customer(
        &self,
        id: CustomerId,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepoResult<usize> {
        self.repo.update_customer(id, first_name, last_name, email)
    }

    /// Removes every phone of `customer_id` equal to `phone_number`.
    pub fn remove_phone(&self, customer_id: CustomerId, phone_number: &str) -> RepoResult<usize> {
        self.repo.remove_phone(customer_id, phone_number)
    }

    /// Removes customer `id` together with all of its phones.
    pub fn remove_customer(&self, id: CustomerId) -> RepoResult<usize> {
        self.repo.remove_customer(id)
    }

    /// Exact-match search over first name, last name, email and phone.
    ///
    /// Yields one row per matching (customer, phone) pair, or `NotFound`.
    pub fn find_customer(&self, term: &str) -> RepoResult<SearchOutcome> {
        self.repo.find_customer(term).map(SearchOutcome::from_rows)
    }

    /// Lists every customer with its phones, ordered by customer id.
    pub fn list_customers(&self) -> RepoResult<Vec<CustomerWithPhones>> {
        self.repo.list_customers().map(group_rows)
    }

    /// Raw left-join rows behind `list_customers`.
    pub fn list_customer_rows(&self) -> RepoResult<Vec<CustomerRow>> {
        self.repo.list_customers()
    }

    pub fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        self.repo.get_customer(id)
    }

    pub fn list_phones(&self, customer_id: CustomerId) -> RepoResult<Vec<Phone>> {
        self.repo.list_phones(customer_id)
    }
}
