//! Human-readable status lines printed by the CLI.

use clients_core::{CustomerId, CustomerRow, CustomerWithPhones};

pub fn table_created(table: &str) -> String {
    format!("{table} table created successfully.")
}

pub fn customer_added(id: CustomerId) -> String {
    format!("Customer added with ID: {id}")
}

pub fn phone_added(customer_id: CustomerId) -> String {
    format!("Phone added for customer ID: {customer_id}")
}

pub fn customer_updated(id: CustomerId, changed: usize) -> String {
    if changed == 0 {
        format!("No customer with ID {id}; nothing updated.")
    } else {
        format!("Customer with ID {id} updated.")
    }
}

pub fn phone_removed(customer_id: CustomerId, changed: usize) -> String {
    if changed == 0 {
        format!("No matching phone for customer ID: {customer_id}")
    } else {
        format!("Phone removed for customer ID: {customer_id}")
    }
}

pub fn customer_removed(id: CustomerId, changed: usize) -> String {
    if changed == 0 {
        format!("No customer with ID {id}; nothing removed.")
    } else {
        format!("Customer with ID {id} removed.")
    }
}

pub fn not_found(term: &str) -> String {
    format!("Customer not found: {term}")
}

/// One `Customer found` line per row, followed by its phone when present.
pub fn found_lines(rows: &[CustomerRow]) -> Vec<String> {
    let mut lines = Vec::new();
    for row in rows {
        lines.push(format!(
            "Customer found: {}, Email: {}",
            row.customer.full_name(),
            row.customer.email
        ));
        if let Some(phone) = &row.phone_number {
            lines.push(format!("Phone: {phone}"));
        }
    }
    lines
}

/// One `ID:` line per customer, followed by one `Phone:` line per phone.
pub fn list_lines(groups: &[CustomerWithPhones]) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        let customer = &group.customer;
        lines.push(format!(
            "ID: {}, Name: {}, Email: {}",
            customer.id,
            customer.full_name(),
            customer.email
        ));
        lines.extend(group.phones.iter().map(|phone| format!("Phone: {phone}")));
    }
    lines
}
