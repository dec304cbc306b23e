//! Subcommand execution against an open customer store.

use crate::cli::Command;
use crate::report;
use anyhow::{Context, Result};
use clients_core::{CustomerRepository, CustomerStore, SearchOutcome};
use std::io::Write;

const DEMO_JOHN: (&str, &str, &str) = ("John", "Doe", "john.doe@example.com");
const DEMO_JANE: (&str, &str, &str) = ("Jane", "Smith", "jane.smith@example.com");
const DEMO_JOHN_NEW_EMAIL: &str = "john.doe@newdomain.com";
const DEMO_JOHN_PHONES: [&str; 2] = ["+1234567890", "+0987654321"];
const DEMO_JANE_PHONE: &str = "+1122334455";

/// Status lines go to `out`; informational misses go to `err`.
pub fn execute<R, O, E>(
    command: &Command,
    store: &CustomerStore<R>,
    out: &mut O,
    err: &mut E,
) -> Result<()>
where
    R: CustomerRepository,
    O: Write,
    E: Write,
{
    match command {
        Command::Demo => run_demo(store, out, err),
        Command::Init => create_tables(store, out),
        Command::Add {
            first_name,
            last_name,
            email,
        } => {
            store.create_schema()?;
            let id = store
                .add_customer(first_name, last_name, email)
                .context("failed to add customer")?;
            writeln!(out, "{}", report::customer_added(id))?;
            Ok(())
        }
        Command::AddPhone {
            customer_id,
            phone_number,
        } => {
            store.create_schema()?;
            store
                .add_phone(*customer_id, phone_number)
                .with_context(|| format!("failed to add phone for customer {customer_id}"))?;
            writeln!(out, "{}", report::phone_added(*customer_id))?;
            Ok(())
        }
        Command::Update {
            id,
            first_name,
            last_name,
            email,
        } => {
            store.create_schema()?;
            let changed = store
                .update_customer(*id, first_name, last_name, email)
                .with_context(|| format!("failed to update customer {id}"))?;
            writeln!(out, "{}", report::customer_updated(*id, changed))?;
            Ok(())
        }
        Command::RemovePhone {
            customer_id,
            phone_number,
        } => {
            store.create_schema()?;
            let changed = store
                .remove_phone(*customer_id, phone_number)
                .with_context(|| format!("failed to remove phone for customer {customer_id}"))?;
            writeln!(out, "{}", report::phone_removed(*customer_id, changed))?;
            Ok(())
        }
        Command::Remove { id } => {
            store.create_schema()?;
            let changed = store
                .remove_customer(*id)
                .with_context(|| format!("failed to remove customer {id}"))?;
            writeln!(out, "{}", report::customer_removed(*id, changed))?;
            Ok(())
        }
        Command::Find { term } => {
            store.create_schema()?;
            print_search(store, term, out, err)
        }
        Command::List => {
            store.create_schema()?;
            print_list(store, out)
        }
    }
}

/// Fixed demonstration sequence. Stops at the first failing step.
fn run_demo<R, O, E>(store: &CustomerStore<R>, out: &mut O, err: &mut E) -> Result<()>
where
    R: CustomerRepository,
    O: Write,
    E: Write,
{
    create_tables(store, out)?;

    let (first, last, email) = DEMO_JOHN;
    let john = store
        .add_customer(first, last, email)
        .context("failed to add customer")?;
    writeln!(out, "{}", report::customer_added(john))?;

    let (first, last, email) = DEMO_JANE;
    let jane = store
        .add_customer(first, last, email)
        .context("failed to add customer")?;
    writeln!(out, "{}", report::customer_added(jane))?;

    for (customer_id, phone) in [
        (john, DEMO_JOHN_PHONES[0]),
        (john, DEMO_JOHN_PHONES[1]),
        (jane, DEMO_JANE_PHONE),
    ] {
        store
            .add_phone(customer_id, phone)
            .with_context(|| format!("failed to add phone for customer {customer_id}"))?;
        writeln!(out, "{}", report::phone_added(customer_id))?;
    }

    let (first, last, _) = DEMO_JOHN;
    let changed = store
        .update_customer(john, first, last, DEMO_JOHN_NEW_EMAIL)
        .with_context(|| format!("failed to update customer {john}"))?;
    writeln!(out, "{}", report::customer_updated(john, changed))?;

    let changed = store
        .remove_phone(john, DEMO_JOHN_PHONES[1])
        .with_context(|| format!("failed to remove phone for customer {john}"))?;
    writeln!(out, "{}", report::phone_removed(john, changed))?;

    print_search(store, DEMO_JANE.2, out, err)?;

    let changed = store
        .remove_customer(jane)
        .with_context(|| format!("failed to remove customer {jane}"))?;
    writeln!(out, "{}", report::customer_removed(jane, changed))?;

    print_list(store, out)
}

fn create_tables<R: CustomerRepository, O: Write>(
    store: &CustomerStore<R>,
    out: &mut O,
) -> Result<()> {
    store
        .create_customer_table()
        .context("failed to create customers table")?;
    writeln!(out, "{}", report::table_created("Customer"))?;
    store
        .create_phone_table()
        .context("failed to create phones table")?;
    writeln!(out, "{}", report::table_created("Phone"))?;
    Ok(())
}

fn print_search<R, O, E>(
    store: &CustomerStore<R>,
    term: &str,
    out: &mut O,
    err: &mut E,
) -> Result<()>
where
    R: CustomerRepository,
    O: Write,
    E: Write,
{
    match store.find_customer(term).context("failed to search customers")? {
        SearchOutcome::Found(rows) => {
            for line in report::found_lines(&rows) {
                writeln!(out, "{line}")?;
            }
        }
        SearchOutcome::NotFound => writeln!(err, "{}", report::not_found(term))?,
    }
    Ok(())
}

fn print_list<R: CustomerRepository, O: Write>(
    store: &CustomerStore<R>,
    out: &mut O,
) -> Result<()> {
    let groups = store.list_customers().context("failed to list customers")?;
    for line in report::list_lines(&groups) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
