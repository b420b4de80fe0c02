//! Customer repository backed by the `customers` table.
//!
//! Calendar dates are stored as ISO-8601 text and membership levels by their
//! canonical name; both are parsed back strictly on read.

use super::{
    age_from_db, log_repo_error, map_insert_error, update_outcome, RecordRepository, RepoError,
    RepoResult, SaveOutcome, UpdateOutcome,
};
use crate::db::StorageHandle;
use crate::model::{Customer, MembershipLevel};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const ENTITY: &str = "customer";
const DATE_FORMAT: &str = "%Y-%m-%d";

const CUSTOMER_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    membershipLevel,
    lastPurchaseDate
FROM customers";

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'h> {
    conn: &'h Connection,
}

impl<'h> SqliteCustomerRepository<'h> {
    pub fn new(handle: &'h StorageHandle) -> Self {
        Self { conn: handle.conn() }
    }

    fn find_by_id_inner(&self, id: &str) -> RepoResult<Customer> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_customer_row(row),
            None => Err(RepoError::NotFound {
                entity: ENTITY,
                key: id.to_string(),
            }),
        }
    }

    fn find_all_inner(&self) -> RepoResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }
        Ok(customers)
    }

    fn save_inner(&self, customer: &Customer) -> RepoResult<SaveOutcome> {
        self.conn
            .execute(
                "INSERT INTO customers (id, name, age, membershipLevel, lastPurchaseDate)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    customer.id.as_str(),
                    customer.name.as_str(),
                    i64::from(customer.age),
                    customer.membership_level.as_str(),
                    date_to_db(customer.last_purchase_date),
                ],
            )
            .map_err(|err| map_insert_error(err, ENTITY, &customer.id))?;
        Ok(SaveOutcome::Inserted)
    }

    fn update_inner(&self, customer: &Customer) -> RepoResult<UpdateOutcome> {
        let changed = self.conn.execute(
            "UPDATE customers
             SET
                name = ?1,
                age = ?2,
                membershipLevel = ?3,
                lastPurchaseDate = ?4
             WHERE id = ?5;",
            params![
                customer.name.as_str(),
                i64::from(customer.age),
                customer.membership_level.as_str(),
                date_to_db(customer.last_purchase_date),
                customer.id.as_str(),
            ],
        )?;
        Ok(update_outcome(changed, ENTITY, &customer.id))
    }

    fn delete_inner(&self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1;", [id])?;
        Ok(changed == 1)
    }
}

impl RecordRepository<Customer> for SqliteCustomerRepository<'_> {
    fn find_by_id(&self, id: &str) -> RepoResult<Customer> {
        self.find_by_id_inner(id)
            .inspect_err(|err| log_repo_error("find_by_id", ENTITY, err))
    }

    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        self.find_all_inner()
            .inspect_err(|err| log_repo_error("find_all", ENTITY, err))
    }

    fn save(&self, entity: &Customer) -> RepoResult<SaveOutcome> {
        self.save_inner(entity)
            .inspect_err(|err| log_repo_error("save", ENTITY, err))
    }

    fn update(&self, entity: &Customer) -> RepoResult<UpdateOutcome> {
        self.update_inner(entity)
            .inspect_err(|err| log_repo_error("update", ENTITY, err))
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        self.delete_inner(id)
            .inspect_err(|err| log_repo_error("delete", ENTITY, err))
    }
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let level_text: String = row.get("membershipLevel")?;
    let membership_level = level_text.parse::<MembershipLevel>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid membership level `{level_text}` in customers.membershipLevel"
        ))
    })?;

    let date_text: String = row.get("lastPurchaseDate")?;
    let last_purchase_date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in customers.lastPurchaseDate"
        ))
    })?;

    Ok(Customer {
        id: row.get("id")?,
        name: row.get("name")?,
        age: age_from_db(row.get("age")?, "customers")?,
        membership_level,
        last_purchase_date,
    })
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
