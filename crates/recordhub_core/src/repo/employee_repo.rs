//! Employee repository backed by the `employees` table.

use super::{
    age_from_db, log_repo_error, map_insert_error, update_outcome, RecordRepository, RepoError,
    RepoResult, SaveOutcome, UpdateOutcome,
};
use crate::db::StorageHandle;
use crate::model::Employee;
use rusqlite::{params, Connection, Row};

const ENTITY: &str = "employee";

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    salary,
    jobTitle
FROM employees";

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'h> {
    conn: &'h Connection,
}

impl<'h> SqliteEmployeeRepository<'h> {
    pub fn new(handle: &'h StorageHandle) -> Self {
        Self { conn: handle.conn() }
    }

    fn find_by_id_inner(&self, id: &str) -> RepoResult<Employee> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_employee_row(row),
            None => Err(RepoError::NotFound {
                entity: ENTITY,
                key: id.to_string(),
            }),
        }
    }

    fn find_all_inner(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn save_inner(&self, employee: &Employee) -> RepoResult<SaveOutcome> {
        self.conn
            .execute(
                "INSERT INTO employees (id, name, age, salary, jobTitle)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    employee.id.as_str(),
                    employee.name.as_str(),
                    i64::from(employee.age),
                    employee.salary,
                    employee.job_title.as_str(),
                ],
            )
            .map_err(|err| map_insert_error(err, ENTITY, &employee.id))?;
        Ok(SaveOutcome::Inserted)
    }

    fn update_inner(&self, employee: &Employee) -> RepoResult<UpdateOutcome> {
        let changed = self.conn.execute(
            "UPDATE employees
             SET
                name = ?1,
                age = ?2,
                salary = ?3,
                jobTitle = ?4
             WHERE id = ?5;",
            params![
                employee.name.as_str(),
                i64::from(employee.age),
                employee.salary,
                employee.job_title.as_str(),
                employee.id.as_str(),
            ],
        )?;
        Ok(update_outcome(changed, ENTITY, &employee.id))
    }

    fn delete_inner(&self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        Ok(changed == 1)
    }
}

impl RecordRepository<Employee> for SqliteEmployeeRepository<'_> {
    fn find_by_id(&self, id: &str) -> RepoResult<Employee> {
        self.find_by_id_inner(id)
            .inspect_err(|err| log_repo_error("find_by_id", ENTITY, err))
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        self.find_all_inner()
            .inspect_err(|err| log_repo_error("find_all", ENTITY, err))
    }

    fn save(&self, entity: &Employee) -> RepoResult<SaveOutcome> {
        self.save_inner(entity)
            .inspect_err(|err| log_repo_error("save", ENTITY, err))
    }

    fn update(&self, entity: &Employee) -> RepoResult<UpdateOutcome> {
        self.update_inner(entity)
            .inspect_err(|err| log_repo_error("update", ENTITY, err))
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        self.delete_inner(id)
            .inspect_err(|err| log_repo_error("delete", ENTITY, err))
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        age: age_from_db(row.get("age")?, "employees")?,
        salary: row.get("salary")?,
        job_title: row.get("jobTitle")?,
    })
}
