//! Database operations for monthly budget records.

use rusqlite::{Connection, Row, params, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    budget::{BudgetRecord, BudgetStatus, ExpenseBreakdown, NewBudgetRecord},
};

/// Initialize the budget record table and indexes.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget_record (
            id INTEGER PRIMARY KEY,
            month TEXT NOT NULL,
            income INTEGER NOT NULL,
            house_rent INTEGER NOT NULL,
            food_costs INTEGER NOT NULL,
            electricity INTEGER NOT NULL,
            gas INTEGER NOT NULL,
            water INTEGER NOT NULL,
            misc INTEGER NOT NULL,
            real_expense INTEGER NOT NULL,
            predicted_baseline INTEGER NOT NULL,
            account_balance INTEGER NOT NULL,
            savings_balance INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_budget_record_month ON budget_record(month);",
    )?;

    Ok(())
}

/// Persist a new budget record and return it with its generated ID and
/// timestamps.
///
/// This is the only write path: records are never updated afterwards, so
/// `updated_at` is stamped with the same instant as `created_at`.
pub fn insert_budget_record(
    record: NewBudgetRecord,
    connection: &Connection,
) -> Result<BudgetRecord, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO budget_record (
            month, income, house_rent, food_costs, electricity, gas, water,
            misc, real_expense, predicted_baseline, account_balance,
            savings_balance, status, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
        params![
            record.month,
            record.income,
            record.expenses.house_rent,
            record.expenses.food_costs,
            record.expenses.electricity,
            record.expenses.gas,
            record.expenses.water,
            record.expenses.misc,
            record.real_expense,
            record.predicted_baseline,
            record.account_balance,
            record.savings_balance,
            record.status.as_str(),
            now,
            now,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(BudgetRecord {
        id,
        month: record.month,
        income: record.income,
        expenses: record.expenses,
        real_expense: record.real_expense,
        predicted_baseline: record.predicted_baseline,
        account_balance: record.account_balance,
        savings_balance: record.savings_balance,
        status: record.status,
        created_at: now,
        updated_at: now,
    })
}

const SELECT_COLUMNS: &str = "SELECT id, month, income, house_rent, food_costs, electricity, \
     gas, water, misc, real_expense, predicted_baseline, account_balance, \
     savings_balance, status, created_at, updated_at FROM budget_record";

/// Retrieve budget records ordered by creation time, oldest first.
///
/// `month` filters on an exact label match; `None` retrieves every record.
pub fn get_budget_records(
    month: Option<&str>,
    connection: &Connection,
) -> Result<Vec<BudgetRecord>, Error> {
    let query = format!("{SELECT_COLUMNS} WHERE (:month IS NULL OR month = :month) ORDER BY created_at ASC, id ASC;");

    connection
        .prepare(&query)?
        .query_map(&[(":month", &month)], map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the most recently created budget record, if any exist.
pub fn get_latest_budget_record(connection: &Connection) -> Result<Option<BudgetRecord>, Error> {
    let query = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT 1;");

    match connection.prepare(&query)?.query_row([], map_row) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Retrieve the distinct month labels across all records, used to populate
/// the dashboard filter.
pub fn get_distinct_months(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT DISTINCT month FROM budget_record ORDER BY month ASC;")?
        .query_map([], |row| row.get(0))?
        .map(|maybe_month| maybe_month.map_err(|error| error.into()))
        .collect()
}

/// Delete every budget record.
///
/// Only used by the opt-in `--reset-store` development flag at startup. The
/// application itself never deletes records.
pub fn delete_all_budget_records(connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM budget_record;", ())?;

    Ok(())
}

fn map_row(row: &Row) -> Result<BudgetRecord, rusqlite::Error> {
    let raw_status: String = row.get(13)?;
    let status = BudgetStatus::from_label(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            13,
            Type::Text,
            format!("unknown budget status {raw_status:?}").into(),
        )
    })?;

    Ok(BudgetRecord {
        id: row.get(0)?,
        month: row.get(1)?,
        income: row.get(2)?,
        expenses: ExpenseBreakdown {
            house_rent: row.get(3)?,
            food_costs: row.get(4)?,
            electricity: row.get(5)?,
            gas: row.get(6)?,
            water: row.get(7)?,
            misc: row.get(8)?,
        },
        real_expense: row.get(9)?,
        predicted_baseline: row.get(10)?,
        account_balance: row.get(11)?,
        savings_balance: row.get(12)?,
        status,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}
