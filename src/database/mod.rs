// Copyright 2023 Remi Bernotavicius

use crate::{Error, Result};
use diesel::connection::SimpleConnection as _;
use diesel::prelude::Connection as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;
use std::time::Duration;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// How long a statement waits on another connection's lock before failing with "database is
/// locked".
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the database at `path` (`":memory:"` works too), turns on foreign key enforcement, sets
/// [`BUSY_TIMEOUT`] and brings the schema up to date.
pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection> {
    let url = path.as_ref().to_string_lossy();
    let mut connection = Connection::establish(&url)?;
    connection.batch_execute(&format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
        BUSY_TIMEOUT.as_millis()
    ))?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(Error::Migration)?;
    Ok(connection)
}

/// Makes at most `attempts` tries, sleeping `delay` between them. The last failure is returned.
pub fn establish_connection_with_retry(
    path: impl AsRef<Path>,
    attempts: u32,
    delay: Duration,
) -> Result<Connection> {
    let path = path.as_ref();
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match establish_connection(path) {
            Ok(connection) => {
                log::info!("connected to {}", path.display());
                return Ok(connection);
            }
            Err(error) if attempt < attempts => {
                log::warn!(
                    "connecting to {} failed (attempt {attempt}/{attempts}): {error}",
                    path.display()
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    establish_connection(":memory:").unwrap()
}

#[test]
fn migrations() {
    let mut conn = Connection::establish(":memory:").unwrap();

    for _ in 0..2 {
        conn.run_pending_migrations(MIGRATIONS).unwrap();
        conn.revert_all_migrations(MIGRATIONS).unwrap();
    }
    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}

#[test]
fn foreign_keys_enforced() {
    use diesel::ExpressionMethods as _;
    use diesel::RunQueryDsl as _;
    use schema::ingredients::dsl::*;

    let mut conn = test_connection();
    let result = diesel::insert_into(ingredients)
        .values((
            name.eq("milk"),
            quantity.eq("1L"),
            expiry_date.eq(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            category_id.eq(99),
        ))
        .execute(&mut conn);
    assert!(Error::from(result.unwrap_err()).is_validation());
}

#[test]
fn retry_gives_up_after_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("data.sqlite");
    let result = establish_connection_with_retry(&path, 2, Duration::from_millis(1));
    assert!(matches!(result, Err(Error::Connection(_))));
}

#[test]
fn busy_timeout_set() {
    use diesel::RunQueryDsl as _;

    #[derive(diesel::QueryableByName)]
    struct BusyTimeout {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        timeout: i32,
    }

    let mut conn = test_connection();
    let row: BusyTimeout = diesel::sql_query("PRAGMA busy_timeout")
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(row.timeout as u128, BUSY_TIMEOUT.as_millis());
}
