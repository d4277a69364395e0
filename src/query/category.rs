// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Category, CategoryId, NewCategory};
use crate::{Error, Result};
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

/// Name and display color of every category a fresh database starts with.
pub const SEED: [(&str, &str); 5] = [
    ("野菜", "#d4edda"),
    ("肉", "#f8d7da"),
    ("乳製品", "#cce5ff"),
    ("加工食品", "#fff3cd"),
    ("その他", "#e2e3e5"),
];

/// Inserts [`SEED`] when there are no categories yet, returning how many rows were added.
///
/// Safe to call on every startup, from any number of connections at once. The write lock is taken
/// before the empty check, so concurrent callers serialize behind it (up to
/// [`database::BUSY_TIMEOUT`]) and exactly one of them inserts.
pub fn ensure_seeded(conn: &mut database::Connection) -> Result<usize> {
    use database::schema::categories;

    conn.immediate_transaction::<_, Error, _>(|conn| {
        let existing: i64 = categories::table.count().get_result(conn)?;
        if existing > 0 {
            log::debug!("{existing} categories present, not seeding");
            return Ok(0);
        }

        let mut inserted = 0;
        for (name, color) in SEED {
            inserted += diesel::insert_or_ignore_into(categories::table)
                .values(NewCategory { name, color })
                .execute(conn)?;
        }
        log::info!("seeded {inserted} categories");
        Ok(inserted)
    })
}

pub fn list_all(conn: &mut database::Connection) -> Result<Vec<Category>> {
    use database::schema::categories::dsl::*;

    Ok(categories
        .select(Category::as_select())
        .order_by((name.asc(), id.asc()))
        .load(conn)?)
}

pub fn get(conn: &mut database::Connection, category_id: CategoryId) -> Result<Category> {
    use database::schema::categories;

    categories::table
        .find(category_id)
        .select(Category::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::NotFound {
            entity: "category",
            id: category_id.get(),
        })
}

pub fn exists(conn: &mut database::Connection, category_id: CategoryId) -> Result<bool> {
    use database::schema::categories;

    Ok(diesel::select(diesel::dsl::exists(categories::table.find(category_id))).get_result(conn)?)
}

/// Fails with a validation error naming the id if it doesn't resolve to a category.
pub(crate) fn require(conn: &mut database::Connection, category_id: CategoryId) -> Result<()> {
    if exists(conn, category_id)? {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "category {category_id} does not exist"
        )))
    }
}
