// Copyright 2023 Remi Bernotavicius

//! Reads and writes against the pantry database. Every function takes the connection explicitly
//! and either completes or fails before returning; multi-row writes run in one transaction.

use diesel::sql_types::{Integer, Text};

pub mod category;
pub mod ingredient;
pub mod recipe;

diesel::define_sql_function! {
    /// Row id of the most recent successful insert on this connection.
    fn last_insert_rowid() -> Integer;
}

diesel::define_sql_function! {
    /// 1-based position of `needle` in `haystack`, 0 when absent.
    fn instr(haystack: Text, needle: Text) -> Integer;
}

diesel::define_sql_function!(fn lower(x: Text) -> Text);
