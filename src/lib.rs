// Copyright 2023 Remi Bernotavicius

//! Household pantry tracker: perishable ingredients with expiry dates, grouped by category, and
//! recipes written against those categories.

pub mod config;
pub mod database;
pub mod error;
pub mod expiry;
pub mod query;

pub use error::{Error, Result};
