// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::{AsChangeset, Insertable};
use diesel_derive_newtype::DieselNewType;
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct CategoryId(i32);

impl From<i32> for CategoryId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl FromStr for CategoryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl CategoryId {
    pub fn get(&self) -> i32 {
        self.0
    }
}

/// Master data: every ingredient and recipe requirement is classified by one of these. Rows are
/// only ever inserted by seeding.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct IngredientId(i32);

impl From<i32> for IngredientId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl FromStr for IngredientId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl IngredientId {
    pub fn get(&self) -> i32 {
        self.0
    }
}

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Category))]
#[diesel(table_name = crate::database::schema::ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub quantity: String,
    pub expiry_date: chrono::NaiveDate,
    pub category_id: CategoryId,
}

/// Used both for inserting and for the full-field replace done by an edit.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
    pub expiry_date: chrono::NaiveDate,
    pub category_id: CategoryId,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct RecipeId(i32);

impl From<i32> for RecipeId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl FromStr for RecipeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl RecipeId {
    pub fn get(&self) -> i32 {
        self.0
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub instructions: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub instructions: &'a str,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct RecipeIngredientId(i32);

/// One "this recipe needs this much of this category" line. A recipe never lists the same
/// category twice.
#[derive(Associations, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Category))]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeIngredient {
    pub id: RecipeIngredientId,
    pub recipe_id: RecipeId,
    pub category_id: CategoryId,
    pub quantity: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct NewRecipeIngredient<'a> {
    pub recipe_id: RecipeId,
    pub category_id: CategoryId,
    pub quantity: &'a str,
}
