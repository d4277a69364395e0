// Copyright 2023 Remi Bernotavicius

use super::{category, last_insert_rowid};
use crate::database;
use crate::database::models::{
    Category, CategoryId, NewRecipe, NewRecipeIngredient, Recipe, RecipeId, RecipeIngredient,
};
use crate::{Error, Result};
use diesel::associations::GroupedBy as _;
use diesel::prelude::Connection as _;
use diesel::prelude::OptionalExtension as _;
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashSet;

/// A recipe as shown in the recipe listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub recipe: Recipe,
    /// Names of the required categories, in the order they were entered.
    pub ingredients_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub category_id: CategoryId,
    pub category: String,
    pub category_color: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub requirements: Vec<Requirement>,
}

fn not_found(id: RecipeId) -> Error {
    Error::NotFound {
        entity: "recipe",
        id: id.get(),
    }
}

/// Pairs up the two parallel form lists, stopping at the shorter one. Pairs with an empty side are
/// dropped. A category appearing twice fails the whole set.
pub fn parse_requirements<'a>(
    category_ids: &[impl AsRef<str>],
    quantities: &'a [impl AsRef<str>],
) -> Result<Vec<(CategoryId, &'a str)>> {
    let mut seen = HashSet::new();
    let mut requirements = vec![];
    for (category_id, quantity) in category_ids.iter().zip(quantities) {
        let (category_id, quantity) = (category_id.as_ref(), quantity.as_ref());
        if category_id.is_empty() || quantity.is_empty() {
            continue;
        }

        let category_id: CategoryId = category_id.parse().map_err(|e| {
            Error::validation(format!("invalid category id {category_id:?}: {e}"))
        })?;
        if !seen.insert(category_id) {
            return Err(Error::validation(format!(
                "category {category_id} listed more than once"
            )));
        }
        requirements.push((category_id, quantity));
    }
    Ok(requirements)
}

/// Newest first.
pub fn list_all(conn: &mut database::Connection) -> Result<Vec<RecipeSummary>> {
    use database::schema::{categories, recipe_ingredients, recipes};

    let all_recipes: Vec<Recipe> = recipes::table
        .select(Recipe::as_select())
        .order_by((recipes::created_at.desc(), recipes::id.desc()))
        .load(conn)?;
    let requirements = RecipeIngredient::belonging_to(&all_recipes)
        .inner_join(categories::table)
        .select((RecipeIngredient::as_select(), Category::as_select()))
        .order_by(recipe_ingredients::id.asc())
        .load::<(RecipeIngredient, Category)>(conn)?
        .grouped_by(&all_recipes);

    Ok(all_recipes
        .into_iter()
        .zip(requirements)
        .map(|(recipe, requirements)| RecipeSummary {
            recipe,
            ingredients_list: requirements.into_iter().map(|(_, c)| c.name).collect(),
        })
        .collect())
}

pub fn get(conn: &mut database::Connection, recipe_id: RecipeId) -> Result<RecipeDetail> {
    use database::schema::{categories, recipe_ingredients, recipes};

    let recipe: Recipe = recipes::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| not_found(recipe_id))?;
    let requirements = RecipeIngredient::belonging_to(&recipe)
        .inner_join(categories::table)
        .select((RecipeIngredient::as_select(), Category::as_select()))
        .order_by(recipe_ingredients::id.asc())
        .load::<(RecipeIngredient, Category)>(conn)?
        .into_iter()
        .map(|(usage, category)| Requirement {
            category_id: category.id,
            category: category.name,
            category_color: category.color,
            quantity: usage.quantity,
        })
        .collect();

    Ok(RecipeDetail {
        recipe,
        requirements,
    })
}

/// Creates a recipe and its requirement rows from the parallel `category_ids` / `quantities` form
/// lists (see [`parse_requirements`]). Either everything is stored or nothing is.
pub fn create(
    conn: &mut database::Connection,
    title: &str,
    instructions: &str,
    category_ids: &[impl AsRef<str>],
    quantities: &[impl AsRef<str>],
) -> Result<RecipeId> {
    let created_at = chrono::Utc::now().naive_utc();
    create_at(conn, title, instructions, category_ids, quantities, created_at)
}

/// [`create`] with an explicit creation timestamp.
pub fn create_at(
    conn: &mut database::Connection,
    title: &str,
    instructions: &str,
    category_ids: &[impl AsRef<str>],
    quantities: &[impl AsRef<str>],
    created_at: chrono::NaiveDateTime,
) -> Result<RecipeId> {
    use database::schema::{recipe_ingredients, recipes};

    if title.trim().is_empty() {
        return Err(Error::validation("recipe title is required"));
    }
    let requirements = parse_requirements(category_ids, quantities)?;

    let new_id = conn.transaction::<_, Error, _>(|conn| {
        diesel::insert_into(recipes::table)
            .values(NewRecipe {
                title,
                instructions,
                created_at,
            })
            .execute(conn)?;
        let recipe_id =
            RecipeId::from(diesel::select(last_insert_rowid()).get_result::<i32>(conn)?);

        for &(category_id, quantity) in &requirements {
            category::require(conn, category_id)?;
            diesel::insert_into(recipe_ingredients::table)
                .values(NewRecipeIngredient {
                    recipe_id,
                    category_id,
                    quantity,
                })
                .execute(conn)?;
        }
        Ok(recipe_id)
    })?;

    log::info!(
        "added recipe {new_id} {title:?} with {} requirements",
        requirements.len()
    );
    Ok(new_id)
}

/// Deletes the recipe's requirement rows, then the recipe.
pub fn delete(conn: &mut database::Connection, recipe_id: RecipeId) -> Result<()> {
    use database::schema::{recipe_ingredients, recipes};

    let removed = conn.transaction::<_, Error, _>(|conn| {
        let removed = diesel::delete(
            recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?;
        if diesel::delete(recipes::table.find(recipe_id)).execute(conn)? == 0 {
            return Err(not_found(recipe_id));
        }
        Ok(removed)
    })?;
    log::info!("deleted recipe {recipe_id} and {removed} requirements");
    Ok(())
}
