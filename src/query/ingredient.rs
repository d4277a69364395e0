// Copyright 2023 Remi Bernotavicius

use super::{category, instr, last_insert_rowid, lower};
use crate::config::SearchCase;
use crate::database;
use crate::database::models::{Category, CategoryId, Ingredient, IngredientId, NewIngredient};
use crate::expiry::{self, ExpiryReport};
use crate::{Error, Result};
use diesel::prelude::Connection as _;
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

/// Date format the presentation layer submits expiry dates in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Both filters are optional and combine with AND. An empty search string is the same as none.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngredientFilter<'a> {
    pub search: Option<&'a str>,
    pub category_id: Option<CategoryId>,
    pub case: SearchCase,
}

/// The raw fields of an add or edit form.
#[derive(Debug, Clone, Copy)]
pub struct IngredientInput<'a> {
    pub name: &'a str,
    pub category_id: CategoryId,
    pub quantity: &'a str,
    pub expiry_date: &'a str,
}

pub fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::validation(format!("invalid expiry date {s:?}: {e}")))
}

fn validate<'a>(
    conn: &mut database::Connection,
    input: &IngredientInput<'a>,
) -> Result<NewIngredient<'a>> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("ingredient name is required"));
    }
    let expiry_date = parse_date(input.expiry_date)?;
    category::require(conn, input.category_id)?;

    Ok(NewIngredient {
        name: input.name,
        quantity: input.quantity,
        expiry_date,
        category_id: input.category_id,
    })
}

fn not_found(id: IngredientId) -> Error {
    Error::NotFound {
        entity: "ingredient",
        id: id.get(),
    }
}

/// Ingredients joined with their category, earliest expiry first. Ties go to the lower id.
pub fn list_filtered(
    conn: &mut database::Connection,
    filter: &IngredientFilter<'_>,
) -> Result<Vec<(Ingredient, Category)>> {
    use database::schema::{categories, ingredients};

    log::debug!("listing ingredients with {filter:?}");

    let mut query = ingredients::table
        .inner_join(categories::table)
        .select((Ingredient::as_select(), Category::as_select()))
        .order_by((ingredients::expiry_date.asc(), ingredients::id.asc()))
        .into_boxed::<diesel::sqlite::Sqlite>();

    if let Some(search) = filter.search.filter(|s| !s.is_empty()) {
        query = match filter.case {
            SearchCase::Sensitive => query.filter(instr(ingredients::name, search).gt(0)),
            SearchCase::Insensitive => {
                query.filter(instr(lower(ingredients::name), lower(search)).gt(0))
            }
        };
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(ingredients::category_id.eq(category_id));
    }

    let results: Vec<(Ingredient, Category)> = query.load(conn)?;
    log::debug!("{} ingredients matched", results.len());
    Ok(results)
}

/// [`list_filtered`] annotated with remaining days and status counts as of `today`.
pub fn expiry_report(
    conn: &mut database::Connection,
    filter: &IngredientFilter<'_>,
    today: chrono::NaiveDate,
) -> Result<ExpiryReport> {
    Ok(expiry::summarize(list_filtered(conn, filter)?, today))
}

pub fn get(
    conn: &mut database::Connection,
    ingredient_id: IngredientId,
) -> Result<(Ingredient, Category)> {
    use database::schema::{categories, ingredients};

    ingredients::table
        .inner_join(categories::table)
        .filter(ingredients::id.eq(ingredient_id))
        .select((Ingredient::as_select(), Category::as_select()))
        .first(conn)
        .optional()?
        .ok_or_else(|| not_found(ingredient_id))
}

pub fn create(
    conn: &mut database::Connection,
    input: IngredientInput<'_>,
) -> Result<IngredientId> {
    use database::schema::ingredients;

    let new_id = conn.transaction::<_, Error, _>(|conn| {
        let new_ingredient = validate(conn, &input)?;
        diesel::insert_into(ingredients::table)
            .values(&new_ingredient)
            .execute(conn)?;
        Ok(IngredientId::from(
            diesel::select(last_insert_rowid()).get_result::<i32>(conn)?,
        ))
    })?;
    log::info!("added ingredient {new_id} {:?}", input.name);
    Ok(new_id)
}

/// Replaces every field of an existing ingredient.
pub fn update(
    conn: &mut database::Connection,
    ingredient_id: IngredientId,
    input: IngredientInput<'_>,
) -> Result<()> {
    use database::schema::ingredients;

    conn.transaction::<_, Error, _>(|conn| {
        let found: bool =
            diesel::select(diesel::dsl::exists(ingredients::table.find(ingredient_id)))
                .get_result(conn)?;
        if !found {
            return Err(not_found(ingredient_id));
        }

        let changes = validate(conn, &input)?;
        diesel::update(ingredients::table.find(ingredient_id))
            .set(&changes)
            .execute(conn)?;
        Ok(())
    })?;
    log::info!("updated ingredient {ingredient_id}");
    Ok(())
}

pub fn delete(conn: &mut database::Connection, ingredient_id: IngredientId) -> Result<()> {
    use database::schema::ingredients;

    let deleted = diesel::delete(ingredients::table.find(ingredient_id)).execute(conn)?;
    if deleted == 0 {
        return Err(not_found(ingredient_id));
    }
    log::info!("deleted ingredient {ingredient_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_connection;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> database::Connection {
        let mut conn = test_connection();
        category::ensure_seeded(&mut conn).unwrap();
        conn
    }

    fn category_named(conn: &mut database::Connection, name: &str) -> CategoryId {
        category::list_all(conn)
            .unwrap()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap()
            .id
    }

    fn add(
        conn: &mut database::Connection,
        name: &str,
        category_id: CategoryId,
        expiry_date: &str,
    ) -> IngredientId {
        create(
            conn,
            IngredientInput {
                name,
                category_id,
                quantity: "1個",
                expiry_date,
            },
        )
        .unwrap()
    }

    fn names(results: &[(Ingredient, Category)]) -> Vec<&str> {
        results.iter().map(|(i, _)| i.name.as_str()).collect()
    }

    fn search(conn: &mut database::Connection, s: &str) -> Vec<String> {
        let filter = IngredientFilter {
            search: Some(s),
            ..Default::default()
        };
        let results = list_filtered(conn, &filter).unwrap();
        results.into_iter().map(|(i, _)| i.name).collect()
    }

    #[test]
    fn create_and_get() {
        let mut conn = seeded();
        let meat = category_named(&mut conn, "肉");
        let id = add(&mut conn, "chicken", meat, "2024-06-12");

        let (ingredient, category) = get(&mut conn, id).unwrap();
        assert_eq!(ingredient.name, "chicken");
        assert_eq!(ingredient.quantity, "1個");
        assert_eq!(ingredient.expiry_date, date(2024, 6, 12));
        assert_eq!(ingredient.category_id, meat);
        assert_eq!(category.name, "肉");
        assert_eq!(category.color, "#f8d7da");
    }

    #[test]
    fn create_returns_distinct_ids() {
        let mut conn = seeded();
        let meat = category_named(&mut conn, "肉");
        let a = add(&mut conn, "beef", meat, "2024-06-12");
        let b = add(&mut conn, "pork", meat, "2024-06-12");
        assert_ne!(a, b);
        assert_eq!(get(&mut conn, b).unwrap().0.name, "pork");
    }

    #[test]
    fn create_rejects_unknown_category() {
        let mut conn = seeded();
        let e = create(
            &mut conn,
            IngredientInput {
                name: "tofu",
                category_id: 404.into(),
                quantity: "1",
                expiry_date: "2024-06-12",
            },
        )
        .unwrap_err();
        assert!(e.is_validation(), "{e}");
        assert!(list_filtered(&mut conn, &Default::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn create_rejects_bad_date_and_blank_name() {
        let mut conn = seeded();
        let dairy = category_named(&mut conn, "乳製品");
        let cases = [
            ("milk", "2024-13-01"),
            ("milk", "next week"),
            ("  ", "2024-06-01"),
        ];
        for (name, expiry_date) in cases {
            let e = create(
                &mut conn,
                IngredientInput {
                    name,
                    category_id: dairy,
                    quantity: "1L",
                    expiry_date,
                },
            )
            .unwrap_err();
            assert!(e.is_validation(), "{e}");
        }
    }

    #[test]
    fn update_replaces_all_fields() {
        let mut conn = seeded();
        let meat = category_named(&mut conn, "肉");
        let other = category_named(&mut conn, "その他");
        let id = add(&mut conn, "ham", meat, "2024-06-12");

        update(
            &mut conn,
            id,
            IngredientInput {
                name: "sliced ham",
                category_id: other,
                quantity: "200g",
                expiry_date: "2024-07-01",
            },
        )
        .unwrap();

        let (ingredient, category) = get(&mut conn, id).unwrap();
        assert_eq!(ingredient.name, "sliced ham");
        assert_eq!(ingredient.quantity, "200g");
        assert_eq!(ingredient.expiry_date, date(2024, 7, 1));
        assert_eq!(category.name, "その他");
    }

    #[test]
    fn update_errors() {
        let mut conn = seeded();
        let meat = category_named(&mut conn, "肉");
        let id = add(&mut conn, "ham", meat, "2024-06-12");
        let input = IngredientInput {
            name: "ham",
            category_id: meat,
            quantity: "1",
            expiry_date: "2024-06-12",
        };

        assert!(update(&mut conn, 999.into(), input)
            .unwrap_err()
            .is_not_found());
        let bad_category = IngredientInput {
            category_id: 999.into(),
            ..input
        };
        assert!(update(&mut conn, id, bad_category)
            .unwrap_err()
            .is_validation());
        let bad_date = IngredientInput {
            expiry_date: "06/12/2024",
            ..input
        };
        assert!(update(&mut conn, id, bad_date).unwrap_err().is_validation());

        assert_eq!(get(&mut conn, id).unwrap().0.expiry_date, date(2024, 6, 12));
    }

    #[test]
    fn delete_removes_row() {
        let mut conn = seeded();
        let meat = category_named(&mut conn, "肉");
        let id = add(&mut conn, "ham", meat, "2024-06-12");

        delete(&mut conn, id).unwrap();
        assert!(get(&mut conn, id).unwrap_err().is_not_found());
        assert!(delete(&mut conn, id).unwrap_err().is_not_found());
    }

    #[test]
    fn list_sorted_by_expiry_then_id() {
        let mut conn = seeded();
        let veg = category_named(&mut conn, "野菜");
        add(&mut conn, "onion", veg, "2024-06-20");
        add(&mut conn, "carrot", veg, "2024-06-09");
        add(&mut conn, "leek", veg, "2024-06-12");
        add(&mut conn, "cabbage", veg, "2024-06-12");

        let results = list_filtered(&mut conn, &Default::default()).unwrap();
        assert_eq!(names(&results), ["carrot", "leek", "cabbage", "onion"]);
        assert!(results
            .windows(2)
            .all(|w| w[0].0.expiry_date <= w[1].0.expiry_date));
    }

    #[test]
    fn filters_combine() {
        let mut conn = seeded();
        let veg = category_named(&mut conn, "野菜");
        let meat = category_named(&mut conn, "肉");
        add(&mut conn, "green pepper", veg, "2024-06-11");
        add(&mut conn, "red pepper", veg, "2024-06-12");
        add(&mut conn, "pepper steak", meat, "2024-06-13");
        add(&mut conn, "chicken", meat, "2024-06-14");

        let by_search = list_filtered(
            &mut conn,
            &IngredientFilter {
                search: Some("pepper"),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            names(&by_search),
            ["green pepper", "red pepper", "pepper steak"]
        );

        let by_category = list_filtered(
            &mut conn,
            &IngredientFilter {
                category_id: Some(meat),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&by_category), ["pepper steak", "chicken"]);
        assert!(by_category.iter().all(|(i, _)| i.category_id == meat));

        let both = list_filtered(
            &mut conn,
            &IngredientFilter {
                search: Some("pepper"),
                category_id: Some(veg),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&both), ["green pepper", "red pepper"]);

        let empty_search = list_filtered(
            &mut conn,
            &IngredientFilter {
                search: Some(""),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(empty_search.len(), 4);
    }

    #[test]
    fn search_is_literal_substring() {
        let mut conn = seeded();
        let other = category_named(&mut conn, "その他");
        add(&mut conn, "100% juice", other, "2024-06-11");
        add(&mut conn, "1000 island", other, "2024-06-11");
        add(&mut conn, "my_sauce", other, "2024-06-11");
        add(&mut conn, "mayo", other, "2024-06-11");

        assert_eq!(search(&mut conn, "0%"), ["100% juice"]);
        assert_eq!(search(&mut conn, "y_"), ["my_sauce"]);
        assert_eq!(search(&mut conn, "納豆"), Vec::<String>::new());
    }

    #[test]
    fn search_case_is_configurable() {
        let mut conn = seeded();
        let dairy = category_named(&mut conn, "乳製品");
        add(&mut conn, "Cheddar", dairy, "2024-06-11");
        add(&mut conn, "cream cheese", dairy, "2024-06-12");

        let sensitive = list_filtered(
            &mut conn,
            &IngredientFilter {
                search: Some("Che"),
                case: SearchCase::Sensitive,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&sensitive), ["Cheddar"]);

        let insensitive = list_filtered(
            &mut conn,
            &IngredientFilter {
                search: Some("Che"),
                case: SearchCase::Insensitive,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&insensitive), ["Cheddar", "cream cheese"]);
    }

    #[test]
    fn report_for_example_day() {
        let mut conn = seeded();
        let veg = category_named(&mut conn, "野菜");
        add(&mut conn, "carrot", veg, "2024-06-09");
        add(&mut conn, "spinach", veg, "2024-06-12");
        add(&mut conn, "onion", veg, "2024-06-20");

        let report = expiry_report(&mut conn, &Default::default(), date(2024, 6, 10)).unwrap();
        let days: Vec<_> = report.items.iter().map(|i| i.remaining_days).collect();
        assert_eq!(days, [-1, 2, 10]);
        assert_eq!(report.total_items, 3);
        assert_eq!(report.expired_count, 1);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.items[0].category, "野菜");
        assert_eq!(report.items[0].category_color, "#d4edda");
    }
}
