diesel::table! {
    categories (id) {
        id -> Integer,
        name -> Text,
        color -> Text,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Integer,
        name -> Text,
        quantity -> Text,
        expiry_date -> Date,
        category_id -> Integer,
    }
}

diesel::table! {
    recipe_ingredients (id) {
        id -> Integer,
        recipe_id -> Integer,
        category_id -> Integer,
        quantity -> Text,
    }
}

diesel::table! {
    recipes (id) {
        id -> Integer,
        title -> Text,
        instructions -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(ingredients -> categories (category_id));
diesel::joinable!(recipe_ingredients -> categories (category_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    categories,
    ingredients,
    recipe_ingredients,
    recipes,
);
