// Copyright 2023 Remi Bernotavicius

use crate::database::models::{Category, CategoryId, Ingredient, IngredientId};
use derive_more::Display;
use strum::EnumIter;

/// Items with at most this many days left (and not yet expired) get a warning.
pub const WARNING_DAYS: i64 = 3;

#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq)]
pub enum ExpiryStatus {
    #[display("expired")]
    Expired,
    #[display("warning")]
    Warning,
    #[display("ok")]
    Ok,
}

impl ExpiryStatus {
    pub fn classify(remaining_days: i64) -> Self {
        if remaining_days <= 0 {
            Self::Expired
        } else if remaining_days <= WARNING_DAYS {
            Self::Warning
        } else {
            Self::Ok
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

/// An ingredient with its category resolved and its remaining days computed against some day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientView {
    pub id: IngredientId,
    pub name: String,
    pub quantity: String,
    pub expiry_date: chrono::NaiveDate,
    pub category_id: CategoryId,
    pub category: String,
    pub category_color: String,
    pub remaining_days: i64,
    pub status: ExpiryStatus,
}

impl IngredientView {
    pub fn new(ingredient: Ingredient, category: Category, today: chrono::NaiveDate) -> Self {
        let remaining_days = (ingredient.expiry_date - today).num_days();
        Self {
            id: ingredient.id,
            name: ingredient.name,
            quantity: ingredient.quantity,
            expiry_date: ingredient.expiry_date,
            category_id: ingredient.category_id,
            category: category.name,
            category_color: category.color,
            remaining_days,
            status: ExpiryStatus::classify(remaining_days),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    pub items: Vec<IngredientView>,
    pub total_items: usize,
    pub expired_count: usize,
    pub warning_count: usize,
}

impl ExpiryReport {
    pub fn ok_count(&self) -> usize {
        self.total_items - self.expired_count - self.warning_count
    }
}

/// Annotates already-fetched ingredients, keeping their order, and counts them per status.
pub fn summarize(
    ingredients: impl IntoIterator<Item = (Ingredient, Category)>,
    today: chrono::NaiveDate,
) -> ExpiryReport {
    let items: Vec<_> = ingredients
        .into_iter()
        .map(|(ingredient, category)| IngredientView::new(ingredient, category, today))
        .collect();
    let count = |status: ExpiryStatus| items.iter().filter(|i| i.status == status).count();

    ExpiryReport {
        total_items: items.len(),
        expired_count: count(ExpiryStatus::Expired),
        warning_count: count(ExpiryStatus::Warning),
        items,
    }
}
