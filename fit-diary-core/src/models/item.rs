use serde::{Deserialize, Serialize};
use std::fmt;

use super::nutrition::NutritionTotals;
use crate::serde_util;

/// A food or recipe picked from search, favourites or recents.
///
/// Recipes carry their macros per serving. For foods the per-serving values
/// are only used when the food has no measurement units on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectableItem {
    #[serde(deserialize_with = "serde_util::string")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "serde_util::flag")]
    pub is_food: bool,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub kcal_per_serving: f64,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub protein_g_per_serving: f64,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub carbs_g_per_serving: f64,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub fat_g_per_serving: f64,
}

impl SelectableItem {
    pub fn food(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, true)
    }

    pub fn recipe(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, false)
    }

    fn new(id: impl Into<String>, name: impl Into<String>, is_food: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_food,
            kcal_per_serving: 0.0,
            protein_g_per_serving: 0.0,
            carbs_g_per_serving: 0.0,
            fat_g_per_serving: 0.0,
        }
    }

    pub fn with_per_serving(mut self, per_serving: NutritionTotals) -> Self {
        self.kcal_per_serving = per_serving.kcal;
        self.protein_g_per_serving = per_serving.protein;
        self.carbs_g_per_serving = per_serving.carbs;
        self.fat_g_per_serving = per_serving.fat;
        self
    }

    pub fn per_serving(&self) -> NutritionTotals {
        NutritionTotals::new(
            self.kcal_per_serving,
            self.protein_g_per_serving,
            self.carbs_g_per_serving,
            self.fat_g_per_serving,
        )
    }
}

impl fmt::Display for SelectableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_food { "FOOD" } else { "RECIPE" };
        write!(f, "[{}] {} ({})", kind, self.name, self.id)
    }
}
