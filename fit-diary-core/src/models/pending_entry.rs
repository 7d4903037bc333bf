use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use super::meal_type::MealType;
use super::nutrition::{format_number, NutritionTotals};
use crate::serde_util;

/// Shown in place of the meal time when none was entered.
pub const NO_TIME_LABEL: &str = "No time";

/// A confirmed diary entry waiting in the batch.
///
/// Built once from the draft at confirmation time and never modified. It owns
/// all of its data, so resetting or reusing the draft cannot affect it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "EntryRecord")]
pub struct PendingDiaryEntry {
    pub id: Uuid,
    pub display_name: String,
    pub is_food: bool,
    pub item_id: String,
    pub item_name: String,
    pub meal_type: MealType,
    pub meal_type_label: String,
    pub meal_time: Option<String>,
    pub date_consumed: NaiveDate,
    pub quantity: f64,
    /// Quantity for recipes, always 1 for foods (their totals already cover the quantity).
    pub servings_consumed: f64,
    pub unit_id: Option<String>,
    pub unit_label: String,
    /// Recipe per-serving values, or the computed totals for foods.
    pub per_serving: NutritionTotals,
    pub totals: NutritionTotals,
}

impl PendingDiaryEntry {
    pub fn meal_time_label(&self) -> &str {
        match self.meal_time.as_deref() {
            Some(time) if !time.is_empty() => time,
            _ => NO_TIME_LABEL,
        }
    }

    fn quantity_summary(&self) -> String {
        if self.is_food {
            format!(
                "{} • {}",
                self.unit_label,
                format_number(self.quantity, 2)
            )
        } else {
            format!("{} serving(s)", format_number(self.servings_consumed, 2))
        }
    }
}

impl fmt::Display for PendingDiaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.display_name)?;
        writeln!(
            f,
            "  {} | {} | {} | {}",
            self.meal_type_label,
            self.meal_time_label(),
            self.date_consumed.format("%d/%m/%Y"),
            self.quantity_summary()
        )?;
        write!(f, "  {}", self.totals)
    }
}

/// Wire shape expected by the batch logging endpoint.
#[derive(Serialize)]
struct EntryRecord {
    id: String,
    display_name: String,
    custom_meal_name: String,
    #[serde(serialize_with = "serde_util::flag_as_int::serialize")]
    is_food: bool,
    food_id: String,
    food_name: String,
    recipe_id: String,
    meal_type: MealType,
    meal_type_label: String,
    meal_time: String,
    meal_time_label: String,
    date_consumed: NaiveDate,
    servings_consumed: f64,
    quantity: f64,
    unit_id: String,
    unit_name: String,
    kcal_per_serving: f64,
    protein_per_serving: f64,
    carbs_per_serving: f64,
    fat_per_serving: f64,
    total_kcal: f64,
    total_protein: f64,
    total_carbs: f64,
    total_fat: f64,
}

impl From<PendingDiaryEntry> for EntryRecord {
    fn from(entry: PendingDiaryEntry) -> Self {
        let meal_time_label = entry.meal_time_label().to_string();
        let (food_id, food_name, recipe_id) = if entry.is_food {
            (entry.item_id, entry.item_name, String::new())
        } else {
            (String::new(), String::new(), entry.item_id)
        };

        Self {
            id: entry.id.to_string(),
            custom_meal_name: entry.display_name.clone(),
            display_name: entry.display_name,
            is_food: entry.is_food,
            food_id,
            food_name,
            recipe_id,
            meal_type: entry.meal_type,
            meal_type_label: entry.meal_type_label,
            meal_time: entry.meal_time.unwrap_or_default(),
            meal_time_label,
            date_consumed: entry.date_consumed,
            servings_consumed: entry.servings_consumed,
            quantity: entry.quantity,
            unit_id: entry.unit_id.unwrap_or_default(),
            unit_name: entry.unit_label,
            kcal_per_serving: entry.per_serving.kcal,
            protein_per_serving: entry.per_serving.protein,
            carbs_per_serving: entry.per_serving.carbs,
            fat_per_serving: entry.per_serving.fat,
            total_kcal: entry.totals.kcal,
            total_protein: entry.totals.protein,
            total_carbs: entry.totals.carbs,
            total_fat: entry.totals.fat,
        }
    }
}
