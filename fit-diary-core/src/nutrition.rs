//! Nutrition totals for a quantity of an item.
//!
//! Recipes scale their per-serving macros locally. Foods are converted by the
//! server, which owns the unit conversion factors; its answer is used as is.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{ApiError, DiaryApi};
use crate::identifier::extract_numeric_id;
use crate::models::{format_number, NutritionTotals, SelectableItem};
use crate::serde_util;

/// Parses a quantity field. Only finite values greater than zero are valid.
pub fn parse_quantity(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite() && *q > 0.0)
}

/// Per-serving macros scaled by `quantity`, rounded for display.
pub fn recipe_totals(item: &SelectableItem, quantity: f64) -> NutritionTotals {
    item.per_serving().scaled(quantity).rounded()
}

/// Parameters of a server-side unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionParams {
    pub item_id: u64,
    pub quantity: f64,
    pub unit_id: String,
    pub is_recipe: bool,
}

impl ConversionParams {
    /// `None` when the item id has no numeric part the server could look up.
    pub fn for_item(item: &SelectableItem, quantity: f64, unit_id: &str) -> Option<Self> {
        let item_id = extract_numeric_id(&item.id)?;
        Some(Self {
            item_id,
            quantity,
            unit_id: unit_id.to_string(),
            is_recipe: !item.is_food,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitInfo {
    #[serde(default)]
    pub name: String,
}

/// Server answer to a conversion request. Values arrive already rounded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversion {
    pub nutrition: NutritionTotals,
    #[serde(default = "default_unit_info")]
    pub unit_info: UnitInfo,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub quantity_in_base_unit: f64,
}

fn default_unit_info() -> UnitInfo {
    UnitInfo {
        name: String::new(),
    }
}

impl Conversion {
    /// Human-readable conversion such as `2 cup = 480g`.
    pub fn caption(&self, quantity: f64) -> String {
        format!(
            "{} {} = {}g",
            quantity,
            self.unit_info.name,
            format_number(self.quantity_in_base_unit, 1)
        )
    }
}

/// How the totals for an item and quantity are obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum Computation {
    /// Computed locally from per-serving values
    Local(NutritionTotals),
    /// Requires a server conversion
    Remote(ConversionParams),
    /// Nothing can be computed; totals reset to zero
    Invalid,
}

/// Decides how to compute totals.
///
/// `unit_id` is `None` for recipes and for foods without measurement units,
/// both of which scale per serving.
pub fn plan_totals(item: &SelectableItem, quantity: &str, unit_id: Option<&str>) -> Computation {
    let Some(quantity) = parse_quantity(quantity) else {
        return Computation::Invalid;
    };

    match unit_id {
        Some(unit_id) if item.is_food => match ConversionParams::for_item(item, quantity, unit_id) {
            Some(params) => Computation::Remote(params),
            None => {
                warn!(item_id = %item.id, "Item id has no numeric part, cannot convert units");
                Computation::Invalid
            }
        },
        _ => Computation::Local(recipe_totals(item, quantity)),
    }
}

/// Computes totals end to end, calling the server for foods.
pub async fn compute_totals<A: DiaryApi + ?Sized>(
    api: &A,
    item: &SelectableItem,
    quantity: &str,
    unit_id: Option<&str>,
) -> Result<NutritionTotals, ApiError> {
    match plan_totals(item, quantity, unit_id) {
        Computation::Local(totals) => Ok(totals),
        Computation::Invalid => Ok(NutritionTotals::zero()),
        Computation::Remote(params) => Ok(api.convert(&params).await?.nutrition),
    }
}
