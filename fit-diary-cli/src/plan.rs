//! YAML description of the entries to stage in one `log` run.
//!
//! ```yaml
//! date: 2025-05-20
//! time: "12:30"
//! items:
//!   - id: taco_66
//!     name: Rice
//!     kind: food
//!     quantity: 2
//!     unit_id: "40"
//!   - id: "12"
//!     name: Lasagna
//!     kind: recipe
//!     quantity: 1.5
//!     per_serving: { kcal: 420, protein: 25, carbs: 38, fat: 18 }
//! ```

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use fit_diary_core::{MealType, NutritionTotals, SelectableItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Food,
    Recipe,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit_id: Option<String>,
    /// Overrides the item name in the diary
    pub display_name: Option<String>,
    #[serde(default)]
    pub per_serving: NutritionTotals,
}

fn default_quantity() -> f64 {
    1.0
}

impl PlanItem {
    pub fn to_selectable(&self) -> SelectableItem {
        let item = match self.kind {
            ItemKind::Food => SelectableItem::food(self.id.clone(), self.name.clone()),
            ItemKind::Recipe => SelectableItem::recipe(self.id.clone(), self.name.clone()),
        };
        item.with_per_serving(self.per_serving)
    }

    pub fn quantity_input(&self) -> String {
        self.quantity.to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    /// Explicit meal type; when set, the time no longer decides it
    pub meal_type: Option<MealType>,
    pub items: Vec<PlanItem>,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlanError::ReadError(path.to_path_buf(), e))?;
        let plan: Plan = serde_yaml::from_str(&contents)
            .map_err(|e| PlanError::ParseError(path.to_path_buf(), e))?;

        if plan.items.is_empty() {
            return Err(PlanError::NoItems(path.to_path_buf()));
        }
        Ok(plan)
    }
}

#[derive(Debug)]
pub enum PlanError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    NoItems(PathBuf),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::ReadError(path, e) => {
                write!(f, "Failed to read plan '{}': {}", path.display(), e)
            }
            PlanError::ParseError(path, e) => {
                write!(f, "Failed to parse plan '{}': {}", path.display(), e)
            }
            PlanError::NoItems(path) => write!(f, "Plan '{}' has no items", path.display()),
        }
    }
}

impl std::error::Error for PlanError {}
