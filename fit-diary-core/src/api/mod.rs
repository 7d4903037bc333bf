//! Remote endpoints the staging engine depends on.
//!
//! The engine only sees the [`DiaryApi`] trait. [`HttpDiaryApi`] talks to the
//! real server; credentials are attached there and an unauthenticated answer
//! surfaces as [`ApiError::Unauthenticated`] like any other failure.

mod envelope;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::models::{MealType, MeasurementUnit, PendingDiaryEntry, SelectableItem};
use crate::nutrition::{Conversion, ConversionParams};

pub use error::ApiError;
pub use http::HttpDiaryApi;

/// Acknowledgement of a logged batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReceipt {
    pub message: Option<String>,
}

/// Initial values for a composing session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageDefaults {
    pub date: NaiveDate,
    pub meal_type: MealType,
    /// Offered meal types keyed by slug, with their display labels
    #[serde(default)]
    pub meal_type_options: HashMap<String, String>,
    #[serde(default)]
    pub favorite_recipes: Vec<SelectableItem>,
    #[serde(default)]
    pub recent_recipes: Vec<SelectableItem>,
}

impl PageDefaults {
    /// Meal type labels for the slugs this client knows.
    pub fn meal_type_labels(&self) -> BTreeMap<MealType, String> {
        self.meal_type_options
            .iter()
            .filter_map(|(slug, label)| match slug.parse::<MealType>() {
                Ok(meal_type) => Some((meal_type, label.clone())),
                Err(_) => {
                    debug!(slug = %slug, "Ignoring unknown meal type option");
                    None
                }
            })
            .collect()
    }
}

/// Request/response contracts of the remote diary service.
#[async_trait]
pub trait DiaryApi: Send + Sync {
    /// Units registered for one item.
    async fn units_for_item(&self, item_id: u64) -> Result<Vec<MeasurementUnit>, ApiError>;

    /// The generic unit catalog, not scoped to any item.
    async fn unit_catalog(&self) -> Result<Vec<MeasurementUnit>, ApiError>;

    /// Converts a quantity in some unit into nutrition totals.
    async fn convert(&self, params: &ConversionParams) -> Result<Conversion, ApiError>;

    /// Logs every entry in one all-or-nothing request.
    async fn log_batch(&self, entries: &[PendingDiaryEntry]) -> Result<BatchReceipt, ApiError>;

    /// Date, meal type and option labels to start a session with.
    async fn page_defaults(
        &self,
        date: Option<NaiveDate>,
        meal_type: Option<MealType>,
    ) -> Result<PageDefaults, ApiError>;
}
