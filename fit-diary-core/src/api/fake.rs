//! In-memory [`DiaryApi`] for unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{ApiError, BatchReceipt, DiaryApi, PageDefaults};
use crate::models::{MealType, MeasurementUnit, NutritionTotals, PendingDiaryEntry};
use crate::nutrition::{Conversion, ConversionParams, UnitInfo};

struct ConversionRule {
    unit_name: String,
    grams_per_unit: f64,
    per_unit: NutritionTotals,
}

/// Scriptable fake that records every call it receives.
///
/// Item units default to "no units registered", the catalog to a failure,
/// conversions to a rejection and batches to success.
#[derive(Default)]
pub(crate) struct FakeDiaryApi {
    item_units: HashMap<u64, Result<Vec<MeasurementUnit>, ApiError>>,
    catalog: Option<Vec<MeasurementUnit>>,
    conversions: HashMap<String, ConversionRule>,
    batch_error: Option<ApiError>,
    batch_delay: Option<Duration>,
    page_defaults: Option<PageDefaults>,
    calls: Mutex<Vec<String>>,
    logged: Mutex<Vec<Vec<PendingDiaryEntry>>>,
}

impl FakeDiaryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item_units(mut self, item_id: u64, units: Vec<MeasurementUnit>) -> Self {
        self.item_units.insert(item_id, Ok(units));
        self
    }

    pub fn with_item_units_error(mut self, item_id: u64, error: ApiError) -> Self {
        self.item_units.insert(item_id, Err(error));
        self
    }

    pub fn with_catalog(mut self, units: Vec<MeasurementUnit>) -> Self {
        self.catalog = Some(units);
        self
    }

    /// Conversions in `unit_id` answer `per_unit * quantity`, unrounded.
    pub fn with_conversion(
        mut self,
        unit_id: &str,
        unit_name: &str,
        grams_per_unit: f64,
        per_unit: NutritionTotals,
    ) -> Self {
        self.conversions.insert(
            unit_id.to_string(),
            ConversionRule {
                unit_name: unit_name.to_string(),
                grams_per_unit,
                per_unit,
            },
        );
        self
    }

    pub fn with_batch_error(mut self, error: ApiError) -> Self {
        self.batch_error = Some(error);
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = Some(delay);
        self
    }

    pub fn with_page_defaults(mut self, defaults: PageDefaults) -> Self {
        self.page_defaults = Some(defaults);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn logged_batches(&self) -> Vec<Vec<PendingDiaryEntry>> {
        self.logged.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DiaryApi for FakeDiaryApi {
    async fn units_for_item(&self, item_id: u64) -> Result<Vec<MeasurementUnit>, ApiError> {
        self.record(format!("units_for_item:{}", item_id));
        self.item_units
            .get(&item_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn unit_catalog(&self) -> Result<Vec<MeasurementUnit>, ApiError> {
        self.record("unit_catalog".to_string());
        self.catalog
            .clone()
            .ok_or_else(|| ApiError::Http("connection refused".to_string()))
    }

    async fn convert(&self, params: &ConversionParams) -> Result<Conversion, ApiError> {
        self.record(format!(
            "convert:{}:{}:{}",
            params.item_id, params.quantity, params.unit_id
        ));
        let rule = self
            .conversions
            .get(&params.unit_id)
            .ok_or_else(|| ApiError::Rejected("Unit not found".to_string()))?;

        Ok(Conversion {
            nutrition: rule.per_unit.scaled(params.quantity),
            unit_info: UnitInfo {
                name: rule.unit_name.clone(),
            },
            quantity_in_base_unit: rule.grams_per_unit * params.quantity,
        })
    }

    async fn log_batch(&self, entries: &[PendingDiaryEntry]) -> Result<BatchReceipt, ApiError> {
        self.record(format!("log_batch:{}", entries.len()));
        if let Some(delay) = self.batch_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.batch_error {
            return Err(error.clone());
        }

        self.logged.lock().unwrap().push(entries.to_vec());
        Ok(BatchReceipt {
            message: Some("Meals logged".to_string()),
        })
    }

    async fn page_defaults(
        &self,
        date: Option<NaiveDate>,
        meal_type: Option<MealType>,
    ) -> Result<PageDefaults, ApiError> {
        self.record(format!(
            "page_defaults:{}:{}",
            date.map(|d| d.to_string()).unwrap_or_default(),
            meal_type.map(|m| m.to_string()).unwrap_or_default()
        ));
        self.page_defaults
            .clone()
            .ok_or(ApiError::Unauthenticated)
    }
}
