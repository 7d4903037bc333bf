//! Measurement unit resolution with tiered fallback.
//!
//! 1. Units registered for the item itself, when its id has a numeric part.
//! 2. The curated gram/milliliter/unit defaults followed by the generic catalog.
//! 3. Nothing: the item is not classified yet.
//!
//! Every tier swallows its own failure and hands over to the next one, so
//! resolution always completes.

use tracing::{debug, warn};

use crate::api::DiaryApi;
use crate::identifier::extract_numeric_id;
use crate::models::{MeasurementUnit, COUNT_UNIT_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSource {
    /// Registered for this specific item
    Item,
    /// Curated defaults plus the generic catalog
    Catalog,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitResolution {
    Resolved {
        units: Vec<MeasurementUnit>,
        /// Id of the preselected unit, always one of `units`
        selected: String,
        source: UnitSource,
    },
    /// No tier produced units
    Unavailable,
}

impl UnitResolution {
    pub fn units(&self) -> &[MeasurementUnit] {
        match self {
            UnitResolution::Resolved { units, .. } => units,
            UnitResolution::Unavailable => &[],
        }
    }

    pub fn selected(&self) -> Option<&MeasurementUnit> {
        match self {
            UnitResolution::Resolved {
                units, selected, ..
            } => units.iter().find(|u| &u.id == selected),
            UnitResolution::Unavailable => None,
        }
    }
}

/// Resolves the units usable for `item_id`. Never fails.
pub async fn resolve_units<A: DiaryApi + ?Sized>(api: &A, item_id: &str) -> UnitResolution {
    match extract_numeric_id(item_id) {
        Some(numeric_id) => {
            if let Some(resolution) = item_tier(api, numeric_id).await {
                return resolution;
            }
        }
        None => debug!(item_id, "No numeric id, skipping item units"),
    }

    if let Some(resolution) = catalog_tier(api).await {
        return resolution;
    }

    warn!(item_id, "No measurement units available for item");
    UnitResolution::Unavailable
}

async fn item_tier<A: DiaryApi + ?Sized>(api: &A, numeric_id: u64) -> Option<UnitResolution> {
    let units = match api.units_for_item(numeric_id).await {
        Ok(units) => units,
        Err(e) => {
            warn!(item_id = numeric_id, error = %e, "Failed to load item units");
            return None;
        }
    };

    let selected = units
        .iter()
        .find(|u| u.is_default)
        .or_else(|| units.first())?
        .id
        .clone();

    debug!(item_id = numeric_id, count = units.len(), "Using item units");
    Some(UnitResolution::Resolved {
        units,
        selected,
        source: UnitSource::Item,
    })
}

async fn catalog_tier<A: DiaryApi + ?Sized>(api: &A) -> Option<UnitResolution> {
    let catalog = match api.unit_catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %e, "Failed to load unit catalog");
            return None;
        }
    };

    let mut units = MeasurementUnit::curated_defaults();
    for unit in catalog {
        if !units.iter().any(|u| u.id == unit.id) {
            units.push(unit.with_default(false));
        }
    }

    debug!(count = units.len(), "Using default units and catalog");
    Some(UnitResolution::Resolved {
        units,
        selected: COUNT_UNIT_ID.to_string(),
        source: UnitSource::Catalog,
    })
}
