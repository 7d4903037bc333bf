//! Configuration of one selected item before it joins the batch.
//!
//! The draft performs no I/O. Operations that need the server return a
//! request descriptor ([`UnitsRequest`], [`ConversionRequest`]); the caller
//! runs it and hands the result back. Each selection gets a new generation
//! and each conversion a new sequence number, and results carrying an
//! outdated tag are dropped. A slow answer for an earlier quantity or item
//! therefore never overwrites newer state.
//!
//! ```text
//! Idle ──select──▶ UnitsResolving ──apply_units──▶ UnitsReady | NoUnitsAvailable
//!                                                    │  quantity / unit edits
//!                                 confirm | cancel ◀─┘
//! Idle ◀────────────────────────────────┘
//! ```

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::ApiError;
use crate::classifier::MealSlot;
use crate::models::{MeasurementUnit, NutritionTotals, PendingDiaryEntry, SelectableItem};
use crate::nutrition::{plan_totals, Computation, Conversion, ConversionParams};
use crate::units::UnitResolution;

pub const DEFAULT_QUANTITY: &str = "1";
pub const SERVING_LABEL: &str = "Serving";
pub const NOT_CLASSIFIED_NOTICE: &str =
    "This food has not been classified yet. Measurement units are not available.";

const QUANTITY_LABEL: &str = "Quantity";
const SERVINGS_LABEL: &str = "Servings";
const NOT_CLASSIFIED_LABEL: &str = "Food not classified";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    Idle,
    UnitsResolving,
    /// Quantity (and unit, for foods) can be edited
    UnitsReady,
    /// Terminal for the current item: per-serving scaling, no unit selector
    NoUnitsAvailable,
}

/// Reasons `confirm` refuses to build an entry. Messages are user facing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Select a food or recipe first.")]
    NoItemSelected,

    #[error("Please enter the meal name.")]
    EmptyName,

    #[error("Please enter a valid quantity.")]
    InvalidQuantity,

    #[error("Select a measurement unit for the food.")]
    MissingUnit,

    #[error("Nutrition is still being calculated. Try again in a moment.")]
    ComputationPending,

    #[error("Nutrition could not be calculated for this quantity. Try again or pick another unit.")]
    ComputationFailed,

    #[error("Unit {0} is not available for this item.")]
    UnitUnavailable(String),
}

/// Unit lookup to run for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitsRequest {
    pub generation: u64,
    pub item_id: String,
}

/// Conversion to run; the answer goes back through `apply_conversion`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub seq: u64,
    pub params: ConversionParams,
}

#[derive(Debug, Clone)]
enum UnitState {
    NotApplicable,
    Resolving,
    Ready {
        units: Vec<MeasurementUnit>,
        selected: Option<String>,
    },
    Unavailable,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    seq: u64,
    quantity: f64,
}

#[derive(Debug, Clone)]
struct Selection {
    item: SelectableItem,
    generation: u64,
    display_name: String,
    quantity: String,
    units: UnitState,
    totals: NutritionTotals,
    caption: Option<String>,
    in_flight: Option<InFlight>,
    /// Last conversion failed; `totals` belong to an earlier quantity or unit
    stale: bool,
}

impl Selection {
    fn new(item: SelectableItem, generation: u64) -> Self {
        let units = if item.is_food {
            UnitState::Resolving
        } else {
            UnitState::NotApplicable
        };
        Self {
            display_name: item.name.clone(),
            item,
            generation,
            quantity: DEFAULT_QUANTITY.to_string(),
            units,
            totals: NutritionTotals::zero(),
            caption: None,
            in_flight: None,
            stale: false,
        }
    }

    fn selected_unit(&self) -> Option<&MeasurementUnit> {
        match &self.units {
            UnitState::Ready {
                units,
                selected: Some(id),
            } => units.iter().find(|u| &u.id == id),
            _ => None,
        }
    }

    fn unit_selector_visible(&self) -> bool {
        self.item.is_food && matches!(self.units, UnitState::Resolving | UnitState::Ready { .. })
    }

    fn reset_totals(&mut self) {
        self.totals = NutritionTotals::zero();
        self.caption = None;
        self.in_flight = None;
        self.stale = false;
    }
}

/// The item currently being configured, if any.
#[derive(Debug, Default)]
pub struct Draft {
    generation: u64,
    next_seq: u64,
    selection: Option<Selection>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DraftPhase {
        match self.selection.as_ref().map(|s| &s.units) {
            None => DraftPhase::Idle,
            Some(UnitState::Resolving) => DraftPhase::UnitsResolving,
            Some(UnitState::NotApplicable | UnitState::Ready { .. }) => DraftPhase::UnitsReady,
            Some(UnitState::Unavailable) => DraftPhase::NoUnitsAvailable,
        }
    }

    /// Starts configuring `item`, discarding everything about the previous one.
    ///
    /// Foods need their units resolved first; recipes are computed right away.
    pub fn select(&mut self, item: SelectableItem) -> Option<UnitsRequest> {
        self.generation += 1;
        let request = item.is_food.then(|| UnitsRequest {
            generation: self.generation,
            item_id: item.id.clone(),
        });

        debug!(item_id = %item.id, is_food = item.is_food, generation = self.generation, "Item selected");
        self.selection = Some(Selection::new(item, self.generation));

        if request.is_none() {
            // Recipes never produce a conversion request.
            let _ = self.recompute();
        }
        request
    }

    /// Installs resolved units. Results for an earlier selection are ignored.
    pub fn apply_units(
        &mut self,
        generation: u64,
        resolution: UnitResolution,
    ) -> Option<ConversionRequest> {
        let selection = self.selection.as_mut()?;
        if selection.generation != generation || !matches!(selection.units, UnitState::Resolving)
        {
            debug!(generation, "Discarding units for a previous selection");
            return None;
        }

        selection.units = match resolution {
            UnitResolution::Resolved {
                units, selected, ..
            } => UnitState::Ready {
                units,
                selected: Some(selected),
            },
            UnitResolution::Unavailable => UnitState::Unavailable,
        };
        self.recompute()
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        if let Some(selection) = self.selection.as_mut() {
            selection.display_name = name.into();
        }
    }

    /// Updates the quantity text; fires on every edit.
    pub fn set_quantity(&mut self, quantity: impl Into<String>) -> Option<ConversionRequest> {
        self.selection.as_mut()?.quantity = quantity.into();
        self.recompute()
    }

    /// Picks one of the resolved units. Unknown ids leave the selection as is.
    pub fn select_unit(
        &mut self,
        unit_id: &str,
    ) -> Result<Option<ConversionRequest>, ValidationError> {
        let selection = self
            .selection
            .as_mut()
            .ok_or(ValidationError::NoItemSelected)?;
        match &mut selection.units {
            UnitState::Ready { units, selected } if units.iter().any(|u| u.id == unit_id) => {
                *selected = Some(unit_id.to_string());
            }
            _ => {
                warn!(unit_id, "Rejecting selection of an unavailable unit");
                return Err(ValidationError::UnitUnavailable(unit_id.to_string()));
            }
        }
        Ok(self.recompute())
    }

    /// Applies a conversion answer. Returns false if it was stale and dropped.
    ///
    /// A failed conversion keeps the last known totals.
    pub fn apply_conversion(&mut self, seq: u64, result: Result<Conversion, ApiError>) -> bool {
        let Some(selection) = self.selection.as_mut() else {
            return false;
        };
        let in_flight = match selection.in_flight {
            Some(in_flight) if in_flight.seq == seq => in_flight,
            _ => {
                debug!(seq, "Discarding stale conversion response");
                return false;
            }
        };
        selection.in_flight = None;

        match result {
            Ok(conversion) => {
                selection.caption = Some(conversion.caption(in_flight.quantity));
                selection.totals = conversion.nutrition;
                selection.stale = false;
            }
            Err(e) => {
                warn!(seq, error = %e, "Nutrition conversion failed");
                selection.stale = true;
            }
        }
        true
    }

    fn recompute(&mut self) -> Option<ConversionRequest> {
        let selection = self.selection.as_mut()?;
        let unit_id = match &selection.units {
            UnitState::Resolving => return None,
            UnitState::Ready { selected: None, .. } => return None,
            UnitState::Ready {
                selected: Some(id), ..
            } => Some(id.as_str()),
            UnitState::NotApplicable | UnitState::Unavailable => None,
        };

        match plan_totals(&selection.item, &selection.quantity, unit_id) {
            Computation::Local(totals) => {
                selection.reset_totals();
                selection.totals = totals;
                None
            }
            Computation::Invalid => {
                selection.reset_totals();
                None
            }
            Computation::Remote(params) => {
                self.next_seq += 1;
                let seq = self.next_seq;
                selection.in_flight = Some(InFlight {
                    seq,
                    quantity: params.quantity,
                });
                Some(ConversionRequest { seq, params })
            }
        }
    }

    /// Validates the draft and turns it into a pending entry.
    ///
    /// On success the draft returns to idle. On failure nothing changes.
    pub fn confirm(&mut self, slot: &MealSlot) -> Result<PendingDiaryEntry, ValidationError> {
        let selection = self
            .selection
            .as_ref()
            .ok_or(ValidationError::NoItemSelected)?;

        let display_name = selection.display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let quantity = crate::nutrition::parse_quantity(&selection.quantity)
            .ok_or(ValidationError::InvalidQuantity)?;
        if selection.unit_selector_visible() && selection.selected_unit().is_none() {
            return Err(ValidationError::MissingUnit);
        }
        if selection.in_flight.is_some() {
            return Err(ValidationError::ComputationPending);
        }
        if selection.stale {
            return Err(ValidationError::ComputationFailed);
        }

        let item = &selection.item;
        let unit = selection.selected_unit();
        let (servings_consumed, per_serving) = if item.is_food {
            (1.0, selection.totals)
        } else {
            (quantity, item.per_serving())
        };

        let entry = PendingDiaryEntry {
            id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            is_food: item.is_food,
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            meal_type: slot.meal_type(),
            meal_type_label: slot.meal_type_label(),
            meal_time: slot.time().map(str::to_string),
            date_consumed: slot.date(),
            quantity,
            servings_consumed,
            unit_id: unit.map(|u| u.id.clone()),
            unit_label: unit
                .map(MeasurementUnit::label)
                .unwrap_or_else(|| SERVING_LABEL.to_string()),
            per_serving,
            totals: selection.totals,
        };

        debug!(entry_id = %entry.id, item_id = %entry.item_id, "Draft confirmed");
        self.selection = None;
        Ok(entry)
    }

    /// Discards the current selection.
    pub fn cancel(&mut self) {
        self.selection = None;
    }

    pub fn item(&self) -> Option<&SelectableItem> {
        self.selection.as_ref().map(|s| &s.item)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.display_name.as_str())
    }

    pub fn quantity(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.quantity.as_str())
    }

    pub fn units(&self) -> &[MeasurementUnit] {
        match self.selection.as_ref().map(|s| &s.units) {
            Some(UnitState::Ready { units, .. }) => units,
            _ => &[],
        }
    }

    pub fn selected_unit(&self) -> Option<&MeasurementUnit> {
        self.selection.as_ref().and_then(Selection::selected_unit)
    }

    pub fn totals(&self) -> NutritionTotals {
        self.selection
            .as_ref()
            .map(|s| s.totals)
            .unwrap_or_default()
    }

    /// Conversion caption for foods, e.g. `2 cup = 480g`.
    pub fn caption(&self) -> Option<&str> {
        self.selection.as_ref().and_then(|s| s.caption.as_deref())
    }

    pub fn is_computing(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.in_flight.is_some())
    }

    pub fn unit_selector_visible(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(Selection::unit_selector_visible)
    }

    /// The quantity field takes the whole row when there is no unit selector.
    pub fn quantity_full_width(&self) -> bool {
        self.selection.is_some() && !self.unit_selector_visible()
    }

    pub fn notice(&self) -> Option<&'static str> {
        (self.phase() == DraftPhase::NoUnitsAvailable).then_some(NOT_CLASSIFIED_NOTICE)
    }

    pub fn quantity_label(&self) -> &'static str {
        match self.selection.as_ref().map(|s| &s.units) {
            Some(UnitState::NotApplicable) => SERVINGS_LABEL,
            Some(UnitState::Unavailable) => NOT_CLASSIFIED_LABEL,
            _ => QUANTITY_LABEL,
        }
    }
}
