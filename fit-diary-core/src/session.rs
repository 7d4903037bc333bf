//! Async driver for one composing session.
//!
//! [`DiarySession`] owns the draft, the pending batch and the meal slot and
//! runs the requests the draft asks for against a [`DiaryApi`].

use chrono::{Local, NaiveDate, Timelike};
use tracing::{debug, info, warn};

use crate::api::DiaryApi;
use crate::batch::PendingBatch;
use crate::classifier::MealSlot;
use crate::draft::{ConversionRequest, Draft, ValidationError};
use crate::models::{MealType, PendingDiaryEntry, SelectableItem};
use crate::submit::{BatchSubmitter, SubmitError, SubmitOutcome};
use crate::units::resolve_units;

const ENTRY_ADDED_MESSAGE: &str =
    "Meal added to the list. Save to the diary to log everything at once.";
const ENTRY_REMOVED_MESSAGE: &str = "Item removed from the list.";
const SUBMITTED_MESSAGE: &str = "Meals logged successfully! Redirecting...";

/// Last status message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub success: bool,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

pub struct DiarySession<A: DiaryApi> {
    api: A,
    draft: Draft,
    batch: PendingBatch,
    slot: MealSlot,
    submitter: BatchSubmitter,
    favorite_recipes: Vec<SelectableItem>,
    recent_recipes: Vec<SelectableItem>,
    feedback: Option<Feedback>,
}

impl<A: DiaryApi> DiarySession<A> {
    /// Session with an explicit slot and no server defaults.
    pub fn new(api: A, slot: MealSlot) -> Self {
        Self {
            api,
            draft: Draft::new(),
            batch: PendingBatch::new(),
            slot,
            submitter: BatchSubmitter::new(),
            favorite_recipes: Vec::new(),
            recent_recipes: Vec::new(),
            feedback: None,
        }
    }

    /// Starts a session seeded from the server's page defaults.
    ///
    /// When they cannot be loaded the requested date and meal type are used,
    /// falling back to today and the current hour. The meal type is then
    /// classified from `time`.
    pub async fn open(
        api: A,
        date: Option<NaiveDate>,
        meal_type: Option<MealType>,
        time: Option<String>,
    ) -> Self {
        let mut session = match api.page_defaults(date, meal_type).await {
            Ok(defaults) => {
                debug!(date = %defaults.date, meal_type = %defaults.meal_type, "Loaded page defaults");
                let slot = MealSlot::new(defaults.date, defaults.meal_type)
                    .with_options(defaults.meal_type_labels());
                let mut session = Self::new(api, slot);
                session.favorite_recipes = defaults.favorite_recipes;
                session.recent_recipes = defaults.recent_recipes;
                session
            }
            Err(e) => {
                warn!(error = %e, "Failed to load page defaults, using local values");
                let now = Local::now();
                let slot = MealSlot::new(
                    date.unwrap_or_else(|| now.date_naive()),
                    meal_type.unwrap_or_else(|| MealType::for_hour(i64::from(now.hour()))),
                );
                Self::new(api, slot)
            }
        };

        session.slot.set_time(time);
        session.slot.auto_classify(true);
        session
    }

    pub fn with_submitter(mut self, submitter: BatchSubmitter) -> Self {
        self.submitter = submitter;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn batch(&self) -> &PendingBatch {
        &self.batch
    }

    pub fn slot(&self) -> &MealSlot {
        &self.slot
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn favorite_recipes(&self) -> &[SelectableItem] {
        &self.favorite_recipes
    }

    pub fn recent_recipes(&self) -> &[SelectableItem] {
        &self.recent_recipes
    }

    /// Selects an item and waits for its units and initial totals.
    pub async fn select_item(&mut self, item: SelectableItem) {
        let Some(request) = self.draft.select(item) else {
            return;
        };

        let resolution = resolve_units(&self.api, &request.item_id).await;
        if let Some(conversion) = self.draft.apply_units(request.generation, resolution) {
            self.run_conversion(conversion).await;
        }
    }

    pub async fn set_quantity(&mut self, quantity: &str) {
        if let Some(conversion) = self.draft.set_quantity(quantity) {
            self.run_conversion(conversion).await;
        }
    }

    /// Switches the unit. Ids outside the resolved units are rejected.
    pub async fn select_unit(&mut self, unit_id: &str) -> Result<(), ValidationError> {
        match self.draft.select_unit(unit_id) {
            Ok(Some(conversion)) => {
                self.run_conversion(conversion).await;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                self.feedback = Some(Feedback::error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run_conversion(&mut self, request: ConversionRequest) {
        let result = self.api.convert(&request.params).await;
        self.draft.apply_conversion(request.seq, result);
    }

    pub fn set_display_name(&mut self, name: &str) {
        self.draft.set_display_name(name);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.slot.set_date(date);
    }

    pub fn set_meal_time(&mut self, time: Option<String>) {
        self.slot.set_time(time);
    }

    /// Explicit meal type choice; time edits stop changing it afterwards.
    pub fn choose_meal_type(&mut self, meal_type: MealType) {
        self.slot.choose_meal_type(meal_type);
    }

    /// Moves the configured item into the batch.
    pub fn confirm(&mut self) -> Result<(), ValidationError> {
        match self.draft.confirm(&self.slot) {
            Ok(entry) => {
                debug!(entry = %entry.display_name, "Entry added to batch");
                self.batch.append(entry);
                self.feedback = Some(Feedback::success(ENTRY_ADDED_MESSAGE));
                Ok(())
            }
            Err(e) => {
                self.feedback = Some(Feedback::error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.draft.cancel();
    }

    pub fn remove_pending(&mut self, index: usize) -> Option<PendingDiaryEntry> {
        let removed = self.batch.remove_at(index)?;
        self.feedback = Some(Feedback::success(ENTRY_REMOVED_MESSAGE));
        Some(removed)
    }

    /// Submits the batch. On failure it stays intact for a retry.
    pub async fn submit_all(&mut self) -> Result<SubmitOutcome, SubmitError> {
        match self.submitter.submit_all(&self.api, &mut self.batch).await {
            Ok(outcome) => {
                info!(count = outcome.submitted, redirect = %outcome.redirect, "Session submitted");
                self.feedback = Some(Feedback::success(SUBMITTED_MESSAGE));
                Ok(outcome)
            }
            Err(e) => {
                self.feedback = Some(Feedback::error(e.to_string()));
                Err(e)
            }
        }
    }
}
