//! Meal-type inference from the time of day.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::identifier::parse_leading_int;
use crate::models::MealType;

/// Classifies a `HH:MM` time into a meal type.
///
/// Only the hour is considered. Returns `None` when no hour can be read.
pub fn classify(time: &str) -> Option<MealType> {
    let hours = time.split(':').next()?;
    parse_leading_int(hours).map(MealType::for_hour)
}

/// Date, time and meal type shared by every entry composed in one session.
///
/// The meal type follows the time automatically until the user picks one
/// directly. That choice trips a one-way latch: later time changes no longer
/// touch the meal type for the rest of the session.
#[derive(Debug, Clone)]
pub struct MealSlot {
    date: NaiveDate,
    time: Option<String>,
    meal_type: MealType,
    options: BTreeMap<MealType, String>,
    user_selected: bool,
}

impl MealSlot {
    pub fn new(date: NaiveDate, meal_type: MealType) -> Self {
        Self {
            date,
            time: None,
            meal_type,
            options: BTreeMap::new(),
            user_selected: false,
        }
    }

    /// Restricts and relabels the selectable meal types.
    pub fn with_options(mut self, options: BTreeMap<MealType, String>) -> Self {
        self.options = options;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn meal_type(&self) -> MealType {
        self.meal_type
    }

    pub fn options(&self) -> &BTreeMap<MealType, String> {
        &self.options
    }

    pub fn meal_type_label(&self) -> String {
        self.options
            .get(&self.meal_type)
            .cloned()
            .unwrap_or_else(|| self.meal_type.default_label().to_string())
    }

    pub fn is_user_selected(&self) -> bool {
        self.user_selected
    }

    /// Updates the time and re-classifies unless the latch is tripped.
    pub fn set_time(&mut self, time: Option<String>) {
        self.time = time.filter(|t| !t.trim().is_empty());
        self.auto_classify(false);
    }

    /// Direct user choice of meal type. Trips the latch permanently.
    pub fn choose_meal_type(&mut self, meal_type: MealType) {
        self.meal_type = meal_type;
        self.user_selected = true;
    }

    /// Applies the classification of the current time.
    ///
    /// `force` ignores the latch; it is used once when a session opens.
    /// Returns whether the meal type changed.
    pub fn auto_classify(&mut self, force: bool) -> bool {
        if self.user_selected && !force {
            return false;
        }
        let Some(slug) = self.time.as_deref().and_then(classify) else {
            return false;
        };
        if !self.options.is_empty() && !self.options.contains_key(&slug) {
            debug!(meal_type = %slug, "Classified meal type is not an offered option");
            return false;
        }

        let changed = self.meal_type != slug;
        self.meal_type = slug;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> MealSlot {
        MealSlot::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            MealType::Breakfast,
        )
    }

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("07:30"), Some(MealType::Breakfast));
        assert_eq!(classify("11:59"), Some(MealType::MorningSnack));
        assert_eq!(classify("12:00"), Some(MealType::Lunch));
        assert_eq!(classify("17:45"), Some(MealType::AfternoonSnack));
        assert_eq!(classify("20:59"), Some(MealType::Dinner));
        assert_eq!(classify("23:00"), Some(MealType::Supper));
        assert_eq!(classify("04:10"), Some(MealType::Supper));
    }

    #[test]
    fn test_classify_unreadable() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("noon"), None);
        assert_eq!(classify(":30"), None);
    }

    #[test]
    fn test_time_change_classifies() {
        let mut slot = slot();
        slot.set_time(Some("19:15".to_string()));
        assert_eq!(slot.meal_type(), MealType::Dinner);
        assert_eq!(slot.time(), Some("19:15"));
    }

    #[test]
    fn test_latch_blocks_classification() {
        let mut slot = slot();
        slot.choose_meal_type(MealType::Lunch);
        assert!(slot.is_user_selected());

        slot.set_time(Some("07:30".to_string()));
        assert_eq!(slot.meal_type(), MealType::Lunch);

        slot.set_time(Some("23:00".to_string()));
        assert_eq!(slot.meal_type(), MealType::Lunch);
        assert!(slot.is_user_selected());
    }

    #[test]
    fn test_forced_classification_ignores_latch() {
        let mut slot = slot();
        slot.choose_meal_type(MealType::Lunch);
        slot.set_time(Some("07:30".to_string()));

        assert!(slot.auto_classify(true));
        assert_eq!(slot.meal_type(), MealType::Breakfast);
        assert!(slot.is_user_selected());
    }

    #[test]
    fn test_classification_limited_to_offered_options() {
        let options: BTreeMap<MealType, String> = [
            (MealType::Breakfast, "Café da manhã".to_string()),
            (MealType::Lunch, "Almoço".to_string()),
        ]
        .into_iter()
        .collect();
        let mut slot = slot().with_options(options);

        slot.set_time(Some("19:00".to_string()));
        assert_eq!(slot.meal_type(), MealType::Breakfast);

        slot.set_time(Some("12:30".to_string()));
        assert_eq!(slot.meal_type(), MealType::Lunch);
        assert_eq!(slot.meal_type_label(), "Almoço");
    }

    #[test]
    fn test_default_label_without_options() {
        let slot = slot();
        assert_eq!(slot.meal_type_label(), "Breakfast");
    }

    #[test]
    fn test_empty_time_is_cleared() {
        let mut slot = slot();
        slot.set_time(Some("  ".to_string()));
        assert_eq!(slot.time(), None);
        assert_eq!(slot.meal_type(), MealType::Breakfast);
    }
}
