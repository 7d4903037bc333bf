use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    Supper,
}

impl MealType {
    pub const ALL: [MealType; 6] = [
        MealType::Breakfast,
        MealType::MorningSnack,
        MealType::Lunch,
        MealType::AfternoonSnack,
        MealType::Dinner,
        MealType::Supper,
    ];

    /// Meal type for an hour of the day.
    ///
    /// Ranges are half-open; anything outside 05:00-21:00 (including
    /// out-of-range hours) is supper.
    pub fn for_hour(hour: i64) -> Self {
        match hour {
            5..=9 => MealType::Breakfast,
            10..=11 => MealType::MorningSnack,
            12..=14 => MealType::Lunch,
            15..=17 => MealType::AfternoonSnack,
            18..=20 => MealType::Dinner,
            _ => MealType::Supper,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::MorningSnack => "morning_snack",
            MealType::Lunch => "lunch",
            MealType::AfternoonSnack => "afternoon_snack",
            MealType::Dinner => "dinner",
            MealType::Supper => "supper",
        }
    }

    /// Label used when the server did not provide one.
    pub fn default_label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::MorningSnack => "Morning snack",
            MealType::Lunch => "Lunch",
            MealType::AfternoonSnack => "Afternoon snack",
            MealType::Dinner => "Dinner",
            MealType::Supper => "Supper",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        MealType::ALL
            .into_iter()
            .find(|meal_type| meal_type.slug() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid meal type '{}'. Valid options: breakfast, morning_snack, lunch, \
                     afternoon_snack, dinner, supper",
                    s
                )
            })
    }
}
