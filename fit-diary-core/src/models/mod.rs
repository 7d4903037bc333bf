mod item;
mod meal_type;
mod nutrition;
mod pending_entry;
mod unit;

pub use item::SelectableItem;
pub use meal_type::MealType;
pub use nutrition::{format_number, NutritionTotals};
pub use pending_entry::{PendingDiaryEntry, NO_TIME_LABEL};
pub use unit::{MeasurementUnit, COUNT_UNIT_ID, GRAM_UNIT_ID, MILLILITER_UNIT_ID};
