//! Fit Diary Core Library
//!
//! Staging engine for diary entries: pick foods and recipes, resolve their
//! measurement units, compute nutrition, collect confirmed entries in a
//! pending batch and log them all in one request.

pub mod api;
pub mod batch;
pub mod classifier;
pub mod draft;
pub mod identifier;
pub mod models;
pub mod nutrition;
mod serde_util;
pub mod session;
pub mod submit;
pub mod units;

pub use api::{ApiError, BatchReceipt, DiaryApi, HttpDiaryApi, PageDefaults};
pub use batch::{PendingBatch, EMPTY_BATCH_MESSAGE};
pub use classifier::{classify, MealSlot};
pub use draft::{ConversionRequest, Draft, DraftPhase, UnitsRequest, ValidationError};
pub use identifier::extract_numeric_id;
pub use models::{
    MealType, MeasurementUnit, NutritionTotals, PendingDiaryEntry, SelectableItem,
};
pub use nutrition::{compute_totals, Conversion, ConversionParams};
pub use session::{DiarySession, Feedback};
pub use submit::{diary_path, BatchSubmitter, SubmitError, SubmitOutcome, DEFAULT_SUBMIT_TIMEOUT};
pub use units::{resolve_units, UnitResolution, UnitSource};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
