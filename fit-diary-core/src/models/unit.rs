use serde::{Deserialize, Serialize};
use std::fmt;

use crate::serde_util;

pub const GRAM_UNIT_ID: &str = "26";
pub const MILLILITER_UNIT_ID: &str = "28";
/// The count-based unit, preselected when the curated defaults are used.
pub const COUNT_UNIT_ID: &str = "31";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementUnit {
    #[serde(deserialize_with = "serde_util::string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default, deserialize_with = "serde_util::flag")]
    pub is_default: bool,
}

impl MeasurementUnit {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            abbreviation: abbreviation.into(),
            is_default: false,
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Gram, milliliter and unit, with the ids registered on the server.
    pub fn curated_defaults() -> Vec<MeasurementUnit> {
        vec![
            MeasurementUnit::new(GRAM_UNIT_ID, "Gram", "g"),
            MeasurementUnit::new(MILLILITER_UNIT_ID, "Milliliter", "ml"),
            MeasurementUnit::new(COUNT_UNIT_ID, "Unit", "un").with_default(true),
        ]
    }

    pub fn label(&self) -> String {
        if self.abbreviation.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.abbreviation)
        }
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let unit = MeasurementUnit::new("40", "Cup", "cp");
        assert_eq!(unit.label(), "Cup (cp)");

        let bare = MeasurementUnit::new("41", "Slice", "");
        assert_eq!(bare.label(), "Slice");
    }

    #[test]
    fn test_curated_defaults() {
        let defaults = MeasurementUnit::curated_defaults();
        let ids: Vec<&str> = defaults.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec![GRAM_UNIT_ID, MILLILITER_UNIT_ID, COUNT_UNIT_ID]);

        let flagged: Vec<&MeasurementUnit> = defaults.iter().filter(|u| u.is_default).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id, COUNT_UNIT_ID);
    }

    #[test]
    fn test_deserialize_numeric_id_and_flag() {
        let unit: MeasurementUnit = serde_json::from_str(
            r#"{"id": 40, "name": "Cup", "abbreviation": "cp", "is_default": 1}"#,
        )
        .unwrap();
        assert_eq!(unit.id, "40");
        assert!(unit.is_default);
    }
}
