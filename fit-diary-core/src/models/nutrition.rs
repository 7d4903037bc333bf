use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::serde_util;

/// Macro totals for a quantity of food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    #[serde(default, deserialize_with = "serde_util::number")]
    pub kcal: f64,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub protein: f64,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "serde_util::number")]
    pub fat: f64,
}

impl NutritionTotals {
    pub fn new(kcal: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            kcal,
            protein,
            carbs,
            fat,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            kcal: self.kcal * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }

    /// Applies the display rounding policy: whole kcal, grams to one decimal.
    pub fn rounded(self) -> Self {
        Self {
            kcal: self.kcal.round(),
            protein: round_one_decimal(self.protein),
            carbs: round_one_decimal(self.carbs),
            fat: round_one_decimal(self.fat),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl Add for NutritionTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            kcal: self.kcal + other.kcal,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a NutritionTotals> for NutritionTotals {
    fn sum<I: Iterator<Item = &'a NutritionTotals>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for NutritionTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kcal | P: {}g | C: {}g | F: {}g",
            format_number(self.kcal, 0),
            format_number(self.protein, 1),
            format_number(self.carbs, 1),
            format_number(self.fat, 1)
        )
    }
}

/// Whole numbers print without decimals, everything else with `decimals` places.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.*}", decimals, value)
    }
}
