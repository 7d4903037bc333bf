//! Lenient field deserializers for the remote API.
//!
//! The server is not consistent about JSON types: identifiers arrive as
//! numbers or strings, flags as booleans or 0/1, and macro values sometimes
//! as numeric strings. Missing or null values fall back to the type default.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Integer(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Scalar::Integer(n)) => Ok(n as f64),
        Some(Scalar::Float(n)) => Ok(n),
        Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Scalar::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{}'", s))),
        Some(Scalar::Bool(_)) => Err(de::Error::custom("expected a number, got a boolean")),
    }
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => false,
        Some(Scalar::Bool(b)) => b,
        Some(Scalar::Integer(n)) => n != 0,
        Some(Scalar::Float(n)) => n != 0.0,
        Some(Scalar::Text(s)) => matches!(s.trim(), "1" | "true"),
    })
}

/// Writes booleans as 0/1.
pub mod flag_as_int {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*value))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::string")]
        id: String,
        #[serde(default, deserialize_with = "super::number")]
        amount: f64,
        #[serde(default, deserialize_with = "super::flag")]
        enabled: bool,
    }

    #[test]
    fn test_accepts_mixed_scalar_types() {
        let sample: Sample =
            serde_json::from_str(r#"{"id": 26, "amount": "12.5", "enabled": 1}"#).unwrap();
        assert_eq!(sample.id, "26");
        assert_eq!(sample.amount, 12.5);
        assert!(sample.enabled);

        let sample: Sample =
            serde_json::from_str(r#"{"id": "taco_66", "amount": 3, "enabled": "0"}"#).unwrap();
        assert_eq!(sample.id, "taco_66");
        assert_eq!(sample.amount, 3.0);
        assert!(!sample.enabled);
    }

    #[test]
    fn test_missing_and_null_fall_back_to_defaults() {
        let sample: Sample = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(sample.id, "");
        assert_eq!(sample.amount, 0.0);
        assert!(!sample.enabled);
    }

    #[test]
    fn test_rejects_non_numeric_text() {
        let result = serde_json::from_str::<Sample>(r#"{"amount": "lots"}"#);
        assert!(result.is_err());
    }
}
