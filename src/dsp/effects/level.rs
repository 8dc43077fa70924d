//! Linear / decibel gain conversions and a serde helper accepting either form.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};

/// Convert a dB value to linear gain.
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert a linear gain to dB. Non-positive values clamp to the smallest positive gain.
pub fn linear_to_db(value: f64) -> f64 {
    20.0 * value.max(f64::MIN_POSITIVE).log10()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GainValue {
    Number(f64),
    Text(String),
}

/// Deserialize a linear gain given either as a number or as a string like `"-6db"`.
pub(super) fn deserialize_linear_gain<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match GainValue::deserialize(deserializer)? {
        GainValue::Number(value) => Ok(value),
        GainValue::Text(text) => parse_gain_text(&text)
            .ok_or_else(|| DeError::custom(format!("invalid gain value \"{}\"", text))),
    }
}

fn parse_gain_text(text: &str) -> Option<f64> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }
    match lower.strip_suffix("db") {
        Some(db) => db.trim().parse::<f64>().ok().map(db_to_linear),
        None => lower.parse::<f64>().ok(),
    }
}
