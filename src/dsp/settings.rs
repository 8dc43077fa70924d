//! Serializable overlap-add configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HOP_SIZE, DEFAULT_WINDOW_SIZE};
use crate::dsp::OverlapAddError;

/// Window and hop lengths for an [`OverlapAdd`](crate::OverlapAdd) adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapAddSettings {
    #[serde(alias = "block_size")]
    pub window_size: usize,
    #[serde(alias = "hop")]
    pub hop_size: usize,
}

impl OverlapAddSettings {
    /// Create a settings payload.
    pub fn new(window_size: usize, hop_size: usize) -> Self {
        Self {
            window_size,
            hop_size,
        }
    }

    /// Parse settings from a JSON object and validate them.
    ///
    /// Missing fields fall back to the defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the lengths are unusable.
    pub fn from_json(json: &str) -> Result<Self, OverlapAddError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Number of windows that overlap at every output position.
    pub fn overlap_factor(&self) -> usize {
        self.window_size / self.hop_size.max(1)
    }

    /// Check that the hop is non-zero, smaller than the window and divides it evenly.
    ///
    /// Fractional overlap ratios are rejected rather than resampled.
    pub fn validate(&self) -> Result<(), OverlapAddError> {
        let (window, hop) = (self.window_size, self.hop_size);
        if hop == 0 {
            return Err(OverlapAddError::ZeroHop);
        }
        if hop >= window {
            return Err(OverlapAddError::HopNotSmallerThanWindow { window, hop });
        }
        if window % hop != 0 {
            return Err(OverlapAddError::FractionalOverlap { window, hop });
        }
        Ok(())
    }
}

impl Default for OverlapAddSettings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_half_overlap() {
        let settings = OverlapAddSettings::default();
        assert_eq!(settings.window_size, 1024);
        assert_eq!(settings.hop_size, 512);
        assert_eq!(settings.overlap_factor(), 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn parses_fields_and_aliases() {
        let settings = OverlapAddSettings::from_json(r#"{"window_size":256,"hop_size":64}"#)
            .expect("parse settings");
        assert_eq!(settings, OverlapAddSettings::new(256, 64));

        let settings =
            OverlapAddSettings::from_json(r#"{"block_size":8,"hop":2}"#).expect("parse aliases");
        assert_eq!(settings, OverlapAddSettings::new(8, 2));
        assert_eq!(settings.overlap_factor(), 4);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings = OverlapAddSettings::from_json(r#"{"hop_size":256}"#).expect("parse");
        assert_eq!(settings, OverlapAddSettings::new(1024, 256));
    }

    #[test]
    fn rejects_unusable_lengths() {
        assert!(matches!(
            OverlapAddSettings::new(8, 0).validate(),
            Err(OverlapAddError::ZeroHop)
        ));
        assert!(matches!(
            OverlapAddSettings::new(8, 8).validate(),
            Err(OverlapAddError::HopNotSmallerThanWindow { window: 8, hop: 8 })
        ));
        assert!(matches!(
            OverlapAddSettings::new(8, 16).validate(),
            Err(OverlapAddError::HopNotSmallerThanWindow { .. })
        ));
        assert!(matches!(
            OverlapAddSettings::new(10, 4).validate(),
            Err(OverlapAddError::FractionalOverlap { window: 10, hop: 4 })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = OverlapAddSettings::from_json(r#"{"window_size":"big"}"#).unwrap_err();
        assert!(matches!(err, OverlapAddError::Parse(_)));
        assert!(err.to_string().starts_with("invalid overlap-add settings"));

        let err = OverlapAddSettings::from_json(r#"{"window_size":12,"hop_size":5}"#).unwrap_err();
        assert_eq!(err.to_string(), "window size 12 is not a multiple of hop size 5");
    }
}
