//! Static gain applied to every window. Serves as a simple inner processor.

use serde::{Deserialize, Serialize};

use super::level::deserialize_linear_gain;
use crate::container::ChannelBlock;
use crate::dsp::{BlockProcessor, ProcessSpec, Sample};

const DEFAULT_GAIN: f64 = 1.0;

/// Serialized configuration for gain parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GainSettings {
    #[serde(deserialize_with = "deserialize_linear_gain")]
    pub gain: f64,
}

impl GainSettings {
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }
}

impl Default for GainSettings {
    fn default() -> Self {
        Self { gain: DEFAULT_GAIN }
    }
}

/// Configured gain effect.
///
/// A minimal stateless inner processor for [`OverlapAdd`](crate::OverlapAdd): it scales
/// every window by a fixed linear gain, configurable from JSON as a number or a dB string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GainEffect {
    pub enabled: bool,
    #[serde(flatten)]
    pub settings: GainSettings,
}

impl Default for GainEffect {
    fn default() -> Self {
        Self {
            enabled: false,
            settings: GainSettings::default(),
        }
    }
}

impl GainEffect {
    /// An enabled effect with the given linear gain.
    pub fn new(gain: f64) -> Self {
        Self {
            enabled: true,
            settings: GainSettings::new(gain),
        }
    }
}

impl<T: Sample> BlockProcessor<T> for GainEffect {
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn process(&mut self, block: &mut ChannelBlock<T>) {
        if !self.enabled {
            return;
        }
        let gain = T::from_f64(sanitize_gain(self.settings.gain));
        for sample in block.as_mut_slice() {
            *sample *= gain;
        }
    }

    fn reset(&mut self) {}
}

fn sanitize_gain(gain: f64) -> f64 {
    if gain.is_finite() {
        gain
    } else {
        DEFAULT_GAIN
    }
}
