//! Brick-wall band-pass filter applied in the frequency domain, one window at a time.
//!
//! Intended to run inside [`OverlapAdd`](crate::OverlapAdd), which supplies the fixed
//! window length the FFT needs.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::SAMPLE_RATE;
use crate::container::ChannelBlock;
use crate::dsp::{BlockProcessor, ProcessSpec};
use crate::fft::{frequency_for_bin, Complex, FourierBin};

const DEFAULT_LOW_HZ: f32 = 0.0;
const DEFAULT_HIGH_HZ: f32 = 20_000.0;

#[cfg(not(feature = "real-fft"))]
mod complex_fft {
    use std::sync::Arc;

    use rustfft::{Fft, FftPlanner};

    use crate::fft::Complex;

    #[derive(Clone)]
    pub(super) struct SpectralEngine {
        fft_size: usize,
        forward: Arc<dyn Fft<f32>>,
        inverse: Arc<dyn Fft<f32>>,
        buffer: Vec<Complex<f32>>,
        scratch: Vec<Complex<f32>>,
    }

    impl SpectralEngine {
        pub(super) fn new(fft_size: usize) -> Self {
            let mut planner = FftPlanner::<f32>::new();
            let forward = planner.plan_fft_forward(fft_size);
            let inverse = planner.plan_fft_inverse(fft_size);
            let scratch_len = forward
                .get_inplace_scratch_len()
                .max(inverse.get_inplace_scratch_len());
            Self {
                fft_size,
                forward,
                inverse,
                buffer: vec![Complex::new(0.0, 0.0); fft_size],
                scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            }
        }

        pub(super) fn spectrum_len(&self) -> usize {
            self.fft_size / 2 + 1
        }

        pub(super) fn forward(&mut self, samples: &[f32], spectrum: &mut [Complex<f32>]) -> bool {
            if samples.len() != self.fft_size || spectrum.len() != self.spectrum_len() {
                return false;
            }
            for (bin, &sample) in self.buffer.iter_mut().zip(samples) {
                *bin = Complex::new(sample, 0.0);
            }
            self.forward
                .process_with_scratch(&mut self.buffer, &mut self.scratch);
            spectrum.copy_from_slice(&self.buffer[..spectrum.len()]);
            true
        }

        /// Unnormalized inverse transform of a half spectrum.
        pub(super) fn inverse(
            &mut self,
            spectrum: &mut [Complex<f32>],
            samples: &mut [f32],
        ) -> bool {
            if samples.len() != self.fft_size || spectrum.len() != self.spectrum_len() {
                return false;
            }
            let n = self.fft_size;
            self.buffer[..spectrum.len()].copy_from_slice(spectrum);
            for k in 1..spectrum.len() {
                if n - k != k {
                    self.buffer[n - k] = spectrum[k].conj();
                }
            }
            self.inverse
                .process_with_scratch(&mut self.buffer, &mut self.scratch);
            for (sample, bin) in samples.iter_mut().zip(&self.buffer) {
                *sample = bin.re;
            }
            true
        }
    }
}

#[cfg(feature = "real-fft")]
mod real_fft {
    use std::sync::Arc;

    use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

    use crate::fft::Complex;

    #[derive(Clone)]
    pub(super) struct SpectralEngine {
        fft_size: usize,
        r2c: Arc<dyn RealToComplex<f32>>,
        c2r: Arc<dyn ComplexToReal<f32>>,
        time_domain: Vec<f32>,
        scratch: Vec<Complex<f32>>,
    }

    impl SpectralEngine {
        pub(super) fn new(fft_size: usize) -> Self {
            let mut planner = RealFftPlanner::<f32>::new();
            let r2c = planner.plan_fft_forward(fft_size);
            let c2r = planner.plan_fft_inverse(fft_size);
            let scratch_len = r2c.get_scratch_len().max(c2r.get_scratch_len());
            Self {
                fft_size,
                r2c,
                c2r,
                time_domain: vec![0.0; fft_size],
                scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            }
        }

        pub(super) fn spectrum_len(&self) -> usize {
            self.fft_size / 2 + 1
        }

        pub(super) fn forward(&mut self, samples: &[f32], spectrum: &mut [Complex<f32>]) -> bool {
            if samples.len() != self.fft_size {
                return false;
            }
            self.time_domain.copy_from_slice(samples);
            self.r2c
                .process_with_scratch(&mut self.time_domain, spectrum, &mut self.scratch)
                .is_ok()
        }

        /// Unnormalized inverse transform of a half spectrum.
        pub(super) fn inverse(
            &mut self,
            spectrum: &mut [Complex<f32>],
            samples: &mut [f32],
        ) -> bool {
            if samples.len() != self.fft_size || spectrum.is_empty() {
                return false;
            }
            // The DC bin, and the Nyquist bin of an even-length transform, must be real.
            spectrum[0].im = 0.0;
            if self.fft_size % 2 == 0 {
                if let Some(nyquist) = spectrum.last_mut() {
                    nyquist.im = 0.0;
                }
            }
            let transformed = self
                .c2r
                .process_with_scratch(spectrum, &mut self.time_domain, &mut self.scratch);
            if transformed.is_err() {
                return false;
            }
            samples.copy_from_slice(&self.time_domain);
            true
        }
    }
}

#[cfg(not(feature = "real-fft"))]
use complex_fft::SpectralEngine;
#[cfg(feature = "real-fft")]
use real_fft::SpectralEngine;

/// Serialized configuration for the pass band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralFilterSettings {
    #[serde(alias = "low", alias = "low_freq")]
    pub low_hz: f32,
    #[serde(alias = "high", alias = "high_freq")]
    pub high_hz: f32,
}

impl SpectralFilterSettings {
    pub fn new(low_hz: f32, high_hz: f32) -> Self {
        Self { low_hz, high_hz }
    }

    fn passes(&self, frequency: f32) -> bool {
        frequency >= self.low_hz && frequency <= self.high_hz
    }
}

impl Default for SpectralFilterSettings {
    fn default() -> Self {
        Self {
            low_hz: DEFAULT_LOW_HZ,
            high_hz: DEFAULT_HIGH_HZ,
        }
    }
}

#[derive(Clone)]
struct SpectralState {
    sample_rate: f64,
    fft_size: usize,
    engine: SpectralEngine,
    analysis: Vec<Vec<Complex<f32>>>,
    work: Vec<Complex<f32>>,
    mask: Vec<f32>,
    mask_settings: SpectralFilterSettings,
}

impl SpectralState {
    fn new(spec: &ProcessSpec, settings: &SpectralFilterSettings) -> Self {
        let fft_size = spec.maximum_block_size;
        let engine = SpectralEngine::new(fft_size);
        let bins = engine.spectrum_len();
        let mut state = Self {
            sample_rate: spec.sample_rate,
            fft_size,
            engine,
            analysis: vec![vec![Complex::new(0.0, 0.0); bins]; spec.num_channels],
            work: vec![Complex::new(0.0, 0.0); bins],
            mask: vec![1.0; bins],
            mask_settings: settings.clone(),
        };
        state.update_mask(settings);
        state
    }

    fn update_mask(&mut self, settings: &SpectralFilterSettings) {
        for (bin, gain) in self.mask.iter_mut().enumerate() {
            let frequency = frequency_for_bin(bin, self.fft_size, self.sample_rate);
            *gain = if settings.passes(frequency) { 1.0 } else { 0.0 };
        }
        self.mask_settings = settings.clone();
    }
}

/// Configured spectral band-pass filter with runtime FFT state.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralFilterEffect {
    pub enabled: bool,
    #[serde(flatten)]
    pub settings: SpectralFilterSettings,
    #[serde(skip)]
    state: Option<SpectralState>,
}

impl std::fmt::Debug for SpectralFilterEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralFilterEffect")
            .field("enabled", &self.enabled)
            .field("settings", &self.settings)
            .field("fft_size", &self.state.as_ref().map(|state| state.fft_size))
            .finish()
    }
}

impl Default for SpectralFilterEffect {
    fn default() -> Self {
        Self {
            enabled: false,
            settings: SpectralFilterSettings::default(),
            state: None,
        }
    }
}

impl SpectralFilterEffect {
    /// An enabled filter passing `[low_hz, high_hz]`.
    pub fn new(low_hz: f32, high_hz: f32) -> Self {
        Self {
            enabled: true,
            settings: SpectralFilterSettings::new(low_hz, high_hz),
            state: None,
        }
    }

    /// FFT length chosen by the last `prepare`, if any.
    pub fn fft_size(&self) -> Option<usize> {
        self.state.as_ref().map(|state| state.fft_size)
    }

    /// Spectrum of the last window analysed on `channel`, before filtering.
    ///
    /// Empty if the effect has not been prepared or the channel does not exist.
    pub fn spectrum(&self, channel: usize) -> Vec<FourierBin> {
        let Some(state) = self.state.as_ref() else {
            return Vec::new();
        };
        let Some(bins) = state.analysis.get(channel) else {
            return Vec::new();
        };
        bins.iter()
            .enumerate()
            .map(|(bin, value)| {
                FourierBin::new(
                    frequency_for_bin(bin, state.fft_size, state.sample_rate),
                    *value,
                )
            })
            .collect()
    }
}

impl BlockProcessor<f32> for SpectralFilterEffect {
    fn prepare(&mut self, spec: &ProcessSpec) {
        let spec = ProcessSpec {
            sample_rate: if spec.sample_rate > 0.0 {
                spec.sample_rate
            } else {
                SAMPLE_RATE
            },
            ..*spec
        };
        if spec.maximum_block_size == 0 {
            self.state = None;
            return;
        }
        let state = SpectralState::new(&spec, &self.settings);
        debug!(
            "spectral filter prepared: fft size {} bins {} channels {} sample rate {}",
            state.fft_size,
            state.work.len(),
            spec.num_channels,
            spec.sample_rate
        );
        self.state = Some(state);
    }

    fn process(&mut self, block: &mut ChannelBlock<f32>) {
        if !self.enabled {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if block.num_samples() != state.fft_size {
            return;
        }
        if state.mask_settings != self.settings {
            state.update_mask(&self.settings);
        }

        let norm = 1.0 / state.fft_size as f32;
        for (channel, analysis) in block.channels_mut().zip(state.analysis.iter_mut()) {
            if !state.engine.forward(channel, &mut state.work) {
                continue;
            }
            analysis.copy_from_slice(&state.work);
            for (bin, gain) in state.work.iter_mut().zip(&state.mask) {
                *bin *= *gain;
            }
            if state.engine.inverse(&mut state.work, channel) {
                for sample in channel.iter_mut() {
                    *sample *= norm;
                }
            }
        }
    }

    fn reset(&mut self) {
        if let Some(state) = self.state.as_mut() {
            for bins in &mut state.analysis {
                bins.fill(Complex::new(0.0, 0.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const FFT_SIZE: usize = 64;
    const RATE: f64 = 6_400.0;

    fn prepared(effect: SpectralFilterEffect, channels: usize) -> SpectralFilterEffect {
        let mut effect = effect;
        effect.prepare(&ProcessSpec::new(RATE, FFT_SIZE, channels));
        effect
    }

    fn tone(bin: usize, amplitude: f32) -> Vec<f32> {
        (0..FFT_SIZE)
            .map(|i| amplitude * (TAU * bin as f32 * i as f32 / FFT_SIZE as f32).sin())
            .collect()
    }

    fn assert_close(actual: &[f32], expected: &[f32], tolerance: f32) {
        assert_eq!(actual.len(), expected.len());
        for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < tolerance, "sample {}: {} vs {}", index, a, e);
        }
    }

    #[test]
    fn disabled_filter_is_passthrough() {
        let mut effect = prepared(SpectralFilterEffect::default(), 1);
        let input = tone(3, 0.5);
        let mut block = ChannelBlock::from_channels(&[input.clone()]);
        effect.process(&mut block);
        assert_eq!(block.channel(0), input.as_slice());
    }

    #[test]
    fn unprepared_filter_is_passthrough() {
        let mut effect = SpectralFilterEffect::new(0.0, 100.0);
        let input = tone(10, 1.0);
        let mut block = ChannelBlock::from_channels(&[input.clone()]);
        effect.process(&mut block);
        assert_eq!(block.channel(0), input.as_slice());
        assert!(effect.spectrum(0).is_empty());
    }

    #[test]
    fn full_band_reconstructs_input() {
        let mut effect = prepared(SpectralFilterEffect::new(0.0, RATE as f32), 2);
        let left: Vec<f32> = (0..FFT_SIZE).map(|i| ((i * 7) % 11) as f32 / 11.0 - 0.5).collect();
        let right = vec![0.75_f32; FFT_SIZE];
        let mut block = ChannelBlock::from_channels(&[left.clone(), right.clone()]);
        effect.process(&mut block);
        assert_close(block.channel(0), &left, 1e-5);
        assert_close(block.channel(1), &right, 1e-5);
    }

    #[test]
    fn low_pass_keeps_only_low_tone() {
        // 100 Hz per bin: tones at 200 Hz and 2 kHz.
        let mut effect = prepared(SpectralFilterEffect::new(0.0, 500.0), 1);
        let low = tone(2, 1.0);
        let high = tone(20, 0.5);
        let mixed: Vec<f32> = low.iter().zip(&high).map(|(a, b)| a + b).collect();
        let mut block = ChannelBlock::from_channels(&[mixed]);
        effect.process(&mut block);
        assert_close(block.channel(0), &low, 1e-4);
    }

    #[test]
    fn high_pass_removes_dc() {
        let mut effect = prepared(SpectralFilterEffect::new(150.0, 3_200.0), 1);
        let mut block = ChannelBlock::from_channels(&[vec![0.5_f32; FFT_SIZE]]);
        effect.process(&mut block);
        assert_close(block.channel(0), &[0.0; FFT_SIZE], 1e-5);
    }

    #[test]
    fn settings_changes_apply_without_prepare() {
        let mut effect = prepared(SpectralFilterEffect::new(0.0, 3_200.0), 1);
        effect.settings.low_hz = 150.0;
        let mut block = ChannelBlock::from_channels(&[vec![1.0_f32; FFT_SIZE]]);
        effect.process(&mut block);
        assert_close(block.channel(0), &[0.0; FFT_SIZE], 1e-5);
    }

    #[test]
    fn spectrum_reports_analysed_bins() {
        let mut effect = prepared(SpectralFilterEffect::new(0.0, 50.0), 1);
        let mut block = ChannelBlock::from_channels(&[tone(4, 1.0)]);
        effect.process(&mut block);

        let bins = effect.spectrum(0);
        assert_eq!(bins.len(), FFT_SIZE / 2 + 1);
        assert_eq!(bins[4].frequency(), 400.0);
        assert!((bins[4].magnitude() - FFT_SIZE as f32 / 2.0).abs() < 1e-3);
        assert!(bins[5].magnitude() < 1e-3);
        assert!(effect.spectrum(1).is_empty());

        BlockProcessor::<f32>::reset(&mut effect);
        assert!(effect.spectrum(0).iter().all(|bin| bin.magnitude() == 0.0));
    }

    #[test]
    fn settings_deserialize_with_aliases() {
        let effect: SpectralFilterEffect =
            serde_json::from_str(r#"{"enabled":true,"low":80,"high_freq":8000}"#)
                .expect("deserialize spectral filter");
        assert!(effect.enabled);
        assert_eq!(effect.settings, SpectralFilterSettings::new(80.0, 8_000.0));
        assert_eq!(effect.fft_size(), None);

        let effect: SpectralFilterEffect = serde_json::from_str("{}").expect("defaults");
        assert!(!effect.enabled);
        assert_eq!(effect.settings, SpectralFilterSettings::default());
    }
}
