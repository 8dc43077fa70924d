//! Spectrum helpers shared by the FFT-based processors.

#[cfg(not(any(feature = "real-fft", feature = "complex-fft")))]
compile_error!("enable either the `real-fft` or the `complex-fft` feature");

#[cfg(feature = "real-fft")]
pub use realfft::num_complex::Complex;
#[cfg(not(feature = "real-fft"))]
pub use rustfft::num_complex::Complex;

/// Centre frequency in Hz of `bin` in an FFT of `fft_size` points.
pub fn frequency_for_bin(bin: usize, fft_size: usize, sample_rate: f64) -> f32 {
    (bin as f64 * sample_rate / fft_size as f64) as f32
}

/// One FFT bin paired with its centre frequency.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FourierBin {
    frequency: f32,
    value: Complex<f32>,
}

impl FourierBin {
    pub fn new(frequency: f32, value: Complex<f32>) -> Self {
        Self { frequency, value }
    }

    pub fn value(&self) -> Complex<f32> {
        self.value
    }

    /// Centre frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn magnitude(&self) -> f32 {
        self.value.norm()
    }

    /// Phase in radians.
    pub fn phase(&self) -> f32 {
        self.value.arg()
    }
}
