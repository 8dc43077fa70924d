//! Shared constants for DSP defaults.

/// Default sample rate used by the library (Hz).
///
/// Used by tests and as a fallback for processors prepared without a host spec.
pub const SAMPLE_RATE: f64 = 44_100.0;

/// Default overlap-add window length in samples.
pub const DEFAULT_WINDOW_SIZE: usize = 1024;

/// Default overlap-add hop length in samples (50% overlap).
pub const DEFAULT_HOP_SIZE: usize = 512;
