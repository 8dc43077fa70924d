//! # Overlap DSP
//!
//! Block-rate buffering primitives for streaming sample processing.
//! It provides a fixed-capacity ring buffer and an overlap-add adapter that runs a
//! fixed-window processor over input delivered in chunks of any size.

pub mod constants;
pub mod container;
pub mod dsp;
pub mod fft;

pub use container::{ChannelBlock, RingBuffer};
pub use dsp::effects::{GainEffect, Passthrough, SpectralFilterEffect};
pub use dsp::{BlockProcessor, OverlapAdd, OverlapAddError, OverlapAddSettings, ProcessSpec, Sample};
