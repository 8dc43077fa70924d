//! The contract between the overlap-add adapter and the processor it drives.

use crate::container::ChannelBlock;
use crate::dsp::Sample;

/// Stream parameters handed to a processor before it runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f64,
    /// Largest number of samples per channel a single `process` call will receive.
    pub maximum_block_size: usize,
    pub num_channels: usize,
}

impl ProcessSpec {
    pub fn new(sample_rate: f64, maximum_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            maximum_block_size,
            num_channels,
        }
    }
}

/// A block-based processor that transforms multi-channel samples in place.
///
/// Implementations must not allocate, block or perform I/O in [`process`](Self::process).
pub trait BlockProcessor<T: Sample> {
    /// Allocate state for the given stream. Called before the first `process`.
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Replace the contents of `block` with processed output of the same shape.
    fn process(&mut self, block: &mut ChannelBlock<T>);

    /// Clear internal history without requiring another `prepare`.
    fn reset(&mut self);
}

impl<T: Sample, P: BlockProcessor<T> + ?Sized> BlockProcessor<T> for Box<P> {
    fn prepare(&mut self, spec: &ProcessSpec) {
        (**self).prepare(spec);
    }

    fn process(&mut self, block: &mut ChannelBlock<T>) {
        (**self).process(block);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
