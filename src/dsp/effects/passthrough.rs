use crate::container::ChannelBlock;
use crate::dsp::{BlockProcessor, ProcessSpec, Sample};

/// Leaves every window unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl<T: Sample> BlockProcessor<T> for Passthrough {
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn process(&mut self, _block: &mut ChannelBlock<T>) {}

    fn reset(&mut self) {}
}
