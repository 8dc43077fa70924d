//! Contiguous multi-channel sample block.
//!
//! Samples are stored channel-major in one allocation:
//!
//! ```text
//! [ ch0[0..n] | ch1[0..n] | ... ]
//! ```

use std::slice::{ChunksExact, ChunksExactMut};

/// Owned block of `num_channels × num_samples` samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelBlock<T> {
    data: Vec<T>,
    num_channels: usize,
    num_samples: usize,
}

impl<T: Copy + Default> ChannelBlock<T> {
    /// Create a block filled with `T::default()`.
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            data: vec![T::default(); num_channels * num_samples],
            num_channels,
            num_samples,
        }
    }

    /// Build a block from per-channel sample vectors of equal length.
    ///
    /// # Panics
    /// Panics if the channels differ in length.
    pub fn from_channels<C: AsRef<[T]>>(channels: &[C]) -> Self {
        let num_samples = channels.first().map_or(0, |channel| channel.as_ref().len());
        let mut data = Vec::with_capacity(channels.len() * num_samples);
        for channel in channels {
            let channel = channel.as_ref();
            assert_eq!(
                channel.len(),
                num_samples,
                "all channels must have the same number of samples"
            );
            data.extend_from_slice(channel);
        }
        Self {
            data,
            num_channels: channels.len(),
            num_samples,
        }
    }

    /// Reshape the block and reset every sample to `T::default()`.
    pub fn resize(&mut self, num_channels: usize, num_samples: usize) {
        self.data.clear();
        self.data.resize(num_channels * num_samples, T::default());
        self.num_channels = num_channels;
        self.num_samples = num_samples;
    }

    /// Reset every sample to `T::default()`.
    pub fn clear(&mut self) {
        self.data.fill(T::default());
    }
}

impl<T> ChannelBlock<T> {
    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Samples per channel.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Returns `true` if the block holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples of one channel.
    #[inline]
    pub fn channel(&self, channel: usize) -> &[T] {
        debug_assert!(channel < self.num_channels);
        let start = channel * self.num_samples;
        &self.data[start..start + self.num_samples]
    }

    /// Mutable samples of one channel.
    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> &mut [T] {
        debug_assert!(channel < self.num_channels);
        let start = channel * self.num_samples;
        &mut self.data[start..start + self.num_samples]
    }

    /// Iterate over channels in order.
    #[inline]
    pub fn channels(&self) -> ChunksExact<'_, T> {
        self.data.chunks_exact(self.num_samples.max(1))
    }

    /// Mutably iterate over channels in order.
    #[inline]
    pub fn channels_mut(&mut self) -> ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.num_samples.max(1))
    }

    /// Raw channel-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable channel-major storage.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Copy> ChannelBlock<T> {
    /// Read one sample.
    #[inline]
    pub fn sample(&self, channel: usize, index: usize) -> T {
        debug_assert!(index < self.num_samples);
        self.data[channel * self.num_samples + index]
    }

    /// Overwrite one sample.
    #[inline]
    pub fn set_sample(&mut self, channel: usize, index: usize, value: T) {
        debug_assert!(index < self.num_samples);
        self.data[channel * self.num_samples + index] = value;
    }
}
