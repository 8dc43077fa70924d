//! Overlap-add adapter for fixed-window processors.
//!
//! [`OverlapAdd`] wraps any [`BlockProcessor`] that expects blocks of exactly
//! `window_size` samples and lets it run on a stream delivered in chunks of any length.
//! Every `hop_size` input samples the most recent window is assembled, processed,
//! scaled by `hop_size / window_size` and summed into the output stream.
//!
//! Output is emitted one sample per input sample, so the latency is a constant
//! `window_size - 1` samples regardless of how the host slices the stream.

use log::{debug, warn};

use crate::container::{ChannelBlock, RingBuffer};
use crate::dsp::{BlockProcessor, OverlapAddError, OverlapAddSettings, ProcessSpec, Sample};

/// Runs a fixed-window processor over arbitrarily chunked input using overlap-add.
pub struct OverlapAdd<T, P> {
    processor: P,
    input_rings: Vec<RingBuffer<T>>,
    output_rings: Vec<RingBuffer<T>>,
    scratch: ChannelBlock<T>,
    window_size: usize,
    hop_size: usize,
    samples_since_last_hop: usize,
}

impl<T, P> std::fmt::Debug for OverlapAdd<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlapAdd")
            .field("window_size", &self.window_size)
            .field("hop_size", &self.hop_size)
            .field("num_channels", &self.input_rings.len())
            .field("samples_since_last_hop", &self.samples_since_last_hop)
            .finish()
    }
}

impl<T: Sample, P: BlockProcessor<T>> OverlapAdd<T, P> {
    /// Wrap `processor`, calling it on windows of `window_size` samples every `hop_size`
    /// input samples.
    ///
    /// # Panics
    /// Panics unless `0 < hop_size < window_size` and `hop_size` divides `window_size`.
    pub fn new(window_size: usize, hop_size: usize, processor: P) -> Self {
        if let Err(err) = OverlapAddSettings::new(window_size, hop_size).validate() {
            panic!("invalid overlap-add configuration: {}", err);
        }
        Self::build(window_size, hop_size, processor)
    }

    /// Fallible variant of [`new`](Self::new).
    pub fn try_new(
        window_size: usize,
        hop_size: usize,
        processor: P,
    ) -> Result<Self, OverlapAddError> {
        OverlapAddSettings::new(window_size, hop_size).validate()?;
        Ok(Self::build(window_size, hop_size, processor))
    }

    /// Build an adapter from serialized settings.
    ///
    /// # Errors
    /// Returns an error if the settings fail [`OverlapAddSettings::validate`].
    pub fn from_settings(
        settings: &OverlapAddSettings,
        processor: P,
    ) -> Result<Self, OverlapAddError> {
        if let Err(err) = settings.validate() {
            warn!("rejecting overlap-add settings {:?}: {}", settings, err);
            return Err(err);
        }
        Ok(Self::build(settings.window_size, settings.hop_size, processor))
    }

    fn build(window_size: usize, hop_size: usize, processor: P) -> Self {
        Self {
            processor,
            input_rings: Vec::new(),
            output_rings: Vec::new(),
            scratch: ChannelBlock::default(),
            window_size,
            hop_size,
            samples_since_last_hop: 0,
        }
    }

    /// Allocate per-channel state and prepare the inner processor.
    ///
    /// The inner processor receives `spec` with `maximum_block_size` replaced by the
    /// window size. Must be called before [`process`](Self::process) and whenever the
    /// channel count changes. All previous overlap state is discarded.
    pub fn prepare(&mut self, spec: &ProcessSpec) {
        let num_channels = spec.num_channels;
        let window = self.window_size;

        self.input_rings.clear();
        self.input_rings
            .resize_with(num_channels, || RingBuffer::with_len(window, T::EQUILIBRIUM));
        self.output_rings.clear();
        self.output_rings
            .resize_with(num_channels, || RingBuffer::with_len(window, T::EQUILIBRIUM));
        self.scratch.resize(num_channels, window);
        self.samples_since_last_hop = 0;

        debug!(
            "overlap-add prepared: window {} hop {} channels {} host block {} sample rate {}",
            window, self.hop_size, num_channels, spec.maximum_block_size, spec.sample_rate
        );

        let window_spec = ProcessSpec {
            maximum_block_size: window,
            ..*spec
        };
        self.processor.prepare(&window_spec);
    }

    /// Process one host block.
    ///
    /// `input` and `output` hold one slice per channel; every slice must have the same
    /// length and the channel count must match the one given to
    /// [`prepare`](Self::prepare). Any block length is accepted, including zero.
    pub fn process(&mut self, input: &[&[T]], output: &mut [&mut [T]]) {
        debug_assert_eq!(input.len(), self.input_rings.len(), "input channel count");
        debug_assert_eq!(output.len(), self.output_rings.len(), "output channel count");

        let num_samples = input.first().map_or(0, |channel| channel.len());
        debug_assert!(input.iter().all(|channel| channel.len() == num_samples));
        debug_assert!(output.iter().all(|channel| channel.len() == num_samples));

        for index in 0..num_samples {
            for (ring, channel) in self.input_rings.iter_mut().zip(input) {
                ring.push(channel[index]);
            }
            let position = self.advance();
            for (ring, channel) in self.output_rings.iter().zip(output.iter_mut()) {
                channel[index] = ring[position];
            }
        }
    }

    /// Process one host block in place.
    pub fn process_replacing(&mut self, block: &mut ChannelBlock<T>) {
        debug_assert_eq!(block.num_channels(), self.input_rings.len(), "channel count");

        for index in 0..block.num_samples() {
            for (channel, ring) in self.input_rings.iter_mut().enumerate() {
                ring.push(block.sample(channel, index));
            }
            let position = self.advance();
            for (channel, ring) in self.output_rings.iter().enumerate() {
                block.set_sample(channel, index, ring[position]);
            }
        }
    }

    /// Reset the inner processor. Overlap-add buffers are left untouched.
    pub fn reset(&mut self) {
        self.processor.reset();
    }

    /// Silence every buffer, restart the hop counter and reset the inner processor.
    pub fn clear(&mut self) {
        for ring in self.input_rings.iter_mut().chain(self.output_rings.iter_mut()) {
            ring.fill(T::EQUILIBRIUM);
        }
        self.scratch.clear();
        self.samples_since_last_hop = 0;
        self.processor.reset();
    }

    /// The wrapped processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Mutable access to the wrapped processor, e.g. to change its settings.
    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    /// Window length W handed to the processor.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of input samples between two processor calls.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Channel count bound by the last [`prepare`](Self::prepare).
    pub fn num_channels(&self) -> usize {
        self.input_rings.len()
    }

    /// Delay in samples between an input sample and its reconstruction in the output.
    pub fn latency_samples(&self) -> usize {
        self.window_size - 1
    }

    /// Count one consumed sample position and fold when a hop completes.
    ///
    /// Returns the output ring index holding the next final sample.
    #[inline]
    fn advance(&mut self) -> usize {
        self.samples_since_last_hop += 1;
        if self.samples_since_last_hop == self.hop_size {
            self.samples_since_last_hop = 0;
            self.fold();
        }
        self.samples_since_last_hop
    }

    fn fold(&mut self) {
        let hop = self.hop_size;
        let overlap = self.window_size - hop;

        for (ring, window) in self.input_rings.iter().zip(self.scratch.channels_mut()) {
            ring.copy_to_slice(window);
        }

        self.processor.process(&mut self.scratch);
        debug_assert_eq!(self.scratch.num_samples(), self.window_size);

        let gain = T::from_f64(hop as f64 / self.window_size as f64);
        for sample in self.scratch.as_mut_slice() {
            *sample *= gain;
        }

        // Ring indices [hop, window) still accumulate; the processed tail is brand new.
        for (ring, processed) in self.output_rings.iter_mut().zip(self.scratch.channels()) {
            let (head, tail) = processed.split_at(overlap);
            for (offset, &sample) in head.iter().enumerate() {
                ring[hop + offset] += sample;
            }
            for &sample in tail {
                ring.push(sample);
            }
        }
    }
}

impl<T: Sample, P: BlockProcessor<T>> BlockProcessor<T> for OverlapAdd<T, P> {
    fn prepare(&mut self, spec: &ProcessSpec) {
        OverlapAdd::prepare(self, spec);
    }

    fn process(&mut self, block: &mut ChannelBlock<T>) {
        self.process_replacing(block);
    }

    fn reset(&mut self) {
        OverlapAdd::reset(self);
    }
}
