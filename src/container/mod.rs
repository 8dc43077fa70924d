//! Storage primitives: the overwrite-oldest ring buffer and the multi-channel block.

mod channel_block;
mod ring_buffer;

pub use channel_block::ChannelBlock;
pub use ring_buffer::{Iter, IterMut, RingBuffer};
