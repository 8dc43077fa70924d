//! DSP components: the processor contract, the overlap-add adapter and inner effects.

pub mod effects;
mod error;
pub mod overlap_add;
mod processor;
mod sample;
mod settings;

pub use error::OverlapAddError;
pub use overlap_add::OverlapAdd;
pub use processor::{BlockProcessor, ProcessSpec};
pub use sample::Sample;
pub use settings::OverlapAddSettings;
