//! Window processors that plug into [`OverlapAdd`](crate::OverlapAdd).

mod gain;
mod level;
mod passthrough;
pub mod spectral_filter;

pub use gain::{GainEffect, GainSettings};
pub use level::{db_to_linear, linear_to_db};
pub use passthrough::Passthrough;
pub use spectral_filter::{SpectralFilterEffect, SpectralFilterSettings};
