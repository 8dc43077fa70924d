use std::fmt::{Display, Formatter};

/// Error type for overlap-add configuration.
#[derive(Debug)]
pub enum OverlapAddError {
    ZeroHop,
    HopNotSmallerThanWindow { window: usize, hop: usize },
    FractionalOverlap { window: usize, hop: usize },
    Parse(serde_json::Error),
}

impl Display for OverlapAddError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroHop => write!(f, "hop size must be non-zero"),
            Self::HopNotSmallerThanWindow { window, hop } => write!(
                f,
                "hop size {} must be smaller than window size {}",
                hop, window
            ),
            Self::FractionalOverlap { window, hop } => write!(
                f,
                "window size {} is not a multiple of hop size {}",
                window, hop
            ),
            Self::Parse(err) => write!(f, "invalid overlap-add settings: {}", err),
        }
    }
}

impl std::error::Error for OverlapAddError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OverlapAddError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
