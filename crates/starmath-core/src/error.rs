use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Component that raised an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    Thresholder,
    Centroider,
    Hfd,
    Fwhm,
    Statistics,
    Stretcher,
    BadPixels,
    Arithmetic,
    Scale,
    Crop,
    Pipeline,
    Io,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Thresholder => "thresholder",
            Self::Centroider => "centroider",
            Self::Hfd => "hfd",
            Self::Fwhm => "fwhm",
            Self::Statistics => "statistics",
            Self::Stretcher => "stretcher",
            Self::BadPixels => "bad pixel interpolator",
            Self::Arithmetic => "arithmetic",
            Self::Scale => "scale",
            Self::Crop => "crop",
            Self::Pipeline => "pipeline",
            Self::Io => "io",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StarmathError {
    #[error("{component}: invalid region: {reason}")]
    InvalidRegion {
        component: Component,
        reason: String,
    },

    #[error("{component}: degenerate blob: {reason}")]
    DegenerateBlob {
        component: Component,
        reason: String,
    },

    #[error("{component}: degenerate star: {reason}")]
    DegenerateStar {
        component: Component,
        reason: String,
    },

    #[error("{component}: dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        component: Component,
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("Cannot read {}: {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("Cannot write {}: {reason}", path.display())]
    WriteError { path: PathBuf, reason: String },

    #[error("{component}: invalid parameter: {reason}")]
    InvalidParameter {
        component: Component,
        reason: String,
    },

    #[error("{component}: no stars detected")]
    NoStarsDetected { component: Component },
}

impl StarmathError {
    pub(crate) fn invalid_region(component: Component, reason: impl Into<String>) -> Self {
        Self::InvalidRegion {
            component,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate_blob(component: Component, reason: impl Into<String>) -> Self {
        Self::DegenerateBlob {
            component,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate_star(component: Component, reason: impl Into<String>) -> Self {
        Self::DegenerateStar {
            component,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(component: Component, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            component,
            reason: reason.into(),
        }
    }

    /// Component tag carried by the error, if any.
    pub fn component(&self) -> Option<Component> {
        match self {
            Self::InvalidRegion { component, .. }
            | Self::DegenerateBlob { component, .. }
            | Self::DegenerateStar { component, .. }
            | Self::DimensionMismatch { component, .. }
            | Self::InvalidParameter { component, .. }
            | Self::NoStarsDetected { component } => Some(*component),
            Self::UnreadableSource { .. } | Self::WriteError { .. } => Some(Component::Io),
        }
    }

    /// Numeric degeneracies that a caller may choose to skip per star.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::DegenerateBlob { .. } | Self::DegenerateStar { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StarmathError>;
