//! Errors reported before a render starts.
use std::fmt;

/// Which input atlas failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasKind {
    Skin,
    Cape,
}

impl fmt::Display for AtlasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasKind::Skin => f.write_str("skin"),
            AtlasKind::Cape => f.write_str("cape"),
        }
    }
}

/// Precondition violations. Everything else (missing cape, edge-on quads) is
/// recovered inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid {kind} atlas dimensions {width}x{height}: {reason}")]
    InvalidAtlasDimensions {
        kind: AtlasKind,
        width: u32,
        height: u32,
        reason: &'static str,
    },

    #[error("invalid render config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
