use std::fmt;

use super::{BufferId, MaterialId, ResourceSetId, TextureId};

/// Failure while creating or updating a renderer-owned resource.
///
/// These never surface from the per-frame draw path; callers log them and
/// leave the dependent resource unrealized so the next frame retries.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    InvalidTextureSize { width: u32, height: u32 },
    PixelSizeMismatch { expected: usize, actual: usize },
    UnknownBuffer(BufferId),
    UnknownTexture(TextureId),
    UnknownResourceSet(ResourceSetId),
    UnknownMaterial(MaterialId),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidTextureSize { width, height } => {
                write!(f, "invalid texture size {width}x{height}")
            }
            RenderError::PixelSizeMismatch { expected, actual } => {
                write!(f, "pixel data is {actual} bytes, expected {expected}")
            }
            RenderError::UnknownBuffer(id) => write!(f, "unknown buffer {id:?}"),
            RenderError::UnknownTexture(id) => write!(f, "unknown texture {id:?}"),
            RenderError::UnknownResourceSet(id) => write!(f, "unknown resource set {id:?}"),
            RenderError::UnknownMaterial(id) => write!(f, "unknown material {id:?}"),
        }
    }
}

impl std::error::Error for RenderError {}
