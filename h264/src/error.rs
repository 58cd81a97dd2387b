//! Error type

use thiserror::Error;

/// Type for errors reported by this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The picture's sample planes do not agree with its macroblock metadata,
    /// e.g. a plane too small to hold `PicSizeInMbs` macroblocks or a motion
    /// grid of the wrong dimensions.
    #[error("Picture geometry does not match its macroblock metadata")]
    InvalidPictureGeometry,

    /// A neighbour macroblock that the caller's own gating promised would
    /// exist could not be resolved. Conforming metadata never triggers this;
    /// the affected picture must be abandoned.
    #[error("Required neighbour macroblock is unavailable")]
    NeighbourUnavailable,

    /// Decoder errors that should not happen on any input.
    #[error("Internal decoder error")]
    InternalDecoderError,
}

/// Type for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;
