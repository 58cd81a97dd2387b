//! Pure-rust H.264 decoder core: picture model and macroblock neighbourhoods

#[macro_use]
extern crate bitflags;

mod decoder;
mod error;
mod traits;
mod types;

pub use decoder::{
    check_availability, get_4x4_neighbour, get_aff_neighbour, get_mb_block_pos, get_mb_pos,
    get_neighbour, get_non_aff_neighbour, mb_is_available, BlockMotion, DecodedPicture,
    LoopFilterIdc, MacroblockInfo, MotionGrid, NeighbourAvail, NeighbourMode, PictureLayout,
    PixelPos, Plane,
};
pub use error::{Error, Result};
pub use traits::Pel;
pub use types::{ChromaFormat, MacroblockType, MotionVector, PictureStructure, SliceType};
