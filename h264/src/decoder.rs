//! H.264 decoder core

mod macroblock;
mod neighbour;
mod picture;

pub use macroblock::{LoopFilterIdc, MacroblockInfo};
pub use neighbour::{
    check_availability, get_4x4_neighbour, get_aff_neighbour, get_mb_block_pos, get_mb_pos,
    get_neighbour, get_non_aff_neighbour, mb_is_available, NeighbourAvail, NeighbourMode, PixelPos,
};
pub use picture::{BlockMotion, DecodedPicture, MotionGrid, PictureLayout, Plane};
