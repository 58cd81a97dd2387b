//! Decoded picture under reconstruction

use crate::error::{Error, Result};
use crate::traits::Pel;
use crate::types::{ChromaFormat, MotionVector, PictureStructure, SliceType};
use crate::decoder::macroblock::MacroblockInfo;

/// One rectangular sample plane.
///
/// Samples are stored in row-major order with an explicit stride, which may
/// exceed the visible width. Coordinates are `(x, y)` with `y` growing
/// downward.
#[derive(Clone, Debug)]
pub struct Plane<P: Pel> {
    data: Vec<P>,
    width: usize,
    height: usize,
    stride: usize,
}

impl<P: Pel> Plane<P> {
    /// Construct a plane filled with a single value, with the stride equal
    /// to the width.
    pub fn new(width: usize, height: usize, fill: P) -> Self {
        Self {
            data: vec![fill; width * height],
            width,
            height,
            stride: width,
        }
    }

    /// Construct a plane whose rows are padded out to `stride` samples.
    pub fn with_stride(width: usize, height: usize, stride: usize, fill: P) -> Result<Self> {
        if stride < width {
            return Err(Error::InvalidPictureGeometry);
        }

        Ok(Self {
            data: vec![fill; stride * height],
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance in samples between vertically adjacent rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Linear index of the sample at `(x, y)`.
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    pub fn get(&self, x: usize, y: usize) -> P {
        self.data[self.offset(x, y)]
    }

    pub fn put(&mut self, x: usize, y: usize, value: P) {
        let offset = self.offset(x, y);
        self.data[offset] = value;
    }

    /// Borrow the raw sample storage, including any stride padding.
    pub fn samples(&self) -> &[P] {
        &self.data
    }

    /// Mutably borrow the raw sample storage, including any stride padding.
    pub fn samples_mut(&mut self) -> &mut [P] {
        &mut self.data
    }
}

/// Reference and motion state of one 4x4 block, per prediction list.
///
/// `ref_pic_id` identifies the physical decoded picture a list entry points
/// at. Two different list slots may name the same picture, so equality of
/// list indices must never stand in for equality of reference pictures.
#[derive(Copy, Clone, Debug)]
pub struct BlockMotion {
    /// Reference index into each list; negative means the list is unused.
    pub ref_idx: [i8; 2],

    /// Identity of the referenced picture for each list. Only meaningful
    /// where the matching `ref_idx` is non-negative.
    pub ref_pic_id: [i64; 2],

    /// Motion vector for each list, in quarter-sample units.
    pub mv: [MotionVector; 2],
}

impl BlockMotion {
    /// A block that references nothing (both lists unused).
    pub fn unused() -> Self {
        Self {
            ref_idx: [-1, -1],
            ref_pic_id: [0, 0],
            mv: [MotionVector::zero(), MotionVector::zero()],
        }
    }

    /// A block predicted from list 0 only.
    pub fn list0(ref_pic_id: i64, mv: MotionVector) -> Self {
        Self {
            ref_idx: [0, -1],
            ref_pic_id: [ref_pic_id, 0],
            mv: [mv, MotionVector::zero()],
        }
    }

    /// The reference picture identity used by `list`, or -1 if the list is
    /// unused by this block.
    pub fn ref_id(&self, list: usize) -> i64 {
        if self.ref_idx[list] < 0 {
            -1
        } else {
            self.ref_pic_id[list]
        }
    }
}

/// Per-4x4-block motion data covering the whole picture.
///
/// The grid shares the sample planes' row convention: a block at grid row
/// `y` covers plane rows `4 * y .. 4 * y + 4`, so in a macroblock-adaptive
/// picture a field pair's blocks are stored field-stacked just like its
/// samples.
#[derive(Clone, Debug)]
pub struct MotionGrid {
    blocks: Vec<BlockMotion>,
    width_in_blocks: usize,
    height_in_blocks: usize,
}

impl MotionGrid {
    pub fn new(width_in_blocks: usize, height_in_blocks: usize) -> Self {
        Self {
            blocks: vec![BlockMotion::unused(); width_in_blocks * height_in_blocks],
            width_in_blocks,
            height_in_blocks,
        }
    }

    pub fn width_in_blocks(&self) -> usize {
        self.width_in_blocks
    }

    pub fn height_in_blocks(&self) -> usize {
        self.height_in_blocks
    }

    pub fn get(&self, blk_x: usize, blk_y: usize) -> &BlockMotion {
        &self.blocks[blk_y * self.width_in_blocks + blk_x]
    }

    pub fn get_mut(&mut self, blk_x: usize, blk_y: usize) -> &mut BlockMotion {
        &mut self.blocks[blk_y * self.width_in_blocks + blk_x]
    }
}

/// Macroblock-grid geometry shared by every neighbourhood query.
///
/// Carrying this by value keeps the resolver functions independent of the
/// sample type the planes happen to store.
#[derive(Copy, Clone, Debug)]
pub struct PictureLayout {
    /// Picture width in macroblocks.
    pub width_in_mbs: usize,

    /// Picture height in macroblocks (counting both of a pair's rows in
    /// macroblock-adaptive pictures).
    pub height_in_mbs: usize,

    /// Whether macroblocks come in adaptive frame/field pairs.
    pub mbaff_frame: bool,
}

impl PictureLayout {
    /// Total number of macroblocks in the picture.
    pub fn size_in_mbs(&self) -> usize {
        self.width_in_mbs * self.height_in_mbs
    }
}

/// A picture in the middle of being decoded.
///
/// Reconstruction fills the planes and the metadata tables; the deblocker
/// then mutates the planes in place and reads everything else. Plane layout
/// contract: every macroblock covers contiguous plane rows starting at its
/// resolved position, so a field pair in a macroblock-adaptive picture is
/// stored field-stacked (16 top-field rows, then 16 bottom-field rows).
/// Interleaving fields back into display order is the output stage's
/// business.
pub struct DecodedPicture<P: Pel> {
    /// The luma plane.
    pub luma: Plane<P>,

    /// Chroma planes (Cb, Cr), absent for monochrome content.
    pub chroma: Option<[Plane<P>; 2]>,

    /// Coded luma bit depth, 8..=14.
    pub bit_depth_luma: u8,

    /// Coded chroma bit depth, 8..=14.
    pub bit_depth_chroma: u8,

    /// The chroma sampling structure.
    pub chroma_format: ChromaFormat,

    /// Frame or single-field coding of this picture.
    pub structure: PictureStructure,

    /// Whether macroblocks come in adaptive frame/field pairs.
    pub mbaff_frame: bool,

    /// The slice coding type in force for this picture.
    pub slice_type: SliceType,

    /// Picture width in macroblocks.
    pub width_in_mbs: usize,

    /// Picture height in macroblocks.
    pub height_in_mbs: usize,

    /// Per-macroblock metadata in address order.
    pub mb_data: Vec<MacroblockInfo>,

    /// Per-4x4-block reference and motion state.
    pub motion: MotionGrid,
}

impl<P: Pel> DecodedPicture<P> {
    /// Construct a picture of `width_in_mbs` x `height_in_mbs` macroblocks
    /// with all planes filled with `fill`, every macroblock carrying `mb`
    /// and no motion data.
    ///
    /// Mismatched geometry (zero-sized grids) is rejected; callers build
    /// the metadata tables up from this baseline.
    pub fn new(
        width_in_mbs: usize,
        height_in_mbs: usize,
        chroma_format: ChromaFormat,
        mb: MacroblockInfo,
        fill: P,
    ) -> Result<Self> {
        if width_in_mbs == 0 || height_in_mbs == 0 {
            return Err(Error::InvalidPictureGeometry);
        }

        let luma = Plane::new(width_in_mbs * 16, height_in_mbs * 16, fill);
        let chroma = chroma_format.mb_chroma_size().map(|(cw, ch)| {
            [
                Plane::new(width_in_mbs * cw, height_in_mbs * ch, fill),
                Plane::new(width_in_mbs * cw, height_in_mbs * ch, fill),
            ]
        });

        Ok(Self {
            luma,
            chroma,
            bit_depth_luma: 8,
            bit_depth_chroma: 8,
            chroma_format,
            structure: PictureStructure::Frame,
            mbaff_frame: false,
            slice_type: SliceType::I,
            width_in_mbs,
            height_in_mbs,
            mb_data: vec![mb; width_in_mbs * height_in_mbs],
            motion: MotionGrid::new(width_in_mbs * 4, height_in_mbs * 4),
        })
    }

    /// Total number of macroblocks in the picture.
    pub fn size_in_mbs(&self) -> usize {
        self.width_in_mbs * self.height_in_mbs
    }

    /// The macroblock-grid geometry of this picture.
    pub fn layout(&self) -> PictureLayout {
        PictureLayout {
            width_in_mbs: self.width_in_mbs,
            height_in_mbs: self.height_in_mbs,
            mbaff_frame: self.mbaff_frame,
        }
    }

    /// Metadata of the macroblock at `mb_addr`.
    pub fn mb(&self, mb_addr: usize) -> &MacroblockInfo {
        &self.mb_data[mb_addr]
    }

    /// Mutable metadata of the macroblock at `mb_addr`.
    pub fn mb_mut(&mut self, mb_addr: usize) -> &mut MacroblockInfo {
        &mut self.mb_data[mb_addr]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::macroblock::MacroblockInfo;

    #[test]
    fn plane_stride_addressing() {
        let mut plane = Plane::with_stride(16, 4, 24, 0u8).unwrap();
        plane.put(15, 3, 200);

        assert_eq!(plane.get(15, 3), 200);
        assert_eq!(plane.offset(15, 3), 3 * 24 + 15);
        assert_eq!(plane.samples().len(), 24 * 4);
    }

    #[test]
    fn plane_rejects_short_stride() {
        assert_eq!(
            Plane::<u8>::with_stride(16, 4, 8, 0).unwrap_err(),
            Error::InvalidPictureGeometry
        );
    }

    #[test]
    fn picture_chroma_geometry_follows_format() {
        let mb = MacroblockInfo::intra(26);

        let p420 = DecodedPicture::new(3, 2, ChromaFormat::Yuv420, mb, 0u8).unwrap();
        let [cb, _] = p420.chroma.as_ref().unwrap();
        assert_eq!((cb.width(), cb.height()), (24, 16));

        let p422 = DecodedPicture::new(3, 2, ChromaFormat::Yuv422, mb, 0u8).unwrap();
        let [cb, _] = p422.chroma.as_ref().unwrap();
        assert_eq!((cb.width(), cb.height()), (24, 32));

        let p400 = DecodedPicture::new(3, 2, ChromaFormat::Monochrome, mb, 0u8).unwrap();
        assert!(p400.chroma.is_none());
    }

    #[test]
    fn block_motion_unused_list_reads_minus_one() {
        let blk = BlockMotion::list0(42, MotionVector::new(4, 0));

        assert_eq!(blk.ref_id(0), 42);
        assert_eq!(blk.ref_id(1), -1);
    }
}
