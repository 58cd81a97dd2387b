//! Parsed H.264 bitstream types

/// ITU-T Recommendation H.264 (03/2005) 7.3.3 `slice_type`
///
/// The coding type of a slice, reduced to its five basic kinds (the
/// bitstream's values 5..9 repeat these with an all-slices-alike promise).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SliceType {
    /// Intra-coded slice.
    I,

    /// Predicted slice referencing one picture list.
    P,

    /// Bi-predicted slice referencing two picture lists.
    B,

    /// Switching-predicted slice.
    Sp,

    /// Switching-intra slice.
    Si,
}

impl SliceType {
    /// Whether this is one of the stream-switching slice kinds.
    ///
    /// Switching slices reconstruct to identical sample values across
    /// differently encoded streams, which forces the deblocker to treat
    /// every edge at full strength.
    pub fn is_switching(self) -> bool {
        matches!(self, SliceType::Sp | SliceType::Si)
    }
}

/// ITU-T Recommendation H.264 (03/2005) 7.4.3 `field_pic_flag`,
/// `bottom_field_flag`
///
/// Whether a coded picture covers a full progressive frame or one of its two
/// fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PictureStructure {
    Frame,
    TopField,
    BottomField,
}

impl PictureStructure {
    /// Whether the picture is a single field rather than a frame.
    pub fn is_field(self) -> bool {
        !matches!(self, PictureStructure::Frame)
    }
}

/// ITU-T Recommendation H.264 (03/2005) 7.4.2.1 `chroma_format_idc`
///
/// The chroma sampling structure. Determines how many chroma sample rows and
/// columns cover one 16x16 luma macroblock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChromaFormat {
    /// 4:0:0, no chroma planes at all.
    Monochrome,

    /// 4:2:0, chroma subsampled in both dimensions.
    Yuv420,

    /// 4:2:2, chroma subsampled horizontally only.
    Yuv422,

    /// 4:4:4, full-resolution chroma.
    Yuv444,
}

impl ChromaFormat {
    /// The `chroma_format_idc` code for this format.
    pub fn idc(self) -> usize {
        match self {
            ChromaFormat::Monochrome => 0,
            ChromaFormat::Yuv420 => 1,
            ChromaFormat::Yuv422 => 2,
            ChromaFormat::Yuv444 => 3,
        }
    }

    /// The chroma region covering one macroblock, in chroma samples.
    ///
    /// Returns `None` for monochrome content.
    pub fn mb_chroma_size(self) -> Option<(usize, usize)> {
        match self {
            ChromaFormat::Monochrome => None,
            ChromaFormat::Yuv420 => Some((8, 8)),
            ChromaFormat::Yuv422 => Some((8, 16)),
            ChromaFormat::Yuv444 => Some((16, 16)),
        }
    }
}

/// ITU-T Recommendation H.264 (03/2005) 7.4.5 `mb_type`
///
/// The coding mode of a macroblock, reduced to the classes the deblocker
/// distinguishes. All inter partitionings collapse into `Inter`: the filter
/// consults the per-4x4-block motion data rather than the partition shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MacroblockType {
    /// Intra with 4x4 spatial prediction.
    Intra4x4,

    /// Intra with 8x8 spatial prediction (High profile).
    Intra8x8,

    /// Intra with 16x16 spatial prediction.
    Intra16x16,

    /// Raw sample passthrough.
    Pcm,

    /// Any inter-predicted macroblock.
    Inter,
}

impl MacroblockType {
    /// Whether the macroblock was coded without reference to other pictures.
    pub fn is_intra(self) -> bool {
        !matches!(self, MacroblockType::Inter)
    }
}

/// A two-dimensional motion vector in quarter-sample units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionVector {
    pub x: i16,
    pub y: i16,
}

impl MotionVector {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }
}
