//! Per-macroblock metadata

use crate::types::MacroblockType;

/// ITU-T Recommendation H.264 (03/2005) 7.4.3 `disable_deblocking_filter_idc`
///
/// Slice-level control over the in-loop filter, recorded per macroblock so
/// the filter never has to chase slice headers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopFilterIdc {
    /// Filter every edge.
    Enabled,

    /// Do not filter this macroblock at all.
    Disabled,

    /// Filter, but not across a slice boundary.
    DisabledAtSliceBoundary,
}

/// Decoded state of one macroblock, as left behind by reconstruction.
///
/// The deblocker treats all of this as read-only. Fields mirror what entropy
/// decoding and reconstruction already had to know; nothing here is derived
/// by the filter itself.
#[derive(Copy, Clone, Debug)]
pub struct MacroblockInfo {
    /// The coding mode this macroblock used.
    pub mb_type: MacroblockType,

    /// One bit per 4x4 luma block (bit `y * 4 + x`), set iff the block has
    /// any non-zero transform coefficient.
    pub cbp_blk: u16,

    /// Luma quantization parameter, 0..=51.
    pub qp: u8,

    /// Per-chroma-plane QP offsets (Cb, Cr), applied before the chroma QP
    /// mapping table.
    pub chroma_qp_offset: [i8; 2],

    /// Whether the luma residual used the 8x8 transform. When set, the two
    /// internal luma edges that do not lie on an 8x8 boundary are skipped.
    pub transform_size_8x8: bool,

    /// In-loop filter control inherited from the slice header.
    pub filter_idc: LoopFilterIdc,

    /// `slice_alpha_c0_offset_div2 * 2`, -12..=12.
    pub alpha_c0_offset: i8,

    /// `slice_beta_offset_div2 * 2`, -12..=12.
    pub beta_offset: i8,

    /// Whether this macroblock is field-coded. Only meaningful in
    /// macroblock-adaptive frame/field pictures.
    pub mb_field: bool,

    /// Index of the slice this macroblock belongs to. Neighbours outside the
    /// current slice count as unavailable.
    pub slice_nr: u16,
}

impl MacroblockInfo {
    /// Metadata for an intra 16x16 macroblock with everything else at rest.
    pub fn intra(qp: u8) -> Self {
        Self {
            mb_type: MacroblockType::Intra16x16,
            cbp_blk: 0,
            qp,
            chroma_qp_offset: [0, 0],
            transform_size_8x8: false,
            filter_idc: LoopFilterIdc::Enabled,
            alpha_c0_offset: 0,
            beta_offset: 0,
            mb_field: false,
            slice_nr: 0,
        }
    }

    /// Metadata for an inter macroblock with no coded residual.
    pub fn inter(qp: u8) -> Self {
        Self {
            mb_type: MacroblockType::Inter,
            ..Self::intra(qp)
        }
    }
}
