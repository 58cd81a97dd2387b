//! Picture-level deblocking driver
//!
//! Walks macroblocks in address order and filters each one's four vertical
//! edges, then its four horizontal edges, for luma and both chroma planes.
//! Which external edges participate is decided here, from the macroblock's
//! position and its slice-level filter controls; the strength and edge
//! passes below never second-guess it.

use crate::edge::edge_loop;
use crate::strength::get_strength;
use crate::tables::CHROMA_EDGE;
use h264_rs::{
    check_availability, get_mb_pos, ChromaFormat, DecodedPicture, LoopFilterIdc, MacroblockInfo,
    MacroblockType, MotionGrid, NeighbourAvail, NeighbourMode, Pel, PictureLayout,
    PictureStructure, Result, SliceType,
};
use itertools::iproduct;

/// Which of a macroblock's two edge families is being filtered. Vertical
/// edges run down the picture and filter across sample columns; horizontal
/// edges the other way around.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EdgeDir {
    Vertical,
    Horizontal,
}

impl EdgeDir {
    pub(crate) fn is_horizontal(self) -> bool {
        matches!(self, EdgeDir::Horizontal)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            EdgeDir::Vertical => 0,
            EdgeDir::Horizontal => 1,
        }
    }
}

/// Everything the strength and edge passes read while one macroblock is
/// filtered. Collected once per macroblock so both passes stay functions of
/// their arguments.
pub(crate) struct FilterContext<'a> {
    pub layout: PictureLayout,
    pub mb_data: &'a [MacroblockInfo],
    pub motion: &'a MotionGrid,
    pub slice_type: SliceType,
    pub structure: PictureStructure,
    pub chroma_format: ChromaFormat,
    pub bit_depth_luma: u8,
    pub bit_depth_chroma: u8,

    /// The macroblock on the Q side of every edge.
    pub mb_addr: usize,

    /// Vertical motion-vector threshold in quarter samples: 2 under field
    /// filtering, 4 otherwise.
    pub mvlimit: i32,

    /// Which neighbour convention upward probes use.
    pub mode: NeighbourMode,
}

/// The Q-side sample of `edge` at position `pel` along it, in the local
/// coordinates of the current macroblock. Edge 4 is the synthetic
/// horizontal edge one sample row below the macroblock top.
pub(crate) fn edge_sample(dir: EdgeDir, edge: usize, pel: usize) -> (i32, i32) {
    match dir {
        EdgeDir::Vertical => ((edge << 2) as i32, pel as i32),
        EdgeDir::Horizontal => (pel as i32, if edge < 4 { (edge << 2) as i32 } else { 1 }),
    }
}

/// Filter every macroblock of a reconstructed picture, in increasing
/// address order.
pub fn deblock_picture<P: Pel>(pic: &mut DecodedPicture<P>) -> Result<()> {
    for mb_addr in 0..pic.size_in_mbs() {
        deblock_macroblock(pic, mb_addr)?;
    }

    Ok(())
}

/// Filter the eight edges of one macroblock, vertical family first.
pub fn deblock_macroblock<P: Pel>(pic: &mut DecodedPicture<P>, mb_addr: usize) -> Result<()> {
    let layout = pic.layout();
    let mb_q = pic.mb_data[mb_addr];

    if mb_q.filter_idc == LoopFilterIdc::Disabled {
        return Ok(());
    }

    debug_assert!(mb_q.mb_type != MacroblockType::Intra8x8 || mb_q.transform_size_8x8);

    let (mb_x, mb_y) = get_mb_pos(layout, mb_addr, (16, 16));
    let mut filter_left_mb_edge = mb_x != 0;
    let mut filter_top_mb_edge = mb_y != 0;

    let mut filter_non_8x8_luma_edges = [true; 4];
    filter_non_8x8_luma_edges[1] = !mb_q.transform_size_8x8;
    filter_non_8x8_luma_edges[3] = !mb_q.transform_size_8x8;

    // the bottom field macroblock of a first-row pair has only the picture
    // edge above it
    if layout.mbaff_frame
        && mb_q.mb_field
        && mb_addr % 2 == 1
        && mb_addr / 2 < layout.width_in_mbs
    {
        filter_top_mb_edge = false;
    }

    let field_mode_mb = pic.structure.is_field() || (layout.mbaff_frame && mb_q.mb_field);
    let mvlimit = if field_mode_mb { 2 } else { 4 };

    let avail = check_availability(layout, &pic.mb_data, mb_addr);
    if mb_q.filter_idc == LoopFilterIdc::DisabledAtSliceBoundary {
        // don't filter at slice boundaries; the bottom half of a frame pair
        // still filters against its own pair's top macroblock
        filter_left_mb_edge = avail.contains(NeighbourAvail::LEFT);
        filter_top_mb_edge = if layout.mbaff_frame && !mb_q.mb_field && mb_addr % 2 == 1 {
            true
        } else {
            avail.contains(NeighbourAvail::TOP)
        };
    }

    let slice_type = pic.slice_type;
    let structure = pic.structure;
    let chroma_format = pic.chroma_format;
    let bit_depth_luma = pic.bit_depth_luma;
    let bit_depth_chroma = pic.bit_depth_chroma;

    let DecodedPicture {
        luma,
        chroma,
        mb_data,
        motion,
        ..
    } = pic;
    let mb_data: &[MacroblockInfo] = mb_data;
    let motion: &MotionGrid = motion;

    let mut ctx = FilterContext {
        layout,
        mb_data,
        motion,
        slice_type,
        structure,
        chroma_format,
        bit_depth_luma,
        bit_depth_chroma,
        mb_addr,
        mvlimit,
        mode: NeighbourMode::Normal,
    };

    for (dir, edge) in iproduct!(
        [EdgeDir::Vertical, EdgeDir::Horizontal].iter().copied(),
        0..4usize
    ) {
        let edge_condition = if dir.is_horizontal() {
            filter_top_mb_edge
        } else {
            filter_left_mb_edge
        };
        if edge == 0 && !edge_condition {
            continue;
        }

        let edge_cr = CHROMA_EDGE[dir.index()][edge][chroma_format.idc()];
        let (strength, mixed_mode_edge) = get_strength(&ctx, dir, edge)?;

        if strength.iter().any(|&s| s != 0) {
            if filter_non_8x8_luma_edges[edge] {
                edge_loop(luma, &strength, &ctx, dir, edge, None)?;
            }
            if let Some(planes) = chroma.as_mut() {
                if edge_cr >= 0 {
                    for (uv, plane) in planes.iter_mut().enumerate() {
                        edge_loop(plane, &strength, &ctx, dir, edge_cr as usize, Some(uv))?;
                    }
                }
            }
        }

        // a frame macroblock under a field pair filters one extra
        // horizontal edge, one sample row below the shared boundary,
        // against the bottom field
        if dir.is_horizontal() && edge == 0 && !mb_q.mb_field && mixed_mode_edge {
            ctx.mode = NeighbourMode::MbaffExtraEdge;
            let (strength, _) = get_strength(&ctx, dir, 4)?;

            if strength.iter().any(|&s| s != 0) {
                if filter_non_8x8_luma_edges[0] {
                    edge_loop(luma, &strength, &ctx, dir, 4, None)?;
                }
                if let Some(planes) = chroma.as_mut() {
                    if edge_cr >= 0 {
                        for (uv, plane) in planes.iter_mut().enumerate() {
                            edge_loop(plane, &strength, &ctx, dir, 4, Some(uv))?;
                        }
                    }
                }
            }
            ctx.mode = NeighbourMode::Normal;
        }
    }

    Ok(())
}
