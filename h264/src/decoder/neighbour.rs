//! Macroblock neighbourhood resolution
//!
//! Maps a local sample offset, possibly outside the current macroblock, to
//! the macroblock and absolute plane position that contain it. Frame
//! pictures use plain raster adjacency; macroblock-adaptive frame/field
//! pictures additionally remap the vertical coordinate across frame/field
//! pair parity.

use crate::decoder::macroblock::MacroblockInfo;
use crate::decoder::picture::PictureLayout;

bitflags! {
    /// Which of the four neighbouring macroblocks exist and lie in the same
    /// slice as the current one.
    ///
    /// In macroblock-adaptive pictures these describe the neighbouring
    /// macroblock *pairs*, anchored at the pair's top macroblock.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct NeighbourAvail : u8 {
        /// Neighbour A, to the left.
        const LEFT = 0b1;

        /// Neighbour B, above.
        const TOP = 0b10;

        /// Neighbour C, above and to the right.
        const TOP_RIGHT = 0b100;

        /// Neighbour D, above and to the left.
        const TOP_LEFT = 0b1000;
    }
}

/// Which deblocking pass a neighbourhood query serves.
///
/// The synthetic horizontal edge between a frame macroblock and the field
/// pair above it needs its own upward-neighbour resolution, so the filter
/// announces that pass explicitly instead of leaving a flag in shared state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NeighbourMode {
    /// Ordinary edge filtering.
    Normal,

    /// The extra horizontal edge one sample below a frame macroblock's top
    /// boundary, filtered against the bottom field of the pair above.
    MbaffExtraEdge,
}

/// A resolved neighbour sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelPos {
    /// Whether the sample may be used: it lies inside the picture and its
    /// macroblock belongs to the same slice as the querying one.
    pub available: bool,

    /// The containing macroblock, known whenever the probe stayed inside
    /// the picture (even for a cross-slice neighbour).
    pub mb_addr: Option<usize>,

    /// Sample column inside the containing macroblock.
    pub x: usize,

    /// Sample row inside the containing macroblock.
    pub y: usize,

    /// Absolute sample column in the plane.
    pub pos_x: usize,

    /// Absolute sample row in the plane.
    pub pos_y: usize,
}

impl PixelPos {
    /// A probe that left the picture entirely.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            mb_addr: None,
            x: 0,
            y: 0,
            pos_x: 0,
            pos_y: 0,
        }
    }
}

/// Position of a macroblock in macroblock units.
///
/// Raster order normally; in macroblock-adaptive pictures the pair index
/// rasterizes and the two pair members share a column, one macroblock row
/// apart.
pub fn get_mb_block_pos(layout: PictureLayout, mb_addr: usize) -> (usize, usize) {
    if layout.mbaff_frame {
        let pair = mb_addr / 2;
        (
            pair % layout.width_in_mbs,
            2 * (pair / layout.width_in_mbs) + (mb_addr % 2),
        )
    } else {
        (
            mb_addr % layout.width_in_mbs,
            mb_addr / layout.width_in_mbs,
        )
    }
}

/// Position of a macroblock in sample units of a plane whose macroblocks
/// measure `mb_size` = (width, height).
pub fn get_mb_pos(layout: PictureLayout, mb_addr: usize, mb_size: (usize, usize)) -> (usize, usize) {
    let (mb_x, mb_y) = get_mb_block_pos(layout, mb_addr);

    (mb_x * mb_size.0, mb_y * mb_size.1)
}

/// Whether the macroblock at `mb_addr` exists and belongs to the same slice
/// as `cur_mb`.
pub fn mb_is_available(
    layout: PictureLayout,
    mb_data: &[MacroblockInfo],
    mb_addr: Option<usize>,
    cur_mb: usize,
) -> bool {
    match mb_addr {
        Some(addr) if addr < layout.size_in_mbs() => {
            mb_data[addr].slice_nr == mb_data[cur_mb].slice_nr
        }
        _ => false,
    }
}

/// Addresses of the A/B/C/D neighbours by picture geometry alone, before any
/// slice check. In macroblock-adaptive pictures these anchor at the top
/// macroblock of the neighbouring pair.
fn neighbour_addrs(layout: PictureLayout, cur_mb: usize) -> [Option<usize>; 4] {
    let w = layout.width_in_mbs;
    let (unit, scale) = if layout.mbaff_frame {
        (cur_mb / 2, 2)
    } else {
        (cur_mb, 1)
    };
    let col = unit % w;
    let row = unit / w;

    let a = if col > 0 { Some((unit - 1) * scale) } else { None };
    let b = if row > 0 { Some((unit - w) * scale) } else { None };
    let c = if row > 0 && col + 1 < w {
        Some((unit - w + 1) * scale)
    } else {
        None
    };
    let d = if row > 0 && col > 0 {
        Some((unit - w - 1) * scale)
    } else {
        None
    };

    [a, b, c, d]
}

/// Determine which of the left, top, top-right and top-left neighbours of
/// `cur_mb` are available for prediction and filtering.
pub fn check_availability(
    layout: PictureLayout,
    mb_data: &[MacroblockInfo],
    cur_mb: usize,
) -> NeighbourAvail {
    let [a, b, c, d] = neighbour_addrs(layout, cur_mb);
    let mut avail = NeighbourAvail::empty();

    if mb_is_available(layout, mb_data, a, cur_mb) {
        avail |= NeighbourAvail::LEFT;
    }
    if mb_is_available(layout, mb_data, b, cur_mb) {
        avail |= NeighbourAvail::TOP;
    }
    if mb_is_available(layout, mb_data, c, cur_mb) {
        avail |= NeighbourAvail::TOP_RIGHT;
    }
    if mb_is_available(layout, mb_data, d, cur_mb) {
        avail |= NeighbourAvail::TOP_LEFT;
    }

    avail
}

/// Complete a partially resolved probe: wrap the local coordinates into the
/// containing macroblock and derive the absolute plane position.
fn finish(
    layout: PictureLayout,
    mb_addr: Option<usize>,
    available: bool,
    xn: i32,
    ym: i32,
    mb_size: (usize, usize),
) -> PixelPos {
    let addr = match mb_addr {
        Some(addr) => addr,
        None => return PixelPos::unavailable(),
    };

    let x = xn.rem_euclid(mb_size.0 as i32) as usize;
    let y = ym.rem_euclid(mb_size.1 as i32) as usize;
    let (mb_x, mb_y) = get_mb_pos(layout, addr, mb_size);

    PixelPos {
        available,
        mb_addr: Some(addr),
        x,
        y,
        pos_x: mb_x + x,
        pos_y: mb_y + y,
    }
}

/// Resolve the sample at local offset `(xn, yn)` of `cur_mb` in a picture
/// without macroblock pairing.
///
/// `mb_size` is the macroblock extent in the probed plane's sample units
/// (16x16 for luma, the chroma-format-dependent size for chroma). Offsets
/// up to one macroblock outside the current one select the A/B/C/D
/// neighbours; anything further is out of reach.
pub fn get_non_aff_neighbour(
    layout: PictureLayout,
    mb_data: &[MacroblockInfo],
    cur_mb: usize,
    xn: i32,
    yn: i32,
    mb_size: (usize, usize),
) -> PixelPos {
    let (max_w, max_h) = (mb_size.0 as i32, mb_size.1 as i32);
    let [a, b, c, d] = neighbour_addrs(layout, cur_mb);

    let mb_addr = if xn < 0 && yn < 0 {
        d
    } else if xn < 0 && yn < max_h {
        a
    } else if xn < max_w && yn < 0 {
        b
    } else if xn < max_w && yn < max_h {
        Some(cur_mb)
    } else if xn >= max_w && yn < 0 {
        c
    } else {
        None
    };

    let available = mb_is_available(layout, mb_data, mb_addr, cur_mb);

    finish(layout, mb_addr, available, xn, yn, mb_size)
}

/// Resolve the sample at local offset `(xn, yn)` of `cur_mb` in a
/// macroblock-adaptive frame/field picture.
///
/// Vertical offsets that leave the macroblock are remapped according to the
/// frame/field parity of the current and the neighbouring pair, per the
/// neighbouring-locations derivation of ITU-T Recommendation H.264
/// (03/2005) 6.4.10. `mode` selects the upward neighbour convention for the
/// deblocker's two horizontal passes over a mixed frame/field boundary.
pub fn get_aff_neighbour(
    layout: PictureLayout,
    mb_data: &[MacroblockInfo],
    cur_mb: usize,
    xn: i32,
    yn: i32,
    mb_size: (usize, usize),
    mode: NeighbourMode,
) -> PixelPos {
    let (max_w, max_h) = (mb_size.0 as i32, mb_size.1 as i32);

    if yn > max_h - 1 || xn > max_w - 1 {
        // the lone reachable case beyond the right column is the top-right
        // corner, which no filtering pass ever probes
        return PixelPos::unavailable();
    }

    let [a, b, _, d] = neighbour_addrs(layout, cur_mb);
    let avail_a = mb_is_available(layout, mb_data, a, cur_mb);
    let avail_b = mb_is_available(layout, mb_data, b, cur_mb);
    let avail_d = mb_is_available(layout, mb_data, d, cur_mb);

    let bottom = cur_mb % 2 == 1;
    let cur_field = mb_data[cur_mb].mb_field;
    let field_at = |addr: Option<usize>| addr.map(|i| mb_data[i].mb_field).unwrap_or(false);

    let mb_addr: Option<usize>;
    let available: bool;
    let ym: i32;

    if xn < 0 && yn < 0 {
        // top-left corner
        match (cur_field, bottom) {
            (false, false) => {
                mb_addr = d.map(|i| i + 1);
                available = avail_d;
                ym = yn;
            }
            (false, true) => {
                available = avail_a;
                if field_at(a) {
                    mb_addr = a.map(|i| i + 1);
                    ym = (yn + max_h) >> 1;
                } else {
                    mb_addr = a;
                    ym = yn;
                }
            }
            (true, false) => {
                available = avail_d;
                if d.is_some() && !field_at(d) {
                    mb_addr = d.map(|i| i + 1);
                    ym = 2 * yn;
                } else {
                    mb_addr = d;
                    ym = yn;
                }
            }
            (true, true) => {
                mb_addr = d.map(|i| i + 1);
                available = avail_d;
                ym = yn;
            }
        }
    } else if xn < 0 {
        // left column
        available = avail_a;
        if a.is_none() {
            mb_addr = None;
            ym = 0;
        } else {
            let left_field = field_at(a);
            match (cur_field, bottom) {
                (false, false) => {
                    if left_field {
                        mb_addr = a.map(|i| i + (yn & 1) as usize);
                        ym = yn >> 1;
                    } else {
                        mb_addr = a;
                        ym = yn;
                    }
                }
                (false, true) => {
                    if left_field {
                        mb_addr = a.map(|i| i + (yn & 1) as usize);
                        ym = (yn + max_h) >> 1;
                    } else {
                        mb_addr = a.map(|i| i + 1);
                        ym = yn;
                    }
                }
                (true, false) => {
                    if left_field {
                        mb_addr = a;
                        ym = yn;
                    } else if yn < max_h / 2 {
                        mb_addr = a;
                        ym = 2 * yn;
                    } else {
                        mb_addr = a.map(|i| i + 1);
                        ym = 2 * yn - max_h;
                    }
                }
                (true, true) => {
                    if left_field {
                        mb_addr = a.map(|i| i + 1);
                        ym = yn;
                    } else if yn < max_h / 2 {
                        mb_addr = a;
                        ym = 2 * yn + 1;
                    } else {
                        mb_addr = a.map(|i| i + 1);
                        ym = 2 * yn + 1 - max_h;
                    }
                }
            }
        }
    } else if yn < 0 {
        // above the macroblock
        match (cur_field, bottom) {
            (false, false) => {
                available = avail_b;
                // the frame macroblock filters its top edge against the top
                // field of a field pair above; every other caller wants the
                // pair's bottom macroblock
                if b.is_some() && !(mode == NeighbourMode::Normal && field_at(b)) {
                    mb_addr = b.map(|i| i + 1);
                } else {
                    mb_addr = b;
                }
                ym = yn;
            }
            (false, true) => {
                mb_addr = Some(cur_mb - 1);
                available = true;
                ym = yn;
            }
            (true, false) => {
                available = avail_b;
                if b.is_some() && !field_at(b) {
                    mb_addr = b.map(|i| i + 1);
                    ym = 2 * yn;
                } else {
                    mb_addr = b;
                    ym = yn;
                }
            }
            (true, true) => {
                mb_addr = b.map(|i| i + 1);
                available = avail_b;
                ym = yn;
            }
        }
    } else if yn == 0 && mode == NeighbourMode::MbaffExtraEdge {
        // one row below the boundary against the pair above: the partner
        // samples come from that pair's bottom macroblock
        mb_addr = b.map(|i| i + 1);
        available = mb_addr.is_some();
        ym = -1;
    } else {
        mb_addr = Some(cur_mb);
        available = true;
        ym = yn;
    }

    finish(layout, mb_addr, available, xn, ym, mb_size)
}

/// Resolve a neighbour sample with the addressing variant the picture
/// requires.
pub fn get_neighbour(
    layout: PictureLayout,
    mb_data: &[MacroblockInfo],
    cur_mb: usize,
    xn: i32,
    yn: i32,
    mb_size: (usize, usize),
    mode: NeighbourMode,
) -> PixelPos {
    if layout.mbaff_frame {
        get_aff_neighbour(layout, mb_data, cur_mb, xn, yn, mb_size, mode)
    } else {
        get_non_aff_neighbour(layout, mb_data, cur_mb, xn, yn, mb_size)
    }
}

/// Resolve a neighbour and snap the result to the 4x4 block grid.
///
/// Local and absolute coordinates come back in block units rather than
/// sample units.
pub fn get_4x4_neighbour(
    layout: PictureLayout,
    mb_data: &[MacroblockInfo],
    cur_mb: usize,
    xn: i32,
    yn: i32,
    mb_size: (usize, usize),
    mode: NeighbourMode,
) -> PixelPos {
    let mut pix = get_neighbour(layout, mb_data, cur_mb, xn, yn, mb_size, mode);

    if pix.mb_addr.is_some() {
        pix.x >>= 2;
        pix.y >>= 2;
        pix.pos_x >>= 2;
        pix.pos_y >>= 2;
    }

    pix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::macroblock::MacroblockInfo;

    const LUMA_MB: (usize, usize) = (16, 16);

    fn layout(width_in_mbs: usize, height_in_mbs: usize, mbaff_frame: bool) -> PictureLayout {
        PictureLayout {
            width_in_mbs,
            height_in_mbs,
            mbaff_frame,
        }
    }

    fn mbs(count: usize) -> Vec<MacroblockInfo> {
        vec![MacroblockInfo::intra(26); count]
    }

    #[test]
    fn raster_mb_positions() {
        let layout = layout(3, 2, false);

        assert_eq!(get_mb_block_pos(layout, 0), (0, 0));
        assert_eq!(get_mb_block_pos(layout, 4), (1, 1));
        assert_eq!(get_mb_pos(layout, 5, LUMA_MB), (32, 16));
        assert_eq!(get_mb_pos(layout, 4, (8, 8)), (8, 8));
    }

    #[test]
    fn mbaff_pair_positions() {
        let layout = layout(2, 4, true);

        // pair 0: addresses 0 and 1 share a column
        assert_eq!(get_mb_block_pos(layout, 0), (0, 0));
        assert_eq!(get_mb_block_pos(layout, 1), (0, 1));
        // pair 3: second pair row, second column
        assert_eq!(get_mb_block_pos(layout, 6), (1, 2));
        assert_eq!(get_mb_block_pos(layout, 7), (1, 3));
        assert_eq!(get_mb_pos(layout, 7, LUMA_MB), (16, 48));
    }

    #[test]
    fn availability_honours_picture_edges() {
        let layout = layout(3, 2, false);
        let mb_data = mbs(6);

        assert_eq!(check_availability(layout, &mb_data, 0), NeighbourAvail::empty());
        assert_eq!(check_availability(layout, &mb_data, 2), NeighbourAvail::LEFT);
        assert_eq!(
            check_availability(layout, &mb_data, 4),
            NeighbourAvail::all()
        );
        // last column has no top-right neighbour
        assert_eq!(
            check_availability(layout, &mb_data, 5),
            NeighbourAvail::LEFT | NeighbourAvail::TOP | NeighbourAvail::TOP_LEFT
        );
    }

    #[test]
    fn availability_honours_slice_boundaries() {
        let layout = layout(3, 2, false);
        let mut mb_data = mbs(6);
        for mb in mb_data.iter_mut().take(4) {
            mb.slice_nr = 0;
        }
        for mb in mb_data.iter_mut().skip(4) {
            mb.slice_nr = 1;
        }

        // MB 4 opens slice 1: its left (3) and top (1) lie in slice 0
        assert_eq!(check_availability(layout, &mb_data, 4), NeighbourAvail::empty());
        assert_eq!(check_availability(layout, &mb_data, 5), NeighbourAvail::LEFT);
    }

    #[test]
    fn non_aff_left_and_top_probes() {
        let layout = layout(3, 2, false);
        let mb_data = mbs(6);

        let left = get_non_aff_neighbour(layout, &mb_data, 4, -1, 3, LUMA_MB);
        assert!(left.available);
        assert_eq!(left.mb_addr, Some(3));
        assert_eq!((left.x, left.y), (15, 3));
        assert_eq!((left.pos_x, left.pos_y), (15, 19));

        let top = get_non_aff_neighbour(layout, &mb_data, 4, 7, -1, LUMA_MB);
        assert_eq!(top.mb_addr, Some(1));
        assert_eq!((top.pos_x, top.pos_y), (23, 15));

        let inside = get_non_aff_neighbour(layout, &mb_data, 4, 7, 3, LUMA_MB);
        assert_eq!(inside.mb_addr, Some(4));
        assert_eq!((inside.pos_x, inside.pos_y), (23, 19));
    }

    #[test]
    fn non_aff_probe_off_picture_is_unavailable() {
        let layout = layout(3, 2, false);
        let mb_data = mbs(6);

        assert_eq!(
            get_non_aff_neighbour(layout, &mb_data, 1, 4, -1, LUMA_MB),
            PixelPos::unavailable()
        );
        assert_eq!(
            get_non_aff_neighbour(layout, &mb_data, 0, -1, 4, LUMA_MB),
            PixelPos::unavailable()
        );
    }

    #[test]
    fn non_aff_cross_slice_probe_keeps_position() {
        let layout = layout(3, 2, false);
        let mut mb_data = mbs(6);
        mb_data[4].slice_nr = 1;
        mb_data[5].slice_nr = 1;

        let left = get_non_aff_neighbour(layout, &mb_data, 4, -1, 0, LUMA_MB);
        assert!(!left.available);
        assert_eq!(left.mb_addr, Some(3));
        assert_eq!((left.pos_x, left.pos_y), (15, 16));
    }

    #[test]
    fn aff_frame_pair_internal_top_edge() {
        let layout = layout(2, 4, true);
        let mb_data = mbs(8);

        // bottom MB of a frame pair reaches its own pair's top MB
        let up = get_aff_neighbour(layout, &mb_data, 5, 4, -1, LUMA_MB, NeighbourMode::Normal);
        assert!(up.available);
        assert_eq!(up.mb_addr, Some(4));
        assert_eq!((up.x, up.y), (4, 15));
        assert_eq!((up.pos_x, up.pos_y), (4, 47));
    }

    #[test]
    fn aff_frame_over_field_top_edge_picks_top_field() {
        let layout = layout(1, 4, true);
        let mut mb_data = mbs(4);
        mb_data[0].mb_field = true;
        mb_data[1].mb_field = true;

        // normal pass: frame MB 2 resolves its top edge against the top
        // field MB of the pair above
        let up = get_aff_neighbour(layout, &mb_data, 2, 0, -1, LUMA_MB, NeighbourMode::Normal);
        assert_eq!(up.mb_addr, Some(0));
        assert_eq!(up.y, 15);
        assert_eq!(up.pos_y, 15);

        // extra-edge pass: row 0 probes land in the bottom field MB instead
        let extra = get_aff_neighbour(
            layout,
            &mb_data,
            2,
            0,
            0,
            LUMA_MB,
            NeighbourMode::MbaffExtraEdge,
        );
        assert_eq!(extra.mb_addr, Some(1));
        assert_eq!(extra.y, 15);
        assert_eq!(extra.pos_y, 31);
    }

    #[test]
    fn aff_frame_over_frame_top_edge_picks_bottom_mb() {
        let layout = layout(1, 4, true);
        let mb_data = mbs(4);

        let up = get_aff_neighbour(layout, &mb_data, 2, 3, -1, LUMA_MB, NeighbourMode::Normal);
        assert_eq!(up.mb_addr, Some(1));
        assert_eq!((up.pos_x, up.pos_y), (3, 31));
    }

    #[test]
    fn aff_field_bottom_mb_reaches_pair_above() {
        let layout = layout(1, 4, true);
        let mut mb_data = mbs(4);
        for mb in mb_data.iter_mut() {
            mb.mb_field = true;
        }

        // a field pair's bottom MB has no internal top edge; its upward
        // neighbour is the bottom MB of the pair above
        let up = get_aff_neighbour(layout, &mb_data, 3, 0, -1, LUMA_MB, NeighbourMode::Normal);
        assert!(up.available);
        assert_eq!(up.mb_addr, Some(1));
        assert_eq!(up.pos_y, 31);
    }

    #[test]
    fn aff_frame_mb_left_of_field_pair_interleaves() {
        let layout = layout(2, 2, true);
        let mut mb_data = mbs(4);
        mb_data[0].mb_field = true;
        mb_data[1].mb_field = true;

        // frame MB 2 (top of the right pair) borrows alternate field rows
        // from the pair on its left
        let even = get_aff_neighbour(layout, &mb_data, 2, -1, 6, LUMA_MB, NeighbourMode::Normal);
        assert_eq!(even.mb_addr, Some(0));
        assert_eq!(even.y, 3);

        let odd = get_aff_neighbour(layout, &mb_data, 2, -1, 7, LUMA_MB, NeighbourMode::Normal);
        assert_eq!(odd.mb_addr, Some(1));
        assert_eq!(odd.y, 3);
    }

    #[test]
    fn aff_field_mb_left_of_frame_pair_doubles() {
        let layout = layout(2, 2, true);
        let mut mb_data = mbs(4);
        mb_data[2].mb_field = true;
        mb_data[3].mb_field = true;

        // top field MB 2 sees the left frame pair's rows two at a time
        let low = get_aff_neighbour(layout, &mb_data, 2, -1, 3, LUMA_MB, NeighbourMode::Normal);
        assert_eq!(low.mb_addr, Some(0));
        assert_eq!(low.y, 6);

        let high = get_aff_neighbour(layout, &mb_data, 2, -1, 12, LUMA_MB, NeighbourMode::Normal);
        assert_eq!(high.mb_addr, Some(1));
        assert_eq!(high.y, 8);
    }

    #[test]
    fn block_grid_snapping() {
        let layout = layout(3, 2, false);
        let mb_data = mbs(6);

        let pix = get_4x4_neighbour(
            layout,
            &mb_data,
            4,
            -1,
            9,
            LUMA_MB,
            NeighbourMode::Normal,
        );
        assert_eq!(pix.mb_addr, Some(3));
        assert_eq!((pix.x, pix.y), (3, 2));
        assert_eq!((pix.pos_x, pix.pos_y), (3, 6));
    }
}
