//! Boundary strength derivation
//!
//! Produces one strength value per sample position along an edge, from the
//! coding modes, coded-coefficient patterns, reference pictures and motion
//! vectors on its two sides. Strength 0 skips a sample entirely; 4 selects
//! the strong intra filter; 1..3 the normal filter with progressively wider
//! clipping bounds.

use crate::deblock::{edge_sample, EdgeDir, FilterContext};
use h264_rs::{
    get_4x4_neighbour, get_mb_block_pos, BlockMotion, Error, MotionVector, PictureStructure,
    Result,
};

/// Whether two motion vectors differ enough to leave a visible seam: a full
/// sample horizontally, or `mvlimit` quarter-samples vertically.
fn mv_apart(a: MotionVector, b: MotionVector, mvlimit: i32) -> bool {
    (i32::from(a.x) - i32::from(b.x)).abs() >= 4
        || (i32::from(a.y) - i32::from(b.y)).abs() >= mvlimit
}

/// Strength contribution of the reference-and-motion comparison, for two
/// blocks that both carry no coded residual.
fn motion_strength(p: &BlockMotion, q: &BlockMotion, mvlimit: i32) -> u8 {
    let (ref_p0, ref_p1) = (p.ref_id(0), p.ref_id(1));
    let (ref_q0, ref_q1) = (q.ref_id(0), q.ref_id(1));

    let same_pictures = (ref_p0 == ref_q0 && ref_p1 == ref_q1)
        || (ref_p0 == ref_q1 && ref_p1 == ref_q0);
    if !same_pictures {
        return 1;
    }

    if ref_p0 != ref_p1 {
        // the two lists reference distinct pictures; compare motion within
        // each matched pair of lists
        let apart = if ref_p0 == ref_q0 {
            mv_apart(p.mv[0], q.mv[0], mvlimit) || mv_apart(p.mv[1], q.mv[1], mvlimit)
        } else {
            mv_apart(p.mv[0], q.mv[1], mvlimit) || mv_apart(p.mv[1], q.mv[0], mvlimit)
        };
        apart as u8
    } else {
        // both lists reference the same picture, so either pairing of the
        // vectors may line up; a seam needs both pairings to move apart
        let straight = mv_apart(p.mv[0], q.mv[0], mvlimit) || mv_apart(p.mv[1], q.mv[1], mvlimit);
        let crossed = mv_apart(p.mv[0], q.mv[1], mvlimit) || mv_apart(p.mv[1], q.mv[0], mvlimit);
        (straight && crossed) as u8
    }
}

/// Derive the 16 per-sample boundary strengths of one edge of the current
/// macroblock, along with whether the edge separates a frame macroblock
/// from a field one.
///
/// The returned flag is what the driver consults to schedule the extra
/// horizontal edge over a mixed frame/field boundary.
pub(crate) fn get_strength(
    ctx: &FilterContext<'_>,
    dir: EdgeDir,
    edge: usize,
) -> Result<([u8; 16], bool)> {
    let mb_q = &ctx.mb_data[ctx.mb_addr];
    let mut strength = [0u8; 16];
    let mut mixed_mode_edge = false;

    for (idx, value) in strength.iter_mut().enumerate() {
        let (xq, yq) = edge_sample(dir, edge, idx);
        let (xp, yp) = if dir.is_horizontal() {
            (xq, yq - 1)
        } else {
            (xq - 1, yq)
        };

        let pix_p = get_4x4_neighbour(
            ctx.layout,
            ctx.mb_data,
            ctx.mb_addr,
            xp,
            yp,
            (16, 16),
            ctx.mode,
        );
        let p_addr = pix_p.mb_addr.ok_or(Error::NeighbourUnavailable)?;
        let mb_p = &ctx.mb_data[p_addr];
        mixed_mode_edge = mb_q.mb_field != mb_p.mb_field;

        let external_strong = edge == 0
            && ((!ctx.layout.mbaff_frame && ctx.structure == PictureStructure::Frame)
                || (ctx.layout.mbaff_frame && !mb_p.mb_field && !mb_q.mb_field)
                || ((ctx.layout.mbaff_frame || ctx.structure.is_field())
                    && !dir.is_horizontal()));
        *value = if external_strong { 4 } else { 3 };

        if ctx.slice_type.is_switching() {
            continue;
        }
        if mb_p.mb_type.is_intra() || mb_q.mb_type.is_intra() {
            continue;
        }

        let blk_q = ((yq as usize >> 2) << 2) + (xq as usize >> 2);
        let blk_p = (pix_p.y << 2) + pix_p.x;

        if (mb_q.cbp_blk >> blk_q) & 1 != 0 || (mb_p.cbp_blk >> blk_p) & 1 != 0 {
            *value = 2;
        } else if mixed_mode_edge {
            // one side predicts from frame references, the other from
            // fields; their vectors are incomparable
            *value = 1;
        } else {
            let (mb_x, mb_y) = get_mb_block_pos(ctx.layout, ctx.mb_addr);
            let blk_x = mb_x * 4 + (blk_q & 3);
            let blk_y = mb_y * 4 + (blk_q >> 2);

            let q = ctx.motion.get(blk_x, blk_y);
            let p = ctx.motion.get(pix_p.pos_x, pix_p.pos_y);
            *value = motion_strength(p, q, ctx.mvlimit);
        }
    }

    Ok((strength, mixed_mode_edge))
}
