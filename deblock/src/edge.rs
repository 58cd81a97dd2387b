//! Per-edge sample filtering
//!
//! Filters the 16 luma (or up to 16 chroma) sample positions along one edge,
//! reading four samples on each side of the boundary and rewriting up to
//! three. Thresholds derive from the QP of the two adjoining macroblocks and
//! the slice-level offsets; everything scales with bit depth.

use crate::deblock::{edge_sample, EdgeDir, FilterContext};
use crate::tables::{ALPHA_TABLE, BETA_TABLE, CLIP_TAB, MAX_QP, PELNUM_CR, QP_SCALE_CR};
use h264_rs::{get_neighbour, Error, LoopFilterIdc, Pel, Plane, Result};

/// The chroma QP implied by a luma QP and a per-plane offset.
fn chroma_qp(qp: u8, offset: i8) -> i32 {
    let index = (i32::from(qp) + i32::from(offset)).clamp(0, MAX_QP) as usize;

    i32::from(QP_SCALE_CR[index])
}

/// Filter one edge of the current macroblock in place.
///
/// `chroma_plane` selects the chroma variant and the plane's QP offset;
/// `None` filters luma. For chroma the `edge` argument is already the
/// chroma edge index, in chroma sample units.
pub(crate) fn edge_loop<P: Pel>(
    plane: &mut Plane<P>,
    strength: &[u8; 16],
    ctx: &FilterContext<'_>,
    dir: EdgeDir,
    edge: usize,
    chroma_plane: Option<usize>,
) -> Result<()> {
    let mb_q = &ctx.mb_data[ctx.mb_addr];
    let is_chroma = chroma_plane.is_some();
    let bit_depth = if is_chroma {
        ctx.bit_depth_chroma
    } else {
        ctx.bit_depth_luma
    };
    let bitdepth_scale = 1i32 << (bit_depth - 8);
    let max_value = (1i32 << bit_depth) - 1;

    let mb_size = if is_chroma {
        ctx.chroma_format
            .mb_chroma_size()
            .ok_or(Error::InternalDecoderError)?
    } else {
        (16, 16)
    };
    let pel_num = if is_chroma {
        PELNUM_CR[dir.index()][ctx.chroma_format.idc()]
    } else {
        16
    };
    let stride = plane.stride() as isize;

    for pel in 0..pel_num {
        let (xq, yq) = edge_sample(dir, edge, pel);
        let (xp, yp) = if dir.is_horizontal() {
            (xq, yq - 1)
        } else {
            (xq - 1, yq)
        };

        let pix_q = get_neighbour(ctx.layout, ctx.mb_data, ctx.mb_addr, xq, yq, mb_size, ctx.mode);
        let pix_p = get_neighbour(ctx.layout, ctx.mb_data, ctx.mb_addr, xp, yp, mb_size, ctx.mode);
        let p_addr = pix_p.mb_addr.ok_or(Error::NeighbourUnavailable)?;
        let mb_p = &ctx.mb_data[p_addr];

        let field_filtering = mb_q.mb_field || mb_p.mb_field;
        let strength_idx = if is_chroma && pel_num == 8 {
            if mb_q.mb_field && !mb_p.mb_field {
                pel << 1
            } else {
                ((pel >> 1) << 2) + (pel % 2)
            }
        } else {
            pel
        };

        // a neighbour in another slice only participates when filtering
        // across slice boundaries is enabled for this macroblock
        if !(pix_p.available || mb_q.filter_idc == LoopFilterIdc::Enabled) {
            continue;
        }

        let strng = strength[strength_idx];
        if strng == 0 {
            continue;
        }

        // under field filtering the frame-coded side reads every other row,
        // so that one field is filtered at a time
        let (inc_p, inc_q) = if dir.is_horizontal() {
            (
                if field_filtering && !mb_p.mb_field {
                    2 * stride
                } else {
                    stride
                },
                if field_filtering && !mb_q.mb_field {
                    2 * stride
                } else {
                    stride
                },
            )
        } else {
            (1, 1)
        };

        let base_p = plane.offset(pix_p.pos_x, pix_p.pos_y) as isize;
        let base_q = plane.offset(pix_q.pos_x, pix_q.pos_y) as isize;

        let qp_avg = if let Some(uv) = chroma_plane {
            (chroma_qp(mb_p.qp, mb_p.chroma_qp_offset[uv])
                + chroma_qp(mb_q.qp, mb_q.chroma_qp_offset[uv])
                + 1)
                >> 1
        } else {
            (i32::from(mb_p.qp) + i32::from(mb_q.qp) + 1) >> 1
        };

        let index_a = (qp_avg + i32::from(mb_q.alpha_c0_offset)).clamp(0, MAX_QP) as usize;
        let index_b = (qp_avg + i32::from(mb_q.beta_offset)).clamp(0, MAX_QP) as usize;

        let alpha = i32::from(ALPHA_TABLE[index_a]) * bitdepth_scale;
        let beta = i32::from(BETA_TABLE[index_b]) * bitdepth_scale;
        let c0_table = i32::from(CLIP_TAB[index_a][strng as usize]) * bitdepth_scale;

        let samples = plane.samples_mut();
        let sample =
            |samples: &[P], base: isize, step: isize| -> i32 { samples[(base + step) as usize].as_() };

        let l0 = sample(samples, base_p, 0);
        let r0 = sample(samples, base_q, 0);
        let l1 = sample(samples, base_p, -inc_p);
        let r1 = sample(samples, base_q, inc_q);
        let l2 = sample(samples, base_p, -2 * inc_p);
        let r2 = sample(samples, base_q, 2 * inc_q);
        let l3 = sample(samples, base_p, -3 * inc_p);
        let r3 = sample(samples, base_q, 3 * inc_q);

        let delta = r0 - l0;
        let abs_delta = delta.abs();

        if abs_delta >= alpha || (r0 - r1).abs() >= beta || (l0 - l1).abs() >= beta {
            continue;
        }

        let mut ap = false;
        let mut aq = false;
        if !is_chroma {
            aq = (r0 - r2).abs() < beta;
            ap = (l0 - l2).abs() < beta;
        }
        let rl0 = l0 + r0;

        if strng == 4 {
            if is_chroma {
                samples[base_q as usize] = P::from_clipped((2 * r1 + r0 + l1 + 2) >> 2);
                samples[base_p as usize] = P::from_clipped((2 * l1 + l0 + r1 + 2) >> 2);
            } else {
                // only a small step across the boundary justifies the full
                // three-sample smoothing
                let small_gap = abs_delta < (alpha >> 2) + 2;
                let aq = aq && small_gap;
                let ap = ap && small_gap;

                samples[base_q as usize] = P::from_clipped(if aq {
                    (l1 + ((r1 + rl0) << 1) + r2 + 4) >> 3
                } else {
                    (2 * r1 + r0 + l1 + 2) >> 2
                });
                samples[base_p as usize] = P::from_clipped(if ap {
                    (r1 + ((l1 + rl0) << 1) + l2 + 4) >> 3
                } else {
                    (2 * l1 + l0 + r1 + 2) >> 2
                });

                if aq {
                    samples[(base_q + inc_q) as usize] =
                        P::from_clipped((r2 + r0 + r1 + l0 + 2) >> 2);
                    samples[(base_q + 2 * inc_q) as usize] =
                        P::from_clipped((((r3 + r2) << 1) + r2 + r1 + rl0 + 4) >> 3);
                }
                if ap {
                    samples[(base_p - inc_p) as usize] =
                        P::from_clipped((l2 + l1 + l0 + r0 + 2) >> 2);
                    samples[(base_p - 2 * inc_p) as usize] =
                        P::from_clipped((((l3 + l2) << 1) + l2 + l1 + rl0 + 4) >> 3);
                }
            }
        } else {
            let c0 = if is_chroma {
                c0_table + 1
            } else {
                c0_table + ap as i32 + aq as i32
            };
            let dif = (((delta << 2) + (l1 - r1) + 4) >> 3).clamp(-c0, c0);

            samples[base_p as usize] = P::from_clipped((l0 + dif).clamp(0, max_value));
            samples[base_q as usize] = P::from_clipped((r0 - dif).clamp(0, max_value));

            if !is_chroma {
                if ap {
                    let adj =
                        ((l2 + ((rl0 + 1) >> 1) - (l1 << 1)) >> 1).clamp(-c0_table, c0_table);
                    samples[(base_p - inc_p) as usize] = P::from_clipped(l1 + adj);
                }
                if aq {
                    let adj =
                        ((r2 + ((rl0 + 1) >> 1) - (r1 << 1)) >> 1).clamp(-c0_table, c0_table);
                    samples[(base_q + inc_q) as usize] = P::from_clipped(r1 + adj);
                }
            }
        }
    }

    Ok(())
}
