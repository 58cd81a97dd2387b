//! Filter threshold tables from ITU-T Recommendation H.264 (03/2005) 8.7

/// Largest quantization parameter the tables are indexed by.
pub const MAX_QP: i32 = 51;

/// Table 8-16 - threshold `alpha` as a function of `indexA`, before bit
/// depth scaling.
#[rustfmt::skip]
pub const ALPHA_TABLE: [u8; 52] = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      4,   4,   5,   6,   7,   8,   9,  10,  12,  13,  15,  17,  20,  22,  25,  28,
     32,  36,  40,  45,  50,  56,  63,  71,  80,  90, 101, 113, 127, 144, 162, 182,
    203, 226, 255, 255,
];

/// Table 8-16 - threshold `beta` as a function of `indexB`, before bit depth
/// scaling.
#[rustfmt::skip]
pub const BETA_TABLE: [u8; 52] = [
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     2,  2,  2,  3,  3,  3,  3,  4,  4,  4,  6,  6,  7,  7,  8,  8,
     9,  9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15, 16, 16,
    17, 17, 18, 18,
];

/// Table 8-17 - clipping bound `t'C0` by `indexA` and boundary strength.
/// Entry 0 of each row is never consulted (strength 0 edges are skipped).
#[rustfmt::skip]
pub const CLIP_TAB: [[u8; 5]; 52] = [
    [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0], [0, 0, 0, 1, 1], [0, 0, 0, 1, 1], [0, 0, 0, 1, 1],
    [0, 0, 0, 1, 1], [0, 0, 1, 1, 1], [0, 0, 1, 1, 1], [0, 1, 1, 1, 1],
    [0, 1, 1, 1, 1], [0, 1, 1, 1, 1], [0, 1, 1, 1, 1], [0, 1, 1, 2, 2],
    [0, 1, 1, 2, 2], [0, 1, 1, 2, 2], [0, 1, 1, 2, 2], [0, 1, 2, 3, 3],
    [0, 1, 2, 3, 3], [0, 2, 2, 3, 3], [0, 2, 2, 4, 4], [0, 2, 3, 4, 4],
    [0, 2, 3, 4, 4], [0, 3, 3, 5, 5], [0, 3, 4, 6, 6], [0, 3, 4, 6, 6],
    [0, 4, 5, 7, 7], [0, 4, 5, 8, 8], [0, 4, 6, 9, 9], [0, 5, 7, 10, 10],
    [0, 6, 8, 11, 11], [0, 6, 8, 13, 13], [0, 7, 10, 14, 14], [0, 8, 11, 16, 16],
    [0, 9, 12, 18, 18], [0, 10, 13, 20, 20], [0, 11, 15, 23, 23], [0, 13, 17, 25, 25],
];

/// Table 8-15 - mapping from a clipped luma QP to the chroma QP it implies.
#[rustfmt::skip]
pub const QP_SCALE_CR: [u8; 52] = [
     0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15,
    16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 29, 30,
    31, 32, 32, 33, 34, 34, 35, 35, 36, 36, 37, 37, 37, 38, 38, 38,
    39, 39, 39, 39,
];

/// Chroma edge index by `[dir][edge][chroma_format_idc]`; -1 marks a luma
/// edge with no chroma counterpart in that sampling structure.
#[rustfmt::skip]
pub const CHROMA_EDGE: [[[i8; 4]; 4]; 2] = [
    [
        [-1,  0,  0,  0],
        [-1, -1, -1,  1],
        [-1,  1,  1,  2],
        [-1, -1, -1,  3],
    ],
    [
        [-1,  0,  0,  0],
        [-1, -1,  1,  1],
        [-1,  1,  2,  2],
        [-1, -1,  3,  3],
    ],
];

/// Samples per chroma edge by `[dir][chroma_format_idc]`.
#[rustfmt::skip]
pub const PELNUM_CR: [[usize; 4]; 2] = [
    [0, 8, 16, 16],
    [0, 8,  8, 16],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cover_every_qp() {
        assert_eq!(ALPHA_TABLE.len(), (MAX_QP + 1) as usize);
        assert_eq!(BETA_TABLE.len(), (MAX_QP + 1) as usize);
        assert_eq!(CLIP_TAB.len(), (MAX_QP + 1) as usize);
        assert_eq!(QP_SCALE_CR.len(), (MAX_QP + 1) as usize);
    }

    #[test]
    fn thresholds_vanish_below_activation_qp() {
        // no edge filters at all below the QP where alpha first turns on
        for qp in 0..16 {
            assert_eq!(ALPHA_TABLE[qp], 0);
            assert_eq!(BETA_TABLE[qp], 0);
            assert_eq!(CLIP_TAB[qp], [0; 5]);
        }
        assert!(ALPHA_TABLE[16] > 0);
    }

    #[test]
    fn chroma_edges_match_sampling_structure() {
        // monochrome never has chroma edges
        for dir in &CHROMA_EDGE {
            for edge in dir {
                assert_eq!(edge[0], -1);
            }
        }
        // 4:2:0 folds both directions to edges 0 and 1
        assert_eq!(CHROMA_EDGE[0][0][1], 0);
        assert_eq!(CHROMA_EDGE[0][2][1], 1);
        assert_eq!(CHROMA_EDGE[0][1][1], -1);
        // 4:2:2 keeps all four horizontal edges
        assert_eq!(CHROMA_EDGE[1][3][2], 3);
    }
}
