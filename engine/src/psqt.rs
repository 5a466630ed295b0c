//! Piece-square tables, midgame and endgame, in centipawns.
//!
//! Tables are written from White's perspective with index 0 = A1; Black
//! values come from mirroring the rank (files are not flipped). Each lookup
//! interpolates between the midgame and endgame tables by game phase.

use meitner_core::position::{PieceType, Player, Square};

#[rustfmt::skip]
const PAWN_MG: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     2,   4,   5,  10,  10,   5,   4,   2,
     4,   8,  12,  16,  16,  12,   8,   4,
     6,  12,  16,  24,  24,  16,  12,   6,
     8,  16,  24,  32,  32,  24,  16,   8,
    12,  24,  36,  48,  48,  36,  24,  12,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    10,  10,  10,  10,  10,  10,  10,  10,
    20,  20,  20,  20,  20,  20,  20,  20,
    30,  30,  30,  30,  30,  30,  30,  30,
    40,  40,  40,  40,  40,  40,  40,  40,
    60,  60,  60,  60,  60,  60,  60,  60,
   100, 100, 100, 100, 100, 100, 100, 100,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_MG: [i32; 64] = [
   -10,  -8,  -6,  -4,  -4,  -6,  -8, -10,
    -8,   0,   2,   4,   4,   2,   0,  -8,
    -6,   2,   6,   8,   8,   6,   2,  -6,
    -4,   4,   8,  10,  10,   8,   4,  -4,
    -4,   4,   8,  10,  10,   8,   4,  -4,
    -6,   2,   6,   8,   8,   6,   2,  -6,
    -8,   0,   2,   4,   4,   2,   0,  -8,
   -10,  -8,  -6,  -4,  -4,  -6,  -8, -10,
];

#[rustfmt::skip]
const KNIGHT_EG: [i32; 64] = [
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -2,   2,   4,   6,   6,   4,   2,  -2,
     0,   4,   6,   8,   8,   6,   4,   0,
     0,   4,   6,   8,   8,   6,   4,   0,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
];

#[rustfmt::skip]
const BISHOP_MG: [i32; 64] = [
    -4,  -2,  -2,  -2,  -2,  -2,  -2,  -4,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -2,   2,   4,   4,   4,   4,   2,  -2,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -2,   2,   4,   4,   4,   4,   2,  -2,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -4,  -2,  -2,  -2,  -2,  -2,  -2,  -4,
];

#[rustfmt::skip]
const BISHOP_EG: [i32; 64] = [
    -2,  -1,  -1,  -1,  -1,  -1,  -1,  -2,
    -1,   0,   1,   1,   1,   1,   0,  -1,
    -1,   1,   2,   2,   2,   2,   1,  -1,
    -1,   1,   2,   4,   4,   2,   1,  -1,
    -1,   1,   2,   4,   4,   2,   1,  -1,
    -1,   1,   2,   2,   2,   2,   1,  -1,
    -1,   0,   1,   1,   1,   1,   0,  -1,
    -2,  -1,  -1,  -1,  -1,  -1,  -1,  -2,
];

#[rustfmt::skip]
const ROOK_MG: [i32; 64] = [
     0,   1,   2,   3,   3,   2,   1,   0,
     1,   2,   3,   4,   4,   3,   2,   1,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     5,   5,   5,   5,   5,   5,   5,   5,
     0,   1,   2,   3,   3,   2,   1,   0,
];

#[rustfmt::skip]
const ROOK_EG: [i32; 64] = [
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
    -2,   0,   2,   2,   2,   2,   0,  -2,
     0,   2,   4,   4,   4,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   4,   4,   4,   2,   0,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
];

#[rustfmt::skip]
const QUEEN_MG: [i32; 64] = [
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
    -2,   0,   2,   2,   2,   2,   0,  -2,
     0,   2,   4,   4,   4,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   4,   4,   4,   2,   0,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
];

#[rustfmt::skip]
const QUEEN_EG: [i32; 64] = [
    -2,  -1,   0,   0,   0,   0,  -1,  -2,
    -1,   0,   1,   1,   1,   1,   0,  -1,
     0,   1,   2,   2,   2,   2,   1,   0,
     0,   1,   2,   4,   4,   2,   1,   0,
     0,   1,   2,   4,   4,   2,   1,   0,
     0,   1,   2,   2,   2,   2,   1,   0,
    -1,   0,   1,   1,   1,   1,   0,  -1,
    -2,  -1,   0,   0,   0,   0,  -1,  -2,
];

#[rustfmt::skip]
const KING_MG: [i32; 64] = [
   -40, -30, -30, -30, -30, -30, -30, -40,
   -30, -20, -10, -10, -10, -10, -20, -30,
   -20, -10,   0,   0,   0,   0, -10, -20,
   -10,   0,   5,   5,   5,   5,   0, -10,
     0,   5,  10,  10,  10,  10,   5,   0,
    -5,   0,   5,  10,  10,   5,   0,  -5,
   -30, -20, -10, -10, -10, -10, -20, -30,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const KING_EG: [i32; 64] = [
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -2,   2,   4,   6,   6,   4,   2,  -2,
     0,   4,   6,   8,   8,   6,   4,   0,
     0,   4,   6,   8,   8,   6,   4,   0,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
];

const MIDGAME: [[i32; 64]; 6] = [PAWN_MG, KNIGHT_MG, BISHOP_MG, ROOK_MG, QUEEN_MG, KING_MG];
const ENDGAME: [[i32; 64]; 6] = [PAWN_EG, KNIGHT_EG, BISHOP_EG, ROOK_EG, QUEEN_EG, KING_EG];

/// Full phase: all minor and major pieces still on the board.
pub const PHASE_MAX: i32 = 256;

#[inline]
fn table_index(sq: Square, player: Player) -> usize {
    match player {
        Player::White => sq.0 as usize,
        Player::Black => sq.flip_rank().0 as usize,
    }
}

/// Midgame table value for a piece of `player` on `sq`.
#[inline]
pub fn midgame_value(pt: PieceType, sq: Square, player: Player) -> i32 {
    MIDGAME[pt.index()][table_index(sq, player)]
}

/// Endgame table value for a piece of `player` on `sq`.
#[inline]
pub fn endgame_value(pt: PieceType, sq: Square, player: Player) -> i32 {
    ENDGAME[pt.index()][table_index(sq, player)]
}

/// Phase-interpolated table value: `phase` runs from 0 (bare endgame) to
/// [`PHASE_MAX`] (full midgame).
#[inline]
pub fn value(pt: PieceType, sq: Square, player: Player, phase: i32) -> i32 {
    debug_assert!((0..=PHASE_MAX).contains(&phase));
    let mg = midgame_value(pt, sq, player);
    let eg = endgame_value(pt, sq, player);
    (mg * phase + eg * (PHASE_MAX - phase)) / PHASE_MAX
}
