//! Bitboard chess board representation and legal move generation.
//!
//! The crate provides the [`Position`] type — piece bitboards, make/unmake
//! with an undo stack, an incrementally maintained zobrist hash, FEN I/O
//! and terminal detection — together with [`MoveList`]-based legal move
//! generation and a perft harness. Search and evaluation live in the
//! companion engine crate.

#[macro_use]
mod macros;

mod masks;
mod precalc;

pub mod bb;
pub mod mov;
pub mod movegen;
pub mod movelist;
pub mod perft;
pub mod position;

pub use bb::Bitboard;
pub use mov::{Move, MoveType, Undo};
pub use movelist::{MoveList, MAX_MOVES};
pub use position::{
    CastlingRights, FenError, MoveError, Piece, PieceType, Player, Position, Square, Zobrist,
    PROMO_PIECES, START_POSITION,
};
