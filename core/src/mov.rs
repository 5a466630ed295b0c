use crate::position::{CastlingRights, Piece, PieceType, Square, Zobrist};

use bitflags::bitflags;

use std::fmt;

bitflags! {
    pub struct MoveType: u8 {
        const QUIET      = 0b00000001;
        const CAPTURE    = 0b00000010;
        const PROMOTION  = 0b00000100;
        const CASTLE     = 0b00001000;
        const EN_PASSANT = 0b00010000;
        const NULL       = 0b00100000;
    }
}

/// A move as produced by move generation: origin, destination, optional
/// promotion target and the move-type flags. 4 bytes.
///
/// The capture flag reflects what the generator saw on the destination
/// square; it is a property of the move, not of the board at execution
/// time. There is not enough information here to undo a move; `make_move`
/// records an [`Undo`] frame for that.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Move {
    orig: Square,
    dest: Square,
    promo_piece_type: Option<PieceType>,
    ty: MoveType,
}

impl Move {
    /// Builds a move from an origin square, destination square and the
    /// move-type flags. The promotion type must be present exactly when the
    /// `PROMOTION` flag is set.
    pub fn build(
        orig: Square,
        dest: Square,
        promo_piece_type: Option<PieceType>,
        ty: MoveType,
    ) -> Self {
        debug_assert_eq!(ty.contains(MoveType::PROMOTION), promo_piece_type.is_some());
        Self {
            orig,
            dest,
            promo_piece_type,
            ty,
        }
    }

    /// The null move, used to initialise empty transposition-table and
    /// killer slots.
    pub fn null() -> Self {
        Self {
            orig: Square(64),
            dest: Square(64),
            promo_piece_type: None,
            ty: MoveType::NULL,
        }
    }

    #[inline(always)]
    pub fn orig(&self) -> Square {
        self.orig
    }

    #[inline(always)]
    pub fn dest(&self) -> Square {
        self.dest
    }

    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.ty.contains(MoveType::NULL)
    }

    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.ty.contains(MoveType::CAPTURE)
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.ty.contains(MoveType::EN_PASSANT)
    }

    #[inline(always)]
    pub fn is_castle(&self) -> bool {
        self.ty.contains(MoveType::CASTLE)
    }

    #[inline(always)]
    pub fn is_promo(&self) -> bool {
        self.ty.contains(MoveType::PROMOTION)
    }

    /// True for moves that neither capture nor promote; the only moves
    /// eligible for the killer and history tables.
    #[inline(always)]
    pub fn is_quiet(&self) -> bool {
        !self.ty.intersects(MoveType::CAPTURE | MoveType::PROMOTION)
    }

    #[inline(always)]
    pub fn promo_piece_type(&self) -> Option<PieceType> {
        self.promo_piece_type
    }

    #[inline(always)]
    pub fn move_type(&self) -> MoveType {
        self.ty
    }

    /// Returns the UCI encoding of this move, e.g. `e2e4` or `e7e8q`.
    /// Castling encodes as the king's two-square move, en passant as the
    /// capturing pawn's diagonal move.
    pub fn to_uci_string(&self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }

        match self.promo_piece_type {
            Some(promo) => format!("{}{}{}", self.orig, self.dest, promo.to_promo_char()),
            None => format!("{}{}", self.orig, self.dest),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci_string())
    }
}

/// The frame pushed by `make_move` and consumed by `unmake_move`: the move
/// itself, the piece that stood on the destination before the move (empty
/// for en passant; the captured pawn's square is derived), and the
/// irreversible state being clobbered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Undo {
    pub(crate) mov: Move,
    pub(crate) captured: Piece,
    pub(crate) prev_castling_rights: CastlingRights,
    pub(crate) prev_ep_square: Option<Square>,
    pub(crate) prev_half_move_clock: u32,
    pub(crate) prev_zobrist: Zobrist,
}

impl Undo {
    #[inline(always)]
    pub fn mov(&self) -> Move {
        self.mov
    }

    #[inline(always)]
    pub fn captured(&self) -> Piece {
        self.captured
    }

    /// The hash of the position this move was played from. Threefold
    /// detection scans these.
    #[inline(always)]
    pub fn prev_zobrist(&self) -> Zobrist {
        self.prev_zobrist
    }
}

impl fmt::Display for Undo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn move_is_4_bytes() {
        assert_eq!(mem::size_of::<Move>(), 4);
    }

    #[test]
    fn null_move_properties() {
        let null = Move::null();
        assert!(null.is_null());
        assert!(!null.is_capture());
        assert_eq!(null.to_uci_string(), "0000");
        assert_eq!(null, Move::null());
    }

    #[test]
    fn uci_strings() {
        let quiet = Move::build(Square::E2, Square::E4, None, MoveType::QUIET);
        assert_eq!(quiet.to_uci_string(), "e2e4");

        let promo = Move::build(
            Square::E7,
            Square::E8,
            Some(PieceType::Queen),
            MoveType::PROMOTION,
        );
        assert_eq!(promo.to_uci_string(), "e7e8q");

        let promo_capture = Move::build(
            Square::B7,
            Square::A8,
            Some(PieceType::Knight),
            MoveType::PROMOTION | MoveType::CAPTURE,
        );
        assert_eq!(promo_capture.to_uci_string(), "b7a8n");
        assert!(promo_capture.is_capture());
        assert!(promo_capture.is_promo());
        assert!(!promo_capture.is_quiet());
    }

    #[test]
    fn en_passant_is_a_capture() {
        let ep = Move::build(
            Square::D5,
            Square::C6,
            None,
            MoveType::EN_PASSANT | MoveType::CAPTURE,
        );
        assert!(ep.is_capture());
        assert!(ep.is_en_passant());
        assert!(!ep.is_quiet());
    }
}
