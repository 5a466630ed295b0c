use super::Square;

use bitflags::bitflags;

use std::fmt;

bitflags! {
    /// The four castling rights packed into the low nibble, in the order the
    /// FEN castling field and the zobrist `castling[16]` table expect them.
    ///
    /// A set bit means the right has not been extinguished; the castle
    /// itself may still be blocked or illegal in the current position.
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE  = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE  = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastlingRights {
    /// No castling rights for either player.
    #[inline]
    pub fn none() -> Self {
        CastlingRights::empty()
    }

    #[inline(always)]
    pub fn white_kingside(self) -> bool {
        self.contains(CastlingRights::WHITE_KINGSIDE)
    }

    #[inline(always)]
    pub fn white_queenside(self) -> bool {
        self.contains(CastlingRights::WHITE_QUEENSIDE)
    }

    #[inline(always)]
    pub fn black_kingside(self) -> bool {
        self.contains(CastlingRights::BLACK_KINGSIDE)
    }

    #[inline(always)]
    pub fn black_queenside(self) -> bool {
        self.contains(CastlingRights::BLACK_QUEENSIDE)
    }

    /// The raw 4-bit mask, used to index the zobrist castling table.
    #[inline(always)]
    pub fn mask(self) -> usize {
        self.bits() as usize
    }

    /// Returns the rights remaining after a move between `from` and `to`.
    ///
    /// A right dies when its king or rook square appears at either end of a
    /// move: the king moving, the rook moving, or the rook being captured
    /// all extinguish it.
    pub fn update(self, from: Square, to: Square) -> Self {
        let mut rights = self;
        for sq in [from, to] {
            match sq {
                Square::E1 => {
                    rights.remove(CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE)
                }
                Square::H1 => rights.remove(CastlingRights::WHITE_KINGSIDE),
                Square::A1 => rights.remove(CastlingRights::WHITE_QUEENSIDE),
                Square::E8 => {
                    rights.remove(CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE)
                }
                Square::H8 => rights.remove(CastlingRights::BLACK_KINGSIDE),
                Square::A8 => rights.remove(CastlingRights::BLACK_QUEENSIDE),
                _ => {}
            }
        }
        rights
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        if self.white_kingside() {
            write!(f, "K")?;
        }
        if self.white_queenside() {
            write!(f, "Q")?;
        }
        if self.black_kingside() {
            write!(f, "k")?;
        }
        if self.black_queenside() {
            write!(f, "q")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_move_loses_both_rights() {
        let rights = CastlingRights::all().update(Square::E1, Square::E2);
        assert!(!rights.white_kingside());
        assert!(!rights.white_queenside());
        assert!(rights.black_kingside());
        assert!(rights.black_queenside());
    }

    #[test]
    fn rook_capture_loses_right() {
        // A piece landing on H8 captures the rook that guarded Black's
        // kingside right.
        let rights = CastlingRights::all().update(Square::D4, Square::H8);
        assert!(!rights.black_kingside());
        assert!(rights.black_queenside());
        assert!(rights.white_kingside());
    }

    #[test]
    fn display_matches_fen_field() {
        assert_eq!(CastlingRights::all().to_string(), "KQkq");
        assert_eq!(CastlingRights::none().to_string(), "-");
        let white_only = CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE;
        assert_eq!(white_only.to_string(), "KQ");
    }

    #[test]
    fn mask_is_the_fen_nibble() {
        assert_eq!(CastlingRights::none().mask(), 0);
        assert_eq!(CastlingRights::all().mask(), 0b1111);
        assert_eq!(CastlingRights::BLACK_QUEENSIDE.mask(), 0b1000);
    }
}
