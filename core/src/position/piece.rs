use super::Player;

use num_derive::FromPrimitive;

use std::fmt;

/// A colored piece, with `Piece::None` as the empty-square sentinel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive)]
#[repr(u8)]
pub enum Piece {
    None = 0,
    WhitePawn = 1,
    WhiteKnight = 2,
    WhiteBishop = 3,
    WhiteRook = 4,
    WhiteQueen = 5,
    WhiteKing = 6,
    BlackPawn = 7,
    BlackKnight = 8,
    BlackBishop = 9,
    BlackRook = 10,
    BlackQueen = 11,
    BlackKing = 12,
}

impl Piece {
    #[inline(always)]
    pub fn is_none(self) -> bool {
        self as u8 == 0
    }

    /// Returns the type of the given piece.
    #[inline]
    pub fn type_of(self) -> PieceType {
        match self {
            Piece::None => PieceType::None,
            Piece::WhitePawn | Piece::BlackPawn => PieceType::Pawn,
            Piece::WhiteKnight | Piece::BlackKnight => PieceType::Knight,
            Piece::WhiteBishop | Piece::BlackBishop => PieceType::Bishop,
            Piece::WhiteRook | Piece::BlackRook => PieceType::Rook,
            Piece::WhiteQueen | Piece::BlackQueen => PieceType::Queen,
            Piece::WhiteKing | Piece::BlackKing => PieceType::King,
        }
    }

    /// Returns the player owning the given piece.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if the piece is `Piece::None`. Only call when
    /// the piece is known to be present.
    #[inline]
    pub fn player(self) -> Player {
        debug_assert!(!self.is_none());
        if (self as u8) <= Piece::WhiteKing as u8 {
            Player::White
        } else {
            Player::Black
        }
    }

    /// Builds a `Piece` from a `Player` and a `PieceType`.
    ///
    /// # Panics
    ///
    /// In debug mode, panics on `PieceType::None`; there is no colored empty
    /// piece.
    #[inline]
    pub fn make(player: Player, piece_type: PieceType) -> Self {
        debug_assert!(!piece_type.is_none());
        let idx = 6 * player as u8 + piece_type as u8;
        num_traits::FromPrimitive::from_u8(idx).unwrap()
    }

    /// Returns a tuple containing the `Player` and `PieceType` of the piece.
    #[inline]
    pub fn player_piece(self) -> (Player, PieceType) {
        (self.player(), self.type_of())
    }

    /// The zero-based index of this piece into `[12]`-shaped tables
    /// (zobrist keys): White pieces 0..=5, Black pieces 6..=11.
    #[inline(always)]
    pub fn index(self) -> usize {
        debug_assert!(!self.is_none());
        self as usize - 1
    }

    /// Parses a FEN piece letter (`PNBRQKpnbrqk`).
    pub fn from_fen_char(c: char) -> Option<Self> {
        let piece = match c {
            'P' => Piece::WhitePawn,
            'N' => Piece::WhiteKnight,
            'B' => Piece::WhiteBishop,
            'R' => Piece::WhiteRook,
            'Q' => Piece::WhiteQueen,
            'K' => Piece::WhiteKing,
            'p' => Piece::BlackPawn,
            'n' => Piece::BlackKnight,
            'b' => Piece::BlackBishop,
            'r' => Piece::BlackRook,
            'q' => Piece::BlackQueen,
            'k' => Piece::BlackKing,
            _ => return None,
        };
        Some(piece)
    }

    /// The FEN letter for this piece; a space for `Piece::None`.
    pub fn to_char(self) -> char {
        match self {
            Piece::None => ' ',
            Piece::WhitePawn => 'P',
            Piece::WhiteKnight => 'N',
            Piece::WhiteBishop => 'B',
            Piece::WhiteRook => 'R',
            Piece::WhiteQueen => 'Q',
            Piece::WhiteKing => 'K',
            Piece::BlackPawn => 'p',
            Piece::BlackKnight => 'n',
            Piece::BlackBishop => 'b',
            Piece::BlackRook => 'r',
            Piece::BlackQueen => 'q',
            Piece::BlackKing => 'k',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// An uncolored piece type, with `PieceType::None` as the sentinel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum PieceType {
    None = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

/// Promotion targets in the order they are emitted by move generation.
pub const PROMO_PIECES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

impl PieceType {
    #[inline(always)]
    pub fn is_none(self) -> bool {
        self == PieceType::None
    }

    /// The zero-based index of this type into `[6]`-shaped tables.
    #[inline(always)]
    pub fn index(self) -> usize {
        debug_assert!(!self.is_none());
        self as usize - 1
    }

    /// The lowercase letter used in UCI promotion suffixes.
    pub fn to_promo_char(self) -> char {
        match self {
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            _ => '?',
        }
    }

    /// Parses a UCI promotion suffix letter.
    pub fn from_promo_char(c: char) -> Option<Self> {
        match c {
            'q' => Some(PieceType::Queen),
            'r' => Some(PieceType::Rook),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::None => "none",
            PieceType::Pawn => "pawn",
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::King => "king",
        };
        write!(f, "{}", name)
    }
}
