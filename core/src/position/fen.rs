use super::{CastlingRights, Piece, Player, Position, Square};

use thiserror::Error;

/// The standard starting position.
pub const START_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A malformed FEN string; each variant locates the offending field.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum FenError {
    #[error("expected 6 space-delimited fields, found {0}")]
    FieldCount(usize),
    #[error("piece placement: {0}")]
    PiecePlacement(String),
    #[error("side to move: expected `w` or `b`, found `{0}`")]
    SideToMove(String),
    #[error("castling rights: {0}")]
    CastlingRights(String),
    #[error("en passant square: `{0}` is not a square on rank 3 or 6")]
    EnPassant(String),
    #[error("halfmove clock: `{0}` is not a non-negative integer")]
    HalfMoveClock(String),
    #[error("fullmove number: `{0}` is not a positive integer")]
    MoveNumber(String),
}

impl Position {
    /// The standard starting position.
    pub fn start_pos() -> Self {
        Self::from_fen(START_POSITION).expect("the starting position FEN is well-formed")
    }

    /// Builds a `Position` from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut pos = Self::blank();
        parse_piece_placement(&mut pos, fields[0])?;
        pos.turn = parse_side_to_move(fields[1])?;
        pos.castling_rights = parse_castling_rights(fields[2])?;
        pos.ep_square = parse_ep_square(fields[3])?;
        pos.half_move_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::HalfMoveClock(fields[4].to_string()))?;
        pos.move_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::MoveNumber(fields[5].to_string()))?;
        if pos.move_number == 0 {
            return Err(FenError::MoveNumber(fields[5].to_string()));
        }

        pos.set_zobrist();
        Ok(pos)
    }

    /// Emits the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let piece = self.piece_at(Square::from_rank_file(rank, file));
                if piece.is_none() {
                    empty_run += 1;
                } else {
                    if empty_run > 0 {
                        fen.push(char::from_digit(empty_run, 10).unwrap());
                        empty_run = 0;
                    }
                    fen.push(piece.to_char());
                }
            }
            if empty_run > 0 {
                fen.push(char::from_digit(empty_run, 10).unwrap());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.turn.is_white() { 'w' } else { 'b' });
        fen.push(' ');
        fen.push_str(&self.castling_rights.to_string());
        fen.push(' ');
        match self.ep_square {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }
        fen.push_str(&format!(" {} {}", self.half_move_clock, self.move_number));

        fen
    }
}

fn parse_piece_placement(pos: &mut Position, field: &str) -> Result<(), FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::PiecePlacement(format!(
            "found {} ranks, expected 8",
            rows.len()
        )));
    }

    // FEN rows run from rank 8 down to rank 1.
    for (row_idx, row) in rows.iter().enumerate() {
        let rank = 7 - row_idx as u8;
        let mut file = 0u8;
        let mut last_was_digit = false;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if last_was_digit {
                    return Err(FenError::PiecePlacement(format!(
                        "consecutive digits in rank {}",
                        rank + 1
                    )));
                }
                if skip < 1 || skip > 8 {
                    return Err(FenError::PiecePlacement(format!(
                        "invalid empty-run digit `{}` in rank {}",
                        c,
                        rank + 1
                    )));
                }
                file += skip as u8;
                last_was_digit = true;
            } else {
                let piece = Piece::from_fen_char(c).ok_or_else(|| {
                    FenError::PiecePlacement(format!("unexpected character `{}`", c))
                })?;
                if file > 7 {
                    return Err(FenError::PiecePlacement(format!(
                        "rank {} is longer than 8 files",
                        rank + 1
                    )));
                }
                pos.put_piece(piece, Square::from_rank_file(rank, file));
                file += 1;
                last_was_digit = false;
            }
        }

        if file != 8 {
            return Err(FenError::PiecePlacement(format!(
                "rank {} covers {} files, expected 8",
                rank + 1,
                file
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(field: &str) -> Result<Player, FenError> {
    match field {
        "w" => Ok(Player::White),
        "b" => Ok(Player::Black),
        _ => Err(FenError::SideToMove(field.to_string())),
    }
}

fn parse_castling_rights(field: &str) -> Result<CastlingRights, FenError> {
    if field == "-" {
        return Ok(CastlingRights::none());
    }
    if field.is_empty() || field.len() > 4 {
        return Err(FenError::CastlingRights(format!(
            "`{}` should be `-` or 1-4 of `KQkq`",
            field
        )));
    }

    let mut rights = CastlingRights::none();
    for c in field.chars() {
        let flag = match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => {
                return Err(FenError::CastlingRights(format!(
                    "unexpected character `{}`",
                    c
                )))
            }
        };
        if rights.contains(flag) {
            return Err(FenError::CastlingRights(format!("`{}` appears twice", c)));
        }
        rights.insert(flag);
    }
    Ok(rights)
}

fn parse_ep_square(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let sq = Square::from_algebraic(field).ok_or_else(|| FenError::EnPassant(field.to_string()))?;
    // Only the ranks a double push can skip over.
    if sq.rank() != 2 && sq.rank() != 5 {
        return Err(FenError::EnPassant(field.to_string()));
    }
    Ok(Some(sq))
}
