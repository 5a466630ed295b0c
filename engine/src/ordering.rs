//! Move ordering: score each move, then sort the list descending before
//! iteration so cutoffs arrive early.

use crate::eval::{piece_value, PAWN_VALUE};
use crate::history::HistoryTable;
use crate::killer::KillerTable;

use meitner_core::mov::Move;
use meitner_core::movelist::{MoveList, MAX_MOVES};
use meitner_core::position::Position;

/// The move stored by the transposition table for this position.
pub const TT_MOVE_SCORE: i32 = 1_000_000;
/// Base score for captures; MVV-LVA differentiates within the band.
pub const CAPTURE_SCORE: i32 = 500_000;
/// Killer moves at this ply.
pub const KILLER_SCORE: i32 = 90_000;

/// Most-valuable-victim / least-valuable-attacker score for a capture.
/// The en-passant victim square is empty, so the victim is a pawn by
/// definition.
pub fn mvv_lva(pos: &Position, mov: &Move) -> i32 {
    debug_assert!(mov.is_capture());
    let victim = if mov.is_en_passant() {
        PAWN_VALUE
    } else {
        piece_value(pos.piece_at(mov.dest()).type_of())
    };
    let attacker = piece_value(pos.piece_at(mov.orig()).type_of());
    10 * victim - attacker
}

/// The full ordering score for the main search.
pub fn score_move(
    pos: &Position,
    mov: &Move,
    tt_move: Option<Move>,
    killers: &KillerTable,
    history: &HistoryTable,
    ply: usize,
) -> i32 {
    if tt_move == Some(*mov) {
        return TT_MOVE_SCORE;
    }
    if mov.is_capture() {
        return CAPTURE_SCORE + mvv_lva(pos, mov);
    }
    if killers.is_killer(ply, *mov) {
        return KILLER_SCORE;
    }
    history.get(mov.orig(), mov.dest())
}

/// Sorts the list by descending score, breaking ties by original position
/// so the ordering is deterministic.
pub fn order_moves(moves: &mut MoveList, mut score: impl FnMut(&Move) -> i32) {
    let len = moves.len();
    let mut keyed: [(i32, u16); MAX_MOVES] = [(0, 0); MAX_MOVES];
    for (i, mov) in moves.iter().enumerate() {
        keyed[i] = (score(mov), i as u16);
    }
    keyed[..len].sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let original = *moves;
    for i in 0..len {
        moves[i] = original[keyed[i].1 as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_order_by_victim_then_attacker() {
        // Pawn takes queen must outrank queen takes pawn.
        let mut pos = Position::from_fen("8/7k/2q5/3P4/8/2Q5/3p4/7K w - - 0 1").unwrap();
        let moves = pos.generate_moves();
        let pawn_takes_queen = moves
            .iter()
            .find(|m| m.to_uci_string() == "d5c6")
            .copied()
            .unwrap();
        let queen_takes_pawn = moves
            .iter()
            .find(|m| m.to_uci_string() == "c3d2")
            .copied()
            .unwrap();
        assert!(mvv_lva(&pos, &pawn_takes_queen) > mvv_lva(&pos, &queen_takes_pawn));
    }

    #[test]
    fn score_bands_are_disjoint() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        let moves = pos.generate_moves();
        let killers = KillerTable::new();
        let history = HistoryTable::new();

        let capture = moves.iter().find(|m| m.is_capture()).copied().unwrap();
        let quiet = moves.iter().find(|m| m.is_quiet()).copied().unwrap();

        let tt_score = score_move(&pos, &quiet, Some(quiet), &killers, &history, 0);
        let capture_score = score_move(&pos, &capture, None, &killers, &history, 0);
        let quiet_score = score_move(&pos, &quiet, None, &killers, &history, 0);

        assert_eq!(tt_score, TT_MOVE_SCORE);
        assert!(capture_score > KILLER_SCORE);
        assert!(capture_score < TT_MOVE_SCORE);
        assert!(quiet_score < KILLER_SCORE);
    }

    #[test]
    fn killers_outrank_plain_quiets() {
        let mut pos = Position::start_pos();
        let moves = pos.generate_moves();
        let mut killers = KillerTable::new();
        let history = HistoryTable::new();

        let killer = moves[5];
        killers.store(2, killer);
        let score = score_move(&pos, &killer, None, &killers, &history, 2);
        assert_eq!(score, KILLER_SCORE);
        // Same move at a different ply is an ordinary quiet.
        let elsewhere = score_move(&pos, &killer, None, &killers, &history, 3);
        assert_eq!(elsewhere, 0);
    }

    #[test]
    fn order_is_descending_and_deterministic() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let mut moves = pos.generate_moves();
        let killers = KillerTable::new();
        let history = HistoryTable::new();

        let pos_ref = &pos;
        let killers_ref = &killers;
        let history_ref = &history;
        order_moves(&mut moves, |m| {
            score_move(pos_ref, m, None, killers_ref, history_ref, 0)
        });

        let scores: Vec<i32> = moves
            .iter()
            .map(|m| score_move(pos_ref, m, None, killers_ref, history_ref, 0))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(moves[0].is_capture());
    }
}
