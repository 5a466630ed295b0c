//! Negamax alpha-beta search with quiescence, a transposition table,
//! principal-variation splitting, late-move reductions, killer/history
//! ordering and iterative deepening under a wall-clock budget.

use crate::config::{IterationCallback, SearchResult};
use crate::eval;
use crate::history::HistoryTable;
use crate::killer::{KillerTable, MAX_PLY};
use crate::ordering::{self, order_moves};
use crate::score::{score_from_tt, score_to_tt, INFINITY, MATE};
use crate::tt::{Bound, TranspositionTable};

use meitner_core::mov::Move;
use meitner_core::movelist::MoveList;
use meitner_core::position::Position;

use log::info;
use separator::Separatable;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Hard ceiling on the nominal search depth.
pub const MAX_DEPTH: u8 = 32;

/// One search run over a position. Owns a clone of the caller's position
/// (the caller's is never touched), borrows the engine's transposition
/// table and stop flag, and keeps its killer and history tables alive
/// across iterative-deepening iterations.
pub(crate) struct Search<'a> {
    pos: Position,
    tt: &'a mut TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    stop: &'a AtomicBool,
    deadline: Option<Instant>,
    started: Instant,
    nodes: u64,
    use_tt: bool,
    use_quiescence: bool,
    use_ordering: bool,
}

impl<'a> Search<'a> {
    pub fn new(
        pos: &Position,
        tt: &'a mut TranspositionTable,
        stop: &'a AtomicBool,
        deadline: Option<Instant>,
        use_tt: bool,
        use_quiescence: bool,
        use_ordering: bool,
    ) -> Self {
        Search {
            pos: pos.clone(),
            tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            stop,
            deadline,
            started: Instant::now(),
            nodes: 0,
            use_tt,
            use_quiescence,
            use_ordering,
        }
    }

    /// Iterative deepening: runs root searches at depth 1, 2, … keeping
    /// the result of the last iteration that ran to completion. The
    /// wall-clock budget is checked between iterations; a cancelled or
    /// timed-out iteration is discarded.
    pub fn iterate(
        &mut self,
        max_depth: u8,
        callback: &mut Option<IterationCallback>,
    ) -> SearchResult {
        let max_depth = max_depth.clamp(1, MAX_DEPTH);
        let mut result = SearchResult::default();

        for depth in 1..=max_depth {
            let Some(iteration) = self.search_root(depth) else {
                break;
            };

            info!(
                "depth {:>2} score {:>6} nodes {:>12} time {:>6}ms best {}",
                iteration.depth,
                iteration.score,
                iteration.nodes.separated_string(),
                iteration.elapsed.as_millis(),
                iteration.best_move,
            );

            result = iteration;
            if let Some(cb) = callback.as_mut() {
                cb(&result);
            }

            if result.best_move.is_null() {
                // The game is over at the root; deeper iterations cannot
                // change that.
                break;
            }
            if self.out_of_time() {
                break;
            }
        }

        result
    }

    /// One full-width root search. Returns `None` when cancelled so the
    /// caller can discard the partial iteration.
    fn search_root(&mut self, depth: u8) -> Option<SearchResult> {
        if self.should_stop() {
            return None;
        }

        let mut moves = self.pos.generate_moves();
        if moves.is_empty() {
            let score = if self.pos.in_check() { -MATE } else { 0 };
            return Some(SearchResult {
                best_move: Move::null(),
                score,
                depth,
                nodes: self.nodes,
                elapsed: self.started.elapsed(),
            });
        }

        let tt_move = if self.use_tt {
            self.tt
                .probe(self.pos.zobrist().0)
                .map(|entry| entry.mov())
                .filter(|mov| !mov.is_null())
        } else {
            None
        };
        if self.use_ordering {
            self.order(&mut moves, tt_move, 0);
        }

        let beta = INFINITY;
        let mut alpha = -INFINITY;
        let mut best_move = moves[0];

        for i in 0..moves.len() {
            if self.should_stop() {
                return None;
            }

            let mov = moves[i];
            self.pos.make_move(mov);
            let score = if i == 0 {
                -self.negamax(depth as i32 - 1, 1, -beta, -alpha)
            } else {
                let mut s = -self.negamax(depth as i32 - 1, 1, -alpha - 1, -alpha);
                if s > alpha {
                    s = -self.negamax(depth as i32 - 1, 1, -beta, -alpha);
                }
                s
            };
            self.pos.unmake_move();

            if self.stopped() {
                return None;
            }

            if score > alpha {
                alpha = score;
                best_move = mov;
            }
        }

        if self.use_tt {
            self.tt.store(
                self.pos.zobrist().0,
                score_to_tt(alpha, 0),
                depth,
                Bound::Exact,
                best_move,
            );
        }

        Some(SearchResult {
            best_move,
            score: alpha,
            depth,
            nodes: self.nodes,
            elapsed: self.started.elapsed(),
        })
    }

    /// Scores every legal root move with a fixed-depth search underneath
    /// it, sorted best first.
    pub fn rank_moves(&mut self, depth: u8) -> Vec<(Move, i32)> {
        let depth = depth.clamp(1, MAX_DEPTH) as i32;
        let moves = self.pos.generate_moves();
        let mut ranked = Vec::with_capacity(moves.len());

        for &mov in &moves {
            self.pos.make_move(mov);
            let score = -self.negamax(depth - 1, 1, -INFINITY, INFINITY);
            self.pos.unmake_move();
            ranked.push((mov, score));
        }

        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    fn negamax(&mut self, depth: i32, ply: i32, mut alpha: i32, mut beta: i32) -> i32 {
        if self.should_stop() {
            return 0;
        }
        self.nodes += 1;

        // The bounds the node was called with determine the flag stored at
        // the end, independent of any transposition-table tightening.
        let alpha_orig = alpha;
        let beta_orig = beta;
        let key = self.pos.zobrist().0;

        let mut tt_move = None;
        if self.use_tt {
            if let Some(entry) = self.tt.probe(key) {
                if !entry.mov().is_null() {
                    tt_move = Some(entry.mov());
                }
                if entry.depth() as i32 >= depth {
                    let score = score_from_tt(entry.score(), ply);
                    match entry.bound() {
                        Bound::Exact => return score,
                        Bound::Lower => alpha = alpha.max(score),
                        Bound::Upper => beta = beta.min(score),
                    }
                    if alpha >= beta {
                        return score;
                    }
                }
            }
        }

        if self.pos.is_fifty_move_draw() {
            return 0;
        }

        // Check extension, bounded by the ply ceiling so a long checking
        // sequence cannot grow the tree without limit.
        let in_check = self.pos.in_check();
        let depth = if in_check && (ply as usize) < MAX_PLY {
            depth + 1
        } else {
            depth
        };

        if depth <= 0 {
            return if self.use_quiescence {
                self.quiescence(ply, alpha, beta)
            } else {
                eval::evaluate(&mut self.pos)
            };
        }

        let mut moves = self.pos.generate_moves();
        if moves.is_empty() {
            // Shallower mates score higher for the winning side.
            return if in_check { -MATE + ply } else { 0 };
        }

        if self.use_ordering {
            self.order(&mut moves, tt_move, ply as usize);
        }

        let mut best_score = -MATE - 1;
        let mut best_move = Move::null();
        let mut cutoff = false;

        for i in 0..moves.len() {
            let mov = moves[i];
            self.pos.make_move(mov);

            let score = if i == 0 {
                // Principal variation: full window for the first move.
                -self.negamax(depth - 1, ply + 1, -beta, -alpha)
            } else {
                // Late quiet moves get reduced; a fail-high walks the
                // result back up to full depth and then full window.
                let reduction = if !in_check && mov.is_quiet() {
                    if depth >= 6 {
                        2
                    } else {
                        1
                    }
                } else {
                    0
                };

                let mut s = -self.negamax(depth - 1 - reduction, ply + 1, -alpha - 1, -alpha);
                if s > alpha && reduction > 0 {
                    s = -self.negamax(depth - 1, ply + 1, -alpha - 1, -alpha);
                }
                if s > alpha && s < beta {
                    s = -self.negamax(depth - 1, ply + 1, -beta, -alpha);
                }
                s
            };

            self.pos.unmake_move();

            if self.stopped() {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mov;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                cutoff = true;
                if mov.is_quiet() {
                    self.killers.store(ply as usize, mov);
                    self.history.add(mov.orig(), mov.dest(), depth);
                }
                break;
            }
        }

        if !cutoff && best_move.is_quiet() {
            self.history.add(best_move.orig(), best_move.dest(), depth);
        }

        if self.use_tt {
            let bound = if best_score <= alpha_orig {
                Bound::Upper
            } else if best_score >= beta_orig {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt
                .store(key, score_to_tt(best_score, ply), depth as u8, bound, best_move);
        }

        best_score
    }

    /// Captures-only extension past the horizon. The stand pat comes from
    /// the full evaluator, so checkmate, stalemate and draw detection
    /// still apply here.
    fn quiescence(&mut self, ply: i32, mut alpha: i32, beta: i32) -> i32 {
        if self.should_stop() {
            return 0;
        }
        self.nodes += 1;

        let stand_pat = eval::evaluate(&mut self.pos);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures = self.pos.generate_captures();
        if self.use_ordering {
            let pos = &self.pos;
            order_moves(&mut captures, |mov| ordering::mvv_lva(pos, mov));
        }

        for i in 0..captures.len() {
            let mov = captures[i];
            self.pos.make_move(mov);
            let score = -self.quiescence(ply + 1, -beta, -alpha);
            self.pos.unmake_move();

            if self.stopped() {
                return 0;
            }

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn order(&mut self, moves: &mut MoveList, tt_move: Option<Move>, ply: usize) {
        let pos = &self.pos;
        let killers = &self.killers;
        let history = &self.history;
        order_moves(moves, |mov| {
            ordering::score_move(pos, mov, tt_move, killers, history, ply)
        });
    }

    /// True when the search must unwind: either a caller set the stop
    /// flag, or the deadline passed (which latches the flag so every
    /// frame above sees it too).
    fn should_stop(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stop.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    #[inline(always)]
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn out_of_time(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::is_mate_score;

    fn run_depth(fen: &str, depth: u8, use_tt: bool) -> SearchResult {
        run_configured(fen, depth, use_tt, true)
    }

    fn run_configured(fen: &str, depth: u8, use_tt: bool, use_ordering: bool) -> SearchResult {
        let pos = Position::from_fen(fen).unwrap();
        let mut tt = TranspositionTable::new(8);
        let stop = AtomicBool::new(false);
        let mut search = Search::new(&pos, &mut tt, &stop, None, use_tt, true, use_ordering);
        search.iterate(depth, &mut None)
    }

    #[test]
    fn grabs_the_hanging_queen() {
        let result = run_depth(
            "rnb1kbnr/pppppppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1",
            2,
            true,
        );
        assert_eq!(result.best_move.to_uci_string(), "e4d5");
        assert!(result.score >= 700, "score was {}", result.score);
    }

    #[test]
    fn finds_mate_in_one() {
        let result = run_depth("6k1/8/6K1/8/8/8/8/Q7 w - - 0 1", 2, true);
        assert_eq!(result.best_move.to_uci_string(), "a1a8");
        assert_eq!(result.score, MATE - 1);
    }

    #[test]
    fn finds_mate_in_two() {
        let result = run_depth("6k1/6pp/8/8/8/8/1R6/1R4K1 w - - 0 1", 4, true);
        assert_eq!(result.best_move.to_uci_string(), "b2b7");
        assert_eq!(result.score, MATE - 3);
    }

    #[test]
    fn mated_root_reports_the_loss() {
        let result = run_depth(
            "rnbqkbnr/ppppp2p/8/5ppQ/4P3/2N5/PPPP1PPP/R1B1KBNR b KQkq - 1 3",
            3,
            true,
        );
        assert!(result.best_move.is_null());
        assert_eq!(result.score, -MATE);
    }

    #[test]
    fn stalemate_root_scores_zero() {
        let result = run_depth("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1", 3, true);
        assert!(result.best_move.is_null());
        assert_eq!(result.score, 0);
    }

    #[test]
    fn quiescence_refuses_the_defended_pawn() {
        // Taking d5 loses the queen to the e6 recapture; the horizon at
        // depth 1 only sees it with quiescence on.
        let result = run_depth("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1", 1, true);
        assert_ne!(result.best_move.to_uci_string(), "d1d5");
    }

    #[test]
    fn tt_does_not_change_fixed_depth_scores() {
        // Ordering is disabled on both sides so the trees are identical
        // move-for-move; the table may only memoize, never change the
        // score.
        let cases = [
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3),
            ("rnb1kbnr/pppppppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1", 3),
            ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
        ];
        for (fen, max_depth) in cases {
            for depth in 1..=max_depth {
                let with_tt = run_configured(fen, depth, true, false);
                let without_tt = run_configured(fen, depth, false, false);
                assert_eq!(
                    with_tt.score, without_tt.score,
                    "depth {} of {}",
                    depth, fen
                );
                assert_eq!(
                    with_tt.best_move, without_tt.best_move,
                    "depth {} of {}",
                    depth, fen
                );
            }
        }
    }

    #[test]
    fn deeper_search_does_not_lose_the_mate() {
        // Iterative deepening past the mate must keep reporting it.
        let result = run_depth("6k1/8/6K1/8/8/8/8/Q7 w - - 0 1", 4, true);
        assert!(is_mate_score(result.score));
        assert_eq!(result.best_move.to_uci_string(), "a1a8");
    }

    #[test]
    fn cancelled_search_returns_the_last_iteration() {
        use std::sync::Arc;

        let pos = Position::start_pos();
        let mut tt = TranspositionTable::new(8);
        let stop = Arc::new(AtomicBool::new(false));

        // The callback latches the stop flag after the first completed
        // iteration; the depth-2 iteration must be discarded.
        let stop_latch = Arc::clone(&stop);
        let mut callback: Option<IterationCallback> = Some(Box::new(move |_| {
            stop_latch.store(true, Ordering::Relaxed);
        }));

        let mut search = Search::new(&pos, &mut tt, &stop, None, true, true, true);
        let result = search.iterate(8, &mut callback);
        assert_eq!(result.depth, 1);
        assert!(!result.best_move.is_null());
    }

    #[test]
    fn already_stopped_search_reports_no_depth() {
        let pos = Position::start_pos();
        let mut tt = TranspositionTable::new(8);
        let stop = AtomicBool::new(true);
        let mut search = Search::new(&pos, &mut tt, &stop, None, true, true, true);
        let result = search.iterate(5, &mut None);
        assert_eq!(result.depth, 0);
        assert!(result.best_move.is_null());
    }
}
