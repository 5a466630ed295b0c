//! The engine: owns the search configuration, the transposition table and
//! the stop flag, and runs searches over caller-supplied positions.

use crate::config::{IterationCallback, SearchConfig, SearchResult};
use crate::eval;
use crate::search::Search;
use crate::tt::TranspositionTable;

use meitner_core::mov::Move;
use meitner_core::position::Position;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct Engine {
    config: SearchConfig,
    tt: TranspositionTable,
    stop: Arc<AtomicBool>,
    iteration_callback: Option<IterationCallback>,
}

impl Engine {
    /// An engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        let tt = TranspositionTable::new(config.tt_size_mb);
        Engine {
            config,
            tt,
            stop: Arc::new(AtomicBool::new(false)),
            iteration_callback: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the configuration, resizing the transposition table if its
    /// budget changed.
    pub fn set_config(&mut self, config: SearchConfig) {
        if config.tt_size_mb != self.config.tt_size_mb {
            self.tt.resize(config.tt_size_mb);
        }
        self.config = config;
    }

    /// Resizes the transposition table, discarding its contents. Must not
    /// be called while a search is running.
    pub fn set_tt_size(&mut self, mb: usize) {
        self.config.tt_size_mb = mb;
        self.tt.resize(mb);
    }

    /// Clears the transposition table.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Registers the callback invoked after each completed
    /// iterative-deepening iteration, replacing any previous one.
    pub fn set_iteration_callback(&mut self, callback: impl FnMut(&SearchResult) + Send + 'static) {
        self.iteration_callback = Some(Box::new(callback));
    }

    pub fn clear_iteration_callback(&mut self) {
        self.iteration_callback = None;
    }

    /// A handle to the stop flag. Setting it (e.g. from an iteration
    /// callback or another thread) makes the running search unwind and
    /// return its last completed iteration.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Requests that the running search stop.
    pub fn stop_search(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Searches under a wall-clock budget, iterating up to the configured
    /// maximum depth.
    pub fn find_best_move(&mut self, pos: &Position, time_limit: Duration) -> SearchResult {
        let max_depth = self.config.max_depth;
        self.run_search(pos, max_depth, Some(time_limit))
    }

    /// Searches to a fixed depth regardless of time.
    pub fn find_best_move_depth(&mut self, pos: &Position, depth: u8) -> SearchResult {
        self.run_search(pos, depth, None)
    }

    /// Searches under both a depth ceiling and a wall-clock budget.
    pub fn find_best_move_with(
        &mut self,
        pos: &Position,
        depth: u8,
        time_limit: Duration,
    ) -> SearchResult {
        self.run_search(pos, depth, Some(time_limit))
    }

    fn run_search(
        &mut self,
        pos: &Position,
        max_depth: u8,
        time_limit: Option<Duration>,
    ) -> SearchResult {
        self.stop.store(false, Ordering::Relaxed);
        let deadline = time_limit.map(|limit| Instant::now() + limit);

        let mut search = Search::new(
            pos,
            &mut self.tt,
            &self.stop,
            deadline,
            self.config.use_transposition_table,
            self.config.use_quiescence_search,
            self.config.use_move_ordering,
        );
        search.iterate(max_depth, &mut self.iteration_callback)
    }

    /// Static evaluation of the position, in centipawns for the side to
    /// move.
    pub fn evaluate(&self, pos: &Position) -> i32 {
        eval::evaluate(&mut pos.clone())
    }

    /// Reconstructs the principal variation by walking best-move entries
    /// out of the transposition table, stopping at the first gap, illegal
    /// move or `max_len` plies.
    pub fn principal_variation(&self, pos: &Position, max_len: usize) -> Vec<Move> {
        let mut walk = pos.clone();
        let mut pv = Vec::new();

        for _ in 0..max_len {
            let Some(entry) = self.tt.probe(walk.zobrist().0) else {
                break;
            };
            let mov = entry.mov();
            if mov.is_null() || !walk.is_legal_move(mov) {
                break;
            }
            walk.make_move(mov);
            pv.push(mov);
        }

        pv
    }

    /// Every legal move scored by a fixed-depth search, best first.
    pub fn ranked_moves(&mut self, pos: &Position, depth: u8) -> Vec<(Move, i32)> {
        self.stop.store(false, Ordering::Relaxed);
        let mut search = Search::new(
            pos,
            &mut self.tt,
            &self.stop,
            None,
            self.config.use_transposition_table,
            self.config.use_quiescence_search,
            self.config.use_move_ordering,
        );
        search.rank_moves(depth)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{is_mate_score, MATE};
    use std::sync::Mutex;

    #[test]
    fn finds_the_queen_capture() {
        let pos =
            Position::from_fen("rnb1kbnr/pppppppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let mut engine = Engine::new();
        let result = engine.find_best_move_depth(&pos, 2);
        assert_eq!(result.best_move.to_uci_string(), "e4d5");
        assert_eq!(result.depth, 2);
        assert!(result.nodes > 0);
    }

    #[test]
    fn evaluate_does_not_disturb_the_position() {
        let pos = Position::start_pos();
        let engine = Engine::new();
        assert_eq!(engine.evaluate(&pos), 0);
        assert_eq!(pos, Position::start_pos());

        let mate =
            Position::from_fen("rnbqkbnr/ppppp2p/8/5ppQ/4P3/2N5/PPPP1PPP/R1B1KBNR b KQkq - 1 3")
                .unwrap();
        assert_eq!(engine.evaluate(&mate), -MATE);
    }

    #[test]
    fn iteration_callback_sees_every_depth() {
        let depths = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&depths);

        let mut engine = Engine::new();
        engine.set_iteration_callback(move |result: &SearchResult| {
            sink.lock().unwrap().push(result.depth);
        });

        let pos = Position::start_pos();
        engine.find_best_move_depth(&pos, 3);

        let seen = depths.lock().unwrap().clone();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn timed_search_completes_at_least_one_iteration() {
        let pos = Position::start_pos();
        let mut engine = Engine::new();
        let result = engine.find_best_move(&pos, Duration::from_secs(2));
        assert!(result.depth >= 1);
        assert!(!result.best_move.is_null());
    }

    #[test]
    fn stop_handle_cancels_from_a_callback() {
        let mut engine = Engine::new();
        let stop = engine.stop_handle();
        engine.set_iteration_callback(move |_| {
            stop.store(true, Ordering::Relaxed);
        });

        let pos = Position::start_pos();
        let result = engine.find_best_move_depth(&pos, 10);
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn principal_variation_starts_with_the_best_move() {
        let pos =
            Position::from_fen("rnb1kbnr/pppppppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let mut engine = Engine::new();
        let result = engine.find_best_move_depth(&pos, 3);

        let pv = engine.principal_variation(&pos, 8);
        assert!(!pv.is_empty());
        assert_eq!(pv[0], result.best_move);

        // Every PV move must be playable in sequence.
        let mut replay = pos.clone();
        for mov in &pv {
            assert!(replay.is_legal_move(*mov));
            replay.make_move(*mov);
        }
    }

    #[test]
    fn ranked_moves_put_the_capture_first() {
        let pos =
            Position::from_fen("rnb1kbnr/pppppppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let mut engine = Engine::new();
        let ranked = engine.ranked_moves(&pos, 2);

        assert_eq!(ranked[0].0.to_uci_string(), "e4d5");
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        // Every legal move appears exactly once.
        let mut pos_check = pos.clone();
        assert_eq!(ranked.len(), pos_check.generate_moves().len());
    }

    #[test]
    fn mate_search_reports_a_mate_score() {
        let pos = Position::from_fen("6k1/8/6K1/8/8/8/8/Q7 w - - 0 1").unwrap();
        let mut engine = Engine::new();
        let result = engine.find_best_move_depth(&pos, 3);
        assert!(is_mate_score(result.score));
        assert_eq!(result.best_move.to_uci_string(), "a1a8");
    }

    #[test]
    fn tt_resize_and_clear_are_safe_between_searches() {
        let pos = Position::start_pos();
        let mut engine = Engine::new();
        engine.find_best_move_depth(&pos, 2);

        engine.set_tt_size(1);
        assert_eq!(engine.config().tt_size_mb, 1);
        engine.clear_tt();

        let result = engine.find_best_move_depth(&pos, 2);
        assert_eq!(result.depth, 2);
        assert!(!result.best_move.is_null());
    }

    #[test]
    fn config_toggles_do_not_change_the_chosen_capture() {
        let pos =
            Position::from_fen("rnb1kbnr/pppppppp/8/3q4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();

        for (use_tt, use_q, use_ord) in [
            (false, true, true),
            (true, false, true),
            (true, true, false),
            (false, false, false),
        ] {
            let mut engine = Engine::with_config(SearchConfig {
                use_transposition_table: use_tt,
                use_quiescence_search: use_q,
                use_move_ordering: use_ord,
                ..SearchConfig::default()
            });
            let result = engine.find_best_move_depth(&pos, 2);
            assert_eq!(
                result.best_move.to_uci_string(),
                "e4d5",
                "tt={} q={} ord={}",
                use_tt,
                use_q,
                use_ord
            );
        }
    }
}
