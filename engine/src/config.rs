use meitner_core::mov::Move;

use std::time::Duration;

/// Search options. The callback is registered on the engine itself; see
/// `Engine::set_iteration_callback`.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Wall-clock budget for time-limited searches.
    pub time_limit: Duration,
    /// Iterative-deepening ceiling; clamped to the search's hard cap.
    pub max_depth: u8,
    /// Transposition table budget in megabytes.
    pub tt_size_mb: usize,
    pub use_transposition_table: bool,
    pub use_quiescence_search: bool,
    pub use_move_ordering: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(5),
            max_depth: 20,
            tt_size_mb: 64,
            use_transposition_table: true,
            use_quiescence_search: true,
            use_move_ordering: true,
        }
    }
}

/// The outcome of one completed search (or search iteration).
///
/// `depth == 0` means no iteration completed: the best move is the null
/// move and must not be played.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Move,
    /// Centipawns from the searched side's perspective.
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self {
            best_move: Move::null(),
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Invoked after every completed iterative-deepening iteration.
pub type IterationCallback = Box<dyn FnMut(&SearchResult) + Send>;
