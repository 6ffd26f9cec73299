//! A configured entry point tying the evaluator and searcher together

use std::time::{Duration, Instant};

use crate::{
    board::Board,
    config::SearchConfig,
    error::{Error, Result},
    eval::{Evaluator, Weights},
    search::{SearchResult, Searcher},
};

#[derive(Clone, Debug)]
pub struct Engine {
    config: SearchConfig,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// A searcher using the configured weights, or the defensive weights for
    /// the board's win length
    pub fn searcher_for<B: Board>(&self, board: &B) -> Searcher {
        let weights = self
            .config
            .weights
            .unwrap_or_else(|| Weights::defensive(board.win_length()));
        Searcher::new(Evaluator::new(weights))
    }

    /// Searches `board` as configured
    ///
    /// With a time budget the search deepens one ply at a time from depth 1,
    /// checking the clock between iterations and keeping the last completed
    /// result. Deepening also stops once a forced win or loss is found.
    pub fn analyse<B>(&self, board: &B) -> Result<SearchResult>
    where
        B: Board + Send + Sync,
    {
        let mut searcher = self.searcher_for(board);
        let max_depth = self.config.max_depth;

        let budget = match self.config.time_budget_ms {
            Some(ms) if max_depth > 0 => Duration::from_millis(ms),
            _ => return self.search_once(&mut searcher, board, max_depth),
        };

        let start = Instant::now();
        let mut depth = 1;
        loop {
            let result = self.search_once(&mut searcher, board, depth)?;
            tracing::trace!(
                "Completed depth {}/{} after {:?}",
                depth,
                max_depth,
                start.elapsed()
            );
            if depth == max_depth || result.is_decided() || start.elapsed() >= budget {
                tracing::debug!(
                    "Iterative deepening stopped at depth {}, {} nodes in total",
                    depth,
                    searcher.node_count
                );
                return Ok(result);
            }
            depth += 1;
        }
    }

    /// Returns the best column for the player to move in `board`
    pub fn choose_move<B>(&self, board: &B) -> Result<usize>
    where
        B: Board + Send + Sync,
    {
        self.analyse(board)?.column.ok_or_else(|| {
            Error::InvalidState("a search depth of at least 1 is needed to choose a move".into())
        })
    }

    fn search_once<B>(&self, searcher: &mut Searcher, board: &B, depth: u32) -> Result<SearchResult>
    where
        B: Board + Send + Sync,
    {
        if self.config.parallel {
            searcher.search_root_parallel(board, depth)
        } else {
            searcher.search_root(board, depth)
        }
    }
}
