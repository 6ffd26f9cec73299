//! Depth-limited alpha-beta search

use rayon::prelude::*;

use crate::{
    board::{successors, Board, Player},
    error::{Error, Result},
    eval::{Evaluator, Score, WIN_SCORE},
};

/// Bound used for the initial search window, beyond every attainable value
pub const INFINITY: Score = Score::MAX;

/// The result of a search from the root position
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchResult {
    /// The best column, `None` only for a depth 0 search
    pub column: Option<usize>,
    /// The minimax value of the position for the player to move at the root
    pub value: Score,
    pub depth: u32,
    /// The number of positions visited
    pub node_count: usize,
}

impl SearchResult {
    /// Whether the value is a forced win or loss rather than a heuristic estimate
    pub fn is_decided(&self) -> bool {
        self.value.abs() >= WIN_SCORE
    }
}

/// An agent choosing moves with minimax search and alpha-beta pruning
///
/// # Notes
/// Every position at the search horizon is scored from the point of view of the
/// player to move at the root, fixed for the whole search. Maximizing and
/// minimizing plies alternate below it, so the opponent is assumed to pick the
/// reply that is worst for the root player.
///
/// Legal columns are searched in ascending order and a child only replaces the
/// current best when it is strictly better, so ties go to the lowest column. The
/// result is identical to a full minimax search of the same tree.
#[derive(Clone, Debug)]
pub struct Searcher {
    evaluator: Evaluator,

    /// The number of nodes searched by this `Searcher` so far (for diagnostics only)
    pub node_count: usize,
}

impl Searcher {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            node_count: 0,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Returns the best column for the player to move in `board`
    pub fn choose_move<B: Board>(&mut self, board: &B, max_depth: u32) -> Result<usize> {
        self.search_root(board, max_depth)?.column.ok_or_else(|| {
            Error::InvalidState("a search depth of at least 1 is needed to choose a move".into())
        })
    }

    /// Searches `board` to `max_depth` plies, returning the best column and its value
    ///
    /// A depth of 0 returns the static evaluation of `board` and no column.
    pub fn search_root<B: Board>(&mut self, board: &B, max_depth: u32) -> Result<SearchResult> {
        Self::check_searchable(board)?;
        let start_count = self.node_count;
        let root = board.player_to_move();

        let (value, column) = self.search(board, max_depth, -INFINITY, INFINITY, true, root)?;

        let result = SearchResult {
            column,
            value,
            depth: max_depth,
            node_count: self.node_count - start_count,
        };
        tracing::debug!(
            "Depth {} search: best column {:?}, value {}, {} nodes",
            result.depth,
            result.column,
            result.value,
            result.node_count
        );
        Ok(result)
    }

    /// Like [`Searcher::search_root`], but searches each root move on its own thread
    ///
    /// Root children are searched with independent full windows and merged with the
    /// same lowest-column tie break, giving the same column and value as the
    /// sequential search.
    pub fn search_root_parallel<B>(&mut self, board: &B, max_depth: u32) -> Result<SearchResult>
    where
        B: Board + Send + Sync,
    {
        if max_depth == 0 {
            return self.search_root(board, max_depth);
        }
        Self::check_searchable(board)?;
        let root = board.player_to_move();

        let children = successors(board).collect::<Result<Vec<_>>>()?;
        let scored = children
            .par_iter()
            .map(|(child, column)| -> Result<(Score, usize, usize)> {
                let mut worker = Searcher::new(self.evaluator.clone());
                let (value, _) =
                    worker.search(child, max_depth - 1, -INFINITY, INFINITY, false, root)?;
                Ok((value, *column, worker.node_count))
            })
            .collect::<Result<Vec<_>>>()?;

        // one for the root itself
        let mut node_count = 1;
        let mut best_value = -INFINITY;
        let mut best_column = None;
        for (value, column, nodes) in scored {
            node_count += nodes;
            if value > best_value {
                best_value = value;
                best_column = Some(column);
            }
        }
        self.node_count += node_count;

        let result = SearchResult {
            column: best_column,
            value: best_value,
            depth: max_depth,
            node_count,
        };
        tracing::debug!(
            "Depth {} parallel search: best column {:?}, value {}, {} nodes",
            result.depth,
            result.column,
            result.value,
            result.node_count
        );
        Ok(result)
    }

    fn check_searchable<B: Board>(board: &B) -> Result<()> {
        if board.outcome().is_terminal() {
            return Err(Error::InvalidState(format!(
                "cannot search a finished game ({:?})",
                board.outcome()
            )));
        }
        if board.legal_columns().is_empty() {
            return Err(Error::InvalidState("no legal moves to search".into()));
        }
        Ok(())
    }

    /// Scores a position where the search stops
    ///
    /// Wins and losses are shifted by the remaining depth so that a faster win,
    /// or a slower loss, is preferred.
    pub(crate) fn horizon_value<B: Board>(&self, board: &B, depth: u32, root: Player) -> Score {
        let score = self.evaluator.evaluate(board, root);
        if score >= WIN_SCORE {
            score + depth as Score
        } else if score <= -WIN_SCORE {
            score - depth as Score
        } else {
            score
        }
    }

    /// Performs game tree search
    ///
    /// Returns the value of `board` for `root` and the column that reaches it.
    fn search<B: Board>(
        &mut self,
        board: &B,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        root: Player,
    ) -> Result<(Score, Option<usize>)> {
        self.node_count += 1;

        if depth == 0 || board.outcome().is_terminal() {
            return Ok((self.horizon_value(board, depth, root), None));
        }

        let mut best_value = if maximizing { -INFINITY } else { INFINITY };
        let mut best_column = None;

        for successor in successors(board) {
            let (next, column) = successor?;
            let (value, _) = self.search(&next, depth - 1, alpha, beta, !maximizing, root)?;

            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_column = Some(column);
                }
                // the minimizing parent already has a better option
                if best_value >= beta {
                    tracing::trace!("Beta cutoff at depth {} after column {}", depth, column);
                    return Ok((best_value, best_column));
                }
                alpha = alpha.max(best_value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_column = Some(column);
                }
                if best_value <= alpha {
                    tracing::trace!("Alpha cutoff at depth {} after column {}", depth, column);
                    return Ok((best_value, best_column));
                }
                beta = beta.min(best_value);
            }
        }

        // full board
        if best_column.is_none() {
            return Ok((self.horizon_value(board, depth, root), None));
        }
        Ok((best_value, best_column))
    }
}
