//! Minimax game tree search, with and without alpha-beta pruning

use log::debug;

use crate::{
    board::{Board, Token},
    order::column_order,
};

/// The value of a position, positive when good for `X` and negative when good for `O`
pub type Score = i32;

/// Starting value of a maximising fold, and the initial alpha
pub const SCORE_MIN: Score = Score::MIN;
/// Starting value of a minimising fold, and the initial beta
pub const SCORE_MAX: Score = Score::MAX;

/// Which search a top-level move decision uses
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Full minimax in ascending column order, scoring wins as ±1
    Minimax,
    /// Minimax with alpha-beta pruning in centre-out column order, scoring
    /// wins by the remaining depth so faster wins are preferred
    AlphaBeta,
}

/// A snapshot of a `Searcher`'s counters
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub nodes_pruned: usize,
}

/// The work done between two snapshots, `later - earlier`
///
/// Counts saturate at zero if the snapshots are taken in the wrong order.
impl std::ops::Sub for SearchStats {
    type Output = Self;

    fn sub(self, earlier: Self) -> Self {
        Self {
            nodes_expanded: self.nodes_expanded.saturating_sub(earlier.nodes_expanded),
            nodes_pruned: self.nodes_pruned.saturating_sub(earlier.nodes_pruned),
        }
    }
}

/// A depth-limited minimax searcher choosing moves for one token
///
/// # Notes
/// The searcher never copies the board. Every candidate move is placed on the
/// board it is given, searched, and removed again, so the board is back in its
/// original layout whenever a search call returns.
///
/// # Position Scoring
/// Only the last move of a leaf is looked at. Plain minimax scores a win for `X`
/// as 1 and a win for `O` as -1. Alpha-beta scores a win as the depth still
/// remaining when it happened (negated for `O`), so a win found sooner scores
/// higher. Anything else, including a draw, is 0.
///
/// # Counters
/// `nodes_expanded` and `nodes_pruned` add up over every search this searcher
/// has run and are never reset. Take [`Searcher::stats`] before and after a move
/// and subtract to get per-move numbers.
#[derive(Clone, Debug)]
pub struct Searcher {
    token: Token,
    depth: usize,

    /// The number of nodes visited by this `Searcher` so far
    pub nodes_expanded: usize,
    /// The number of times this `Searcher` has cut off the remaining siblings of a node
    pub nodes_pruned: usize,
}

impl Searcher {
    /// Creates a new `Searcher` for `token` looking `depth` plies past each candidate move
    pub fn new(token: Token, depth: usize) -> Self {
        Self {
            token,
            depth,
            nodes_expanded: 0,
            nodes_pruned: 0,
        }
    }

    pub fn token(&self) -> Token {
        self.token
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            nodes_expanded: self.nodes_expanded,
            nodes_pruned: self.nodes_pruned,
        }
    }

    fn is_terminal(board: &Board, depth: usize) -> bool {
        depth == 0 || board.is_full() || board.has_winning_line_at_last_move()
    }

    /// The token whose last move completed a line, if any
    fn winner(board: &Board) -> Option<Token> {
        board
            .last_move()
            .and_then(|last| last.cell.token())
            .filter(|_| board.has_winning_line_at_last_move())
    }

    /// Scores a leaf as a win (1), loss (-1) or neither (0) for `X`
    pub fn evaluate(board: &Board) -> Score {
        match Self::winner(board) {
            Some(Token::X) => 1,
            Some(Token::O) => -1,
            None => 0,
        }
    }

    /// Scores a leaf, weighting a win by the depth left when it was reached
    pub fn evaluate_with_depth(board: &Board, depth: usize) -> Score {
        match Self::winner(board) {
            Some(Token::X) => depth as Score,
            Some(Token::O) => -(depth as Score),
            None => 0,
        }
    }

    /// Performs plain minimax search
    ///
    /// Returns the score of the position (see [Position Scoring]). A node with no
    /// legal moves returns its starting fold value unchanged, which can only happen
    /// on a board that should already have been caught as terminal.
    ///
    /// [Position Scoring]: #position-scoring
    pub fn minimax(&mut self, board: &mut Board, depth: usize, maximizing: bool) -> Score {
        self.nodes_expanded += 1;

        // a win found at depth 0 still scores as a win
        if Self::is_terminal(board, depth) {
            return Self::evaluate(board);
        }

        let mover = Token::for_side(maximizing);
        let mut best = if maximizing { SCORE_MIN } else { SCORE_MAX };
        let mut expanded = false;

        for column in 0..board.num_columns() {
            let value = match board.with_piece(column, mover, |board| {
                self.minimax(board, depth - 1, !maximizing)
            }) {
                Some(value) => value,
                None => continue,
            };
            expanded = true;
            best = if maximizing {
                best.max(value)
            } else {
                best.min(value)
            };
        }
        debug_assert!(expanded, "non-terminal node without a legal move");

        best
    }

    /// Performs minimax search with alpha-beta pruning
    ///
    /// `alpha` is the score the maximising side is already guaranteed on this path
    /// and `beta` the score the minimising side is guaranteed. Start with
    /// [`SCORE_MIN`] and [`SCORE_MAX`].
    ///
    /// Returns the score of the position (see [Position Scoring])
    ///
    /// [Position Scoring]: #position-scoring
    pub fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: usize,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> Score {
        let order = column_order(board.num_columns());
        self.alpha_beta_ordered(board, depth, alpha, beta, maximizing, &order)
    }

    fn alpha_beta_ordered(
        &mut self,
        board: &mut Board,
        depth: usize,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        order: &[usize],
    ) -> Score {
        self.nodes_expanded += 1;

        if Self::is_terminal(board, depth) {
            return Self::evaluate_with_depth(board, depth);
        }

        let mover = Token::for_side(maximizing);
        let mut best = if maximizing { SCORE_MIN } else { SCORE_MAX };
        let mut expanded = false;

        for &column in order {
            let value = match board.with_piece(column, mover, |board| {
                self.alpha_beta_ordered(board, depth - 1, alpha, beta, !maximizing, order)
            }) {
                Some(value) => value,
                None => continue,
            };
            expanded = true;

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }
            // cut off the remaining siblings, the best value so far still counts
            if beta <= alpha {
                self.nodes_pruned += 1;
                break;
            }
        }
        debug_assert!(expanded, "non-terminal node without a legal move");

        best
    }

    /// Chooses a column for this searcher's token
    ///
    /// Each legal column is tried in turn and searched `depth` plies further with
    /// the opponent to move. `X` keeps the first strictly highest scoring column,
    /// `O` the first strictly lowest. The board is back in its original layout when
    /// this returns.
    ///
    /// Returns the score and column of the best move, or `None` if no column is playable
    pub fn best_move(&mut self, board: &mut Board, algorithm: Algorithm) -> Option<(Score, usize)> {
        let before = self.stats();
        let maximizing = self.token.is_maximizing();
        let order = match algorithm {
            Algorithm::Minimax => (0..board.num_columns()).collect::<Vec<_>>(),
            Algorithm::AlphaBeta => column_order(board.num_columns()),
        };

        let mut best: Option<(Score, usize)> = None;
        for &column in order.iter() {
            let depth = self.depth;
            let score = match board.with_piece(column, self.token, |board| match algorithm {
                Algorithm::Minimax => self.minimax(board, depth, !maximizing),
                Algorithm::AlphaBeta => self.alpha_beta_ordered(
                    board,
                    depth,
                    SCORE_MIN,
                    SCORE_MAX,
                    !maximizing,
                    &order,
                ),
            }) {
                Some(score) => score,
                None => continue,
            };

            let improves = match best {
                None => true,
                Some((best_score, _)) if maximizing => score > best_score,
                Some((best_score, _)) => score < best_score,
            };
            if improves {
                best = Some((score, column));
            }
        }

        let spent = self.stats() - before;
        debug!(
            "{} {:?} depth {}: best {:?}, {} nodes expanded, {} prunes",
            self.token, algorithm, self.depth, best, spent.nodes_expanded, spent.nodes_pruned
        );
        best
    }
}
