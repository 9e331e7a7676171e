//! A game tree search agent for playing 'Connect N', a generalised
//! Connect 4 with any number of rows, columns and pieces in a line to win
//!
//! Moves are chosen with either plain minimax or minimax with alpha-beta
//! pruning, searching in place on a single board by applying and undoing pieces.
//!
//! # Basic Usage
//!
//! ```
//! use connectn_ai::{board::{Board, Token}, config::GameConfig, search::{Algorithm, Searcher}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // X has three in a row along the bottom, O has stacked on top
//! let mut board = Board::from_moves(GameConfig::default(), "112233")?;
//! let mut searcher = Searcher::new(Token::X, 2);
//! let (score, best_move) = searcher.best_move(&mut board, Algorithm::AlphaBeta).unwrap();
//!
//! assert!((score, best_move) == (2, 3));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod config;

pub mod board;

pub mod order;

pub mod search;

pub mod agent;

pub mod game;

pub mod experiment;

mod test;

pub use agent::{Agent, HumanAgent, LineInput, RandomAgent, SearchAgent};
pub use board::{Board, Cell, Token};
pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameOutcome, Pruning};
pub use search::{Algorithm, SearchStats, Searcher};

/// The default number of rows on the game board
pub const DEFAULT_ROWS: usize = 6;

/// The default number of columns on the game board
pub const DEFAULT_COLUMNS: usize = 7;

/// The default number of pieces in a line needed to win
pub const DEFAULT_WIN_LENGTH: usize = 4;

// the default game must be winnable along at least one axis
const_assert!(DEFAULT_WIN_LENGTH <= DEFAULT_ROWS || DEFAULT_WIN_LENGTH <= DEFAULT_COLUMNS);
const_assert!(DEFAULT_ROWS > 0 && DEFAULT_COLUMNS > 0 && DEFAULT_WIN_LENGTH > 0);
