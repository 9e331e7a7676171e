//! Players that pick a column to play given a copy of the board

use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};

use std::cell::RefCell;
use std::io::{self, stdin, stdout, BufRead, Stdin, Stdout, Write};
use std::rc::Rc;

use crate::{
    board::{Board, Token},
    search::{Algorithm, SearchStats, Searcher},
};

/// Anything that can take a turn in a game
///
/// Every call gets its own copy of the authoritative board, so an agent is free
/// to change it while deciding. The returned column is zero-indexed.
pub trait Agent {
    fn token(&self) -> Token;

    fn get_move(&mut self, board: Board) -> Result<usize>;

    /// Picks a move with alpha-beta pruning, for agents that search
    fn get_move_alpha_beta(&mut self, board: Board) -> Result<usize> {
        self.get_move(board)
    }

    /// Search counters accumulated so far, for agents that search
    fn stats(&self) -> Option<SearchStats> {
        None
    }
}

/// An agent that picks moves by minimax search
#[derive(Clone, Debug)]
pub struct SearchAgent {
    searcher: Searcher,
}

impl SearchAgent {
    pub fn new(token: Token, depth: usize) -> Self {
        Self {
            searcher: Searcher::new(token, depth),
        }
    }

    fn search(&mut self, mut board: Board, algorithm: Algorithm) -> Result<usize> {
        self.searcher
            .best_move(&mut board, algorithm)
            .map(|(_, column)| column)
            .ok_or_else(|| anyhow!("no move available for {}", self.searcher.token()))
    }
}

impl Agent for SearchAgent {
    fn token(&self) -> Token {
        self.searcher.token()
    }

    fn get_move(&mut self, board: Board) -> Result<usize> {
        self.search(board, Algorithm::Minimax)
    }

    fn get_move_alpha_beta(&mut self, board: Board) -> Result<usize> {
        self.search(board, Algorithm::AlphaBeta)
    }

    fn stats(&self) -> Option<SearchStats> {
        Some(self.searcher.stats())
    }
}

/// An agent that plays a uniformly random column that isn't full
///
/// Seeding it the same way gives the same sequence of moves for the same boards.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    token: Token,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(token: Token, seed: u64) -> Self {
        Self {
            token,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn token(&self) -> Token {
        self.token
    }

    fn get_move(&mut self, board: Board) -> Result<usize> {
        board
            .legal_columns()
            .choose(&mut self.rng)
            .ok_or_else(|| anyhow!("no move available for {}", self.token))
    }
}

/// Somewhere a human agent reads its moves from, a line at a time
///
/// Readers passed to more than one agent must not buffer ahead privately, or one
/// agent ends up holding lines meant for the other.
pub trait LineInput {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

/// Stdin keeps one buffer for the whole process and is locked per line
impl LineInput for Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.lock().read_line(buf)
    }
}

/// One reader handed to several agents in turn
impl<R: BufRead> LineInput for Rc<RefCell<R>> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.borrow_mut().read_line(buf)
    }
}

/// An agent that asks a person for a one-indexed column
pub struct HumanAgent<R, W> {
    token: Token,
    input: R,
    output: W,
}

impl HumanAgent<Stdin, Stdout> {
    /// A human agent reading from stdin and prompting on stdout
    ///
    /// Any number of these can take turns on the same terminal or pipe.
    pub fn stdio(token: Token) -> Self {
        Self::new(token, stdin(), stdout())
    }
}

impl<R: LineInput, W: Write> HumanAgent<R, W> {
    pub fn new(token: Token, input: R, output: W) -> Self {
        Self {
            token,
            input,
            output,
        }
    }
}

impl<R: LineInput, W: Write> Agent for HumanAgent<R, W> {
    fn token(&self) -> Token {
        self.token
    }

    fn get_move(&mut self, board: Board) -> Result<usize> {
        let columns = board.num_columns();
        loop {
            write!(self.output, "Player {}, column (1-{}) > ", self.token, columns)?;
            self.output.flush()?;

            let mut input_str = String::new();
            if self.input.read_line(&mut input_str)? == 0 {
                return Err(anyhow!("input closed before a move was entered"));
            }

            match input_str.trim().parse::<usize>() {
                Ok(column) if column >= 1 && column <= columns => return Ok(column - 1),
                Ok(column) => writeln!(
                    self.output,
                    "Invalid move, column {} out of range. Columns must be between 1 and {}",
                    column, columns
                )?,
                Err(_) => writeln!(self.output, "Invalid number: {}", input_str.trim())?,
            }
        }
    }
}
