//! The turn loop between two agents

use anyhow::{anyhow, Result};
use log::{info, warn};

use crate::{agent::Agent, board::Board, config::GameConfig};

/// How a finished game ended
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    FirstPlayerWin,
    SecondPlayerWin,
    Draw,
}

impl GameOutcome {
    /// The result from the first player's point of view: 1 for a win, -1 for a loss, 0 for a draw
    pub fn score(self) -> i32 {
        match self {
            GameOutcome::FirstPlayerWin => 1,
            GameOutcome::SecondPlayerWin => -1,
            GameOutcome::Draw => 0,
        }
    }
}

/// Which seats pick their moves with alpha-beta pruning
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pruning {
    pub first: bool,
    pub second: bool,
}

/// A game of Connect N, owning the board and both players
///
/// The first agent always moves first.
pub struct Game<'a> {
    board: Board,
    agents: [Box<dyn Agent + 'a>; 2],
    on_move: Option<Box<dyn FnMut(&Board) + 'a>>,
}

impl<'a> Game<'a> {
    pub fn new(
        config: GameConfig,
        first: Box<dyn Agent + 'a>,
        second: Box<dyn Agent + 'a>,
    ) -> Result<Self> {
        if first.token() == second.token() {
            return Err(anyhow!("both players are using token {}", first.token()));
        }
        Ok(Self {
            board: Board::new(config)?,
            agents: [first, second],
            on_move: None,
        })
    }

    /// Calls `on_move` with the board after every successful move
    pub fn with_move_callback<F: FnMut(&Board) + 'a>(mut self, on_move: F) -> Self {
        self.on_move = Some(Box::new(on_move));
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn first(&self) -> &dyn Agent {
        self.agents[0].as_ref()
    }

    pub fn second(&self) -> &dyn Agent {
        self.agents[1].as_ref()
    }

    /// Plays until a player completes a line or the board fills up
    ///
    /// An agent that picks a full or missing column loses its turn.
    pub fn play(&mut self, pruning: Pruning) -> Result<GameOutcome> {
        let mut index = 0;
        loop {
            let use_pruning = if index == 0 { pruning.first } else { pruning.second };
            let agent = &mut self.agents[index];
            let token = agent.token();

            let snapshot = self.board.clone();
            let column = if use_pruning {
                agent.get_move_alpha_beta(snapshot)?
            } else {
                agent.get_move(snapshot)?
            };

            if self.board.try_place(column, token) {
                if let Some(on_move) = self.on_move.as_mut() {
                    on_move(&self.board);
                }
                if self.board.has_winning_line_at_last_move() {
                    let outcome = if index == 0 {
                        GameOutcome::FirstPlayerWin
                    } else {
                        GameOutcome::SecondPlayerWin
                    };
                    info!("{} wins with column {}", token, column + 1);
                    return Ok(outcome);
                }
                if self.board.is_full() {
                    info!("board full, game drawn");
                    return Ok(GameOutcome::Draw);
                }
            } else {
                warn!(
                    "{} made an illegal move in column {}, turn lost",
                    token,
                    column + 1
                );
            }

            index = (index + 1) % 2;
        }
    }
}
