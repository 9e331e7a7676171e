//! Board dimensions and win condition for a game of Connect N

use crate::{DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_WIN_LENGTH};

/// Errors that can occur when building a game configuration
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board must have at least one row and one column, got {rows}x{columns}")]
    EmptyBoard { rows: usize, columns: usize },

    #[error("win length must be at least 1")]
    ZeroWinLength,

    #[error("win length {win_length} does not fit on a {rows}x{columns} board")]
    Unwinnable {
        rows: usize,
        columns: usize,
        win_length: usize,
    },
}

/// The shape of a board and the number of pieces in a line needed to win
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub win_length: usize,
}

impl GameConfig {
    /// Creates a validated configuration
    pub fn new(rows: usize, columns: usize, win_length: usize) -> Result<Self, ConfigError> {
        let config = Self {
            rows,
            columns,
            win_length,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyBoard {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.win_length == 0 {
            return Err(ConfigError::ZeroWinLength);
        }
        // diagonals are never longer than the shorter side, so one of the
        // straight axes has to fit the line
        if self.win_length > self.rows.max(self.columns) {
            return Err(ConfigError::Unwinnable {
                rows: self.rows,
                columns: self.columns,
                win_length: self.win_length,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            win_length: DEFAULT_WIN_LENGTH,
        }
    }
}

impl std::fmt::Display for GameConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} connect {}", self.rows, self.columns, self.win_length)
    }
}
