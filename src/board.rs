use anyhow::{anyhow, Result};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::fmt;
use std::io::Write;

use crate::config::{ConfigError, GameConfig};

/// The piece type of one of the two players
///
/// `X` is always the maximising side of the search and `O` the minimising side.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Token {
    X,
    O,
}

impl Token {
    pub fn opponent(self) -> Self {
        match self {
            Token::X => Token::O,
            Token::O => Token::X,
        }
    }

    pub fn is_maximizing(self) -> bool {
        self == Token::X
    }

    /// The token that moves for the given side of the search
    pub fn for_side(maximizing: bool) -> Self {
        if maximizing {
            Token::X
        } else {
            Token::O
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::X => write!(f, "X"),
            Token::O => write!(f, "O"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    Empty,
    Occupied(Token),
}

impl Cell {
    pub fn token(&self) -> Option<Token> {
        match self {
            Cell::Occupied(token) => Some(*token),
            Cell::Empty => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Occupied(token) => write!(f, "{}", token),
            Cell::Empty => write!(f, " "),
        }
    }
}

/// The most recent change to the board
///
/// After a removal `cell` is [`Cell::Empty`], so nobody owns the vacated square.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LastMove {
    pub row: usize,
    pub column: usize,
    pub cell: Cell,
}

// row, column steps for the vertical, horizontal and both diagonal axes
const AXES: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// A Connect N board with gravity, where row 0 is the bottom row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>, // cells are stored left-to-right, bottom-to-top
    heights: Vec<usize>,
    rows: usize,
    columns: usize,
    win_length: usize,
    last_move: Option<LastMove>,
}

impl Board {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cells: vec![Cell::Empty; config.rows * config.columns],
            heights: vec![0; config.columns],
            rows: config.rows,
            columns: config.columns,
            win_length: config.win_length,
            last_move: None,
        })
    }

    /// Builds a board from a string of one-indexed column digits, alternating
    /// between `X` and `O` starting with `X`
    pub fn from_moves<S: AsRef<str>>(config: GameConfig, moves: S) -> Result<Self> {
        let mut board = Self::new(config)?;
        let mut token = Token::X;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column) if column >= 1 && column <= board.columns => {
                    let column = column - 1;
                    // no moves can follow a winning move
                    if board.has_winning_line_at_last_move() {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    if !board.try_place(column, token) {
                        return Err(anyhow!("Invalid move, column {} full", column + 1));
                    }
                    token = token.opponent();
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// The number of pieces in a column, which is also the next free row
    pub fn column_fill(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn playable(&self, column: usize) -> bool {
        column < self.columns && self.heights[column] < self.rows
    }

    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns).filter(move |&column| self.playable(column))
    }

    pub fn is_full(&self) -> bool {
        (0..self.columns).all(|column| !self.playable(column))
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Cell {
        self.cells[column + self.columns * row]
    }

    /// Drops a piece into a column
    ///
    /// Returns `false` without changing the board if the column doesn't exist or is full.
    pub fn try_place(&mut self, column: usize, token: Token) -> bool {
        if !self.playable(column) {
            return false;
        }
        let row = self.heights[column];
        let cell = Cell::Occupied(token);
        self.cells[column + self.columns * row] = cell;
        self.heights[column] += 1;
        self.last_move = Some(LastMove { row, column, cell });
        true
    }

    /// Takes the top piece back out of a column
    ///
    /// Only meant to reverse the caller's own most recent placement in that column,
    /// deeper history is not checked. Returns `false` if the column doesn't exist or is empty.
    pub fn undo_last(&mut self, column: usize) -> bool {
        if column >= self.columns || self.heights[column] == 0 {
            return false;
        }
        let row = self.heights[column] - 1;
        self.cells[column + self.columns * row] = Cell::Empty;
        self.heights[column] -= 1;
        self.last_move = Some(LastMove {
            row,
            column,
            cell: Cell::Empty,
        });
        true
    }

    /// Places `token` in `column`, runs `f` on the board and takes the piece back out
    ///
    /// Returns `None` without calling `f` if the placement is illegal. `f` must leave
    /// the board as it found it, the piece is then always removed before returning.
    pub fn with_piece<R, F>(&mut self, column: usize, token: Token, f: F) -> Option<R>
    where
        F: FnOnce(&mut Self) -> R,
    {
        if !self.try_place(column, token) {
            return None;
        }
        let result = f(self);
        let undone = self.undo_last(column);
        // an empty column here means pieces were placed and removed out of step
        assert!(
            undone,
            "could not undo piece in column {}, board history out of sync",
            column
        );
        Some(result)
    }

    /// Checks whether the last placed piece completed a line of `win_length`
    ///
    /// Only lines through the last move are considered. Always `false` if the
    /// last action was a removal or nothing has been played yet.
    pub fn has_winning_line_at_last_move(&self) -> bool {
        let (row, column, token) = match self.last_move {
            Some(LastMove {
                row,
                column,
                cell: Cell::Occupied(token),
            }) => (row as i32, column as i32, token),
            _ => return false,
        };
        let player = Cell::Occupied(token);

        for &(dy, dx) in AXES.iter() {
            // the last move itself
            let mut run = 1;
            for &sign in [-1i32, 1].iter() {
                let mut y = row + sign * dy;
                let mut x = column + sign * dx;
                while run < self.win_length {
                    if y < 0
                        || y >= self.rows as i32
                        || x < 0
                        || x >= self.columns as i32
                        || self.cell_at(y as usize, x as usize) != player
                    {
                        break;
                    }
                    y += sign * dy;
                    x += sign * dx;
                    run += 1;
                }
            }
            if run >= self.win_length {
                return true;
            }
        }

        false
    }

    /// Draws the board to a terminal with coloured pieces
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        let cols: String = (1..=self.columns).map(|x| (x % 10).to_string()).collect();
        out.queue(PrintStyledContent(style(cols + "\n")))?;

        for row in (0..self.rows).rev() {
            for column in 0..self.columns {
                out.queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match self.cell_at(row, column) {
                            Cell::Occupied(Token::X) => Color::Red,
                            Cell::Occupied(Token::O) => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
            }
            out.queue(PrintStyledContent(style("\n")))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Plain text view of the board with (0, 0) at the bottom left
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            write!(f, "| ")?;
            for column in 0..self.columns {
                write!(f, "{}  ", self.cell_at(row, column))?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", "---".repeat(self.columns + 1))
    }
}
