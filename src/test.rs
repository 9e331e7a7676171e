#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};

    use crate::order::column_order;
    use crate::search::{SCORE_MAX, SCORE_MIN};
    use crate::{
        Agent, Algorithm, Board, Cell, Game, GameConfig, GameOutcome, Pruning, SearchAgent,
        SearchStats, Searcher, Token,
    };

    fn config(rows: usize, columns: usize, win_length: usize) -> GameConfig {
        GameConfig {
            rows,
            columns,
            win_length,
        }
    }

    // grid contents and column fills, ignoring the last move
    fn layout(board: &Board) -> (Vec<Cell>, Vec<usize>) {
        let mut cells = vec![];
        for row in 0..board.num_rows() {
            for column in 0..board.num_columns() {
                cells.push(board.cell_at(row, column));
            }
        }
        let fills = (0..board.num_columns()).map(|c| board.column_fill(c)).collect();
        (cells, fills)
    }

    /// Plays back a fixed list of columns
    struct Scripted {
        token: Token,
        moves: Vec<usize>,
    }

    impl Agent for Scripted {
        fn token(&self) -> Token {
            self.token
        }

        fn get_move(&mut self, _board: Board) -> Result<usize> {
            if self.moves.is_empty() {
                return Err(anyhow!("script ran out"));
            }
            Ok(self.moves.remove(0))
        }
    }

    #[test]
    pub fn place_and_undo_round_trip() -> Result<()> {
        let mut board = Board::from_moves(GameConfig::default(), "4453")?;
        let before = layout(&board);

        let moves = [(0, Token::O), (6, Token::X), (0, Token::O), (3, Token::X), (2, Token::O)];
        for &(column, token) in moves.iter() {
            assert!(board.try_place(column, token));
        }
        assert_ne!(layout(&board), before);
        for &(column, _) in moves.iter().rev() {
            assert!(board.undo_last(column));
        }

        assert_eq!(layout(&board), before);
        Ok(())
    }

    #[test]
    pub fn illegal_placements_leave_board_alone() -> Result<()> {
        let mut board = Board::from_moves(config(2, 3, 3), "11")?;
        let before = layout(&board);

        assert!(!board.try_place(0, Token::X));
        assert!(!board.try_place(3, Token::X));
        assert!(!board.undo_last(1));
        assert!(!board.undo_last(7));
        assert_eq!(layout(&board), before);

        assert!(!board.playable(0));
        assert!(board.playable(1));
        assert_eq!(board.legal_columns().collect::<Vec<_>>(), vec![1, 2]);
        Ok(())
    }

    #[test]
    pub fn gravity_and_last_move() -> Result<()> {
        let mut board = Board::new(GameConfig::default())?;
        assert_eq!(board.last_move(), None);

        assert!(board.try_place(2, Token::X));
        assert!(board.try_place(2, Token::O));
        assert_eq!(board.cell_at(0, 2), Cell::Occupied(Token::X));
        assert_eq!(board.cell_at(1, 2), Cell::Occupied(Token::O));
        assert_eq!(board.column_fill(2), 2);

        let last = board.last_move().ok_or_else(|| anyhow!("no last move"))?;
        assert_eq!((last.row, last.column, last.cell), (1, 2, Cell::Occupied(Token::O)));

        assert!(board.undo_last(2));
        let last = board.last_move().ok_or_else(|| anyhow!("no last move"))?;
        assert_eq!((last.row, last.column, last.cell), (1, 2, Cell::Empty));
        assert_eq!(board.cell_at(1, 2), Cell::Empty);
        Ok(())
    }

    #[test]
    pub fn winning_lines() -> Result<()> {
        // horizontal, X along the bottom
        assert!(Board::from_moves(GameConfig::default(), "1122334")?.has_winning_line_at_last_move());
        // horizontal, completed from the middle of the line
        assert!(Board::from_moves(GameConfig::default(), "1122443")?.has_winning_line_at_last_move());
        // vertical
        assert!(Board::from_moves(GameConfig::default(), "1213141")?.has_winning_line_at_last_move());
        // diagonal /
        assert!(Board::from_moves(GameConfig::default(), "12233434474")?.has_winning_line_at_last_move());
        // diagonal \
        assert!(Board::from_moves(GameConfig::default(), "76655454414")?.has_winning_line_at_last_move());

        // three in a row is not enough
        assert!(!Board::from_moves(GameConfig::default(), "112233")?.has_winning_line_at_last_move());
        // four on the bottom row, not in a line
        assert!(!Board::from_moves(GameConfig::default(), "1122447")?.has_winning_line_at_last_move());
        // a piece next to the other token's three
        assert!(!Board::from_moves(GameConfig::default(), "112234")?.has_winning_line_at_last_move());
        Ok(())
    }

    #[test]
    pub fn no_win_without_a_placement() -> Result<()> {
        let board = Board::new(GameConfig::default())?;
        assert!(!board.has_winning_line_at_last_move());

        let mut board_won = Board::from_moves(GameConfig::default(), "1122334")?;
        assert!(board_won.has_winning_line_at_last_move());
        // taking the winning piece back out is an undo, not a win
        assert!(board_won.undo_last(3));
        assert!(!board_won.has_winning_line_at_last_move());

        // an undo in another column hides the line as well
        let mut board_won = Board::from_moves(GameConfig::default(), "1122334")?;
        assert!(board_won.try_place(6, Token::O));
        assert!(board_won.undo_last(6));
        assert!(!board_won.has_winning_line_at_last_move());
        Ok(())
    }

    #[test]
    pub fn win_length_one() -> Result<()> {
        let mut board = Board::new(config(1, 4, 1))?;
        assert!(board.try_place(2, Token::O));
        assert!(board.has_winning_line_at_last_move());
        Ok(())
    }

    #[test]
    pub fn full_board() -> Result<()> {
        let mut board = Board::from_moves(config(2, 2, 2), "121")?;
        assert!(!board.is_full());
        assert!(board.try_place(1, Token::O));
        assert!(board.is_full());
        assert_eq!(board.legal_columns().count(), 0);
        for column in 0..2 {
            assert!(!board.playable(column));
        }

        let mut searcher = Searcher::new(Token::X, 3);
        assert_eq!(searcher.best_move(&mut board, Algorithm::Minimax), None);
        assert_eq!(searcher.best_move(&mut board, Algorithm::AlphaBeta), None);
        Ok(())
    }

    #[test]
    pub fn scoped_placement() -> Result<()> {
        let mut board = Board::from_moves(config(2, 3, 3), "11")?;
        let before = layout(&board);

        let seen = board.with_piece(2, Token::X, |board| board.cell_at(0, 2));
        assert_eq!(seen, Some(Cell::Occupied(Token::X)));
        assert_eq!(layout(&board), before);

        // full column, the closure never runs
        assert_eq!(board.with_piece(0, Token::X, |_| unreachable!()), None::<()>);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "board history out of sync")]
    pub fn unpaired_undo_is_fatal() {
        let mut board = Board::new(GameConfig::default()).unwrap();
        board.with_piece(0, Token::X, |board| {
            board.undo_last(0);
        });
    }

    #[test]
    pub fn centre_out_order() {
        assert_eq!(column_order(7), vec![3, 2, 4, 1, 5, 0, 6]);
        assert_eq!(column_order(6), vec![3, 2, 4, 1, 5, 0]);
        assert_eq!(column_order(2), vec![1, 0]);
        assert_eq!(column_order(1), vec![0]);
        for columns in 1..12 {
            let mut order = column_order(columns);
            order.sort_unstable();
            assert_eq!(order, (0..columns).collect::<Vec<_>>());
        }
    }

    #[test]
    pub fn search_restores_board() -> Result<()> {
        let mut board = Board::from_moves(GameConfig::default(), "44536")?;
        let before = layout(&board);

        let mut searcher = Searcher::new(Token::O, 3);
        searcher.best_move(&mut board, Algorithm::Minimax);
        assert_eq!(layout(&board), before);
        searcher.best_move(&mut board, Algorithm::AlphaBeta);
        assert_eq!(layout(&board), before);
        Ok(())
    }

    #[test]
    pub fn leaf_scores() -> Result<()> {
        let mut x_won = Board::from_moves(GameConfig::default(), "1122334")?;
        let mut o_won = Board::from_moves(GameConfig::default(), "71122334")?;
        let mut searcher = Searcher::new(Token::X, 4);

        // a win found with no depth left is still a win
        assert_eq!(searcher.minimax(&mut x_won, 0, false), 1);
        assert_eq!(searcher.minimax(&mut o_won, 0, true), -1);
        assert_eq!(searcher.minimax(&mut x_won, 5, false), 1);

        assert_eq!(searcher.alpha_beta(&mut x_won, 5, SCORE_MIN, SCORE_MAX, false), 5);
        assert_eq!(searcher.alpha_beta(&mut o_won, 2, SCORE_MIN, SCORE_MAX, true), -2);

        let mut quiet = Board::from_moves(GameConfig::default(), "44")?;
        assert_eq!(searcher.minimax(&mut quiet, 0, true), 0);
        assert_eq!(Searcher::evaluate_with_depth(&quiet, 6), 0);
        Ok(())
    }

    #[test]
    pub fn takes_an_immediate_win() -> Result<()> {
        let mut board = Board::from_moves(GameConfig::default(), "112233")?;

        let mut plain = Searcher::new(Token::X, 1);
        let (score, column) = plain
            .best_move(&mut board, Algorithm::Minimax)
            .ok_or_else(|| anyhow!("no move"))?;
        assert_eq!(column, 3);
        assert!(score > 0);

        let mut pruned = Searcher::new(Token::X, 3);
        assert_eq!(pruned.best_move(&mut board, Algorithm::AlphaBeta), Some((3, 3)));
        Ok(())
    }

    #[test]
    pub fn minimising_side_takes_its_win() -> Result<()> {
        // O has three stacked in column 2 and is to move
        let mut board = Board::from_moves(GameConfig::default(), "1212326")?;

        let mut pruned = Searcher::new(Token::O, 2);
        assert_eq!(pruned.best_move(&mut board, Algorithm::AlphaBeta), Some((-2, 1)));

        let mut plain = Searcher::new(Token::O, 1);
        assert_eq!(plain.best_move(&mut board, Algorithm::Minimax), Some((-1, 1)));
        Ok(())
    }

    #[test]
    pub fn blocks_an_immediate_loss() -> Result<()> {
        // X threatens to finish the bottom row in column 4, O must block
        let mut board = Board::from_moves(GameConfig::default(), "15263")?;

        let mut pruned = Searcher::new(Token::O, 2);
        let (_, column) = pruned
            .best_move(&mut board, Algorithm::AlphaBeta)
            .ok_or_else(|| anyhow!("no move"))?;
        assert_eq!(column, 3);

        let mut plain = Searcher::new(Token::O, 2);
        let (_, column) = plain
            .best_move(&mut board, Algorithm::Minimax)
            .ok_or_else(|| anyhow!("no move"))?;
        assert_eq!(column, 3);
        Ok(())
    }

    #[test]
    pub fn single_row_win_length_one() -> Result<()> {
        for &token in [Token::X, Token::O].iter() {
            for &algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta].iter() {
                let mut board = Board::new(config(1, 5, 1))?;
                let mut searcher = Searcher::new(token, 3);
                let (_, column) = searcher
                    .best_move(&mut board, algorithm)
                    .ok_or_else(|| anyhow!("no move"))?;
                assert!(board.playable(column));
            }
        }
        Ok(())
    }

    #[test]
    pub fn empty_board_opens_in_the_centre() -> Result<()> {
        let mut board = Board::new(GameConfig::default())?;
        let mut searcher = Searcher::new(Token::X, 7);
        assert_eq!(searcher.best_move(&mut board, Algorithm::AlphaBeta), Some((0, 3)));
        Ok(())
    }

    #[test]
    pub fn pruning_never_picks_a_worse_move() -> Result<()> {
        let positions = [
            (config(3, 3, 3), ""),
            (config(3, 3, 2), "2"),
            (config(4, 4, 3), "23321441"),
            (config(3, 4, 3), "2332"),
            (config(4, 4, 3), "1234"),
        ];

        for &(game_config, moves) in positions.iter() {
            let mut board = Board::from_moves(game_config, moves)?;
            let empty = game_config.rows * game_config.columns - moves.len();
            let token = if moves.len() % 2 == 0 { Token::X } else { Token::O };
            // deep enough that every line of play fills the board before the depth runs out
            let depth = empty;

            let mut plain = Searcher::new(token, depth);
            let (plain_score, _) = plain
                .best_move(&mut board, Algorithm::Minimax)
                .ok_or_else(|| anyhow!("no move"))?;
            let mut pruned = Searcher::new(token, depth);
            let (pruned_score, pruned_column) = pruned
                .best_move(&mut board, Algorithm::AlphaBeta)
                .ok_or_else(|| anyhow!("no move"))?;

            assert_eq!(pruned_score.signum(), plain_score, "{} {}", game_config, moves);

            // the pruned choice is worth as much as the best move under plain minimax
            let mut check = Searcher::new(token, depth);
            let value = board
                .with_piece(pruned_column, token, |board| {
                    check.minimax(board, depth, !token.is_maximizing())
                })
                .ok_or_else(|| anyhow!("illegal choice"))?;
            assert_eq!(value, plain_score, "{} {}", game_config, moves);
        }
        Ok(())
    }

    #[test]
    pub fn pruning_expands_fewer_nodes() -> Result<()> {
        let mut board = Board::from_moves(GameConfig::default(), "4453")?;

        for depth in 1..=4 {
            let mut plain = Searcher::new(Token::X, depth);
            plain.best_move(&mut board, Algorithm::Minimax);
            let mut pruned = Searcher::new(Token::X, depth);
            pruned.best_move(&mut board, Algorithm::AlphaBeta);

            assert!(pruned.nodes_expanded <= plain.nodes_expanded);
            assert_eq!(plain.nodes_pruned, 0);
            if depth > 1 {
                assert!(pruned.nodes_pruned > 0);
            }
        }
        Ok(())
    }

    #[test]
    pub fn counters_accumulate() -> Result<()> {
        let mut board = Board::from_moves(GameConfig::default(), "44")?;
        let mut searcher = Searcher::new(Token::X, 3);

        searcher.best_move(&mut board, Algorithm::AlphaBeta);
        let first = searcher.stats();
        assert!(first.nodes_expanded > 0);

        searcher.best_move(&mut board, Algorithm::AlphaBeta);
        let second = searcher.stats();
        // the same search from the same position costs the same again
        assert_eq!(second - first, first);
        // snapshots diffed the wrong way round come out empty
        assert_eq!(first - second, SearchStats::default());
        Ok(())
    }

    #[test]
    pub fn plain_minimax_node_count() -> Result<()> {
        // 1 row, 3 columns, nothing can win: every ordering of the three cells is searched
        let mut board = Board::new(config(1, 3, 3))?;
        let mut searcher = Searcher::new(Token::X, 5);
        assert_eq!(searcher.best_move(&mut board, Algorithm::Minimax), Some((0, 0)));
        // 3 children, each with 2 children, each with 1 full-board leaf
        assert_eq!(searcher.nodes_expanded, 3 + 3 * 2 + 3 * 2);
        Ok(())
    }

    #[test]
    pub fn game_forfeits_illegal_moves() -> Result<()> {
        let first = Scripted {
            token: Token::X,
            moves: vec![5, 0],
        };
        let second = Scripted {
            token: Token::O,
            moves: vec![2, 1],
        };
        let mut game = Game::new(config(1, 3, 2), Box::new(first), Box::new(second))?;

        // X loses its first turn, so O gets two pieces side by side
        assert_eq!(game.play(Pruning::default())?, GameOutcome::SecondPlayerWin);
        assert_eq!(game.board().cell_at(0, 0), Cell::Occupied(Token::X));
        Ok(())
    }

    #[test]
    pub fn game_ends_in_a_draw_when_full() -> Result<()> {
        let first = Scripted {
            token: Token::X,
            moves: vec![0],
        };
        let second = Scripted {
            token: Token::O,
            moves: vec![1],
        };
        let mut game = Game::new(config(1, 2, 2), Box::new(first), Box::new(second))?;
        let outcome = game.play(Pruning::default())?;
        assert_eq!(outcome, GameOutcome::Draw);
        assert_eq!(outcome.score(), 0);
        Ok(())
    }

    #[test]
    pub fn game_rejects_matching_tokens() {
        let game = Game::new(
            GameConfig::default(),
            Box::new(SearchAgent::new(Token::X, 1)),
            Box::new(SearchAgent::new(Token::X, 1)),
        );
        assert!(game.is_err());
    }

    #[test]
    pub fn search_beats_a_script_and_keeps_counting() -> Result<()> {
        // O only ever plays the last column, X should win along the bottom
        let second = Scripted {
            token: Token::O,
            moves: vec![6, 6, 6, 6, 6],
        };
        let mut moves_seen = 0;
        let outcome = {
            let mut game = Game::new(
                GameConfig::default(),
                Box::new(SearchAgent::new(Token::X, 3)),
                Box::new(second),
            )?
            .with_move_callback(|_| moves_seen += 1);
            let outcome = game.play(Pruning {
                first: true,
                second: false,
            })?;

            let stats = game.first().stats().ok_or_else(|| anyhow!("no stats"))?;
            assert!(stats.nodes_expanded > 0 && stats.nodes_pruned > 0);
            assert_eq!(game.second().stats(), None);
            outcome
        };

        assert_eq!(outcome, GameOutcome::FirstPlayerWin);
        assert_eq!(outcome.score(), 1);
        assert_eq!(moves_seen, 7);
        Ok(())
    }

    #[test]
    pub fn text_render() -> Result<()> {
        let board = Board::from_moves(config(2, 3, 3), "112")?;
        assert_eq!(
            board.to_string(),
            "| O        |\n| X  X     |\n------------\n"
        );

        let mut out = Vec::new();
        board.render(&mut out)?;
        assert!(!out.is_empty());
        Ok(())
    }
}
