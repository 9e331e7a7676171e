use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::PathBuf;

use connectn_ai::experiment::{self, Opponent, Suite};
use connectn_ai::*;

/// Play Connect N against minimax search agents, or measure them over many games
#[derive(Parser)]
#[command(name = "connectn", about = "Connect N with minimax and alpha-beta search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a single game, printing the board after every move
    Play {
        #[command(flatten)]
        board: BoardArgs,

        /// Who plays X, the first player
        #[arg(long, value_enum, default_value = "human")]
        first: AgentKind,

        /// Who plays O, the second player
        #[arg(long, value_enum, default_value = "search")]
        second: AgentKind,

        /// Search depth for search agents
        #[arg(long, default_value_t = 6)]
        depth: usize,

        /// Use alpha-beta pruning for the first player
        #[arg(long)]
        first_pruning: bool,

        /// Use alpha-beta pruning for the second player
        #[arg(long)]
        second_pruning: bool,

        /// Seed for random agents
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Play many games of a searching X against an opponent and write the results as CSV
    Experiment {
        /// Which set of boards and depths to play
        #[arg(long, value_enum, default_value = "depth")]
        suite: Suite,

        /// Search depth for suites that don't vary it
        #[arg(long, default_value_t = 6)]
        depth: usize,

        /// Games per combination of preset and pruning option
        #[arg(long, default_value_t = 100)]
        games: usize,

        /// Which search X uses
        #[arg(long, value_enum, default_value = "pruning")]
        search: SearchChoice,

        /// Play against a search agent of this depth instead of a random one
        #[arg(long)]
        opponent_depth: Option<usize>,

        /// Use alpha-beta pruning for a searching opponent
        #[arg(long)]
        opponent_pruning: bool,

        /// Seed for the random opponent
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Where to write the CSV results
        #[arg(long, default_value = "results.csv")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct BoardArgs {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,

    /// Pieces in a line needed to win
    #[arg(long, default_value_t = DEFAULT_WIN_LENGTH)]
    win_length: usize,
}

#[derive(Copy, Clone, ValueEnum)]
enum AgentKind {
    Human,
    Search,
    Random,
}

#[derive(Copy, Clone, ValueEnum)]
enum SearchChoice {
    Plain,
    Pruning,
    Both,
}

impl SearchChoice {
    fn options(self) -> &'static [bool] {
        match self {
            SearchChoice::Plain => &[false],
            SearchChoice::Pruning => &[true],
            SearchChoice::Both => &[false, true],
        }
    }
}

fn make_agent(kind: AgentKind, token: Token, depth: usize, seed: u64) -> Box<dyn Agent> {
    match kind {
        AgentKind::Human => Box::new(HumanAgent::stdio(token)),
        AgentKind::Search => Box::new(SearchAgent::new(token, depth)),
        AgentKind::Random => Box::new(RandomAgent::new(token, seed)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            board,
            first,
            second,
            depth,
            first_pruning,
            second_pruning,
            seed,
        } => {
            let config = GameConfig::new(board.rows, board.columns, board.win_length)?;
            println!("Welcome to Connect {}\n", config.win_length);

            let mut game = Game::new(
                config,
                make_agent(first, Token::X, depth, seed),
                make_agent(second, Token::O, depth, seed.wrapping_add(1)),
            )?
            .with_move_callback(|board| {
                board.render(&mut stdout()).expect("Failed to draw board!");
            });
            game.board().render(&mut stdout())?;

            let outcome = game.play(Pruning {
                first: first_pruning,
                second: second_pruning,
            })?;
            match outcome {
                GameOutcome::FirstPlayerWin => println!("Player X wins!"),
                GameOutcome::SecondPlayerWin => println!("Player O wins!"),
                GameOutcome::Draw => println!("Draw!"),
            }
            for (name, agent) in [("X", game.first()), ("O", game.second())].iter() {
                if let Some(stats) = agent.stats() {
                    println!(
                        "Player {}: {} nodes expanded, {} branches pruned",
                        name, stats.nodes_expanded, stats.nodes_pruned
                    );
                }
            }
        }

        Command::Experiment {
            suite,
            depth,
            games,
            search,
            opponent_depth,
            opponent_pruning,
            seed,
            output,
        } => {
            let opponent = match opponent_depth {
                Some(depth) => Opponent::Search {
                    depth,
                    pruning: opponent_pruning,
                },
                None => Opponent::Random,
            };
            let tasks = experiment::tasks(&suite.presets(depth), search.options(), games);
            let progress = experiment::progress_bar(tasks.len());
            let records = experiment::run(&tasks, opponent, seed, &progress)?;

            let file = File::create(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            experiment::write_csv(BufWriter::new(file), &records)?;
            println!("Wrote {} games to {}", records.len(), output.display());
        }
    }
    Ok(())
}
