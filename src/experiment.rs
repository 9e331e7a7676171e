//! Batch play of many games for comparing plain and pruned search
//!
//! Every game is independent, with its own board and agents, so games are
//! spread over a thread pool while each search stays single-threaded.

use anyhow::Result;
use indicatif::*;
use rayon::prelude::*;

use std::io::Write;
use std::time::Instant;

use crate::{
    agent::{Agent, RandomAgent, SearchAgent},
    board::Token,
    config::GameConfig,
    game::{Game, Pruning},
};

/// A board configuration and search depth to measure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub label: String,
    pub config: GameConfig,
    pub depth: usize,
}

impl Preset {
    fn new(label: impl Into<String>, rows: usize, columns: usize, win_length: usize, depth: usize) -> Self {
        Self {
            label: label.into(),
            config: GameConfig {
                rows,
                columns,
                win_length,
            },
            depth,
        }
    }
}

/// A named set of presets
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Suite {
    /// Growing boards with four in a line to win
    BoardSize,
    /// A 7x8 board with win lengths from 3 to 6
    WinLength,
    /// Small, medium and large games
    Scale,
    /// The standard board searched at depths 1 to 7
    Depth,
}

impl Suite {
    /// The presets of this suite, using `depth` wherever the suite doesn't vary it
    pub fn presets(self, depth: usize) -> Vec<Preset> {
        match self {
            Suite::BoardSize => [(4, 5), (5, 6), (6, 7), (7, 8), (8, 9), (9, 10)]
                .iter()
                .map(|&(rows, columns)| {
                    Preset::new(format!("{}x{}", rows, columns), rows, columns, 4, depth)
                })
                .collect(),
            Suite::WinLength => (3..=6)
                .map(|win_length| Preset::new(win_length.to_string(), 7, 8, win_length, depth))
                .collect(),
            Suite::Scale => vec![
                Preset::new("small", 3, 3, 2, depth),
                Preset::new("medium", 6, 7, 4, depth),
                Preset::new("large", 9, 10, 7, depth),
            ],
            Suite::Depth => (1..=7)
                .map(|depth| Preset::new(depth.to_string(), 6, 7, 4, depth))
                .collect(),
        }
    }
}

/// The second player that the searching first player is measured against
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Opponent {
    Random,
    Search { depth: usize, pruning: bool },
}

/// One game to play
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub preset: Preset,
    pub pruning: bool,
}

/// Every combination of preset and pruning option, `repeats` times over
pub fn tasks(presets: &[Preset], pruning_options: &[bool], repeats: usize) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(presets.len() * pruning_options.len() * repeats);
    for _ in 0..repeats {
        for &pruning in pruning_options {
            for preset in presets {
                tasks.push(Task {
                    preset: preset.clone(),
                    pruning,
                });
            }
        }
    }
    tasks
}

/// The measurements of one game, from the first player's point of view
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub result: i32,
    pub nodes_expanded: usize,
    pub nodes_pruned: usize,
    pub pruning: bool,
    pub label: String,
    pub seconds: f64,
}

/// Plays a single game between a searching `X` and the opponent `O`
pub fn play_task(task: &Task, opponent: Opponent, seed: u64) -> Result<Record> {
    let player = Box::new(SearchAgent::new(Token::X, task.preset.depth));
    let (second, second_pruning): (Box<dyn Agent>, bool) = match opponent {
        Opponent::Random => (Box::new(RandomAgent::new(Token::O, seed)), false),
        Opponent::Search { depth, pruning } => (Box::new(SearchAgent::new(Token::O, depth)), pruning),
    };
    let mut game = Game::new(task.preset.config, player, second)?;

    let start = Instant::now();
    let outcome = game.play(Pruning {
        first: task.pruning,
        second: second_pruning,
    })?;
    let seconds = start.elapsed().as_secs_f64();

    let stats = game.first().stats().unwrap_or_default();
    Ok(Record {
        result: outcome.score(),
        nodes_expanded: stats.nodes_expanded,
        nodes_pruned: stats.nodes_pruned,
        pruning: task.pruning,
        label: task.preset.label.clone(),
        seconds,
    })
}

/// Plays every task in parallel, ticking `progress` as games finish
///
/// Random opponents get the seed `seed + task index`, so a run can be repeated exactly.
pub fn run(tasks: &[Task], opponent: Opponent, seed: u64, progress: &ProgressBar) -> Result<Vec<Record>> {
    let records = tasks
        .par_iter()
        .enumerate()
        .map(|(i, task)| {
            let record = play_task(task, opponent, seed.wrapping_add(i as u64));
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();
    Ok(records)
}

/// A progress bar in the style used for long batch runs
pub fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );
    progress
}

/// Writes records as CSV with a header row
pub fn write_csv<W: Write>(mut out: W, records: &[Record]) -> Result<()> {
    writeln!(out, "result,numExpanded,numPruned,isPruning,boardSize,time")?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            record.result,
            record.nodes_expanded,
            record.nodes_pruned,
            record.pruning,
            record.label,
            record.seconds
        )?;
    }
    out.flush()?;
    Ok(())
}
