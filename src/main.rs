use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use connectn_ai::*;

#[derive(Parser)]
#[command(name = "connectn")]
#[command(about = "Alpha-beta move selection for Connect-N games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best move in a position
    Analyse {
        /// 1-indexed columns played so far, e.g. 4453 or 4,4,10
        #[arg(long, default_value = "")]
        moves: String,
        #[command(flatten)]
        board: BoardArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play a game against the engine, or watch it play itself
    Play {
        /// Which player, if any, is controlled from stdin
        #[arg(long, value_enum, default_value_t = Human::None)]
        human: Human,
        #[command(flatten)]
        board: BoardArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct BoardArgs {
    #[arg(long, default_value_t = 7)]
    width: usize,
    #[arg(long, default_value_t = 6)]
    height: usize,
    #[arg(long, default_value_t = 4)]
    win_length: usize,
}

#[derive(Args)]
struct SearchArgs {
    /// Search depth in plies, overrides the config file
    #[arg(long)]
    depth: Option<u32>,
    /// JSON search config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Search root moves on separate threads
    #[arg(long)]
    parallel: bool,
    /// Deepen iteratively within this many milliseconds
    #[arg(long)]
    budget_ms: Option<u64>,
}

impl SearchArgs {
    fn engine(&self) -> Result<Engine> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading search config from {}", path.display());
                SearchConfig::load(path)?
            }
            None => SearchConfig::default(),
        };
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if self.parallel {
            config.parallel = true;
        }
        if self.budget_ms.is_some() {
            config.time_budget_ms = self.budget_ms;
        }
        Ok(Engine::new(config)?)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Human {
    None,
    One,
    Two,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyse {
            moves,
            board,
            search,
        } => analyse(&moves, &board, &search),
        Commands::Play {
            human,
            board,
            search,
        } => play(human, &board, &search),
    }
}

fn analyse(moves: &str, board_args: &BoardArgs, search: &SearchArgs) -> Result<()> {
    let board = ArrayBoard::from_moves(
        board_args.width,
        board_args.height,
        board_args.win_length,
        moves,
    )?;
    let engine = search.engine()?;
    tracing::info!(
        "Analysing {} moves on a {}x{} board, depth {}",
        board.num_moves(),
        board.width(),
        board.height(),
        engine.config().max_depth
    );

    let result = engine.analyse(&board)?;
    match result.column {
        Some(column) => println!("Best move: {}", column + 1),
        None => println!("No move chosen at depth 0"),
    }
    println!("{}", describe(&result, board.player_to_move()));
    println!("Positions searched: {}", result.node_count);
    Ok(())
}

fn play(human: Human, board_args: &BoardArgs, search: &SearchArgs) -> Result<()> {
    let mut board = ArrayBoard::new(board_args.width, board_args.height, board_args.win_length)?;
    let engine = search.engine()?;
    let mut history = Vec::new();
    let stdin = stdin();

    // game loop
    loop {
        match board.outcome() {
            Outcome::InProgress => {
                let player = board.player_to_move();
                let human_turn = matches!(
                    (human, player),
                    (Human::One, Player::One) | (Human::Two, Player::Two)
                );

                let next_move = if human_turn {
                    print!("Move input > ");
                    stdout().flush()?;
                    let mut input_str = String::new();
                    if stdin.read_line(&mut input_str)? == 0 {
                        return Err(anyhow!("input closed before the game finished"));
                    }

                    match input_str.trim().parse::<usize>() {
                        Err(_) => {
                            println!("Invalid number: {}", input_str.trim());
                            continue;
                        }
                        Ok(column) => column,
                    }
                // AI player
                } else {
                    println!("AI is thinking...");
                    let result = engine.analyse(&board)?;
                    let column = result
                        .column
                        .ok_or_else(|| anyhow!("the engine needs a search depth of at least 1"))?;
                    println!("{}", describe(&result, player));
                    println!("Player {} plays {}", player_number(player), column + 1);
                    column + 1
                };

                if let Err(err) = board.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
                history.push(next_move);
            }

            // end states
            Outcome::WonBy(player) => {
                println!("Player {} wins!", player_number(player));
                break;
            }
            Outcome::Draw => {
                println!("Draw!");
                break;
            }
        }
    }

    let separator = if board.width() > 9 { "," } else { "" };
    let moves: Vec<String> = history.iter().map(|column| column.to_string()).collect();
    println!("Moves: {}", moves.join(separator));
    Ok(())
}

fn player_number(player: Player) -> usize {
    match player {
        Player::One => 1,
        Player::Two => 2,
    }
}

/// Describes a search value for the player who was to move
fn describe(result: &SearchResult, player: Player) -> String {
    // decided values carry the depth left when the game ended
    let plies_to_end = |margin: Score| result.depth.saturating_sub(margin as u32);
    if result.value >= WIN_SCORE {
        let plies = plies_to_end(result.value - WIN_SCORE);
        format!(
            "Player {} can force a win within {} plies.",
            player_number(player),
            plies
        )
    } else if result.value <= -WIN_SCORE {
        let plies = plies_to_end(-WIN_SCORE - result.value);
        format!(
            "Player {} can force a win within {} plies.",
            player_number(player.opponent()),
            plies
        )
    } else {
        format!("Heuristic value: {}", result.value)
    }
}
