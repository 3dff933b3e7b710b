use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use owo_colors::OwoColorize;

use viper::cache::{GameMeta, ScoreKey};
use viper::env::GameRequest;
use viper::eval::*;
use viper::game::*;
use viper::logging;
use viper::tactics::*;

#[derive(Parser)]
#[command(name = "viper eval", about = "Evaluate the moves of a game request.")]
struct Opts {
    /// Evaluation weights as json, missing weights are defaulted
    #[arg(long)]
    config: Option<EvalConfig>,
    /// Lookahead used for the food horizon
    #[arg(long, default_value_t = 0)]
    lookahead: u16,
    #[command(subcommand)]
    input: Input,
}

#[derive(Subcommand)]
enum Input {
    /// Json data of the request
    Data { data: String },
    /// File containing the data
    File { file: PathBuf },
}

fn main() -> Result<(), Box<dyn Error>> {
    logging();

    let Opts {
        config,
        lookahead,
        input,
    } = Opts::parse();

    let request: GameRequest = match input {
        Input::Data { data } => serde_json::from_str(&data)?,
        Input::File { file } => serde_json::from_reader(std::fs::File::open(file)?)?,
    };
    let config = config.unwrap_or_default();

    let game = Game::from_request(&request);
    info!("{game:?}");
    let me = &request.you.id;
    let Some(idx) = game.index_of(me) else {
        return Err(format!("snake {me} is not on the board").into());
    };

    let meta = GameMeta::new(&game, lookahead);
    let ctx = EvalContext::with_meta(&config, &meta);
    info!("hazard walls: {:?}", meta.hazard_walls);

    let mut grid = Grid::new(&game);
    let moves = legal_moves(&game, &grid, idx);
    let kiss = kiss_states(&game, &grid, idx, moves);
    info!("moves: {moves:?}");
    info!("kiss: {kiss:?}");

    for (i, area) in voronoi(&game, &mut grid).iter().enumerate() {
        info!(
            "{}: {} cells, closest food {:?}",
            game.snakes[i].id,
            area.cell_count(),
            area.closest_food()
        );
    }

    if let Some(key) = ScoreKey::new(&game, me, lookahead) {
        info!("score key: {key}");
    }

    for d in moves.iter() {
        let score = evaluate_move(&game, me, d, &ctx);
        println!("{}: {score:.2}", format!("{d:?}").bright_green());
    }
    Ok(())
}
