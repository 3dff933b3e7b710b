//! Composite evaluation of a board snapshot for one snake.

use std::fmt::Debug;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

mod config;
pub use config::*;
mod signals;
pub use signals::*;
pub mod terms;

use crate::cache::GameMeta;
use crate::env::{Direction, Vec2D};
use crate::game::{default_move, legal_moves, Game, Grid, HazardWalls, Snake};
use crate::tactics::{kiss_states, KissOfDeath, KissOfMurder, KissStates};

/// Score of a snapshot without the evaluated snake.
pub const NO_ME: f64 = -10000.0;

/// Kiss states of the move that produced the evaluated snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorKiss {
    pub death: KissOfDeath,
    pub murder: KissOfMurder,
}

impl PriorKiss {
    pub fn of(states: &KissStates, d: Direction) -> PriorKiss {
        PriorKiss {
            death: states.death(d),
            murder: states.murder(d),
        }
    }
}

/// Inputs of the evaluation that are not part of the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub config: &'a EvalConfig,
    pub hazard_walls: HazardWalls,
    pub lookahead: u16,
}

impl<'a> EvalContext<'a> {
    pub fn new(config: &'a EvalConfig) -> Self {
        Self {
            config,
            hazard_walls: HazardWalls::default(),
            lookahead: 0,
        }
    }

    pub fn with_meta(config: &'a EvalConfig, meta: &GameMeta) -> Self {
        Self {
            config,
            hazard_walls: meta.hazard_walls,
            lookahead: meta.lookahead,
        }
    }
}

/// Scores the snapshot from the perspective of the snake `me`.
///
/// Returns [`NO_ME`] if the snake is dead, every other score is larger.
pub fn evaluate(
    game: &Game,
    me: &str,
    prior: PriorKiss,
    prior_health: Option<u8>,
    ctx: &EvalContext,
) -> f64 {
    let Some(signals) = Signals::new(game, me, ctx, prior, prior_health) else {
        return NO_ME;
    };
    let mut score = ctx.config.base;
    for (name, term) in terms::TERMS {
        let delta = term(&signals, ctx.config);
        trace!("{me} {name}: {delta:.2}");
        score += delta;
    }
    score.max(NO_ME + 1.0)
}

/// Evaluates the snapshot after `me` moved in `d` and every opponent made
/// its default move.
pub fn evaluate_move(game: &Game, me: &str, d: Direction, ctx: &EvalContext) -> f64 {
    let Some(idx) = game.index_of(me) else {
        return NO_ME;
    };
    let grid = Grid::new(game);
    let kiss = kiss_states(game, &grid, idx, legal_moves(game, &grid, idx));
    let moves: Vec<Direction> = (0..game.snakes.len())
        .map(|i| if i == idx { d } else { default_move(game, &grid, i) })
        .collect();

    let mut next = game.clone();
    next.advance(&moves);

    let prior = PriorKiss::of(&kiss, d);
    let prior_health = Some(game.snakes[idx].health);
    if next.snakes.is_empty() && game.snakes.len() > 1 {
        let other = game.snakes.iter().find(|s| s.id != me);
        debug!("{me} {d:?}: no survivors, synthesize a tie");
        determine_eval_no_snakes(&next, &game.snakes[idx], other, ctx)
    } else {
        evaluate(&next, me, prior, prior_health, ctx)
    }
}

/// Evaluates a snapshot in which every snake died.
///
/// The snake `me` and optionally one opponent are placed on a neutral
/// board at mirrored positions around the center of the hazard free area.
/// The score of that board is discounted, so that an engineered tie is
/// never preferred over a comparable live state.
pub fn determine_eval_no_snakes(
    game: &Game,
    me: &Snake,
    other: Option<&Snake>,
    ctx: &EvalContext,
) -> f64 {
    let synth = synthesize_tie(game, me, other, &ctx.hazard_walls);
    let score = evaluate(&synth, &me.id, PriorKiss::default(), None, ctx);
    score - ctx.config.tie_discount * score.abs()
}

/// Builds the neutral snapshot for [`determine_eval_no_snakes`].
///
/// The heads are mirrored four cells apart around the center of the hazard
/// free area, along its first axis that is at least five cells long. If the
/// area is smaller the heads are spread over the whole board instead. The
/// bodies extend away from each other and are stacked at the border.
pub fn synthesize_tie(
    game: &Game,
    me: &Snake,
    other: Option<&Snake>,
    walls: &HazardWalls,
) -> Game {
    let (min, max) = walls.safe_bounds(game.width, game.height);
    let (w, h) = (game.width as i16, game.height as i16);
    let center = Vec2D::new((min.x + max.x) / 2, (min.y + max.y) / 2);

    let wide = max.x - min.x >= 4;
    let tall = max.y - min.y >= 4;
    let horizontal = wide || (!tall && w >= h);
    let (lo, hi) = match (horizontal, wide, tall) {
        (true, true, _) => (min.x, max.x),
        (true, false, _) => (0, w - 1),
        (false, _, true) => (min.y, max.y),
        (false, _, false) => (0, h - 1),
    };
    let c = if horizontal { center.x } else { center.y };
    let (a, b) = mirrored(lo, hi, c);

    let place = |snake: &Snake, head: i16, step: i16| {
        let body = (0..snake.len().max(1) as i16).map(|i| {
            if horizontal {
                Vec2D::new(head, (center.y - i).max(min.y))
            } else {
                Vec2D::new(center.x, (head + step * i).clamp(lo, hi))
            }
        });
        Snake {
            id: snake.id.clone(),
            name: snake.name.clone(),
            health: snake.health,
            body: body.collect(),
        }
    };

    let mut synth = game.clone();
    synth.snakes.clear();
    synth.snakes.push(place(me, a, -1));
    if let Some(other) = other {
        synth.snakes.push(place(other, b, 1));
    }
    let occupied: Vec<Vec2D> = synth
        .snakes
        .iter()
        .flat_map(|s| s.body.iter().copied())
        .collect();
    synth.food.retain(|p| !occupied.contains(p));
    synth
}

/// Two coordinates in `lo..=hi` that are four apart around `c`, or as far
/// apart as the range allows.
fn mirrored(lo: i16, hi: i16, c: i16) -> (i16, i16) {
    let b = ((c - 2).max(lo) + 4).min(hi);
    ((b - 4).max(lo), b)
}

/// A heuristic that evaluates the game state at the leafs of a tree search.
pub trait Heuristic: Debug + Clone + Send + Sync + 'static {
    fn eval(&self, game: &Game, me: &str) -> f64;

    /// Evaluates a state that was reached by a known move of `me`.
    ///
    /// `prior` are the kiss states of that move and `prior_health` the health
    /// before it. Heuristics that do not score the move itself fall back to
    /// [`Heuristic::eval`].
    fn eval_after(
        &self,
        game: &Game,
        me: &str,
        _prior: PriorKiss,
        _prior_health: Option<u8>,
    ) -> f64 {
        self.eval(game, me)
    }
}

/// Composite evaluation with the per game metadata of the search driver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticalHeuristic {
    pub config: EvalConfig,
    pub hazard_walls: HazardWalls,
    pub lookahead: u16,
}

impl TacticalHeuristic {
    pub fn new(config: EvalConfig, meta: &GameMeta) -> Self {
        Self {
            config,
            hazard_walls: meta.hazard_walls,
            lookahead: meta.lookahead,
        }
    }

    fn context(&self) -> EvalContext<'_> {
        EvalContext {
            config: &self.config,
            hazard_walls: self.hazard_walls,
            lookahead: self.lookahead,
        }
    }
}

impl Heuristic for TacticalHeuristic {
    fn eval(&self, game: &Game, me: &str) -> f64 {
        evaluate(game, me, PriorKiss::default(), None, &self.context())
    }

    fn eval_after(&self, game: &Game, me: &str, prior: PriorKiss, prior_health: Option<u8>) -> f64 {
        evaluate(game, me, prior, prior_health, &self.context())
    }
}
