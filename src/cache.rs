//! Per game metadata owned by the search driver and score cache keys.

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::game::{Game, HazardWalls};

/// Metadata that is derived once per game and refreshed on every move.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameMeta {
    pub hazard_walls: HazardWalls,
    /// Search depth of the driver
    pub lookahead: u16,
    pub turn: usize,
    pub hazard_count: usize,
}

impl GameMeta {
    pub fn new(game: &Game, lookahead: u16) -> GameMeta {
        GameMeta {
            hazard_walls: HazardWalls::from_game(game),
            lookahead,
            turn: game.turn,
            hazard_count: game.hazards.len(),
        }
    }
}

type Key = (String, String);

/// Concurrency safe store of [`GameMeta`] keyed by game and snake id.
///
/// Entries are created on the first move, updated on each move and removed
/// at the end of the game.
#[derive(Debug, Default)]
pub struct GameCache {
    games: RwLock<HashMap<Key, GameMeta>>,
}

impl GameCache {
    pub fn new() -> GameCache {
        GameCache::default()
    }

    fn key(game_id: &str, snake_id: &str) -> Key {
        (game_id.to_string(), snake_id.to_string())
    }

    pub fn start(&self, game_id: &str, snake_id: &str, game: &Game, lookahead: u16) -> GameMeta {
        let meta = GameMeta::new(game, lookahead);
        info!("start {game_id} as {snake_id}: {meta:?}");
        self.games.write().insert(Self::key(game_id, snake_id), meta);
        meta
    }

    /// Refreshes the metadata for the next move.
    ///
    /// The hazard walls are only recomputed if the hazards changed. Unknown
    /// games are started with a lookahead of zero.
    pub fn update(&self, game_id: &str, snake_id: &str, game: &Game) -> GameMeta {
        let mut games = self.games.write();
        let meta = games
            .entry(Self::key(game_id, snake_id))
            .or_insert_with(|| GameMeta::new(game, 0));
        if meta.hazard_count != game.hazards.len() {
            meta.hazard_walls = HazardWalls::from_game(game);
            meta.hazard_count = game.hazards.len();
            debug!("{game_id}: hazard walls {:?}", meta.hazard_walls);
        }
        meta.turn = game.turn;
        *meta
    }

    pub fn set_lookahead(&self, game_id: &str, snake_id: &str, lookahead: u16) {
        if let Some(meta) = self.games.write().get_mut(&Self::key(game_id, snake_id)) {
            meta.lookahead = lookahead;
        }
    }

    pub fn get(&self, game_id: &str, snake_id: &str) -> Option<GameMeta> {
        self.games.read().get(&Self::key(game_id, snake_id)).copied()
    }

    pub fn end(&self, game_id: &str, snake_id: &str) -> Option<GameMeta> {
        let meta = self.games.write().remove(&Self::key(game_id, snake_id));
        info!("end {game_id} as {snake_id}");
        meta
    }

    pub fn len(&self) -> usize {
        self.games.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.read().is_empty()
    }
}

pub const MAX_FOOD_TIER: u8 = 4;
pub const MAX_HAZARD_TIER: u8 = 4;
pub const MAX_SNAKE_COUNT: u8 = 8;

/// Coarse description of a position used to look up cached scores.
///
/// Encoded as `length;food;hazard;snakes;depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub length: u16,
    pub food_tier: u8,
    pub hazard_tier: u8,
    pub snake_count: u8,
    pub depth: u16,
}

impl ScoreKey {
    pub fn new(game: &Game, me: &str, depth: u16) -> Option<ScoreKey> {
        let snake = game.snake(me)?;
        let area = (game.width * game.height).max(1);
        Some(ScoreKey {
            length: snake.len().min(u16::MAX as usize) as u16,
            food_tier: game.food.len().min(MAX_FOOD_TIER as usize) as u8,
            hazard_tier: (game.hazards.len() * MAX_HAZARD_TIER as usize / area)
                .min(MAX_HAZARD_TIER as usize) as u8,
            snake_count: game.snakes.len().clamp(1, MAX_SNAKE_COUNT as usize) as u8,
            depth,
        })
    }

    /// Parses an encoded key, `None` on any malformed or out of range field.
    pub fn parse(s: &str) -> Option<ScoreKey> {
        let mut fields = s.split(';');
        let mut next = || fields.next().map(str::trim);
        let key = ScoreKey {
            length: next()?.parse().ok()?,
            food_tier: next()?.parse().ok()?,
            hazard_tier: next()?.parse().ok()?,
            snake_count: next()?.parse().ok()?,
            depth: next()?.parse().ok()?,
        };
        if next().is_some()
            || key.food_tier > MAX_FOOD_TIER
            || key.hazard_tier > MAX_HAZARD_TIER
            || !(1..=MAX_SNAKE_COUNT).contains(&key.snake_count)
        {
            return None;
        }
        Some(key)
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{};{}",
            self.length, self.food_tier, self.hazard_tier, self.snake_count, self.depth
        )
    }
}
