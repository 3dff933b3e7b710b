use serde::{Deserialize, Serialize};

use super::is_faceoff;
use crate::env::{Direction, Vec2D};
use crate::game::{legal_moves, Cell, Game, Grid, MoveSet};

/// Risk of being eaten by a longer (or equally long) head after a move.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KissOfDeath {
    #[default]
    No,
    Certainty,
    /// Equally long opponent, both would die
    CertaintyMutual,
    Maybe,
    MaybeMutual,
    /// The only unthreatened move out of three
    ThreeToOneAvoidance,
    /// Two unthreatened moves out of three
    ThreeToTwoAvoidance,
    /// The only unthreatened move out of two
    TwoToOneAvoidance,
}

impl KissOfDeath {
    pub fn is_certain(self) -> bool {
        matches!(self, KissOfDeath::Certainty | KissOfDeath::CertaintyMutual)
    }

    fn hunted(certain: bool, mutual: bool) -> KissOfDeath {
        match (certain, mutual) {
            (true, false) => KissOfDeath::Certainty,
            (true, true) => KissOfDeath::CertaintyMutual,
            (false, false) => KissOfDeath::Maybe,
            (false, true) => KissOfDeath::MaybeMutual,
        }
    }
}

/// Chance of eating a shorter head after a move.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KissOfMurder {
    #[default]
    No,
    Certainty,
    Maybe,
    /// The prey escapes but would end up in a faceoff
    Faceoff,
    /// The prey can avoid the kill
    Avoidance,
}

impl KissOfMurder {
    pub fn rank(self) -> u8 {
        match self {
            KissOfMurder::No => 0,
            KissOfMurder::Avoidance => 1,
            KissOfMurder::Faceoff => 2,
            KissOfMurder::Maybe => 3,
            KissOfMurder::Certainty => 4,
        }
    }
}

/// Kiss classification of all four directions of one snake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KissStates {
    pub death: [KissOfDeath; 4],
    pub murder: [KissOfMurder; 4],
    /// The snake that might be eaten in each direction
    pub prey: [Option<usize>; 4],
}

impl KissStates {
    pub fn death(&self, d: Direction) -> KissOfDeath {
        self.death[d as usize]
    }

    pub fn murder(&self, d: Direction) -> KissOfMurder {
        self.murder[d as usize]
    }

    pub fn prey(&self, d: Direction) -> Option<usize> {
        self.prey[d as usize]
    }
}

/// An opposing head next to a candidate cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadNeighbor {
    pub snake: usize,
    pub len: usize,
}

/// Opposing heads around the cell a snake would move to.
///
/// The cell the snake comes from is excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborBundle {
    pub pos: Vec2D,
    pub heads: Vec<HeadNeighbor>,
}

impl NeighborBundle {
    pub fn new(game: &Game, grid: &Grid, me: usize, d: Direction) -> Option<NeighborBundle> {
        let head = game.snakes.get(me)?.head();
        let pos = game.neighbor(head, d)?;
        let mut heads = Vec::new();
        for n in Direction::iter() {
            let Some(p) = game.neighbor(pos, n) else {
                continue;
            };
            if p == head {
                continue;
            }
            if let Some(snake) = grid.get(p).and_then(Cell::head_of) {
                if snake != me && !heads.iter().any(|h: &HeadNeighbor| h.snake == snake) {
                    let len = game.snakes[snake].len();
                    heads.push(HeadNeighbor { snake, len });
                }
            }
        }
        Some(NeighborBundle { pos, heads })
    }

    /// Heads that would win (or tie) a head to head against `len`.
    pub fn hunters(&self, len: usize) -> impl Iterator<Item = &HeadNeighbor> + '_ {
        self.heads.iter().filter(move |h| h.len >= len)
    }

    /// Heads that would lose a head to head against `len`.
    pub fn prey(&self, len: usize) -> impl Iterator<Item = &HeadNeighbor> + '_ {
        self.heads.iter().filter(move |h| h.len < len)
    }
}

/// Classifies the legal `moves` of snake `me` by the head to head threats
/// and opportunities they lead to.
pub fn kiss_states(game: &Game, grid: &Grid, me: usize, moves: MoveSet) -> KissStates {
    let mut states = KissStates::default();
    let Some(you) = game.snakes.get(me) else {
        return states;
    };
    let len = you.len();

    let bundles: Vec<(Direction, NeighborBundle)> = moves
        .iter()
        .filter_map(|d| NeighborBundle::new(game, grid, me, d).map(|b| (d, b)))
        .collect();
    if bundles.iter().all(|(_, b)| b.heads.is_empty()) {
        return states;
    }
    let others: Vec<MoveSet> = (0..game.snakes.len())
        .map(|i| legal_moves(game, grid, i))
        .collect();

    // Returns if the snake may move into `p` and if that is its only option
    let can_enter = |snake: usize, p: Vec2D| -> (bool, bool) {
        let moves = others[snake];
        let into = game
            .direction_to(game.snakes[snake].head(), p)
            .map_or(false, |d| moves.has(d));
        (into, into && moves.count() == 1)
    };

    // Death
    let hunted: Vec<(Direction, bool, bool)> = bundles
        .iter()
        .filter_map(|(d, bundle)| {
            let mut found = false;
            let mut certain = false;
            let mut mutual = true;
            for hunter in bundle.hunters(len) {
                found = true;
                certain |= can_enter(hunter.snake, bundle.pos).1;
                mutual &= hunter.len == len;
            }
            found.then_some((*d, certain, mutual))
        })
        .collect();

    match hunted.len() {
        0 => {}
        1 => {
            let (d, _, mutual) = hunted[0];
            states.death[d as usize] = KissOfDeath::hunted(true, mutual);
            let escape = if moves.count() >= 3 {
                KissOfDeath::ThreeToTwoAvoidance
            } else {
                KissOfDeath::TwoToOneAvoidance
            };
            for other in moves.iter().filter(|&o| o != d) {
                states.death[other as usize] = escape;
            }
        }
        _ => {
            for &(d, certain, mutual) in &hunted {
                states.death[d as usize] = KissOfDeath::hunted(certain, mutual);
            }
            for other in moves.iter().filter(|&o| hunted.iter().all(|h| h.0 != o)) {
                states.death[other as usize] = KissOfDeath::ThreeToOneAvoidance;
            }
        }
    }

    // Murder
    let destinations: Vec<Vec2D> = bundles.iter().map(|(_, b)| b.pos).collect();
    for (d, bundle) in &bundles {
        for prey in bundle.prey(len) {
            if !can_enter(prey.snake, bundle.pos).0 {
                continue;
            }
            let prey_head = game.snakes[prey.snake].head();
            let prey_moves = others[prey.snake];
            let contested = prey_moves.iter().all(|m| {
                game.neighbor(prey_head, m)
                    .map_or(false, |p| destinations.contains(&p))
            });
            let grade = match prey_moves.count() {
                1 => KissOfMurder::Certainty,
                2 if contested => KissOfMurder::Maybe,
                _ if is_faceoff(game, grid, me, prey.snake) => KissOfMurder::Faceoff,
                _ => KissOfMurder::Avoidance,
            };
            if grade.rank() > states.murder[*d as usize].rank() {
                states.murder[*d as usize] = grade;
                states.prey[*d as usize] = Some(prey.snake);
            }
        }
    }

    states
}
