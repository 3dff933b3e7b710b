use std::collections::BTreeMap;

use super::{Game, Grid, Territory};
use crate::env::{Direction, Vec2D};

/// Number of snakes that fit into the owner bitmask.
const MAX_SNAKES: usize = 32;

/// Territory claimed by a single snake.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoronoiResult {
    /// Claimed cells, hazards are weighted less and ties are split
    pub reachable: f64,
    /// Food discovered at each search depth
    pub food: BTreeMap<u16, Vec<Vec2D>>,
}

impl VoronoiResult {
    /// Number of claimed cells rounded up.
    pub fn cell_count(&self) -> usize {
        self.reachable.ceil() as usize
    }

    /// The nearest claimed food and its depth.
    pub fn closest_food(&self) -> Option<(u16, Vec2D)> {
        self.food
            .iter()
            .find_map(|(&depth, food)| food.first().map(|&p| (depth, p)))
    }

    /// Iterates over the claimed food up to the given depth.
    pub fn food_within(&self, depth: u16) -> impl Iterator<Item = (u16, Vec2D)> + '_ {
        self.food
            .range(..=depth)
            .flat_map(|(&d, food)| food.iter().map(move |&p| (d, p)))
    }
}

/// Weight of a hazardous cell without food.
pub fn hazard_weight(hazard_damage: u8) -> f64 {
    (1.0 - hazard_damage as f64 / 20.0).max(0.1)
}

/// Partitions the board among all snakes with a simultaneous breadth first
/// search from every head.
///
/// Cells are claimed by the snake that reaches them first, cells reached by
/// multiple snakes at the same depth are shared. Body segments block until
/// they have vacated. The territory is stored in the grid.
pub fn voronoi(game: &Game, grid: &mut Grid) -> Vec<VoronoiResult> {
    let count = game.snakes.len().min(MAX_SNAKES);

    let mut frontier = Vec::with_capacity(count);
    for (i, snake) in game.snakes.iter().take(count).enumerate() {
        let head = snake.head();
        if let Some(cell) = grid.get_mut(head) {
            match cell.territory {
                Some(ref mut t) => t.owners |= 1 << i,
                None => {
                    cell.territory = Some(Territory::new(i, 0));
                    frontier.push(head);
                }
            }
        }
    }

    // Cells that are blocked until a later depth
    let mut waiting: BTreeMap<u16, Vec<(Vec2D, u32)>> = BTreeMap::new();
    let mut depth = 0;
    while !frontier.is_empty() || !waiting.is_empty() {
        depth += 1;
        let mut next = Vec::new();

        if let Some(cells) = waiting.remove(&depth) {
            for (p, owners) in cells {
                claim(grid, p, owners, depth, &mut next);
            }
        }

        for &p in &frontier {
            let owners = grid[p].territory.map_or(0, |t| t.owners);
            for d in Direction::iter() {
                let Some(n) = game.neighbor(p, d) else {
                    continue;
                };
                if grid[n].territory.map_or(false, |t| t.depth < depth) {
                    continue;
                }
                let free_in = grid.vacates_in(game, n);
                if free_in <= depth {
                    claim(grid, n, owners, depth, &mut next);
                } else if free_in != u16::MAX {
                    waiting.entry(free_in).or_default().push((n, owners));
                }
            }
        }
        frontier = next;
    }

    let hazard = hazard_weight(game.rules.hazard_damage);
    let mut results = vec![VoronoiResult::default(); game.snakes.len()];
    for (p, cell) in grid.iter() {
        let Some(territory) = cell.territory else {
            continue;
        };
        let weight = if cell.hazard && !cell.food { hazard } else { 1.0 };
        let share = weight / territory.owner_count() as f64;
        for (i, result) in results.iter_mut().enumerate().take(count) {
            if territory.is_owned_by(i) {
                result.reachable += share;
                if cell.food {
                    result.food.entry(territory.depth).or_default().push(p);
                }
            }
        }
    }
    results
}

fn claim(grid: &mut Grid, p: Vec2D, owners: u32, depth: u16, next: &mut Vec<Vec2D>) {
    let cell = &mut grid[p];
    match cell.territory {
        Some(ref mut t) if t.depth == depth => t.owners |= owners,
        Some(_) => {}
        None => {
            cell.territory = Some(Territory { owners, depth });
            next.push(p);
        }
    }
}
