use crate::env::{Direction, Vec2D};
use crate::game::{legal_moves, Edge, Game, Grid, HazardWalls, Part};

/// Trapping maneuvers an actor can force onto a target this turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tactics {
    pub cutoff: bool,
    pub hazard_cutoff: bool,
    pub sandwich: bool,
    pub faceoff: bool,
}

impl Tactics {
    pub fn detect(
        game: &Game,
        grid: &Grid,
        walls: &HazardWalls,
        actor: usize,
        target: usize,
    ) -> Tactics {
        Tactics {
            cutoff: is_cutoff(game, grid, actor, target),
            hazard_cutoff: is_hazard_cutoff(game, grid, walls, actor, target),
            sandwich: is_sandwich(game, grid, actor, target),
            faceoff: is_faceoff(game, grid, actor, target),
        }
    }

    pub fn any(&self) -> bool {
        self.cutoff || self.hazard_cutoff || self.sandwich || self.faceoff
    }
}

/// Direction of the last move of a snake, `None` before its first move.
pub fn heading(game: &Game, snake: usize) -> Option<Direction> {
    let snake = game.snakes.get(snake)?;
    game.direction_to(snake.neck()?, snake.head())
}

/// Returns if the actor can pin the target against a board edge.
///
/// The target has to move along the edge while the actor either already
/// occupies the escape lane diagonally in front of it or is level with it
/// and long enough to win a head to head in the lane. Never true in wrapped
/// games.
pub fn is_cutoff(game: &Game, grid: &Grid, actor: usize, target: usize) -> bool {
    !game.rules.mode.wrapped
        && actor != target
        && Edge::board(game.width, game.height)
            .into_iter()
            .any(|edge| is_cutoff_along(game, grid, edge, actor, target))
}

/// Same as [`is_cutoff`] but against the edges of the hazard walls.
pub fn is_hazard_cutoff(
    game: &Game,
    grid: &Grid,
    walls: &HazardWalls,
    actor: usize,
    target: usize,
) -> bool {
    game.rules.hazard_damage > 0
        && actor != target
        && walls
            .edges()
            .into_iter()
            .any(|edge| is_cutoff_along(game, grid, edge, actor, target))
}

fn is_cutoff_along(game: &Game, grid: &Grid, edge: Edge, actor: usize, target: usize) -> bool {
    let (Some(a), Some(t)) = (game.snakes.get(actor), game.snakes.get(target)) else {
        return false;
    };
    let Some(travel) = heading(game, target) else {
        return false;
    };
    let head = t.head();
    if !edge.is_parallel(travel) || !edge.contains(head) {
        return false;
    }
    let Some(lane) = game.neighbor(head, edge.inward) else {
        return false;
    };

    // A third snake already blocks the lane
    if let Some(seg) = grid.get(lane).and_then(|c| c.occupant) {
        let owner = seg.snake as usize;
        if owner != actor && owner != target && seg.part != Part::Tail {
            return false;
        }
    }

    // The actor has to keep moving along the edge
    let Some(ahead) = game.neighbor(a.head(), travel) else {
        return false;
    };
    if !grid.passable(game, ahead) {
        return false;
    }

    if game.neighbor(lane, travel) == Some(a.head()) {
        true
    } else if a.head() == lane {
        a.len() > t.len() + food_ahead(game, head, travel)
    } else {
        false
    }
}

/// Food the snake could pick up when following `d` from `p`.
fn food_ahead(game: &Game, mut p: Vec2D, d: Direction) -> usize {
    let mut count = 0;
    for _ in 0..game.width.max(game.height) {
        let Some(next) = game.neighbor(p, d) else {
            break;
        };
        if game.food.contains(&next) {
            count += 1;
        }
        p = next;
    }
    count
}

/// Returns if the actor and another snake flank the target on opposite
/// sides and can both follow it.
pub fn is_sandwich(game: &Game, grid: &Grid, actor: usize, target: usize) -> bool {
    if actor == target || game.snakes.len() < 3 {
        return false;
    }
    let Some(t) = game.snakes.get(target) else {
        return false;
    };
    let Some(travel) = heading(game, target) else {
        return false;
    };
    let target_moves = legal_moves(game, grid, target).count();
    let along_axis = Vec2D::from(travel);
    let side_axis = Vec2D::from(travel.rotate());

    // Side of the target the snake flanks if it is in position
    let flank = |s: usize| -> Option<i16> {
        let snake = game.snakes.get(s)?;
        let offset = game.offset(t.head(), snake.head());
        let along = offset.x * along_axis.x + offset.y * along_axis.y;
        let side = offset.x * side_axis.x + offset.y * side_axis.y;
        let placed = match along {
            0 => true,
            -1 => snake.len() > t.len(),
            1 => target_moves <= 1,
            _ => false,
        };
        (side.abs() == 1 && placed && legal_moves(game, grid, s).has(travel)).then_some(side)
    };

    let Some(side) = flank(actor) else {
        return false;
    };
    (0..game.snakes.len())
        .filter(|&s| s != actor && s != target)
        .any(|s| flank(s) == Some(-side))
}

/// Returns if the longer actor faces the target with one free cell between
/// their heads and the target cannot move directly away.
pub fn is_faceoff(game: &Game, grid: &Grid, actor: usize, target: usize) -> bool {
    let (Some(a), Some(t)) = (game.snakes.get(actor), game.snakes.get(target)) else {
        return false;
    };
    if actor == target || a.len() <= t.len() {
        return false;
    }
    let Some(toward) = Direction::iter().find(|&d| {
        game.neighbor(t.head(), d)
            .and_then(|p| game.neighbor(p, d))
            == Some(a.head())
    }) else {
        return false;
    };
    let moves = legal_moves(game, grid, target);
    moves.has(toward) && !moves.has(toward.invert())
}
