use std::fmt;

use super::{Game, Grid, Part};
use crate::env::Direction;

/// Set of directions a snake may move in.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveSet([bool; 4]);

impl MoveSet {
    pub const fn all() -> MoveSet {
        MoveSet([true; 4])
    }

    pub const fn none() -> MoveSet {
        MoveSet([false; 4])
    }

    #[inline]
    pub fn has(&self, d: Direction) -> bool {
        self.0[d as usize]
    }

    #[inline]
    pub fn disable(&mut self, d: Direction) {
        self.0[d as usize] = false;
    }

    #[inline]
    pub fn enable(&mut self, d: Direction) {
        self.0[d as usize] = true;
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::iter().filter(|&d| self.has(d))
    }

    /// Keeps only the directions for which `f` returns true.
    pub fn retain(&mut self, mut f: impl FnMut(Direction) -> bool) {
        for d in Direction::iter() {
            if self.has(d) && !f(d) {
                self.disable(d);
            }
        }
    }
}

impl FromIterator<Direction> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut moves = MoveSet::none();
        for d in iter {
            moves.enable(d);
        }
        moves
    }
}

impl fmt::Debug for MoveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Returns the moves of a snake that do not immediately kill it.
///
/// Each filter only narrows the set: walls, bodies (receding tails are
/// free), starvation and finally the own neck. Head to head collisions are
/// not considered.
pub fn legal_moves(game: &Game, grid: &Grid, snake: usize) -> MoveSet {
    let Some(you) = game.snakes.get(snake) else {
        return MoveSet::none();
    };
    let head = you.head();
    let mut moves = MoveSet::all();

    // Walls
    moves.retain(|d| game.neighbor(head, d).is_some());

    // Bodies
    moves.retain(|d| {
        game.neighbor(head, d)
            .map_or(false, |p| grid.passable(game, p))
    });

    // Starvation
    moves.retain(|d| {
        let Some(cell) = game.neighbor(head, d).and_then(|p| grid.get(p)) else {
            return false;
        };
        let damage = if cell.hazard {
            1 + game.rules.hazard_damage as i16
        } else {
            1
        };
        cell.food || game.rules.mode.constrictor || you.health as i16 - damage > 0
    });

    // Neck
    if let Some(neck) = you.neck() {
        moves.retain(|d| game.neighbor(head, d) != Some(neck));
    }

    moves
}

/// Returns a move for the snake that is always defined.
///
/// If there are no legal moves the constraints are relaxed step by step:
/// first any occupied cell that is on the board and not the neck, then any
/// cell on the board and finally any direction away from the neck.
pub fn default_move(game: &Game, grid: &Grid, snake: usize) -> Direction {
    if let Some(d) = legal_moves(game, grid, snake).iter().next() {
        return d;
    }
    let Some(you) = game.snakes.get(snake) else {
        return Direction::Up;
    };
    let head = you.head();
    let neck = you.neck();

    // Prefer cells that might still be free next turn
    let rank = |d: Direction| match game.neighbor(head, d).and_then(|p| grid.get(p)) {
        Some(cell) => match cell.occupant {
            None => 0,
            Some(seg) if seg.part == Part::Tail => 1,
            Some(seg) if seg.part == Part::Head => 2,
            Some(_) => 3,
        },
        None => 4,
    };

    let on_board = |d: &Direction| game.neighbor(head, *d).is_some();
    let not_neck = |d: &Direction| neck.is_none() || game.neighbor(head, *d) != neck;

    Direction::iter()
        .filter(on_board)
        .filter(not_neck)
        .min_by_key(|&d| rank(d))
        .or_else(|| Direction::iter().find(on_board))
        .or_else(|| Direction::iter().find(not_neck))
        .unwrap_or(Direction::Up)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Vec2D;
    use crate::game::Snake;
    use Direction::*;

    fn set(dirs: &[Direction]) -> MoveSet {
        dirs.iter().copied().collect()
    }

    #[test]
    fn legal_walls_and_neck() {
        let game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . . . .
            0 . . . .
            ^ . . . ."#,
        )
        .unwrap();
        let grid = Grid::new(&game);
        assert_eq!(legal_moves(&game, &grid, 0), set(&[Up, Right]));
    }

    #[test]
    fn legal_bodies_and_tails() {
        let game = Game::parse(
            r#"
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . v 1 < . .
            . . > 0 ^ . ."#,
        )
        .unwrap();
        let grid = Grid::new(&game);
        assert_eq!(game.snakes[0].tail(), Vec2D::new(2, 1));
        assert_eq!(game.snakes[1].tail(), Vec2D::new(4, 0));
        // both tails recede
        assert_eq!(legal_moves(&game, &grid, 0), set(&[Right]));
        assert_eq!(legal_moves(&game, &grid, 1), set(&[Up, Left]));
    }

    #[test]
    fn legal_stacked_tail() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . 0 < . .
            . 1 ^ . .
            . ^ . . .
            . ^ . . ."#,
        )
        .unwrap();
        let grid = Grid::new(&game);
        assert_eq!(game.snakes[0].tail(), Vec2D::new(2, 2));
        assert!(legal_moves(&game, &grid, 1).has(Right));

        // after eating it stays
        let tail = game.snakes[0].tail();
        game.snakes[0].body.push_back(tail);
        let grid = Grid::new(&game);
        assert!(!legal_moves(&game, &grid, 1).has(Right));
    }

    #[test]
    fn legal_starvation() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . . x . .
            x x 0 o .
            . . ^ . .
            . . ^ . ."#,
        )
        .unwrap();
        game.rules.hazard_damage = 14;
        game.snakes[0].health = 10;
        let grid = Grid::new(&game);
        assert_eq!(legal_moves(&game, &grid, 0), set(&[Right]));

        game.snakes[0].health = 16;
        assert_eq!(legal_moves(&game, &grid, 0), set(&[Up, Right, Left]));

        game.snakes[0].health = 1;
        assert_eq!(legal_moves(&game, &grid, 0), set(&[Right]));

        game.rules.mode.constrictor = true;
        assert_eq!(legal_moves(&game, &grid, 0), set(&[Up, Right, Left]));
    }

    #[test]
    fn legal_turn_zero() {
        let game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . 0 . .
            . . . . .
            . . . . ."#,
        )
        .unwrap();
        let grid = Grid::new(&game);
        assert_eq!(game.snakes[0].neck(), None);
        assert_eq!(legal_moves(&game, &grid, 0), MoveSet::all());
        assert_eq!(legal_moves(&game, &grid, 1), MoveSet::none());
    }

    #[test]
    fn default_move_relaxes() {
        let game = Game::parse(
            r#"
            1 < < .
            0 . ^ .
            ^ . ^ .
            ^ . ^ ."#,
        )
        .unwrap();
        let grid = Grid::new(&game);
        assert_eq!(default_move(&game, &grid, 0), Right);

        let game = Game::parse(
            r#"
            1 < . .
            0 ^ . .
            ^ ^ . .
            ^ . . ."#,
        )
        .unwrap();
        let grid = Grid::new(&game);
        assert!(legal_moves(&game, &grid, 0).is_empty());
        // the head of 1 might move away, its body will not
        assert_eq!(default_move(&game, &grid, 0), Up);
    }

    #[test]
    fn default_move_last_resort() {
        // only the neck is on the board
        let mut game = Game::new(1, 2);
        game.snakes.push(Snake::new("0", [Vec2D::new(0, 1), Vec2D::new(0, 0)], 100));
        let grid = Grid::new(&game);
        assert!(legal_moves(&game, &grid, 0).is_empty());
        assert_eq!(default_move(&game, &grid, 0), Down);

        // nothing is on the board
        let mut game = Game::new(1, 1);
        game.snakes.push(Snake::new("0", [Vec2D::new(0, 0); 3], 100));
        let grid = Grid::new(&game);
        assert!(legal_moves(&game, &grid, 0).is_empty());
        assert_eq!(default_move(&game, &grid, 0), Up);

        // unknown snake
        assert_eq!(default_move(&game, &grid, 4), Up);
    }
}
