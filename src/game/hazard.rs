use serde::{Deserialize, Serialize};

use super::Game;
use crate::env::{Direction, Vec2D};

/// Boundaries of the hazard region that grows from the board edges.
///
/// Each side holds the innermost coordinate of the run of fully hazardous
/// columns (or rows) starting at that edge, `None` if the outermost column
/// (or row) is not entirely hazardous.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HazardWalls {
    pub left: Option<i16>,
    pub right: Option<i16>,
    pub up: Option<i16>,
    pub down: Option<i16>,
}

impl HazardWalls {
    pub fn from_game(game: &Game) -> HazardWalls {
        let (w, h) = (game.width as i16, game.height as i16);
        if game.hazards.is_empty() || w == 0 || h == 0 {
            return HazardWalls::default();
        }
        let mut hazard = vec![false; game.width * game.height];
        for p in &game.hazards {
            if game.has(*p) {
                hazard[p.x as usize + p.y as usize * game.width] = true;
            }
        }
        let at = |x: i16, y: i16| hazard[x as usize + y as usize * game.width];
        let column = |x: i16| (0..h).all(|y| at(x, y));
        let row = |y: i16| (0..w).all(|x| at(x, y));

        // Innermost line of the run starting with the first element
        fn run(mut lines: impl Iterator<Item = i16>, full: impl Fn(i16) -> bool) -> Option<i16> {
            let mut last = None;
            for i in &mut lines {
                if !full(i) {
                    break;
                }
                last = Some(i);
            }
            last
        }

        HazardWalls {
            left: run(0..w, column),
            right: run((0..w).rev(), column),
            down: run(0..h, row),
            up: run((0..h).rev(), row),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == HazardWalls::default()
    }

    /// Inclusive box of cells that are not part of a hazard wall.
    ///
    /// If the walls cover the whole board the box collapses onto the middle
    /// of the hazard free remainder instead of inverting.
    pub fn safe_bounds(&self, width: usize, height: usize) -> (Vec2D, Vec2D) {
        fn bounds(low: Option<i16>, high: Option<i16>, size: i16) -> (i16, i16) {
            let min = low.map_or(0, |l| l + 1);
            let max = high.map_or(size - 1, |h| h - 1);
            if min <= max {
                (min, max)
            } else {
                let mid = ((min + max) / 2).clamp(0, size - 1);
                (mid, mid)
            }
        }
        let (min_x, max_x) = bounds(self.left, self.right, width as i16);
        let (min_y, max_y) = bounds(self.down, self.up, height as i16);
        (Vec2D::new(min_x, min_y), Vec2D::new(max_x, max_y))
    }

    /// Center of the hazard free box.
    pub fn center(&self, width: usize, height: usize) -> (f64, f64) {
        let (min, max) = self.safe_bounds(width, height);
        (
            (min.x + max.x) as f64 / 2.0,
            (min.y + max.y) as f64 / 2.0,
        )
    }

    /// The lines right next to the hazard walls, facing the safe area.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(4);
        if let Some(x) = self.left {
            edges.push(Edge::new(Direction::Right, x + 1));
        }
        if let Some(x) = self.right {
            edges.push(Edge::new(Direction::Left, x - 1));
        }
        if let Some(y) = self.down {
            edges.push(Edge::new(Direction::Up, y + 1));
        }
        if let Some(y) = self.up {
            edges.push(Edge::new(Direction::Down, y - 1));
        }
        edges
    }

    /// Returns if `p` lies directly next to a hazard wall.
    pub fn is_adjacent(&self, p: Vec2D) -> bool {
        self.edges().iter().any(|e| e.contains(p))
    }
}

/// A line along which a snake can be pinned, together with the direction
/// that leads away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub inward: Direction,
    pub line: i16,
}

impl Edge {
    pub const fn new(inward: Direction, line: i16) -> Edge {
        Edge { inward, line }
    }

    /// The four board edges.
    pub fn board(width: usize, height: usize) -> [Edge; 4] {
        [
            Edge::new(Direction::Right, 0),
            Edge::new(Direction::Left, width as i16 - 1),
            Edge::new(Direction::Up, 0),
            Edge::new(Direction::Down, height as i16 - 1),
        ]
    }

    pub fn contains(&self, p: Vec2D) -> bool {
        if self.inward.horizontal() {
            p.x == self.line
        } else {
            p.y == self.line
        }
    }

    /// Returns if moving in `d` follows this edge.
    pub fn is_parallel(&self, d: Direction) -> bool {
        d.horizontal() != self.inward.horizontal()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn walls_from_hazards() {
        let game = Game::parse(
            r#"
            x x x x x x
            x . . . . x
            x . . . . x
            x . . 0 . x
            x . . . . x
            x x x x x x"#,
        )
        .unwrap();
        let walls = HazardWalls::from_game(&game);
        assert_eq!(
            walls,
            HazardWalls {
                left: Some(0),
                right: Some(5),
                up: Some(5),
                down: Some(0),
            }
        );
        assert_eq!(
            walls.safe_bounds(6, 6),
            (Vec2D::new(1, 1), Vec2D::new(4, 4))
        );
        assert_eq!(walls.center(6, 6), (2.5, 2.5));
        assert!(walls.is_adjacent(Vec2D::new(1, 3)));
        assert!(!walls.is_adjacent(Vec2D::new(2, 2)));
    }

    #[test]
    fn walls_partial() {
        let game = Game::parse(
            r#"
            x x . . .
            x x . . .
            x x . . .
            x . . 0 .
            x x . . x"#,
        )
        .unwrap();
        let walls = HazardWalls::from_game(&game);
        assert_eq!(walls.left, Some(0));
        assert_eq!(walls.right, None);
        assert_eq!(walls.up, None);
        assert_eq!(walls.down, None);
        assert_eq!(walls.edges(), vec![Edge::new(Direction::Right, 1)]);
        assert_eq!(
            walls.safe_bounds(5, 5),
            (Vec2D::new(1, 0), Vec2D::new(4, 4))
        );
    }

    #[test]
    fn walls_cover_everything() {
        let mut game = Game::new(3, 3);
        for x in 0..3 {
            for y in 0..3 {
                game.hazards.push(Vec2D::new(x, y));
            }
        }
        let walls = HazardWalls::from_game(&game);
        let (min, max) = walls.safe_bounds(3, 3);
        assert!(min.x <= max.x && min.y <= max.y);
        assert!(min.within(3, 3) && max.within(3, 3));
    }

    #[test]
    fn board_edges() {
        let edges = Edge::board(11, 11);
        assert!(edges[0].contains(Vec2D::new(0, 3)));
        assert!(edges[0].is_parallel(Direction::Up));
        assert!(!edges[0].is_parallel(Direction::Left));
        assert!(edges[3].contains(Vec2D::new(4, 10)));
    }
}
