use std::ops::{Index, IndexMut};

use owo_colors::OwoColorize;

use super::{Cell, Game, Segment};
use crate::env::Vec2D;

/// Random access index over a single board snapshot.
///
/// Every snapshot gets its own grid, cells are never shared between
/// snapshots. Coordinates outside of the board resolve to `None`.
#[derive(Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    pub fn empty(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Builds the index for the given snapshot.
    ///
    /// Snakes are stamped first (head to tail), then food, then hazards.
    /// The first occupant of a cell is kept, so the stacked tail of a snake
    /// that just ate is stamped as body.
    pub fn new(game: &Game) -> Grid {
        let mut grid = Grid::empty(game.width, game.height);
        for (i, snake) in game.snakes.iter().enumerate() {
            grid.add_snake(i as u8, snake.body.iter().copied());
        }
        grid.add_food(&game.food);
        grid.add_hazards(&game.hazards);
        grid
    }

    fn add_snake(&mut self, snake: u8, body: impl ExactSizeIterator<Item = Vec2D>) {
        let len = body.len();
        for (i, p) in body.enumerate() {
            if let Some(cell) = self.get_mut(p) {
                if cell.occupant.is_none() {
                    cell.occupant = Some(Segment::new(snake, i as u16, len));
                }
            }
        }
    }

    fn add_food(&mut self, food: &[Vec2D]) {
        for &p in food {
            if let Some(cell) = self.get_mut(p) {
                cell.food = true;
            }
        }
    }

    fn add_hazards(&mut self, hazards: &[Vec2D]) {
        for &p in hazards {
            if let Some(cell) = self.get_mut(p) {
                cell.hazard = true;
            }
        }
    }

    /// Returns if `p` is within the boundaries of this grid.
    #[inline]
    pub fn has(&self, p: Vec2D) -> bool {
        p.within(self.width, self.height)
    }

    #[inline]
    pub fn get(&self, p: Vec2D) -> Option<&Cell> {
        if self.has(p) {
            Some(&self.cells[p.x as usize + p.y as usize * self.width])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, p: Vec2D) -> Option<&mut Cell> {
        if self.has(p) {
            Some(&mut self.cells[p.x as usize + p.y as usize * self.width])
        } else {
            None
        }
    }

    /// Iterates over all coordinates and their cells.
    pub fn iter(&self) -> impl Iterator<Item = (Vec2D, &Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (Vec2D::new((i % width) as i16, (i / width) as i16), c))
    }

    /// Number of plies until the cell at `p` is no longer occupied.
    ///
    /// Free cells return 0, cells of constrictor snakes never vacate.
    pub fn vacates_in(&self, game: &Game, p: Vec2D) -> u16 {
        match self.get(p).and_then(|c| c.occupant) {
            None => 0,
            Some(_) if game.rules.mode.constrictor => u16::MAX,
            Some(seg) => {
                let len = game.snakes[seg.snake as usize].len() as u16;
                len.saturating_sub(seg.index)
            }
        }
    }

    /// Returns if the cell is free or occupied by a tail that recedes in the
    /// next ply.
    pub fn passable(&self, game: &Game, p: Vec2D) -> bool {
        match self.get(p) {
            Some(cell) => match cell.occupant {
                None => true,
                Some(seg) if cell.is_tail() => {
                    game.snakes[seg.snake as usize].tail_recedes(&game.rules)
                }
                Some(_) => false,
            },
            None => false,
        }
    }
}

impl Index<Vec2D> for Grid {
    type Output = Cell;

    fn index(&self, p: Vec2D) -> &Self::Output {
        assert!(self.has(p), "{:?} is not on the board", p);
        &self.cells[p.x as usize + p.y as usize * self.width]
    }
}

impl IndexMut<Vec2D> for Grid {
    fn index_mut(&mut self, p: Vec2D) -> &mut Self::Output {
        assert!(self.has(p), "{:?} is not on the board", p);
        &mut self.cells[p.x as usize + p.y as usize * self.width]
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {{")?;
        for y in (0..self.height as i16).rev() {
            write!(f, "  ")?;
            for x in 0..self.width as i16 {
                let cell = self[Vec2D::new(x, y)];
                if cell.hazard {
                    write!(f, "{:?} ", cell.on_bright_black())?;
                } else {
                    write!(f, "{:?} ", cell)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "}}")?;
        Ok(())
    }
}
