/// Which part of a snake occupies a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Part {
    Head,
    Body,
    /// Last snake body part
    Tail,
}

/// A snake segment stamped onto the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment {
    /// Index of the snake in the snapshot
    pub snake: u8,
    /// Position in the body, the head is 0
    pub index: u16,
    pub part: Part,
}

impl Segment {
    pub fn new(snake: u8, index: u16, len: usize) -> Segment {
        let part = if index == 0 {
            Part::Head
        } else if index as usize + 1 == len {
            Part::Tail
        } else {
            Part::Body
        };
        Segment { snake, index, part }
    }
}

/// Owners of a cell after the territory partitioning.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Territory {
    /// Bitmask of the owning snakes, more than one bit on ties
    pub owners: u32,
    /// Breadth first search depth at which the cell was claimed
    pub depth: u16,
}

impl Territory {
    pub fn new(snake: usize, depth: u16) -> Territory {
        Territory {
            owners: 1 << snake,
            depth,
        }
    }

    pub fn is_owned_by(&self, snake: usize) -> bool {
        self.owners & (1 << snake) != 0
    }

    pub fn owner_count(&self) -> u32 {
        self.owners.count_ones()
    }
}

/// Represents a single tile of the board.
///
/// A cell may be hazardous and occupied at the same time.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub occupant: Option<Segment>,
    pub food: bool,
    pub hazard: bool,
    pub territory: Option<Territory>,
}

impl Cell {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Returns the snake whose head is on this cell.
    pub fn head_of(&self) -> Option<usize> {
        match self.occupant {
            Some(Segment {
                snake,
                part: Part::Head,
                ..
            }) => Some(snake as usize),
            _ => None,
        }
    }

    pub fn is_tail(&self) -> bool {
        matches!(
            self.occupant,
            Some(Segment {
                part: Part::Tail,
                ..
            })
        )
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.occupant {
            Some(Segment {
                snake,
                part: Part::Head,
                ..
            }) => write!(f, "{}", snake),
            Some(Segment {
                part: Part::Tail, ..
            }) => write!(f, ","),
            Some(_) => write!(f, "#"),
            None if self.food => write!(f, "o"),
            None if self.hazard => write!(f, "x"),
            None => write!(f, "."),
        }
    }
}
