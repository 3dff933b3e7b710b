use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// Board coordinate, the origin is the bottom left corner.
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vec2D {
    pub x: i16,
    pub y: i16,
}

impl Vec2D {
    pub const fn new(x: i16, y: i16) -> Vec2D {
        Vec2D { x, y }
    }

    pub fn apply(self, d: Direction) -> Vec2D {
        self + d.into()
    }

    pub fn manhattan(&self) -> u64 {
        self.x.unsigned_abs() as u64 + self.y.unsigned_abs() as u64
    }

    /// Returns if the coordinate lies on a board of the given size.
    #[inline]
    pub fn within(&self, width: usize, height: usize) -> bool {
        0 <= self.x && self.x < width as i16 && 0 <= self.y && self.y < height as i16
    }
}

impl From<(i16, i16)> for Vec2D {
    fn from(val: (i16, i16)) -> Self {
        Vec2D::new(val.0, val.1)
    }
}

impl From<Direction> for Vec2D {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Vec2D::new(0, 1),
            Direction::Right => Vec2D::new(1, 0),
            Direction::Down => Vec2D::new(0, -1),
            Direction::Left => Vec2D::new(-1, 0),
        }
    }
}

impl Add for Vec2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<i16> for Vec2D {
    type Output = Self;

    fn mul(self, k: i16) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
        }
    }
}

impl Neg for Vec2D {
    type Output = Vec2D;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn iter() -> impl Iterator<Item = Direction> {
        [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ]
        .into_iter()
    }

    pub fn invert(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Rotates clockwise by 90 degrees.
    pub fn rotate(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Returns if the direction moves along the x axis.
    pub fn horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }
}

impl From<Vec2D> for Direction {
    fn from(p: Vec2D) -> Direction {
        if p.x < 0 {
            Direction::Left
        } else if p.x > 0 {
            Direction::Right
        } else if p.y < 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

impl From<u8> for Direction {
    fn from(v: u8) -> Direction {
        match v % 4 {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GameData {
    pub id: String,
    #[serde(default)]
    pub ruleset: Ruleset,
    #[serde(default)]
    pub timeout: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub settings: RulesetSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesetSettings {
    pub food_spawn_chance: i64,
    pub minimum_food: i64,
    pub hazard_damage_per_turn: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SnakeData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub health: u8,
    /// head to tail
    pub body: Vec<Vec2D>,
    #[serde(default)]
    pub latency: serde_json::Value,
    #[serde(default)]
    pub shout: String,
}

impl PartialEq for SnakeData {
    fn eq(&self, rhs: &SnakeData) -> bool {
        self.id == rhs.id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Board {
    pub height: usize,
    pub width: usize,
    pub food: Vec<Vec2D>,
    #[serde(default)]
    pub hazards: Vec<Vec2D>,
    pub snakes: Vec<SnakeData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameRequest {
    pub game: GameData,
    pub turn: usize,
    pub board: Board,
    pub you: SnakeData,
}
