use std::collections::VecDeque;
use std::fmt::{self, Debug};

use log::debug;
use owo_colors::{OwoColorize, Style};

use super::{default_move, Grid};
use crate::env::{Direction, GameRequest, Ruleset, SnakeData, Vec2D};

pub const MAX_HEALTH: u8 = 100;

/// The outcome of a simulated game.
/// If the game did not end the outcome is `None`.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Outcome {
    None,
    Draw,
    Winner(String),
}

/// Ruleset flags that change movement or scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mode {
    /// Moving over an edge continues on the opposite side
    pub wrapped: bool,
    /// Every move counts as eating
    pub constrictor: bool,
    /// There are no opponents
    pub solo: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rules {
    pub mode: Mode,
    /// Additional damage per turn spent in a hazard
    pub hazard_damage: u8,
}

impl Rules {
    pub fn from_ruleset(ruleset: &Ruleset, snake_count: usize) -> Rules {
        let name = ruleset.name.to_lowercase();
        Rules {
            mode: Mode {
                wrapped: name.contains("wrapped"),
                constrictor: name.contains("constrictor"),
                solo: name.contains("solo") || snake_count <= 1,
            },
            hazard_damage: ruleset.settings.hazard_damage_per_turn.clamp(0, 100) as u8,
        }
    }
}

/// Reduced representation of a snake.
#[derive(Debug, Clone)]
pub struct Snake {
    pub id: String,
    pub name: String,
    pub health: u8,
    /// head to tail
    pub body: VecDeque<Vec2D>,
}

impl Snake {
    pub fn new(id: impl Into<String>, body: impl IntoIterator<Item = Vec2D>, health: u8) -> Snake {
        let id = id.into();
        Snake {
            name: id.clone(),
            id,
            health,
            body: body.into_iter().collect(),
        }
    }

    pub fn from(snake: &SnakeData) -> Snake {
        Snake {
            id: snake.id.clone(),
            name: snake.name.clone(),
            health: snake.health,
            body: snake.body.iter().copied().collect(),
        }
    }

    pub fn head(&self) -> Vec2D {
        self.body[0]
    }

    /// The body part behind the head, if it is not stacked below the head.
    pub fn neck(&self) -> Option<Vec2D> {
        self.body.get(1).copied().filter(|&p| p != self.head())
    }

    pub fn tail(&self) -> Vec2D {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns if the tail cell is freed in the next ply.
    pub fn tail_recedes(&self, rules: &Rules) -> bool {
        let n = self.body.len();
        !rules.mode.constrictor && (n < 2 || self.body[n - 1] != self.body[n - 2])
    }
}

impl PartialEq for Snake {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Snake {}

/// Snapshot of the board.
///
/// Dead snakes are removed from `snakes`.
#[derive(Clone)]
pub struct Game {
    pub width: usize,
    pub height: usize,
    pub turn: usize,
    pub rules: Rules,
    pub food: Vec<Vec2D>,
    pub hazards: Vec<Vec2D>,
    pub snakes: Vec<Snake>,
}

impl Game {
    pub fn new(width: usize, height: usize) -> Game {
        Game {
            width,
            height,
            turn: 0,
            rules: Rules::default(),
            food: Vec::new(),
            hazards: Vec::new(),
            snakes: Vec::with_capacity(4),
        }
    }

    /// Loads the game state from the provided request.
    pub fn from_request(request: &GameRequest) -> Game {
        let snakes: Vec<Snake> = request
            .board
            .snakes
            .iter()
            .filter(|s| s.health > 0 && !s.body.is_empty())
            .map(Snake::from)
            .collect();
        Game {
            width: request.board.width,
            height: request.board.height,
            turn: request.turn,
            rules: Rules::from_ruleset(&request.game.ruleset, snakes.len()),
            food: request.board.food.clone(),
            hazards: request.board.hazards.clone(),
            snakes,
        }
    }

    pub fn has(&self, p: Vec2D) -> bool {
        p.within(self.width, self.height)
    }

    /// Returns the index of the snake with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.snakes.iter().position(|s| s.id == id)
    }

    pub fn snake(&self, id: &str) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }

    /// Returns the neighbor of `p` in the given direction.
    /// The coordinate is wrapped around the edges in wrapped mode and `None`
    /// if it leaves the board otherwise.
    pub fn neighbor(&self, p: Vec2D, d: Direction) -> Option<Vec2D> {
        let n = p.apply(d);
        if self.rules.mode.wrapped {
            let (w, h) = (self.width as i16, self.height as i16);
            Some(Vec2D::new(n.x.rem_euclid(w), n.y.rem_euclid(h)))
        } else if self.has(n) {
            Some(n)
        } else {
            None
        }
    }

    /// The direction that leads from `from` to its neighbor `to`.
    pub fn direction_to(&self, from: Vec2D, to: Vec2D) -> Option<Direction> {
        Direction::iter().find(|&d| self.neighbor(from, d) == Some(to))
    }

    /// Manhattan distance that takes wrapping into account.
    pub fn distance(&self, a: Vec2D, b: Vec2D) -> u64 {
        self.offset(a, b).manhattan()
    }

    /// Shortest vector from `from` to `to`, which may cross the edges in
    /// wrapped mode.
    pub fn offset(&self, from: Vec2D, to: Vec2D) -> Vec2D {
        let d = to - from;
        if !self.rules.mode.wrapped {
            return d;
        }
        fn shortest(v: i16, size: usize) -> i16 {
            let size = size.max(1) as i16;
            let v = v.rem_euclid(size);
            if v > size / 2 {
                v - size
            } else {
                v
            }
        }
        Vec2D::new(shortest(d.x, self.width), shortest(d.y, self.height))
    }

    /// Returns if the game has ended and which snake is the winner or if the
    /// game was a draw.
    pub fn outcome(&self) -> Outcome {
        match self.snakes.len() {
            0 => Outcome::Draw,
            1 if !self.rules.mode.solo => Outcome::Winner(self.snakes[0].id.clone()),
            _ => Outcome::None,
        }
    }

    /// Executes one simultaneous ply.
    ///
    /// `moves` contains the direction for each snake, in snapshot order.
    /// Missing moves and moves that would leave the board are replaced by
    /// the default move.
    pub fn advance(&mut self, moves: &[Direction]) {
        let mut grid = None;
        let mut heads = Vec::with_capacity(self.snakes.len());
        for (i, snake) in self.snakes.iter().enumerate() {
            let mut head = moves
                .get(i)
                .and_then(|&d| self.neighbor(snake.head(), d));
            if head.is_none() {
                let grid = grid.get_or_insert_with(|| Grid::new(self));
                let recovered = default_move(self, grid, i);
                debug!(
                    "turn {}: {} moved {:?} off board, retry with {:?}",
                    self.turn,
                    snake.id,
                    moves.get(i),
                    recovered
                );
                head = self.neighbor(snake.head(), recovered);
            }
            heads.push(head);
        }

        // Move heads, pop tails and feed
        let rules = self.rules;
        let mut eaten = Vec::new();
        for (snake, head) in self.snakes.iter_mut().zip(&heads) {
            let Some(head) = *head else {
                snake.health = 0;
                continue;
            };
            snake.body.push_front(head);
            snake.body.pop_back();

            let fed = self.food.contains(&head);
            if fed || rules.mode.constrictor {
                let tail = snake.tail();
                snake.body.push_back(tail);
                snake.health = MAX_HEALTH;
                if fed {
                    eaten.push(head);
                }
            } else {
                let damage = if self.hazards.contains(&head) {
                    1 + rules.hazard_damage
                } else {
                    1
                };
                snake.health = snake.health.saturating_sub(damage);
            }
        }
        self.food.retain(|p| !eaten.contains(p));

        // Starvation
        self.snakes.retain(|s| s.health > 0);

        // Collisions are resolved simultaneously
        let dead: Vec<bool> = self
            .snakes
            .iter()
            .enumerate()
            .map(|(i, snake)| {
                let head = snake.head();
                self.snakes.iter().enumerate().any(|(j, other)| {
                    other.body.iter().skip(1).any(|&p| p == head)
                        || (i != j && other.head() == head && other.len() >= snake.len())
                })
            })
            .collect();
        let mut dead = dead.into_iter();
        self.snakes.retain(|_| !dead.next().unwrap_or(false));

        self.turn += 1;
    }
}

impl Game {
    /// Parses textual human readable board representation used in test.
    ///
    /// Digits are heads, arrows are body parts pointing towards the head,
    /// `o` is food and `x` hazard.
    pub fn parse(txt: &str) -> Option<Game> {
        let txt = txt.trim();

        #[derive(PartialEq)]
        enum RawCell {
            Free,
            Food,
            Hazard,
            Head(u8),
            Body(Direction),
        }

        let raw_cells: Vec<RawCell> = txt
            .lines()
            .rev()
            .flat_map(|l| {
                l.split_whitespace().flat_map(|s| {
                    s.chars().next().map(|c| match c {
                        'o' => RawCell::Food,
                        'x' => RawCell::Hazard,
                        '0'..='9' => RawCell::Head(c as u8 - b'0'),
                        '^' => RawCell::Body(Direction::Up),
                        '>' => RawCell::Body(Direction::Right),
                        'v' => RawCell::Body(Direction::Down),
                        '<' => RawCell::Body(Direction::Left),
                        _ => RawCell::Free,
                    })
                })
            })
            .collect();
        let height = txt.lines().count();

        if height == 0 || raw_cells.len() % height != 0 {
            return None;
        }
        let width = raw_cells.len() / height;
        let pos = |i: usize| Vec2D::new((i % width) as _, (i / width) as _);

        let mut game = Game::new(width, height);
        for (i, cell) in raw_cells.iter().enumerate() {
            match cell {
                RawCell::Food => game.food.push(pos(i)),
                RawCell::Hazard => game.hazards.push(pos(i)),
                _ => {}
            }
        }

        for i in 0..=9 {
            let Some(p) = raw_cells.iter().position(|c| *c == RawCell::Head(i)) else {
                break;
            };
            let mut p = pos(p);
            let mut body = VecDeque::new();
            body.push_back(p);
            while let Some(next) = Direction::iter().find_map(|d| {
                let next = p.apply(d);
                (next.within(width, height)
                    && !body.contains(&next)
                    && raw_cells[next.x as usize + next.y as usize * width]
                        == RawCell::Body(d.invert()))
                .then_some(next)
            }) {
                p = next;
                body.push_back(p);
            }
            while body.len() < 3 {
                body.push_back(p);
            }
            game.snakes.push(Snake::new(i.to_string(), body, MAX_HEALTH));
        }
        game.rules.mode.solo = game.snakes.len() <= 1;

        Some(game)
    }
}

impl Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum FmtCell {
            Free,
            Food,
            Body(Direction, usize),
            Head(usize),
        }
        fn id_color(id: usize) -> Style {
            match id {
                0 => Style::new().green(),
                1 => Style::new().yellow(),
                2 => Style::new().blue(),
                3 => Style::new().magenta(),
                _ => Style::new().cyan(),
            }
        }
        impl Debug for FmtCell {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    FmtCell::Free => write!(f, "."),
                    FmtCell::Food => write!(f, "{}", "o".red()),
                    FmtCell::Body(dir, id) => match dir {
                        Direction::Up => write!(f, "{}", "^".style(id_color(*id))),
                        Direction::Right => write!(f, "{}", ">".style(id_color(*id))),
                        Direction::Down => write!(f, "{}", "v".style(id_color(*id))),
                        Direction::Left => write!(f, "{}", "<".style(id_color(*id))),
                    },
                    FmtCell::Head(id) => write!(f, "{}", id.style(id_color(*id))),
                }
            }
        }

        let mut cells = vec![(FmtCell::Free, false); self.width * self.height];
        let idx = |p: Vec2D| p.y as usize * self.width + p.x as usize;

        for &p in &self.food {
            if self.has(p) {
                cells[idx(p)].0 = FmtCell::Food;
            }
        }
        for &p in &self.hazards {
            if self.has(p) {
                cells[idx(p)].1 = true;
            }
        }

        for (id, snake) in self.snakes.iter().enumerate() {
            for (&part, &next) in snake.body.iter().skip(1).zip(snake.body.iter()) {
                if part != next && self.has(part) {
                    let dir = self.direction_to(part, next).unwrap_or(Direction::Up);
                    cells[idx(part)].0 = FmtCell::Body(dir, id);
                }
            }
            if self.has(snake.head()) {
                cells[idx(snake.head())].0 = FmtCell::Head(id);
            }
        }

        writeln!(f, "Game {{")?;
        for y in (0..self.height).rev() {
            write!(f, "  ")?;
            for x in 0..self.width {
                let (cell, hazard) = cells[y * self.width + x];
                if hazard {
                    write!(f, "{:?} ", cell.on_bright_black())?;
                } else {
                    write!(f, "{:?} ", cell)?;
                }
            }
            writeln!(f)?;
        }

        write!(f, "  Turn: {}, Snakes: [", self.turn)?;
        for (i, snake) in self.snakes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}: {} {}/{})", i, snake.id, snake.len(), snake.health)?;
        }
        writeln!(f, "]")?;
        writeln!(f, "}}")
    }
}
