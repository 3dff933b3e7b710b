use super::{EvalContext, PriorKiss};
use crate::env::Vec2D;
use crate::game::{legal_moves, voronoi, Game, Grid, HazardWalls, MoveSet, Snake, VoronoiResult};
use crate::tactics::{kiss_states, KissStates, Tactics};

/// Everything the evaluation terms need, derived once per evaluation.
pub struct Signals<'a> {
    pub game: &'a Game,
    /// Index of the evaluated snake
    pub me: usize,
    pub walls: HazardWalls,
    pub lookahead: u16,
    pub grid: Grid,
    pub moves: MoveSet,
    pub kiss: KissStates,
    pub voronoi: Vec<VoronoiResult>,
    /// Traps we can force onto each snake
    pub offense: Vec<Tactics>,
    /// Traps each snake can force onto us
    pub defense: Vec<Tactics>,
    pub prior: PriorKiss,
    pub prior_health: Option<u8>,
}

impl<'a> Signals<'a> {
    /// Returns `None` if the snake `me` is not part of the game.
    pub fn new(
        game: &'a Game,
        me: &str,
        ctx: &EvalContext,
        prior: PriorKiss,
        prior_health: Option<u8>,
    ) -> Option<Signals<'a>> {
        let me = game.index_of(me)?;
        let walls = ctx.hazard_walls;
        let mut grid = Grid::new(game);

        let moves = legal_moves(game, &grid, me);
        let kiss = kiss_states(game, &grid, me, moves);
        let (offense, defense): (Vec<Tactics>, Vec<Tactics>) = (0..game.snakes.len())
            .map(|i| {
                if i == me {
                    (Tactics::default(), Tactics::default())
                } else {
                    (
                        Tactics::detect(game, &grid, &walls, me, i),
                        Tactics::detect(game, &grid, &walls, i, me),
                    )
                }
            })
            .unzip();
        let voronoi = voronoi(game, &mut grid);

        Some(Signals {
            game,
            me,
            walls,
            lookahead: ctx.lookahead,
            grid,
            moves,
            kiss,
            voronoi,
            offense,
            defense,
            prior,
            prior_health,
        })
    }

    pub fn you(&self) -> &Snake {
        &self.game.snakes[self.me]
    }

    pub fn head(&self) -> Vec2D {
        self.you().head()
    }

    pub fn opponents(&self) -> impl Iterator<Item = (usize, &Snake)> + '_ {
        self.game
            .snakes
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.me)
    }

    pub fn opponent_count(&self) -> usize {
        self.game.snakes.len() - 1
    }

    /// Exactly one opponent left in a multiplayer game.
    pub fn is_duel(&self) -> bool {
        !self.game.rules.mode.solo && self.game.snakes.len() == 2
    }

    pub fn area(&self) -> f64 {
        (self.game.width * self.game.height) as f64
    }

    /// Manhattan distance of the head to the center of the hazard free area.
    pub fn center_distance(&self) -> f64 {
        let (cx, cy) = self.walls.center(self.game.width, self.game.height);
        let head = self.head();
        (head.x as f64 - cx).abs() + (head.y as f64 - cy).abs()
    }

    /// Distance of `p` to the nearest board corner.
    pub fn corner_distance(&self, p: Vec2D) -> u64 {
        let (w, h) = (self.game.width as i16 - 1, self.game.height as i16 - 1);
        [
            Vec2D::new(0, 0),
            Vec2D::new(w, 0),
            Vec2D::new(0, h),
            Vec2D::new(w, h),
        ]
        .into_iter()
        .map(|c| (c - p).manhattan())
        .min()
        .unwrap_or_default()
    }
}
