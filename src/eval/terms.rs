//! Independent scoring terms, summed onto the base score.

use super::{EvalConfig, MurderWeights, Signals};
use crate::game::MAX_HEALTH;
use crate::tactics::{KissOfMurder, Tactics};

pub type Term = fn(&Signals, &EvalConfig) -> f64;

/// All terms in evaluation order.
pub const TERMS: &[(&str, Term)] = &[
    ("solo_win", solo_win),
    ("opponents", opponents),
    ("walls", walls),
    ("hazards", hazards),
    ("center", center),
    ("duel_starvation", duel_starvation),
    ("kiss_death", kiss_death),
    ("kiss_murder", kiss_murder),
    ("prior_kiss", prior_kiss),
    ("moves", moves),
    ("length", length),
    ("health", health),
    ("food", food),
    ("king", king),
    ("enemy_corner", enemy_corner),
    ("tail_chase", tail_chase),
    ("space", space),
    ("trapped", trapped),
    ("tactics", tactics),
];

/// We outlived every opponent.
pub fn solo_win(s: &Signals, c: &EvalConfig) -> f64 {
    if !s.game.rules.mode.solo && s.game.snakes.len() == 1 {
        c.solo_win
    } else {
        0.0
    }
}

pub fn opponents(s: &Signals, c: &EvalConfig) -> f64 {
    if s.game.rules.mode.solo {
        return 0.0;
    }
    -(0..s.opponent_count())
        .map(|k| (c.opponent - k as f64 * c.opponent_step).max(c.opponent_floor))
        .sum::<f64>()
}

pub fn walls(s: &Signals, c: &EvalConfig) -> f64 {
    if s.game.rules.mode.wrapped {
        return 0.0;
    }
    let head = s.head();
    let x_edge = head.x == 0 || head.x == s.game.width as i16 - 1;
    let y_edge = head.y == 0 || head.y == s.game.height as i16 - 1;
    match (x_edge, y_edge) {
        (true, true) => -c.corner,
        (true, false) | (false, true) => -c.wall,
        _ => 0.0,
    }
}

pub fn hazards(s: &Signals, c: &EvalConfig) -> f64 {
    if s.game.rules.hazard_damage == 0 {
        return 0.0;
    }
    let head = s.head();
    let mut delta = 0.0;
    if s.grid.get(head).map_or(false, |cell| cell.hazard) {
        delta -= c.in_hazard;
    }
    if s.walls.is_adjacent(head) {
        delta -= c.hazard_wall;
    }
    delta
}

pub fn center(s: &Signals, c: &EvalConfig) -> f64 {
    if s.game.rules.mode.wrapped {
        return 0.0;
    }
    -c.center * s.center_distance()
}

/// Reward a starving opponent in the endgame.
pub fn duel_starvation(s: &Signals, c: &EvalConfig) -> f64 {
    if !s.is_duel() {
        return 0.0;
    }
    s.opponents()
        .map(|(_, o)| c.duel_starvation_health.saturating_sub(o.health) as f64)
        .sum::<f64>()
        * c.duel_starvation
}

/// Penalty of the safest legal move.
pub fn kiss_death(s: &Signals, c: &EvalConfig) -> f64 {
    s.moves
        .iter()
        .map(|d| c.death.penalty(s.kiss.death(d)))
        .min_by(f64::total_cmp)
        .map_or(0.0, |p| -p)
}

/// Best kill opportunity that is not certain suicide.
pub fn kiss_murder(s: &Signals, c: &EvalConfig) -> f64 {
    s.moves
        .iter()
        .filter(|&d| !s.kiss.death(d).is_certain())
        .map(|d| {
            let grade = s.kiss.murder(d);
            let traps = s.kiss.prey(d).map(|p| s.offense[p]).unwrap_or_default();
            murder_reward(&c.murder, grade, traps)
        })
        .max_by(f64::total_cmp)
        .unwrap_or(0.0)
}

/// Reward of a kill grade.
///
/// An avoidable kill is raised if the prey would escape into a trap. The
/// traps are checked in a fixed order and each may only raise the reward.
pub fn murder_reward(weights: &MurderWeights, grade: KissOfMurder, traps: Tactics) -> f64 {
    let mut reward = weights.reward(grade);
    if grade == KissOfMurder::Avoidance {
        if traps.cutoff {
            reward = reward.max(weights.avoid_into_cutoff);
        }
        if traps.hazard_cutoff {
            reward = reward.max(weights.avoid_into_hazard_cutoff);
        }
        if traps.sandwich {
            reward = reward.max(weights.avoid_into_sandwich);
        }
        if traps.faceoff {
            reward = reward.max(weights.avoid_into_faceoff);
        }
    }
    reward
}

/// Kiss states of the move that lead to this state.
pub fn prior_kiss(s: &Signals, c: &EvalConfig) -> f64 {
    c.prior_murder.reward(s.prior.murder) - c.prior_death.penalty(s.prior.death)
}

pub fn moves(s: &Signals, c: &EvalConfig) -> f64 {
    c.moves[s.moves.count().min(4)]
}

pub fn length(s: &Signals, c: &EvalConfig) -> f64 {
    c.length * s.you().len() as f64
}

/// Step function over the turns we survive with the current health.
pub fn health(s: &Signals, c: &EvalConfig) -> f64 {
    let you = s.you();
    let in_hazard = s.grid.get(you.head()).map_or(false, |cell| cell.hazard);
    let per_turn = if in_hazard {
        1 + s.game.rules.hazard_damage as u16
    } else {
        1
    };
    let survivable = you.health as u16 / per_turn;

    let w = &c.health;
    let mut delta = w
        .tiers
        .iter()
        .zip(&w.rewards)
        .find(|&(&tier, _)| survivable >= tier)
        .map_or(-w.starving, |(_, &reward)| reward);

    if !s.game.rules.mode.constrictor && you.health == MAX_HEALTH {
        if let Some(prior) = s.prior_health.filter(|&p| p < MAX_HEALTH) {
            delta += w.just_ate * (MAX_HEALTH - prior) as f64 / MAX_HEALTH as f64;
        }
    }
    delta
}

/// Nearby food in our territory, closer food is worth more.
pub fn food(s: &Signals, c: &EvalConfig) -> f64 {
    if s.game.rules.mode.constrictor {
        return 0.0;
    }
    let limit = s.lookahead.saturating_add(c.food_margin);
    let value: f64 = s.voronoi[s.me]
        .food_within(limit)
        .map(|(depth, p)| {
            let mut value = 1.0 / depth.max(1) as f64;
            if s.corner_distance(p) == 0 {
                value *= c.food_corner;
            }
            if s.grid.get(p).map_or(false, |cell| cell.hazard) {
                value *= c.food_hazard;
            }
            value
        })
        .sum();
    let hunger = 1.0 - s.you().health as f64 / (2.0 * MAX_HEALTH as f64);
    c.food * hunger * value
}

/// The largest snake claims the center.
pub fn king(s: &Signals, c: &EvalConfig) -> f64 {
    if s.game.rules.mode.wrapped {
        return 0.0;
    }
    let Some(longest) = s.opponents().map(|(_, o)| o.len()).max() else {
        return 0.0;
    };
    if s.you().len() >= longest + c.king_margin {
        -c.king * s.center_distance()
    } else {
        0.0
    }
}

/// Being close to a corner with enemies nearby.
pub fn enemy_corner(s: &Signals, c: &EvalConfig) -> f64 {
    if s.game.rules.mode.wrapped || s.corner_distance(s.head()) > 2 {
        return 0.0;
    }
    let head = s.head();
    if s.opponents()
        .any(|(_, o)| s.game.distance(o.head(), head) <= c.enemy_corner_distance)
    {
        -c.enemy_corner
    } else {
        0.0
    }
}

/// Stay close to the own tail if space runs out or in long duels.
pub fn tail_chase(s: &Signals, c: &EvalConfig) -> f64 {
    let safe = s.voronoi[s.me].cell_count() as f64 / s.area();
    let long_duel =
        s.is_duel() && s.game.hazards.is_empty() && s.game.turn >= c.tail_chase_turn;
    if safe < c.tail_chase_space || long_duel {
        let you = s.you();
        c.tail_chase / s.game.distance(you.head(), you.tail()).max(1) as f64
    } else {
        0.0
    }
}

pub fn space(s: &Signals, c: &EvalConfig) -> f64 {
    let own = s.voronoi[s.me].reachable;
    let mut delta = c.space * own / s.area();
    if let Some(best) = s
        .opponents()
        .map(|(i, _)| s.voronoi[i].reachable)
        .max_by(f64::total_cmp)
    {
        delta += c.space_lead * (own - best) / s.area();
    }
    delta
}

/// Not enough room to fit our body.
pub fn trapped(s: &Signals, c: &EvalConfig) -> f64 {
    if s.voronoi[s.me].cell_count() < s.you().len() {
        -c.trapped
    } else {
        0.0
    }
}

pub fn tactics(s: &Signals, c: &EvalConfig) -> f64 {
    let w = &c.tactics;
    let value = |t: &Tactics| {
        let mut v = 0.0;
        if t.cutoff {
            v += w.cutoff;
        }
        if t.hazard_cutoff {
            v += w.hazard_cutoff;
        }
        if t.sandwich {
            v += w.sandwich;
        }
        if t.faceoff {
            v += w.faceoff;
        }
        v
    };
    let offense: f64 = s.offense.iter().map(value).sum();
    let defense: f64 = s.defense.iter().map(value).sum();
    offense - w.defense * defense
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Vec2D;
    use crate::eval::{EvalContext, PriorKiss};
    use crate::game::{Game, HazardWalls};
    use crate::tactics::KissOfDeath;

    fn signals<'a>(game: &'a Game, ctx: &EvalContext) -> Signals<'a> {
        Signals::new(game, "0", ctx, PriorKiss::default(), None).unwrap()
    }

    #[test]
    fn avoidance_raise() {
        let w = MurderWeights::default();
        let none = Tactics::default();
        let all = Tactics {
            cutoff: true,
            hazard_cutoff: true,
            sandwich: true,
            faceoff: true,
        };
        assert_eq!(murder_reward(&w, KissOfMurder::Avoidance, none), w.avoidance);
        assert_eq!(
            murder_reward(&w, KissOfMurder::Avoidance, all),
            w.avoid_into_cutoff
        );
        let faceoff = Tactics {
            faceoff: true,
            ..none
        };
        assert_eq!(
            murder_reward(&w, KissOfMurder::Avoidance, faceoff),
            w.avoid_into_faceoff
        );
        // never lowered
        let low = MurderWeights {
            avoid_into_sandwich: 0.0,
            ..w.clone()
        };
        let sandwich = Tactics {
            sandwich: true,
            ..none
        };
        assert_eq!(
            murder_reward(&low, KissOfMurder::Avoidance, sandwich),
            low.avoidance
        );
        // other grades are not raised
        assert_eq!(murder_reward(&w, KissOfMurder::Certainty, all), w.certainty);
    }

    #[test]
    fn walls_and_wrapping() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . . . .
            0 . . . .
            ^ . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        assert_eq!(walls(&signals(&game, &ctx), &config), -config.wall);
        assert_eq!(center(&signals(&game, &ctx), &config), -config.center * 3.0);

        game.rules.mode.wrapped = true;
        assert_eq!(walls(&signals(&game, &ctx), &config), 0.0);
        assert_eq!(center(&signals(&game, &ctx), &config), 0.0);
    }

    #[test]
    fn opponent_penalty_floor() {
        let game = Game::parse(
            r#"
            . . . . . . .
            . 1 . 2 . 3 .
            . . . . . . .
            . 4 . 5 . 6 .
            . . . . . . .
            . . . 0 . . .
            . . . . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        // 100 + 75 + 50 + 25 + 25 + 25
        assert_eq!(opponents(&signals(&game, &ctx), &config), -300.0);
    }

    #[test]
    fn hazard_center() {
        let mut game = Game::parse(
            r#"
            x x x x x x x
            x . . . . . x
            x . . . . . x
            x . . 0 . . x
            x . . ^ . . x
            x . . ^ . . x
            x x x x x x x"#,
        )
        .unwrap();
        game.rules.hazard_damage = 14;
        let config = EvalConfig::default();
        let mut ctx = EvalContext::new(&config);
        ctx.hazard_walls = HazardWalls::from_game(&game);
        let s = signals(&game, &ctx);
        assert_eq!(s.center_distance(), 0.0);
        assert_eq!(hazards(&s, &config), 0.0);

        game.snakes[0].body.iter_mut().for_each(|p| p.x = 1);
        let s = signals(&game, &ctx);
        assert_eq!(s.center_distance(), 2.0);
        assert_eq!(hazards(&s, &config), -config.hazard_wall);
    }

    #[test]
    fn health_tiers() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . . 0 . .
            . . ^ . .
            . . ^ . .
            . . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        let w = &config.health;
        assert_eq!(health(&signals(&game, &ctx), &config), w.rewards[0]);

        game.snakes[0].health = 12;
        assert_eq!(health(&signals(&game, &ctx), &config), w.rewards[5]);
        game.snakes[0].health = 3;
        assert_eq!(health(&signals(&game, &ctx), &config), -w.starving);

        // just ate after starving
        game.snakes[0].health = MAX_HEALTH;
        let s = Signals::new(&game, "0", &ctx, PriorKiss::default(), Some(10)).unwrap();
        assert_eq!(health(&s, &config), w.rewards[0] + w.just_ate * 90.0 / 100.0);
    }

    #[test]
    fn kiss_terms() {
        let game = Game::parse(
            r#"
            . > > v . . .
            . . . v . . .
            . . . 1 . . .
            . . . . . . .
            . . . 0 . . .
            . . . . . . .
            . . . . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        let s = signals(&game, &ctx);
        assert_eq!(s.kiss.death(crate::env::Direction::Up), KissOfDeath::Certainty);
        // the safest move only escapes
        assert_eq!(kiss_death(&s, &config), -config.death.three_to_two);
        assert_eq!(kiss_murder(&s, &config), 0.0);
    }
    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn solo_win_and_starving_opponent() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . 0 . . .
            . ^ . . .
            . . . . .
            . . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        assert_eq!(solo_win(&signals(&game, &ctx), &config), 0.0);
        // the opponents died
        game.rules.mode.solo = false;
        assert_eq!(solo_win(&signals(&game, &ctx), &config), config.solo_win);

        let mut game = Game::parse(
            r#"
            . . . . .
            . 0 . 1 .
            . ^ . ^ .
            . . . . .
            . . . . ."#,
        )
        .unwrap();
        assert_eq!(solo_win(&signals(&game, &ctx), &config), 0.0);
        assert_eq!(duel_starvation(&signals(&game, &ctx), &config), 0.0);
        game.snakes[1].health = 10;
        assert!(close(
            duel_starvation(&signals(&game, &ctx), &config),
            15.0 * config.duel_starvation
        ));
    }

    #[test]
    fn food_discounts() {
        let mut game = Game::parse(
            r#"
            . . . . . . .
            . . . . . . .
            . . . o . . .
            . . . 0 . o .
            . . . ^ . . .
            . . . ^ . . .
            . . . . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        // depth 1 and 2 at full health
        let expected = config.food * 0.5 * (1.0 + 0.5);
        assert!(close(food(&signals(&game, &ctx), &config), expected));

        // beyond the horizon unless we look further ahead
        game.food.push(Vec2D::new(3, 6));
        assert!(close(food(&signals(&game, &ctx), &config), expected));
        let mut ahead = EvalContext::new(&config);
        ahead.lookahead = 1;
        let s = Signals::new(&game, "0", &ahead, PriorKiss::default(), None).unwrap();
        assert!(close(food(&s, &config), expected + config.food * 0.5 / 3.0));

        // hungry snakes value food more
        game.snakes[0].health = 50;
        assert!(close(food(&signals(&game, &ctx), &config), config.food * 0.75 * 1.5));

        game.rules.mode.constrictor = true;
        assert_eq!(food(&signals(&game, &ctx), &config), 0.0);
    }

    #[test]
    fn food_in_corner_and_hazard() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . . . .
            . 0 . . .
            o ^ . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        let corner = 0.5 * config.food_corner;
        assert!(close(food(&signals(&game, &ctx), &config), config.food * 0.5 * corner));

        game.hazards.push(Vec2D::new(0, 0));
        assert!(close(
            food(&signals(&game, &ctx), &config),
            config.food * 0.5 * corner * config.food_hazard
        ));
    }

    #[test]
    fn king_of_the_center() {
        let mut game = Game::parse(
            r#"
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . 0 . . . 1 .
            . ^ . . . ^ .
            . ^ . . . . .
            . ^ < . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        assert_eq!(game.snakes[0].len(), 5);
        assert!(close(king(&signals(&game, &ctx), &config), -config.king * 2.0));

        game.snakes[1].body.push_back(Vec2D::new(5, 2));
        assert_eq!(king(&signals(&game, &ctx), &config), 0.0);
    }

    #[test]
    fn enemy_near_corner() {
        let mut game = Game::parse(
            r#"
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . 0 . 1 . . .
            . ^ . ^ . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        assert_eq!(enemy_corner(&signals(&game, &ctx), &config), -config.enemy_corner);

        game.rules.mode.wrapped = true;
        assert_eq!(enemy_corner(&signals(&game, &ctx), &config), 0.0);

        game.rules.mode.wrapped = false;
        game.snakes[1].body.iter_mut().for_each(|p| p.y += 4);
        assert_eq!(enemy_corner(&signals(&game, &ctx), &config), 0.0);
    }

    #[test]
    fn tail_chase_and_trapped() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . . . . .
            v . . . .
            v . 1 . .
            0 > ^ . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        let s = signals(&game, &ctx);
        assert!(s.voronoi[0].cell_count() >= 3);
        assert_eq!(trapped(&s, &config), 0.0);

        // bodies never leave in constrictor games
        game.rules.mode.constrictor = true;
        let s = signals(&game, &ctx);
        assert_eq!(s.voronoi[0].cell_count(), 1);
        assert_eq!(trapped(&s, &config), -config.trapped);
        assert!(close(tail_chase(&s, &config), config.tail_chase / 2.0));
    }

    #[test]
    fn tail_chase_long_duel() {
        let mut game = Game::parse(
            r#"
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . 0 . . . 1 .
            . ^ . . . ^ .
            . ^ . . . . .
            . ^ < . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        assert_eq!(tail_chase(&signals(&game, &ctx), &config), 0.0);

        game.turn = config.tail_chase_turn;
        assert!(close(tail_chase(&signals(&game, &ctx), &config), config.tail_chase / 4.0));
    }

    #[test]
    fn space_share_and_lead() {
        let game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . . . .
            . . . . .
            . . 0 . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        assert!(close(space(&signals(&game, &ctx), &config), config.space));

        // the middle column is shared
        let game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . 0 . 1 .
            . . . . .
            . . . . ."#,
        )
        .unwrap();
        let s = signals(&game, &ctx);
        assert!(close(s.voronoi[0].reachable, 12.5));
        assert!(close(space(&s, &config), config.space * 0.5));
    }

    #[test]
    fn tactics_offense_and_defense() {
        let game = Game::parse(
            r#"
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . 0 1 2 . .
            . . ^ ^ ^ . .
            . . ^ ^ ^ . .
            . . . . . . ."#,
        )
        .unwrap();
        let config = EvalConfig::default();
        let ctx = EvalContext::new(&config);
        let w = &config.tactics;
        assert!(close(tactics(&signals(&game, &ctx), &config), w.sandwich));

        let s = Signals::new(&game, "1", &ctx, PriorKiss::default(), None).unwrap();
        assert!(close(tactics(&s, &config), -w.defense * 2.0 * w.sandwich));
    }
}
