use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tactics::{KissOfDeath, KissOfMurder};

/// Penalties for the kiss of death states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathWeights {
    pub certainty: f64,
    pub certainty_mutual: f64,
    pub maybe: f64,
    pub maybe_mutual: f64,
    pub three_to_one: f64,
    pub three_to_two: f64,
    pub two_to_one: f64,
}

impl Default for DeathWeights {
    fn default() -> Self {
        Self {
            certainty: 400.0,
            certainty_mutual: 300.0,
            maybe: 200.0,
            maybe_mutual: 150.0,
            three_to_one: 30.0,
            three_to_two: 10.0,
            two_to_one: 20.0,
        }
    }
}

impl DeathWeights {
    pub fn penalty(&self, kiss: KissOfDeath) -> f64 {
        match kiss {
            KissOfDeath::No => 0.0,
            KissOfDeath::Certainty => self.certainty,
            KissOfDeath::CertaintyMutual => self.certainty_mutual,
            KissOfDeath::Maybe => self.maybe,
            KissOfDeath::MaybeMutual => self.maybe_mutual,
            KissOfDeath::ThreeToOneAvoidance => self.three_to_one,
            KissOfDeath::ThreeToTwoAvoidance => self.three_to_two,
            KissOfDeath::TwoToOneAvoidance => self.two_to_one,
        }
    }
}

/// Rewards for the kiss of murder states.
///
/// An avoidable kill is worth more if the prey would end up in a trap
/// instead, the last four weights are the raised rewards for each trap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MurderWeights {
    pub certainty: f64,
    pub maybe: f64,
    pub faceoff: f64,
    pub avoidance: f64,
    pub avoid_into_cutoff: f64,
    pub avoid_into_hazard_cutoff: f64,
    pub avoid_into_sandwich: f64,
    pub avoid_into_faceoff: f64,
}

impl Default for MurderWeights {
    fn default() -> Self {
        Self {
            certainty: 100.0,
            maybe: 50.0,
            faceoff: 30.0,
            avoidance: 10.0,
            avoid_into_cutoff: 40.0,
            avoid_into_hazard_cutoff: 35.0,
            avoid_into_sandwich: 30.0,
            avoid_into_faceoff: 20.0,
        }
    }
}

impl MurderWeights {
    pub fn reward(&self, kiss: KissOfMurder) -> f64 {
        match kiss {
            KissOfMurder::No => 0.0,
            KissOfMurder::Certainty => self.certainty,
            KissOfMurder::Maybe => self.maybe,
            KissOfMurder::Faceoff => self.faceoff,
            KissOfMurder::Avoidance => self.avoidance,
        }
    }
}

/// Rewards for traps against opponents, the same traps against us are
/// penalized scaled by `defense`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticWeights {
    pub cutoff: f64,
    pub hazard_cutoff: f64,
    pub sandwich: f64,
    pub faceoff: f64,
    pub defense: f64,
}

impl Default for TacticWeights {
    fn default() -> Self {
        Self {
            cutoff: 50.0,
            hazard_cutoff: 40.0,
            sandwich: 40.0,
            faceoff: 20.0,
            defense: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthWeights {
    /// Minimum survivable turns of each tier, descending
    pub tiers: [u16; 7],
    pub rewards: [f64; 7],
    /// Penalty below the lowest tier
    pub starving: f64,
    /// Bonus for eating, scaled with the missing health before
    pub just_ate: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            tiers: [80, 60, 45, 30, 20, 10, 5],
            rewards: [60.0, 50.0, 40.0, 30.0, 20.0, 10.0, 0.0],
            starving: 200.0,
            just_ate: 50.0,
        }
    }
}

/// Weights of the composite evaluation.
///
/// Penalties are given as positive values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub base: f64,
    pub solo_win: f64,
    /// Penalty for the first opponent, reduced by `opponent_step` for each
    /// further one down to `opponent_floor`
    pub opponent: f64,
    pub opponent_step: f64,
    pub opponent_floor: f64,
    pub wall: f64,
    pub corner: f64,
    pub in_hazard: f64,
    pub hazard_wall: f64,
    /// Penalty per cell of distance from the center
    pub center: f64,
    pub duel_starvation: f64,
    pub duel_starvation_health: u8,
    pub death: DeathWeights,
    pub murder: MurderWeights,
    pub prior_death: DeathWeights,
    pub prior_murder: MurderWeights,
    /// Reward by the number of legal moves
    pub moves: [f64; 5],
    pub length: f64,
    pub health: HealthWeights,
    pub food: f64,
    /// Additional depth beyond the lookahead in which food is considered
    pub food_margin: u16,
    pub food_corner: f64,
    pub food_hazard: f64,
    pub king: f64,
    pub king_margin: usize,
    pub enemy_corner: f64,
    pub enemy_corner_distance: u64,
    pub tail_chase: f64,
    pub tail_chase_space: f64,
    pub tail_chase_turn: usize,
    pub space: f64,
    pub space_lead: f64,
    pub trapped: f64,
    pub tactics: TacticWeights,
    /// Fraction by which synthesized ties are discounted
    pub tie_discount: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            base: 500.0,
            solo_win: 1000.0,
            opponent: 100.0,
            opponent_step: 25.0,
            opponent_floor: 25.0,
            wall: 15.0,
            corner: 30.0,
            in_hazard: 40.0,
            hazard_wall: 10.0,
            center: 2.0,
            duel_starvation: 5.0,
            duel_starvation_health: 25,
            death: DeathWeights::default(),
            murder: MurderWeights::default(),
            prior_death: DeathWeights {
                certainty: 200.0,
                certainty_mutual: 150.0,
                maybe: 100.0,
                maybe_mutual: 75.0,
                three_to_one: 15.0,
                three_to_two: 5.0,
                two_to_one: 10.0,
            },
            prior_murder: MurderWeights {
                certainty: 50.0,
                maybe: 25.0,
                faceoff: 15.0,
                avoidance: 5.0,
                avoid_into_cutoff: 20.0,
                avoid_into_hazard_cutoff: 18.0,
                avoid_into_sandwich: 15.0,
                avoid_into_faceoff: 10.0,
            },
            moves: [-400.0, 10.0, 15.0, 40.0, 45.0],
            length: 10.0,
            health: HealthWeights::default(),
            food: 20.0,
            food_margin: 2,
            food_corner: 0.5,
            food_hazard: 0.25,
            king: 3.0,
            king_margin: 2,
            enemy_corner: 40.0,
            enemy_corner_distance: 3,
            tail_chase: 20.0,
            tail_chase_space: 0.25,
            tail_chase_turn: 100,
            space: 100.0,
            space_lead: 50.0,
            trapped: 300.0,
            tactics: TacticWeights::default(),
            tie_discount: 0.05,
        }
    }
}

impl FromStr for EvalConfig {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}
