use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The three scored phases of a match.
///
/// Serialized as lowercase strings; these are the values that appear in
/// `strength_areas` and `weakness_coverage` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Auto,
    Teleop,
    Endgame,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Auto, Phase::Teleop, Phase::Endgame];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Auto => "auto",
            Phase::Teleop => "teleop",
            Phase::Endgame => "endgame",
        }
    }
}

/// A team's per-event performance snapshot.
///
/// Field names are part of the wire contract with the presentation layer.
/// EPA components stay `None` when a team is unscored; scoring treats a
/// missing component as a zero contribution rather than a zero measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Team {
    pub team_key: String,
    pub event_key: String,
    pub team_number: u32,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub epa: Option<f64>,
    #[serde(default)]
    pub auto_epa: Option<f64>,
    #[serde(default)]
    pub teleop_epa: Option<f64>,
    #[serde(default)]
    pub endgame_epa: Option<f64>,
    /// Ranking-point predictors, carried for future weighting but not scored.
    #[serde(default)]
    pub rp_1_epa: Option<f64>,
    #[serde(default)]
    pub rp_2_epa: Option<f64>,
}

impl Team {
    /// Overall EPA, zero when unscored.
    pub fn overall_epa(&self) -> f64 {
        self.epa.unwrap_or(0.0)
    }

    /// Phase component, zero when unscored.
    pub fn phase_epa(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Auto => self.auto_epa.unwrap_or(0.0),
            Phase::Teleop => self.teleop_epa.unwrap_or(0.0),
            Phase::Endgame => self.endgame_epa.unwrap_or(0.0),
        }
    }

    /// Sum of the three phase components.
    pub fn phase_total(&self) -> f64 {
        Phase::ALL.iter().map(|p| self.phase_epa(*p)).sum()
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win-rate-derived consistency in [0, 1]; 0.5 when no matches are on
    /// record (a tie counts as half a win).
    pub fn consistency(&self) -> f64 {
        let matches = self.matches_played();
        if matches == 0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / matches as f64
    }

    /// The phase this team is best at. Ties resolve to the earliest phase in
    /// auto -> teleop -> endgame order, so the result is deterministic.
    pub fn strongest_phase(&self) -> Phase {
        let mut best = Phase::Auto;
        let mut best_value = self.phase_epa(Phase::Auto);
        for phase in [Phase::Teleop, Phase::Endgame] {
            let value = self.phase_epa(phase);
            if value > best_value {
                best = phase;
                best_value = value;
            }
        }
        best
    }
}
