use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Team;

/// A proposed alliance with its derived aggregates.
///
/// `rank` is the alliance's position in the producing operation's ordering
/// (1 = best). `teams` is ordered captain first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Alliance {
    pub rank: u32,
    pub teams: Vec<Team>,
    pub combined_epa: f64,
    pub auto_epa_sum: f64,
    pub teleop_epa_sum: f64,
    pub endgame_epa_sum: f64,
    pub synergy_score: f64,
    pub total_score: f64,
}

impl Alliance {
    pub fn captain(&self) -> Option<&Team> {
        self.teams.first()
    }
}
