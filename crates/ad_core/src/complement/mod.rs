//! Complement search: rank the remaining pool by how well each candidate
//! pairs with a target team.

use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::models::{Phase, Team};
use crate::scoring::{AllianceWeights, PhaseThresholds, ScoringEngine};

pub const DEFAULT_TOP_N: usize = 10;

/// Share of a team's own phase total that marks a phase as a strength.
const STRENGTH_SHARE: f64 = 0.35;

/// A ranked pairing candidate with its fit annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComplementCandidate {
    pub team: Team,
    pub combined_epa: f64,
    pub synergy_score: f64,
    pub strength_areas: Vec<Phase>,
    pub weakness_coverage: Vec<Phase>,
    pub overall_fit_score: f64,
}

pub struct ComplementFinder {
    engine: ScoringEngine,
    top_n: usize,
}

impl Default for ComplementFinder {
    fn default() -> Self {
        Self { engine: ScoringEngine::default(), top_n: DEFAULT_TOP_N }
    }
}

impl ComplementFinder {
    pub fn new(weights: AllianceWeights) -> Result<Self> {
        Ok(Self { engine: ScoringEngine::new(weights)?, top_n: DEFAULT_TOP_N })
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Rank the pool's candidates for `target`, best fit first.
    ///
    /// The target is excluded defensively even when present in the pool.
    /// Ties in fit resolve by ascending team number.
    pub fn find(&self, target: &Team, pool: &[Team]) -> Result<Vec<ComplementCandidate>> {
        if pool.is_empty() {
            return Err(CoreError::InsufficientData(
                "no team data available for this event".to_string(),
            ));
        }

        let thresholds = PhaseThresholds::from_pool(pool);
        let weaknesses: Vec<Phase> = Phase::ALL
            .into_iter()
            .filter(|p| thresholds.is_weak(target, *p))
            .collect();
        debug!(
            "finding complements for {}: weak phases {:?}",
            target.team_key, weaknesses
        );

        let mut candidates: Vec<ComplementCandidate> = pool
            .iter()
            .filter(|c| c.team_key != target.team_key)
            .map(|candidate| {
                let group = self.engine.group_score(&[target, candidate]);
                let coverage = thresholds.covered_weaknesses(target, candidate);
                ComplementCandidate {
                    team: candidate.clone(),
                    combined_epa: group.combined_epa,
                    synergy_score: group.synergy,
                    strength_areas: strength_areas(candidate),
                    weakness_coverage: coverage,
                    overall_fit_score: self.engine.fit_score(target, candidate, &thresholds),
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.overall_fit_score
                .partial_cmp(&a.overall_fit_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.team.team_number.cmp(&b.team.team_number))
        });
        candidates.truncate(self.top_n);
        Ok(candidates)
    }
}

/// Phases holding at least [`STRENGTH_SHARE`] of the team's own phase total.
fn strength_areas(team: &Team) -> Vec<Phase> {
    let total = team.phase_total();
    if total <= 0.0 {
        return Vec::new();
    }
    Phase::ALL
        .into_iter()
        .filter(|p| team.phase_epa(*p) / total >= STRENGTH_SHARE)
        .collect()
}
