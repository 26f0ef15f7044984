//! Team, group, and fit scoring.
//!
//! Everything the optimizer, draft simulator, and complement finder rank by
//! funnels through [`ScoringEngine`], so an alternate synergy policy can be
//! swapped in one place.

mod synergy;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::{Phase, Team};

pub use synergy::{PhaseCoverageSynergy, SynergyModel};

/// Fit-score bonus per covered weakness phase.
pub const COVERAGE_BONUS: f64 = 2.0;

/// Tunable scoring coefficients. All must be non-negative.
///
/// Consistency and synergy default lower than the phase weights; they act as
/// tie-breakers and bonuses, not primary drivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AllianceWeights {
    pub auto: f64,
    pub teleop: f64,
    pub endgame: f64,
    pub consistency: f64,
    pub synergy: f64,
}

impl Default for AllianceWeights {
    fn default() -> Self {
        Self { auto: 1.0, teleop: 1.0, endgame: 1.0, consistency: 0.5, synergy: 0.3 }
    }
}

impl AllianceWeights {
    pub fn validate(&self) -> Result<()> {
        let entries = [
            ("auto", self.auto),
            ("teleop", self.teleop),
            ("endgame", self.endgame),
            ("consistency", self.consistency),
            ("synergy", self.synergy),
        ];
        for (name, value) in entries {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidConfiguration(format!(
                    "weight '{name}' must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Aggregate score breakdown for a group of teams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupScore {
    pub combined_epa: f64,
    pub auto_sum: f64,
    pub teleop_sum: f64,
    pub endgame_sum: f64,
    pub synergy: f64,
    pub total: f64,
}

/// Pool-relative phase thresholds for weakness/coverage classification.
///
/// `low` is the 25th percentile of the pool's values per phase, `strong` the
/// 75th. A team below `low` in a phase is weak there; a team above `strong`
/// can cover that weakness.
#[derive(Debug, Clone, Copy)]
pub struct PhaseThresholds {
    low: [f64; 3],
    strong: [f64; 3],
}

impl PhaseThresholds {
    pub fn from_pool(pool: &[Team]) -> Self {
        let mut low = [0.0; 3];
        let mut strong = [0.0; 3];
        for phase in Phase::ALL {
            let mut values: Vec<f64> = pool.iter().map(|t| t.phase_epa(phase)).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            low[phase as usize] = nearest_rank(&values, 0.25);
            strong[phase as usize] = nearest_rank(&values, 0.75);
        }
        Self { low, strong }
    }

    pub fn is_weak(&self, team: &Team, phase: Phase) -> bool {
        team.phase_epa(phase) < self.low[phase as usize]
    }

    pub fn covers(&self, team: &Team, phase: Phase) -> bool {
        team.phase_epa(phase) > self.strong[phase as usize]
    }

    /// Phases where `target` is weak and `candidate` is strong.
    pub fn covered_weaknesses(&self, target: &Team, candidate: &Team) -> Vec<Phase> {
        Phase::ALL
            .into_iter()
            .filter(|p| self.is_weak(target, *p) && self.covers(candidate, *p))
            .collect()
    }
}

/// Nearest-rank percentile over an ascending-sorted slice.
fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * fraction).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Stateless scoring over a fixed weight configuration and synergy policy.
#[derive(Clone)]
pub struct ScoringEngine {
    weights: AllianceWeights,
    synergy: Arc<dyn SynergyModel>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            weights: AllianceWeights::default(),
            synergy: Arc::new(PhaseCoverageSynergy),
        }
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine").field("weights", &self.weights).finish()
    }
}

impl ScoringEngine {
    pub fn new(weights: AllianceWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights, synergy: Arc::new(PhaseCoverageSynergy) })
    }

    pub fn with_synergy_model(weights: AllianceWeights, model: Arc<dyn SynergyModel>) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights, synergy: model })
    }

    pub fn weights(&self) -> &AllianceWeights {
        &self.weights
    }

    /// Individual score: weighted phase sum plus a record-derived consistency
    /// adjustment. Total over every well-formed team.
    pub fn team_score(&self, team: &Team) -> f64 {
        let w = &self.weights;
        w.auto * team.phase_epa(Phase::Auto)
            + w.teleop * team.phase_epa(Phase::Teleop)
            + w.endgame * team.phase_epa(Phase::Endgame)
            + w.consistency * team.consistency() * team.overall_epa()
    }

    /// Aggregate score for a group of teams.
    ///
    /// The synergy term multiplies against `max(combined_epa, 0)` so that a
    /// synergy bonus can never invert the ordering for negative-EPA groups.
    pub fn group_score(&self, teams: &[&Team]) -> GroupScore {
        let w = &self.weights;
        let auto_sum: f64 = teams.iter().map(|t| t.phase_epa(Phase::Auto)).sum();
        let teleop_sum: f64 = teams.iter().map(|t| t.phase_epa(Phase::Teleop)).sum();
        let endgame_sum: f64 = teams.iter().map(|t| t.phase_epa(Phase::Endgame)).sum();
        let combined_epa: f64 = teams.iter().map(|t| t.overall_epa()).sum();
        let avg_consistency = if teams.is_empty() {
            0.0
        } else {
            teams.iter().map(|t| t.consistency()).sum::<f64>() / teams.len() as f64
        };
        let synergy = self.synergy.synergy(teams);

        let total = w.auto * auto_sum
            + w.teleop * teleop_sum
            + w.endgame * endgame_sum
            + w.consistency * avg_consistency * combined_epa
            + w.synergy * synergy * combined_epa.max(0.0);

        GroupScore { combined_epa, auto_sum, teleop_sum, endgame_sum, synergy, total }
    }

    /// Pairing fit: the pair's group total plus an explicit coverage bonus
    /// for every target weakness the candidate is strong in.
    pub fn fit_score(&self, target: &Team, candidate: &Team, thresholds: &PhaseThresholds) -> f64 {
        let group = self.group_score(&[target, candidate]);
        let covered = thresholds.covered_weaknesses(target, candidate);
        group.total + COVERAGE_BONUS * covered.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn team(number: u32, auto: f64, teleop: f64, endgame: f64) -> Team {
        Team {
            team_key: format!("frc{number}"),
            event_key: "2024test".to_string(),
            team_number: number,
            nickname: None,
            rank: None,
            wins: 0,
            losses: 0,
            ties: 0,
            epa: Some(auto + teleop + endgame),
            auto_epa: Some(auto),
            teleop_epa: Some(teleop),
            endgame_epa: Some(endgame),
            rp_1_epa: None,
            rp_2_epa: None,
        }
    }

    #[test]
    fn test_team_score_default_weights() {
        let engine = ScoringEngine::default();
        let t = team(254, 10.0, 20.0, 5.0);
        // phase sum 35, neutral consistency 0.5 scaled by weight 0.5 on epa 35
        assert_eq!(engine.team_score(&t), 35.0 + 0.5 * 0.5 * 35.0);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = AllianceWeights { synergy: -0.1, ..AllianceWeights::default() };
        assert!(matches!(
            ScoringEngine::new(weights),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_group_score_sums_phases() {
        let engine = ScoringEngine::default();
        let a = team(1, 10.0, 0.0, 0.0);
        let b = team(2, 0.0, 8.0, 0.0);
        let c = team(3, 0.0, 0.0, 6.0);
        let group = engine.group_score(&[&a, &b, &c]);
        assert_eq!(group.auto_sum, 10.0);
        assert_eq!(group.teleop_sum, 8.0);
        assert_eq!(group.endgame_sum, 6.0);
        assert_eq!(group.combined_epa, 24.0);
        assert_eq!(group.synergy, 4.5);
        // 24 weighted phases + 0.5 * 0.5 * 24 consistency + 0.3 * 4.5 * 24 synergy
        assert_eq!(group.total, 24.0 + 6.0 + 0.3 * 4.5 * 24.0);
    }

    #[test]
    fn test_disjoint_strengths_beat_overlapping_at_equal_totals() {
        let engine = ScoringEngine::default();
        let disjoint = [team(1, 9.0, 0.0, 0.0), team(2, 0.0, 9.0, 0.0), team(3, 0.0, 0.0, 9.0)];
        let overlapping = [team(4, 9.0, 0.0, 0.0), team(5, 9.0, 0.0, 0.0), team(6, 9.0, 0.0, 0.0)];
        let d: Vec<&Team> = disjoint.iter().collect();
        let o: Vec<&Team> = overlapping.iter().collect();
        assert!(engine.group_score(&d).total >= engine.group_score(&o).total);
    }

    #[test]
    fn test_thresholds_weakness_and_coverage() {
        // Auto values across the pool: 0, 2, 4, 6, 8, 10.
        // Nearest-rank p25 hits index round(5*0.25)=1 -> 2; p75 index 4 -> 8.
        let pool: Vec<Team> = (0..6).map(|i| team(i + 1, (i * 2) as f64, 5.0, 5.0)).collect();
        let thresholds = PhaseThresholds::from_pool(&pool);

        assert!(thresholds.is_weak(&pool[0], Phase::Auto), "0 < p25 of 2");
        assert!(!thresholds.is_weak(&pool[2], Phase::Auto), "4 is not below p25");
        assert!(thresholds.covers(&pool[5], Phase::Auto), "10 > p75 of 8");
        assert!(!thresholds.covers(&pool[4], Phase::Auto), "8 is not above p75");

        let covered = thresholds.covered_weaknesses(&pool[0], &pool[5]);
        assert_eq!(covered, vec![Phase::Auto]);
    }

    #[test]
    fn test_fit_score_adds_coverage_bonus() {
        let engine = ScoringEngine::default();
        let pool: Vec<Team> = (0..6).map(|i| team(i + 1, (i * 2) as f64, 5.0, 5.0)).collect();
        let thresholds = PhaseThresholds::from_pool(&pool);
        let base = engine.group_score(&[&pool[0], &pool[5]]).total;
        assert_eq!(engine.fit_score(&pool[0], &pool[5], &thresholds), base + COVERAGE_BONUS);
    }

    proptest! {
        /// Scores are invariant under member permutation. Integer-valued EPAs
        /// keep every floating-point sum exact, so equality is strict.
        #[test]
        fn prop_group_score_permutation_invariant(
            values in proptest::collection::vec((0i16..500, 0i16..500, 0i16..500), 2..6),
            rotation in 0usize..6,
        ) {
            let engine = ScoringEngine::default();
            let teams: Vec<Team> = values
                .iter()
                .enumerate()
                .map(|(i, (a, t, e))| team(i as u32 + 1, *a as f64, *t as f64, *e as f64))
                .collect();

            let original: Vec<&Team> = teams.iter().collect();
            let mut rotated = original.clone();
            rotated.rotate_left(rotation % teams.len());

            let lhs = engine.group_score(&original);
            let rhs = engine.group_score(&rotated);
            prop_assert_eq!(lhs.total, rhs.total);
            prop_assert_eq!(lhs.synergy, rhs.synergy);
            prop_assert_eq!(lhs.combined_epa, rhs.combined_epa);
        }

        #[test]
        fn prop_team_score_deterministic(a in 0i16..500, t in 0i16..500, e in 0i16..500) {
            let engine = ScoringEngine::default();
            let x = team(7, a as f64, t as f64, e as f64);
            prop_assert_eq!(engine.team_score(&x), engine.team_score(&x));
        }
    }
}
