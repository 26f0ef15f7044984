//! Greedy sequential-best alliance partitioning.
//!
//! True optimal partitioning over `C(N, size)` combinations is infeasible at
//! event scale, and a globally optimal search would also change the observable
//! "best alliance first" ordering. Instead the optimizer commits alliances
//! rank by rank: the strongest remaining team captains, the best-scoring
//! partner set from the remainder fills the alliance, and the members leave
//! the pool before the next rank is built.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::models::{Alliance, Team};
use crate::scoring::{AllianceWeights, ScoringEngine};
use crate::MAX_ALLIANCES;

#[derive(Debug, Clone, Copy)]
pub struct OptimizerConfig {
    /// Teams per alliance, captain included.
    pub alliance_size: usize,
    /// Alliances to build; defaults to `min(8, eligible / alliance_size)`.
    pub alliance_count: Option<usize>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { alliance_size: 3, alliance_count: None }
    }
}

impl OptimizerConfig {
    fn validate(&self) -> Result<()> {
        if self.alliance_size == 0 {
            return Err(CoreError::InvalidConfiguration(
                "alliance size must be at least 1".to_string(),
            ));
        }
        if self.alliance_count == Some(0) {
            return Err(CoreError::InvalidConfiguration(
                "alliance count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct AllianceOptimizer {
    engine: ScoringEngine,
    config: OptimizerConfig,
}

impl AllianceOptimizer {
    pub fn new(weights: AllianceWeights) -> Result<Self> {
        Self::with_config(weights, OptimizerConfig::default())
    }

    pub fn with_config(weights: AllianceWeights, config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine: ScoringEngine::new(weights)?, config })
    }

    /// Partition (a prefix of) the pool into ranked alliances.
    ///
    /// Only teams with a positive overall EPA are eligible. If fewer than
    /// `alliance_size` teams remain for a slot, that slot and all following
    /// ones are omitted; an alliance is never partially filled.
    pub fn compute(&self, pool: &[Team]) -> Result<Vec<Alliance>> {
        if pool.is_empty() {
            return Err(CoreError::InsufficientData(
                "no team data available for this event".to_string(),
            ));
        }

        let mut remaining: Vec<&Team> = pool
            .iter()
            .filter(|t| t.epa.map_or(false, |epa| epa > 0.0))
            .collect();
        remaining.sort_by(|a, b| self.compare_by_team_score(a, b));

        let size = self.config.alliance_size;
        let count = self
            .config
            .alliance_count
            .unwrap_or_else(|| MAX_ALLIANCES.min(remaining.len() / size));

        debug!(
            "building up to {} alliances of {} from {} eligible teams",
            count,
            size,
            remaining.len()
        );

        let mut groups: Vec<Vec<&Team>> = Vec::with_capacity(count);
        for _ in 0..count {
            if remaining.len() < size {
                break;
            }
            let captain = remaining[0];
            let partner_idx = self.best_partner_set(captain, &remaining[1..], size - 1);

            let mut members = Vec::with_capacity(size);
            members.push(captain);
            members.extend(partner_idx.iter().map(|&i| remaining[1 + i]));

            let taken: Vec<usize> =
                std::iter::once(0).chain(partner_idx.iter().map(|&i| 1 + i)).collect();
            remaining = remaining
                .iter()
                .enumerate()
                .filter(|(i, _)| !taken.contains(i))
                .map(|(_, t)| *t)
                .collect();

            groups.push(members);
        }

        // Greedy construction is already near-ordered; the final stable sort
        // guarantees weakly decreasing totals with construction order (and
        // thus the stronger captain) as the tie-break.
        let mut scored: Vec<(Vec<&Team>, crate::scoring::GroupScore)> = groups
            .into_iter()
            .map(|members| {
                let score = self.engine.group_score(&members);
                (members, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total.partial_cmp(&a.1.total).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (members, g))| Alliance {
                rank: i as u32 + 1,
                teams: members.into_iter().cloned().collect(),
                combined_epa: g.combined_epa,
                auto_epa_sum: g.auto_sum,
                teleop_epa_sum: g.teleop_sum,
                endgame_epa_sum: g.endgame_sum,
                synergy_score: g.synergy,
                total_score: g.total,
            })
            .collect())
    }

    fn compare_by_team_score(&self, a: &Team, b: &Team) -> Ordering {
        self.engine
            .team_score(b)
            .partial_cmp(&self.engine.team_score(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team_number.cmp(&b.team_number))
    }

    /// Best `k`-subset of `pool` to pair with `captain`, by group total.
    ///
    /// Parallelized over the first partner index; exact score ties resolve to
    /// the lexicographically smallest partner team-number tuple so output is
    /// reproducible.
    fn best_partner_set(&self, captain: &Team, pool: &[&Team], k: usize) -> Vec<usize> {
        if k == 0 || pool.len() < k {
            return Vec::new();
        }

        let best = (0..=pool.len() - k)
            .into_par_iter()
            .map(|first| {
                let mut best = None;
                let mut chosen = vec![first];
                self.search_partners(captain, pool, k, &mut chosen, first + 1, &mut best);
                best
            })
            .reduce(|| None, |a, b| better_candidate(pool, a, b));

        best.map(|(_, idx)| idx).unwrap_or_default()
    }

    fn search_partners(
        &self,
        captain: &Team,
        pool: &[&Team],
        k: usize,
        chosen: &mut Vec<usize>,
        start: usize,
        best: &mut Option<(f64, Vec<usize>)>,
    ) {
        if chosen.len() == k {
            let mut members: Vec<&Team> = Vec::with_capacity(k + 1);
            members.push(captain);
            members.extend(chosen.iter().map(|&i| pool[i]));
            let total = self.engine.group_score(&members).total;

            let improves = match best {
                None => true,
                Some((score, idx)) => {
                    total > *score
                        || (total == *score
                            && partner_numbers(pool, chosen) < partner_numbers(pool, idx))
                }
            };
            if improves {
                *best = Some((total, chosen.clone()));
            }
            return;
        }

        let needed = k - chosen.len();
        for i in start..=(pool.len() - needed) {
            chosen.push(i);
            self.search_partners(captain, pool, k, chosen, i + 1, best);
            chosen.pop();
        }
    }
}

fn partner_numbers(pool: &[&Team], idx: &[usize]) -> Vec<u32> {
    idx.iter().map(|&i| pool[i].team_number).collect()
}

fn better_candidate(
    pool: &[&Team],
    a: Option<(f64, Vec<usize>)>,
    b: Option<(f64, Vec<usize>)>,
) -> Option<(f64, Vec<usize>)> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => {
            if b.0 > a.0 || (b.0 == a.0 && partner_numbers(pool, &b.1) < partner_numbers(pool, &a.1))
            {
                Some(b)
            } else {
                Some(a)
            }
        }
    }
}
