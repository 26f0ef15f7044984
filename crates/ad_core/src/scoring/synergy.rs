use crate::models::{Phase, Team};

/// Pluggable synergy policy.
///
/// Implementations must be permutation-invariant over the group's value
/// multiset, and must score a group whose members' strongest phases are
/// pairwise disjoint at least as high as a group with identical totals but
/// fully overlapping strengths.
pub trait SynergyModel: Send + Sync {
    fn synergy(&self, teams: &[&Team]) -> f64;
}

/// Default synergy policy: phase coverage plus strength spread.
///
/// Awards 1.0 for every phase some member contributes to, plus 0.5 for every
/// distinct strongest phase across the group. A trio whose members each lead
/// a different phase therefore earns 4.5; a trio of identical specialists
/// earns 1.5.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseCoverageSynergy;

impl SynergyModel for PhaseCoverageSynergy {
    fn synergy(&self, teams: &[&Team]) -> f64 {
        if teams.is_empty() {
            return 0.0;
        }

        let mut synergy = 0.0;
        for phase in Phase::ALL {
            if teams.iter().any(|t| t.phase_epa(phase) > 0.0) {
                synergy += 1.0;
            }
        }

        let mut led = [false; 3];
        for team in teams {
            led[team.strongest_phase() as usize] = true;
        }
        synergy + 0.5 * led.iter().filter(|l| **l).count() as f64
    }
}
