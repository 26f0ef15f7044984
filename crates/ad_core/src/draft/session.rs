//! Snake-draft state machine.
//!
//! A session seeds captains once at creation (top teams by individual score),
//! then advances strictly through `pick`/`auto_pick`/`auto_complete`. Turn
//! order snakes: forward to the last alliance, a double-pick at the boundary,
//! then backward to alliance 1 and again a double-pick. Each one-directional
//! pass is a round.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::Team;
use crate::scoring::ScoringEngine;
use crate::MAX_ALLIANCES;

pub const DEFAULT_NUM_ROUNDS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PickDirection {
    Forward,
    Backward,
}

/// One entry of the append-only pick history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PickRecord {
    pub round: u32,
    pub alliance_number: u32,
    pub team: Team,
}

/// Wire-shape snapshot of a session; field names are the API contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DraftSnapshot {
    pub session_id: String,
    pub event_key: String,
    pub round: u32,
    pub current_alliance: u32,
    pub pick_direction: PickDirection,
    pub alliances: BTreeMap<u32, Vec<Team>>,
    pub available_teams: Vec<Team>,
    pub pick_history: Vec<PickRecord>,
    pub is_complete: bool,
}

/// A single simulated draft.
///
/// Invariant: `available` and the alliance rosters partition the original
/// pool; every team is in exactly one place at every instant.
#[derive(Debug, Clone)]
pub struct DraftSession {
    session_id: String,
    event_key: String,
    num_rounds: u32,
    num_alliances: u32,
    round: u32,
    current_alliance: u32,
    direction: PickDirection,
    alliances: BTreeMap<u32, Vec<Team>>,
    available: Vec<Team>,
    pick_history: Vec<PickRecord>,
    is_complete: bool,
    created_at: DateTime<Utc>,
    engine: ScoringEngine,
}

impl DraftSession {
    /// Seed a new session from an event pool.
    ///
    /// Captains are the top teams by individual score (round-0 privileged
    /// step); the alliance count is capped at eight and chosen so every
    /// alliance can reach its full roster of `1 + num_rounds`.
    pub fn new(event_key: impl Into<String>, pool: &[Team], num_rounds: u32) -> Result<Self> {
        if num_rounds == 0 {
            return Err(CoreError::InvalidConfiguration(
                "num_rounds must be at least 1".to_string(),
            ));
        }

        let engine = ScoringEngine::default();
        let mut sorted: Vec<Team> = pool.to_vec();
        sorted.sort_by(|a, b| {
            engine
                .team_score(b)
                .partial_cmp(&engine.team_score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.team_number.cmp(&b.team_number))
        });

        let roster_size = 1 + num_rounds as usize;
        let num_alliances = MAX_ALLIANCES.min(sorted.len() / roster_size);
        if num_alliances < 2 {
            return Err(CoreError::InsufficientData(
                "not enough teams for a draft".to_string(),
            ));
        }

        let available = sorted.split_off(num_alliances);
        let alliances: BTreeMap<u32, Vec<Team>> = sorted
            .into_iter()
            .enumerate()
            .map(|(i, captain)| (i as u32 + 1, vec![captain]))
            .collect();

        let event_key = event_key.into();
        let session = Self {
            session_id: Uuid::new_v4().to_string(),
            event_key: event_key.clone(),
            num_rounds,
            num_alliances: num_alliances as u32,
            round: 1,
            current_alliance: 1,
            direction: PickDirection::Forward,
            alliances,
            available,
            pick_history: Vec::new(),
            is_complete: false,
            created_at: Utc::now(),
            engine,
        };
        info!(
            "draft session {} created for {event_key}: {num_alliances} alliances, {num_rounds} rounds",
            session.session_id
        );
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn event_key(&self) -> &str {
        &self.event_key
    }

    pub fn num_rounds(&self) -> u32 {
        self.num_rounds
    }

    pub fn num_alliances(&self) -> u32 {
        self.num_alliances
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_alliance(&self) -> u32 {
        self.current_alliance
    }

    pub fn direction(&self) -> PickDirection {
        self.direction
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn available(&self) -> &[Team] {
        &self.available
    }

    pub fn alliances(&self) -> &BTreeMap<u32, Vec<Team>> {
        &self.alliances
    }

    pub fn pick_history(&self) -> &[PickRecord] {
        &self.pick_history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Pick `team_key` for the current alliance and advance the turn.
    ///
    /// Validation happens before any mutation, so a failed pick leaves the
    /// session untouched.
    pub fn pick(&mut self, team_key: &str) -> Result<()> {
        if self.is_complete {
            return Err(CoreError::InvalidState("Draft is complete".to_string()));
        }
        let idx = self
            .available
            .iter()
            .position(|t| t.team_key == team_key)
            .ok_or_else(|| {
                CoreError::InvalidSelection(format!("Team {team_key} is not available"))
            })?;
        if !self.alliances.contains_key(&self.current_alliance) {
            return Err(CoreError::InvalidState(format!(
                "alliance {} has no roster",
                self.current_alliance
            )));
        }

        let team = self.available.remove(idx);
        debug!(
            "session {}: alliance {} picks {} in round {}",
            self.session_id, self.current_alliance, team.team_key, self.round
        );
        self.pick_history.push(PickRecord {
            round: self.round,
            alliance_number: self.current_alliance,
            team: team.clone(),
        });
        if let Some(roster) = self.alliances.get_mut(&self.current_alliance) {
            roster.push(team);
        }
        self.advance();
        Ok(())
    }

    /// Greedy one-step auto pick: the available team that maximizes the
    /// current roster's group total, ties broken by individual score, then
    /// by lowest team number.
    pub fn auto_pick(&mut self) -> Result<()> {
        if self.is_complete {
            return Err(CoreError::InvalidState("Draft is complete".to_string()));
        }

        let key = {
            let roster = self.alliances.get(&self.current_alliance).ok_or_else(|| {
                CoreError::InvalidState(format!("alliance {} has no roster", self.current_alliance))
            })?;

            let mut best: Option<(f64, f64, u32, &str)> = None;
            for candidate in &self.available {
                let mut members: Vec<&Team> = roster.iter().collect();
                members.push(candidate);
                let total = self.engine.group_score(&members).total;
                let individual = self.engine.team_score(candidate);

                let improves = match &best {
                    None => true,
                    Some((t, i, n, _)) => {
                        total > *t
                            || (total == *t
                                && (individual > *i
                                    || (individual == *i && candidate.team_number < *n)))
                    }
                };
                if improves {
                    best = Some((total, individual, candidate.team_number, &candidate.team_key));
                }
            }
            best.map(|(_, _, _, key)| key.to_string())
                .ok_or_else(|| CoreError::InvalidSelection("No available teams".to_string()))?
        };

        self.pick(&key)
    }

    /// Run `auto_pick` until the draft completes. Observably identical to
    /// calling `auto_pick` repeatedly by hand.
    pub fn auto_complete(&mut self) -> Result<()> {
        let max_picks = (self.num_alliances * self.num_rounds) as usize;
        for _ in 0..max_picks {
            if self.is_complete {
                break;
            }
            self.auto_pick()?;
        }
        Ok(())
    }

    pub fn to_snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            session_id: self.session_id.clone(),
            event_key: self.event_key.clone(),
            round: self.round,
            current_alliance: self.current_alliance,
            pick_direction: self.direction,
            alliances: self.alliances.clone(),
            available_teams: self.available.clone(),
            pick_history: self.pick_history.clone(),
            is_complete: self.is_complete,
        }
    }

    /// Snake advancement with the boundary double-pick. The round increments
    /// at each direction flip; once every roster is full (or the pool is dry)
    /// the turn state freezes and the session completes.
    fn advance(&mut self) {
        let roster_size = 1 + self.num_rounds as usize;
        let all_full = self.alliances.values().all(|r| r.len() >= roster_size);
        if all_full || self.available.is_empty() {
            self.is_complete = true;
            info!(
                "draft session {} complete after {} picks",
                self.session_id,
                self.pick_history.len()
            );
            return;
        }

        match self.direction {
            PickDirection::Forward => {
                if self.current_alliance < self.num_alliances {
                    self.current_alliance += 1;
                } else {
                    self.direction = PickDirection::Backward;
                    self.round += 1;
                }
            }
            PickDirection::Backward => {
                if self.current_alliance > 1 {
                    self.current_alliance -= 1;
                } else {
                    self.direction = PickDirection::Forward;
                    self.round += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    /// Team 1 strongest, strictly descending after that.
    fn descending_pool(n: u32) -> Vec<Team> {
        (1..=n)
            .map(|i| {
                let s = (n - i + 1) as f64;
                team(i, 3.0 * s, 2.0 * s, s)
            })
            .collect()
    }

    fn assert_partition_invariant(session: &DraftSession, pool: &[Team]) {
        let mut seen: Vec<&str> = session
            .available()
            .iter()
            .chain(session.alliances().values().flatten())
            .map(|t| t.team_key.as_str())
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = pool.iter().map(|t| t.team_key.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected, "pool partition invariant violated");
    }

    #[test]
    fn test_captain_seeding() {
        let pool = descending_pool(12);
        let session = DraftSession::new("2024test", &pool, 2).unwrap();

        assert_eq!(session.num_alliances(), 4, "min(8, 12 / 3)");
        for (number, roster) in session.alliances() {
            assert_eq!(roster.len(), 1);
            assert_eq!(roster[0].team_number, *number, "captains seeded in score order");
        }
        assert_eq!(session.available().len(), 8);
        assert_eq!(session.round(), 1);
        assert_eq!(session.current_alliance(), 1);
        assert_eq!(session.direction(), PickDirection::Forward);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_snake_visit_order_with_boundary_double_pick() {
        let pool = descending_pool(12);
        let mut session = DraftSession::new("2024test", &pool, 2).unwrap();

        let mut visited = Vec::new();
        let mut rounds = Vec::new();
        while !session.is_complete() {
            visited.push(session.current_alliance());
            rounds.push(session.round());
            session.auto_pick().unwrap();
        }

        assert_eq!(visited, vec![1, 2, 3, 4, 4, 3, 2, 1]);
        assert_eq!(rounds, vec![1, 1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(session.pick_history().len(), 8, "num_alliances * num_rounds");
        assert_partition_invariant(&session, &pool);
    }

    #[test]
    fn test_full_pool_six_team_draft() {
        let pool = descending_pool(6);
        let mut session = DraftSession::new("2024test", &pool, 2).unwrap();

        assert_eq!(session.num_alliances(), 2);
        // Captains are the two strongest teams.
        assert_eq!(session.alliances()[&1][0].team_number, 1);
        assert_eq!(session.alliances()[&2][0].team_number, 2);

        let mut visited = Vec::new();
        while !session.is_complete() {
            visited.push(session.current_alliance());
            session.auto_pick().unwrap();
        }

        assert_eq!(visited, vec![1, 2, 2, 1], "one full snake pass");
        assert!(session.available().is_empty(), "all six teams assigned");
        assert!(session.is_complete());
        assert_partition_invariant(&session, &pool);
    }

    #[test]
    fn test_manual_pick_moves_team() {
        let pool = descending_pool(9);
        let mut session = DraftSession::new("2024test", &pool, 2).unwrap();
        assert_eq!(session.num_alliances(), 3);

        session.pick("frc5").unwrap();
        assert_eq!(session.alliances()[&1].len(), 2);
        assert_eq!(session.alliances()[&1][1].team_key, "frc5");
        assert!(session.available().iter().all(|t| t.team_key != "frc5"));
        assert_eq!(session.current_alliance(), 2);
        assert_eq!(session.pick_history().len(), 1);
        assert_eq!(session.pick_history()[0].alliance_number, 1);
        assert_eq!(session.pick_history()[0].round, 1);
        assert_partition_invariant(&session, &pool);
    }

    #[test]
    fn test_pick_of_rostered_team_fails_without_side_effect() {
        let pool = descending_pool(9);
        let mut session = DraftSession::new("2024test", &pool, 2).unwrap();
        session.pick("frc5").unwrap();

        let before = serde_json::to_string(&session.to_snapshot()).unwrap();
        let err = session.pick("frc5").unwrap_err();
        assert!(matches!(err, CoreError::InvalidSelection(_)));
        assert_eq!(err.to_string(), "Team frc5 is not available");

        let after = serde_json::to_string(&session.to_snapshot()).unwrap();
        assert_eq!(before, after, "failed pick must not mutate the session");
    }

    #[test]
    fn test_unknown_team_fails() {
        let pool = descending_pool(9);
        let mut session = DraftSession::new("2024test", &pool, 2).unwrap();
        assert!(matches!(session.pick("frc9999"), Err(CoreError::InvalidSelection(_))));
    }

    #[test]
    fn test_pick_on_complete_session_fails() {
        let pool = descending_pool(6);
        let mut session = DraftSession::new("2024test", &pool, 2).unwrap();
        session.auto_complete().unwrap();
        assert!(session.is_complete());

        let before = serde_json::to_string(&session.to_snapshot()).unwrap();
        assert!(matches!(session.pick("frc3"), Err(CoreError::InvalidState(_))));
        assert!(matches!(session.auto_pick(), Err(CoreError::InvalidState(_))));
        let after = serde_json::to_string(&session.to_snapshot()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_auto_complete_matches_repeated_auto_pick() {
        let pool = descending_pool(12);

        let mut by_loop = DraftSession::new("2024test", &pool, 2).unwrap();
        while !by_loop.is_complete() {
            by_loop.auto_pick().unwrap();
        }

        let mut by_auto = DraftSession::new("2024test", &pool, 2).unwrap();
        by_auto.auto_complete().unwrap();

        // Session ids differ; the drafted content must not.
        assert_eq!(by_loop.alliances(), by_auto.alliances());
        assert_eq!(by_loop.available(), by_auto.available());
        assert_eq!(by_loop.pick_history(), by_auto.pick_history());
        assert_eq!(by_loop.is_complete(), by_auto.is_complete());
        assert_eq!(by_loop.round(), by_auto.round());
    }

    #[test]
    fn test_auto_pick_prefers_complementary_strength() {
        // Captain 1 is an auto specialist. Candidate 10 has the same raw
        // total as candidate 11 but complements in teleop/endgame, so the
        // synergy term must prefer it.
        let mut pool = vec![
            team(1, 30.0, 0.0, 0.0),
            team(2, 20.0, 0.0, 0.0),
            team(10, 0.0, 6.0, 6.0),
            team(11, 12.0, 0.0, 0.0),
            team(12, 1.0, 1.0, 1.0),
            team(13, 1.0, 1.0, 1.0),
        ];
        pool.sort_by_key(|t| t.team_number);

        let mut session = DraftSession::new("2024test", &pool, 2).unwrap();
        assert_eq!(session.alliances()[&1][0].team_number, 1);
        session.auto_pick().unwrap();
        assert_eq!(
            session.alliances()[&1][1].team_number,
            10,
            "complementary candidate beats equal-total specialist"
        );
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let pool = descending_pool(6);
        assert!(matches!(
            DraftSession::new("2024test", &pool, 0),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_tiny_pool_rejected() {
        let pool = descending_pool(5);
        assert!(matches!(
            DraftSession::new("2024test", &pool, 2),
            Err(CoreError::InsufficientData(_))
        ));
    }
}
