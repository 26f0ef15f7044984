//! Event catalog: resolved team pools, keyed by event.
//!
//! External data sync (statistics providers, databases) happens outside the
//! engine; callers register each event's resolved pool here once and the
//! draft/optimizer/complement operations look it up by `event_key`.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::info;

use crate::error::{CoreError, Result};
use crate::models::Team;

pub struct EventCatalog {
    events: RwLock<HashMap<String, Vec<Team>>>,
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventCatalog {
    pub fn new() -> Self {
        Self { events: RwLock::new(HashMap::new()) }
    }

    /// Register (or replace) an event's team pool; returns the pool size.
    pub fn load(&self, event_key: impl Into<String>, teams: Vec<Team>) -> usize {
        let event_key = event_key.into();
        let count = teams.len();
        info!("loaded {count} teams for event {event_key}");
        self.events.write().expect("event catalog lock poisoned").insert(event_key, teams);
        count
    }

    /// The event's full pool, cloned for the caller.
    pub fn teams(&self, event_key: &str) -> Result<Vec<Team>> {
        let events = self.events.read().expect("event catalog lock poisoned");
        let teams = events
            .get(event_key)
            .ok_or_else(|| CoreError::NotFound(format!("Event not found: {event_key}")))?;
        if teams.is_empty() {
            return Err(CoreError::InsufficientData(format!(
                "no team data available for event {event_key}"
            )));
        }
        Ok(teams.clone())
    }

    /// A single team within an event.
    pub fn team(&self, event_key: &str, team_key: &str) -> Result<Team> {
        self.teams(event_key)?
            .into_iter()
            .find(|t| t.team_key == team_key)
            .ok_or_else(|| {
                CoreError::NotFound(format!("Team {team_key} not found at event {event_key}"))
            })
    }

    pub fn contains(&self, event_key: &str) -> bool {
        self.events.read().expect("event catalog lock poisoned").contains_key(event_key)
    }
}
