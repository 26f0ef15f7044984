//! Stateless prediction endpoints: optimal alliances and complements.

use super::types::{ComplementResponse, OptimalAlliancesRequest, OptimalAlliancesResponse};
use super::catalog;
use crate::complement::ComplementFinder;
use crate::optimizer::AllianceOptimizer;

/// Partition a loaded event's pool into ranked alliances.
pub fn optimal_alliances_json(request_json: &str) -> Result<String, String> {
    let request: OptimalAlliancesRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;

    let teams = catalog().teams(&request.event_key).map_err(|e| e.to_string())?;
    let optimizer =
        AllianceOptimizer::new(request.weights.unwrap_or_default()).map_err(|e| e.to_string())?;
    let alliances = optimizer.compute(&teams).map_err(|e| e.to_string())?;

    let response = OptimalAlliancesResponse { event_key: request.event_key, alliances };
    serde_json::to_string(&response).map_err(|e| e.to_string())
}

/// Rank the best remaining partners for a target team at an event.
pub fn complements_json(event_key: &str, team_key: &str) -> Result<String, String> {
    let teams = catalog().teams(event_key).map_err(|e| e.to_string())?;
    let target = catalog().team(event_key, team_key).map_err(|e| e.to_string())?;

    let finder = ComplementFinder::default();
    let complements = finder.find(&target, &teams).map_err(|e| e.to_string())?;

    let response = ComplementResponse { target_team: target, complements };
    serde_json::to_string(&response).map_err(|e| e.to_string())
}
