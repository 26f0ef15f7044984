//! Draft lifecycle over the JSON boundary.
//!
//! Every function takes a JSON request string and returns either the
//! serialized response or a human-readable detail string for the caller to
//! surface verbatim.

use super::types::{DraftPickRequest, DraftSessionRequest, LoadEventTeamsRequest,
    LoadEventTeamsResponse, StartDraftRequest};
use super::{catalog, sessions};

/// Register an event's resolved team pool.
pub fn load_event_teams_json(request_json: &str) -> Result<String, String> {
    let request: LoadEventTeamsRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;

    let team_count = catalog().load(&request.event_key, request.teams);
    let response = LoadEventTeamsResponse { event_key: request.event_key, team_count };
    serde_json::to_string(&response).map_err(|e| e.to_string())
}

/// Start a draft for a previously loaded event.
pub fn start_draft_json(request_json: &str) -> Result<String, String> {
    let request: StartDraftRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;

    let teams = catalog().teams(&request.event_key).map_err(|e| e.to_string())?;
    let snapshot = sessions()
        .create(&request.event_key, &teams, request.num_rounds)
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&snapshot).map_err(|e| e.to_string())
}

/// Make a manual pick for the alliance currently on the clock.
pub fn make_pick_json(request_json: &str) -> Result<String, String> {
    let request: DraftPickRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;

    let snapshot = sessions()
        .with_session(&request.session_id, |session| {
            session.pick(&request.team_key)?;
            Ok(session.to_snapshot())
        })
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&snapshot).map_err(|e| e.to_string())
}

/// Let the engine pick for the alliance currently on the clock.
pub fn auto_pick_json(request_json: &str) -> Result<String, String> {
    let request: DraftSessionRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;

    let snapshot = sessions()
        .with_session(&request.session_id, |session| {
            session.auto_pick()?;
            Ok(session.to_snapshot())
        })
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&snapshot).map_err(|e| e.to_string())
}

/// Run the draft to completion with engine picks.
pub fn auto_complete_json(request_json: &str) -> Result<String, String> {
    let request: DraftSessionRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;

    let snapshot = sessions()
        .with_session(&request.session_id, |session| {
            session.auto_complete()?;
            Ok(session.to_snapshot())
        })
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&snapshot).map_err(|e| e.to_string())
}

/// Fetch a session snapshot without mutating it.
pub fn get_draft_json(session_id: &str) -> Result<String, String> {
    let snapshot = sessions().snapshot(session_id).map_err(|e| e.to_string())?;
    serde_json::to_string(&snapshot).map_err(|e| e.to_string())
}
