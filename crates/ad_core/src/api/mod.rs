//! JSON boundary for the engine.
//!
//! The presentation layer talks to these functions with request/response
//! strings; the process-wide catalog and session store live here so a host
//! can wire the whole engine with no setup beyond loading event pools.

pub mod draft_json;
pub mod predict_json;
pub mod types;


use once_cell::sync::Lazy;

use crate::data::EventCatalog;
use crate::draft::SessionStore;

static CATALOG: Lazy<EventCatalog> = Lazy::new(EventCatalog::new);
static SESSIONS: Lazy<SessionStore> = Lazy::new(SessionStore::new);

/// The process-wide event catalog behind the JSON API.
pub fn catalog() -> &'static EventCatalog {
    &CATALOG
}

/// The process-wide session store behind the JSON API.
pub fn sessions() -> &'static SessionStore {
    &SESSIONS
}

pub use draft_json::{
    auto_complete_json, auto_pick_json, get_draft_json, load_event_teams_json, make_pick_json,
    start_draft_json,
};
pub use predict_json::{complements_json, optimal_alliances_json};
pub use types::{
    ComplementResponse, DraftPickRequest, DraftSessionRequest, ErrorResponse,
    LoadEventTeamsRequest, LoadEventTeamsResponse, OptimalAlliancesRequest,
    OptimalAlliancesResponse, StartDraftRequest,
};
