//! Request/response payloads for the JSON boundary.
//!
//! Field names are the compatibility contract with the presentation layer;
//! they mirror the HTTP payloads the frontend already speaks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::complement::ComplementCandidate;
use crate::draft::DEFAULT_NUM_ROUNDS;
use crate::models::{Alliance, Team};
use crate::scoring::AllianceWeights;

#[derive(Debug, Deserialize)]
pub struct LoadEventTeamsRequest {
    pub event_key: String,
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct LoadEventTeamsResponse {
    pub event_key: String,
    pub team_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct StartDraftRequest {
    pub event_key: String,
    #[serde(default = "default_num_rounds")]
    pub num_rounds: u32,
}

fn default_num_rounds() -> u32 {
    DEFAULT_NUM_ROUNDS
}

#[derive(Debug, Deserialize)]
pub struct DraftPickRequest {
    pub session_id: String,
    pub team_key: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OptimalAlliancesRequest {
    pub event_key: String,
    #[serde(default)]
    pub weights: Option<AllianceWeights>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct OptimalAlliancesResponse {
    pub event_key: String,
    pub alliances: Vec<Alliance>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ComplementResponse {
    pub target_team: Team,
    pub complements: Vec<ComplementCandidate>,
}

/// Error payload rendered verbatim by the presentation layer.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
