//! # ad_core - Alliance Selection & Draft Simulation Engine
//!
//! Scoring, optimization, and draft simulation for multi-team robotics
//! events, with a JSON API for easy integration with a presentation layer.
//!
//! ## Features
//! - Weighted team/group scoring with a pluggable synergy policy
//! - Greedy sequential-best alliance partitioning (deterministic output)
//! - Resumable snake-draft sessions with manual and automatic picks
//! - Complement search: who best covers a target team's weaknesses

pub mod api;
pub mod complement;
pub mod data;
pub mod draft;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod scoring;

// Re-export the JSON boundary
pub use api::{
    auto_complete_json, auto_pick_json, complements_json, get_draft_json,
    load_event_teams_json, make_pick_json, optimal_alliances_json, start_draft_json,
};
pub use error::{CoreError, Result};

// Re-export the engine types
pub use complement::{ComplementCandidate, ComplementFinder};
pub use data::EventCatalog;
pub use draft::{DraftSession, DraftSnapshot, PickDirection, PickRecord, SessionStore};
pub use models::{Alliance, Phase, Team};
pub use optimizer::{AllianceOptimizer, OptimizerConfig};
pub use scoring::{
    AllianceWeights, GroupScore, PhaseCoverageSynergy, PhaseThresholds, ScoringEngine,
    SynergyModel,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event convention: at most eight alliances, whether proposed or drafted.
pub const MAX_ALLIANCES: usize = 8;
