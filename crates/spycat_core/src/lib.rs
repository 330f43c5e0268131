//! Core domain logic for the Spy Cat Agency.
//! This crate is the single source of truth for mission/assignment invariants.

pub mod breed;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use breed::cat_api::{CatApiBreedDirectory, DEFAULT_CAT_API_URL};
pub use breed::{BreedCheck, BreedDirectory};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::agent::{Agent, AgentDraft, AgentId};
pub use model::mission::{
    Mission, MissionId, Target, TargetDraft, TargetId, TargetUpdate, MAX_TARGETS, MIN_TARGETS,
};
pub use model::ValidationError;
pub use repo::agent_repo::{AgentRepository, SqliteAgentRepository};
pub use repo::mission_repo::{MissionRepository, SqliteMissionRepository};
pub use repo::{EntityKind, ListQuery, RepoError, RepoResult};
pub use service::agent_service::{AgentService, AgentServiceError};
pub use service::mission_service::MissionService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "operational"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_reports_operational() {
        assert_eq!(ping(), "operational");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
