//! Agent registry use-case service.
//!
//! # Responsibility
//! - Provide roster entry points for core callers.
//! - Consult the breed directory once before every agent creation.
//!
//! # Invariants
//! - `BreedCheck::Unavailable` is collapsed to "treat as valid" here and only
//!   here; the lookup boundary itself stays policy-free.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::breed::{BreedCheck, BreedDirectory};
use crate::model::agent::{Agent, AgentDraft, AgentId};
use crate::repo::agent_repo::AgentRepository;
use crate::repo::{ListQuery, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for agent use-cases.
#[derive(Debug)]
pub enum AgentServiceError {
    /// The breed directory answered and the breed was not listed.
    UnknownBreed(String),
    /// Persistence-layer failure or rule outcome.
    Repo(RepoError),
}

impl Display for AgentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBreed(breed) => write!(f, "unknown breed: `{breed}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AgentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::UnknownBreed(_) => None,
        }
    }
}

impl From<RepoError> for AgentServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Agent registry facade over repository and breed directory implementations.
pub struct AgentService<R: AgentRepository, B: BreedDirectory> {
    repo: R,
    breeds: B,
}

impl<R: AgentRepository, B: BreedDirectory> AgentService<R, B> {
    /// Creates a service using the provided repository and breed directory.
    pub fn new(repo: R, breeds: B) -> Self {
        Self { repo, breeds }
    }

    /// Creates one agent after a single breed-directory lookup.
    ///
    /// # Contract
    /// - The lookup happens before the store write.
    /// - An unavailable directory never blocks creation (fail-open).
    pub fn create_agent(&self, draft: &AgentDraft) -> Result<Agent, AgentServiceError> {
        draft.validate().map_err(RepoError::from)?;

        match self.breeds.check_breed(&draft.breed) {
            BreedCheck::Confirmed(true) => {}
            BreedCheck::Confirmed(false) => {
                info!(
                    "event=agent_create module=agent status=rejected reason=unknown_breed breed={}",
                    draft.breed
                );
                return Err(AgentServiceError::UnknownBreed(draft.breed.clone()));
            }
            BreedCheck::Unavailable => {
                warn!(
                    "event=agent_create module=agent status=degraded reason=breed_directory_unavailable breed={}",
                    draft.breed
                );
            }
        }

        let agent = self.repo.create_agent(draft)?;
        info!(
            "event=agent_create module=agent status=ok agent_id={}",
            agent.id
        );
        Ok(agent)
    }

    /// Gets one agent by id.
    pub fn get_agent(&self, id: AgentId) -> Result<Option<Agent>, AgentServiceError> {
        Ok(self.repo.get_agent(id)?)
    }

    /// Lists agents using offset/limit pagination.
    pub fn list_agents(&self, query: &ListQuery) -> Result<Vec<Agent>, AgentServiceError> {
        Ok(self.repo.list_agents(query)?)
    }

    /// Updates the agent's salary, the only mutable field.
    pub fn update_salary(&self, id: AgentId, salary: f64) -> Result<Agent, AgentServiceError> {
        Ok(self.repo.update_salary(id, salary)?)
    }

    /// Deletes one agent unconditionally.
    pub fn delete_agent(&self, id: AgentId) -> Result<(), AgentServiceError> {
        self.repo.delete_agent(id)?;
        info!("event=agent_delete module=agent status=ok agent_id={id}");
        Ok(())
    }

    /// Returns whether the agent holds an assigned, incomplete mission.
    pub fn has_active_mission(&self, id: AgentId) -> Result<bool, AgentServiceError> {
        Ok(self.repo.has_active_mission(id)?)
    }
}
