//! Mission rule-engine use-case service.
//!
//! # Responsibility
//! - Provide stable mission/target entry points for core callers.
//! - Delegate invariant enforcement to the repository transactions.
//!
//! # Invariants
//! - Service APIs never bypass repository rule checks.
//! - Service layer remains storage-agnostic.

use crate::model::agent::AgentId;
use crate::model::mission::{Mission, MissionId, Target, TargetDraft, TargetId, TargetUpdate};
use crate::repo::mission_repo::MissionRepository;
use crate::repo::{ListQuery, RepoResult};
use log::info;

/// Mission service facade over repository implementations.
pub struct MissionService<R: MissionRepository> {
    repo: R,
}

impl<R: MissionRepository> MissionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one mission with 1..=3 targets in a single atomic unit.
    pub fn create_mission(&mut self, targets: &[TargetDraft]) -> RepoResult<Mission> {
        let mission = self.repo.create_mission(targets)?;
        info!(
            "event=mission_create module=mission status=ok mission_id={} targets={}",
            mission.id,
            mission.targets.len()
        );
        Ok(mission)
    }

    /// Gets one mission with its targets by id.
    pub fn get_mission(&self, id: MissionId) -> RepoResult<Option<Mission>> {
        self.repo.get_mission(id)
    }

    /// Lists missions using offset/limit pagination.
    pub fn list_missions(&self, query: &ListQuery) -> RepoResult<Vec<Mission>> {
        self.repo.list_missions(query)
    }

    /// Deletes one unassigned mission, cascading its targets.
    pub fn delete_mission(&mut self, id: MissionId) -> RepoResult<()> {
        self.repo.delete_mission(id)?;
        info!("event=mission_delete module=mission status=ok mission_id={id}");
        Ok(())
    }

    /// Assigns an agent to a mission; assignment is permanent.
    pub fn assign_agent(
        &mut self,
        mission_id: MissionId,
        agent_id: AgentId,
    ) -> RepoResult<Mission> {
        let mission = self.repo.assign_agent(mission_id, agent_id)?;
        info!(
            "event=mission_assign module=mission status=ok mission_id={mission_id} agent_id={agent_id}"
        );
        Ok(mission)
    }

    /// Applies a notes/completion update to one target.
    pub fn update_target(
        &mut self,
        target_id: TargetId,
        update: &TargetUpdate,
    ) -> RepoResult<Target> {
        self.repo.update_target(target_id, update)
    }

    /// Gets one target by id.
    pub fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>> {
        self.repo.get_target(id)
    }
}
