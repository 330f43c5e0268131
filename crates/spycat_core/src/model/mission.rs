//! Mission and target domain model.
//!
//! # Responsibility
//! - Define the mission aggregate and its owned targets.
//! - Enforce target field rules and the 1..=3 target-count rule.
//!
//! # Invariants
//! - A mission always owns between `MIN_TARGETS` and `MAX_TARGETS` targets,
//!   fixed at creation.
//! - `is_complete` flags are monotonic: they move false -> true and never back.
//! - `agent_id` is set at most once for the mission's lifetime.

use crate::model::agent::AgentId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Stable identifier for a mission.
pub type MissionId = i64;

/// Stable identifier for a target.
pub type TargetId = i64;

/// Minimum number of targets a mission must own.
pub const MIN_TARGETS: usize = 1;

/// Maximum number of targets a mission may own.
pub const MAX_TARGETS: usize = 3;

/// Unit of work containing 1..=3 targets, optionally assigned to one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Store-assigned stable id.
    pub id: MissionId,
    /// Assigned agent, set at most once. May dangle after agent deletion.
    pub agent_id: Option<AgentId>,
    /// True only once every owned target is complete; never unset.
    pub is_complete: bool,
    /// Owned targets in creation order.
    pub targets: Vec<Target>,
}

impl Mission {
    /// Returns whether this mission counts toward its agent's workload.
    ///
    /// An active mission is assigned and not yet complete.
    pub fn is_active(&self) -> bool {
        self.agent_id.is_some() && !self.is_complete
    }
}

/// Sub-objective of a mission with notes and an independent completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Store-assigned stable id.
    pub id: TargetId,
    /// Owning mission reference.
    pub mission_id: MissionId,
    pub name: String,
    pub country: String,
    /// Free-text notes, editable only while target and mission are incomplete.
    pub notes: String,
    pub is_complete: bool,
}

/// Creation input for one target inside `create_mission`.
///
/// Targets start incomplete; notes default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDraft {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: String,
}

impl TargetDraft {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            notes: String::new(),
        }
    }

    /// Checks field rules before the draft reaches persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTargetName);
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::EmptyTargetCountry);
        }
        Ok(())
    }
}

/// Partial update input for `update_target`.
///
/// Both fields are optional; when `notes` is present but locked by completion
/// state, the whole update is rejected and no field is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUpdate {
    pub notes: Option<String>,
    pub is_complete: Option<bool>,
}

impl TargetUpdate {
    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            is_complete: None,
        }
    }

    pub fn complete() -> Self {
        Self {
            notes: None,
            is_complete: Some(true),
        }
    }
}

/// Checks the mission target-count rule for creation input.
pub fn target_count_in_range(count: usize) -> bool {
    (MIN_TARGETS..=MAX_TARGETS).contains(&count)
}

#[cfg(test)]
mod tests {
    use super::{target_count_in_range, Mission, TargetDraft};
    use crate::model::ValidationError;

    #[test]
    fn target_count_bounds() {
        assert!(!target_count_in_range(0));
        assert!(target_count_in_range(1));
        assert!(target_count_in_range(3));
        assert!(!target_count_in_range(4));
    }

    #[test]
    fn draft_field_rules() {
        assert!(TargetDraft::new("T1", "FR").validate().is_ok());
        assert_eq!(
            TargetDraft::new("", "FR").validate(),
            Err(ValidationError::EmptyTargetName)
        );
        assert_eq!(
            TargetDraft::new("T1", "  ").validate(),
            Err(ValidationError::EmptyTargetCountry)
        );
    }

    #[test]
    fn mission_activity_requires_assignment_and_incompleteness() {
        let mut mission = Mission {
            id: 1,
            agent_id: None,
            is_complete: false,
            targets: Vec::new(),
        };
        assert!(!mission.is_active());

        mission.agent_id = Some(7);
        assert!(mission.is_active());

        mission.is_complete = true;
        assert!(!mission.is_active());
    }
}
