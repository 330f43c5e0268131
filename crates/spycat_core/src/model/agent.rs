//! Agent ("spy cat") domain model.
//!
//! # Responsibility
//! - Define the roster record and its creation draft.
//! - Enforce agent field rules at the validation boundary.
//!
//! # Invariants
//! - `salary` is the only field mutable after creation.
//! - Breed plausibility is checked externally at creation time, never here.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Stable identifier for a roster agent.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Identifiers are opaque integers assigned by the store at creation.
pub type AgentId = i64;

/// Roster member eligible for mission assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Store-assigned stable id.
    pub id: AgentId,
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

/// Creation input for a new agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDraft {
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

impl AgentDraft {
    pub fn new(
        name: impl Into<String>,
        years_of_experience: u32,
        breed: impl Into<String>,
        salary: f64,
    ) -> Self {
        Self {
            name: name.into(),
            years_of_experience,
            breed: breed.into(),
            salary,
        }
    }

    /// Checks field rules before the draft reaches persistence.
    ///
    /// Years of experience are non-negative by construction (`u32`).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyAgentName);
        }
        if self.breed.trim().is_empty() {
            return Err(ValidationError::EmptyBreed);
        }
        if self.salary <= 0.0 {
            return Err(ValidationError::NonPositiveSalary);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AgentDraft;
    use crate::model::ValidationError;

    #[test]
    fn valid_draft_passes() {
        let draft = AgentDraft::new("Whiskers", 3, "Maine Coon", 4200.0);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let draft = AgentDraft::new("   ", 3, "Maine Coon", 4200.0);
        assert_eq!(draft.validate(), Err(ValidationError::EmptyAgentName));
    }

    #[test]
    fn blank_breed_is_rejected() {
        let draft = AgentDraft::new("Whiskers", 3, "", 4200.0);
        assert_eq!(draft.validate(), Err(ValidationError::EmptyBreed));
    }

    #[test]
    fn non_positive_salary_is_rejected() {
        let draft = AgentDraft::new("Whiskers", 3, "Maine Coon", 0.0);
        assert_eq!(draft.validate(), Err(ValidationError::NonPositiveSalary));
    }
}
