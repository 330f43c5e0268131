//! Domain model for agents, missions and targets.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Enforce the field-level validation boundary for create/update input.
//!
//! # Invariants
//! - Every domain object is identified by a stable integer id assigned by the
//!   store at creation.
//! - Mission -> Target is exclusive ownership; Mission -> Agent is a
//!   non-owning reference with no stored back-pointer.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod agent;
pub mod mission;

/// Field-level validation failure for draft input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Agent name must be non-empty.
    EmptyAgentName,
    /// Agent breed must be non-empty.
    EmptyBreed,
    /// Agent salary must be strictly positive.
    NonPositiveSalary,
    /// Target name must be non-empty.
    EmptyTargetName,
    /// Target country must be non-empty.
    EmptyTargetCountry,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAgentName => write!(f, "agent name cannot be empty"),
            Self::EmptyBreed => write!(f, "agent breed cannot be empty"),
            Self::NonPositiveSalary => write!(f, "agent salary must be greater than zero"),
            Self::EmptyTargetName => write!(f, "target name cannot be empty"),
            Self::EmptyTargetCountry => write!(f, "target country cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
