//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and boundary calls into use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod agent_service;
pub mod mission_service;
