//! External breed directory boundary.
//!
//! # Responsibility
//! - Define the lookup contract consulted once during agent creation.
//! - Keep the two lookup outcomes (confirmed vs unavailable) explicit so the
//!   fail-open policy lives at the call site, not inside the client.
//!
//! # Invariants
//! - `Unavailable` is a boundary condition, never an error surfaced to callers.
//! - Breed-name matching is case-insensitive.

pub mod cat_api;

/// Outcome of one breed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreedCheck {
    /// The directory answered; `true` iff the breed name was listed.
    Confirmed(bool),
    /// The directory could not be consulted (timeout, non-success response,
    /// malformed body). Callers treat this as valid.
    Unavailable,
}

/// Lookup contract for validating agent breeds at creation time.
pub trait BreedDirectory {
    fn check_breed(&self, breed: &str) -> BreedCheck;
}
