//! TheCatAPI-backed breed directory client.
//!
//! # Responsibility
//! - Fetch the known breed list over HTTP and match names case-insensitively.
//! - Collapse every transport or decode failure into `BreedCheck::Unavailable`.
//!
//! # Invariants
//! - One synchronous GET per lookup, bounded by a fixed timeout.
//! - This client never blocks agent creation on its own failures.

use crate::breed::{BreedCheck, BreedDirectory};
use log::warn;
use serde::Deserialize;
use std::time::Duration;

/// Default directory endpoint, overridable via the `CAT_API_URL` environment
/// variable.
pub const DEFAULT_CAT_API_URL: &str = "https://api.thecatapi.com/v1";

const CAT_API_URL_ENV: &str = "CAT_API_URL";
const BREED_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct BreedEntry {
    #[serde(default)]
    name: String,
}

/// Synchronous breed directory backed by TheCatAPI `/breeds` listing.
pub struct CatApiBreedDirectory {
    agent: ureq::Agent,
    base_url: String,
}

impl CatApiBreedDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(BREED_LOOKUP_TIMEOUT)
                .build(),
            base_url: base_url.into(),
        }
    }

    /// Builds a directory from `CAT_API_URL`, falling back to the default
    /// public endpoint.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(CAT_API_URL_ENV).unwrap_or_else(|_| DEFAULT_CAT_API_URL.to_string());
        Self::new(base_url)
    }
}

impl BreedDirectory for CatApiBreedDirectory {
    fn check_breed(&self, breed: &str) -> BreedCheck {
        let url = format!("{}/breeds", self.base_url);

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(err) => {
                warn!("event=breed_lookup module=breed status=unavailable error={err}");
                return BreedCheck::Unavailable;
            }
        };

        match response.into_json::<Vec<BreedEntry>>() {
            Ok(entries) => BreedCheck::Confirmed(breed_listed(&entries, breed)),
            Err(err) => {
                warn!(
                    "event=breed_lookup module=breed status=unavailable error_code=decode_failed error={err}"
                );
                BreedCheck::Unavailable
            }
        }
    }
}

fn breed_listed(entries: &[BreedEntry], breed: &str) -> bool {
    let wanted = breed.to_lowercase();
    entries
        .iter()
        .any(|entry| entry.name.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::{breed_listed, BreedEntry};

    fn entries(names: &[&str]) -> Vec<BreedEntry> {
        names
            .iter()
            .map(|name| BreedEntry {
                name: (*name).to_string(),
            })
            .collect()
    }

    #[test]
    fn matching_is_case_insensitive() {
        let known = entries(&["Maine Coon", "Siamese"]);
        assert!(breed_listed(&known, "maine coon"));
        assert!(breed_listed(&known, "SIAMESE"));
    }

    #[test]
    fn unknown_breed_is_not_listed() {
        let known = entries(&["Maine Coon"]);
        assert!(!breed_listed(&known, "Dachshund"));
        assert!(!breed_listed(&[], "Maine Coon"));
    }
}
