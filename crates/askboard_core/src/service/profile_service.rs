//! Author name resolution.
//!
//! # Invariants
//! - Resolution never fails the caller: missing profiles and store failures
//!   both yield [`ANONYMOUS_NAME`].
//! - Precedence is display name, then handle, then the fallback.

use crate::model::profile::{display_label, ANONYMOUS_NAME};
use crate::model::UserId;
use crate::repo::profile_repo::ProfileRepository;
use log::warn;
use std::collections::HashMap;

/// Resolves user ids into display names.
pub struct ProfileResolver<P: ProfileRepository> {
    repo: P,
}

impl<P: ProfileRepository> ProfileResolver<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    /// Resolves one author name.
    pub fn resolve(&self, user_id: UserId) -> String {
        match self.repo.get_profile(user_id) {
            Ok(profile) => display_label(profile.as_ref()),
            Err(err) => {
                warn!(
                    "event=profile_resolve module=service status=fallback error_code=profile_lookup_failed error={err}"
                );
                ANONYMOUS_NAME.to_string()
            }
        }
    }

    /// Resolves many author names with one grouped lookup.
    ///
    /// Every requested id is present in the result. When the grouped lookup
    /// fails, ids are resolved one by one so a single bad row cannot blank
    /// the rest.
    pub fn resolve_many(&self, user_ids: &[UserId]) -> HashMap<UserId, String> {
        let mut unique: Vec<UserId> = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if !unique.contains(user_id) {
                unique.push(*user_id);
            }
        }

        match self.repo.get_profiles(&unique) {
            Ok(profiles) => {
                let by_user: HashMap<UserId, _> = profiles
                    .iter()
                    .map(|profile| (profile.user_id, profile))
                    .collect();
                unique
                    .into_iter()
                    .map(|user_id| {
                        let label = display_label(by_user.get(&user_id).copied());
                        (user_id, label)
                    })
                    .collect()
            }
            Err(err) => {
                warn!(
                    "event=profile_resolve_many module=service status=fallback error_code=grouped_lookup_failed count={} error={err}",
                    unique.len()
                );
                unique
                    .into_iter()
                    .map(|user_id| (user_id, self.resolve(user_id)))
                    .collect()
            }
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> P {
        self.repo
    }
}
