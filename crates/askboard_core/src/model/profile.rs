//! Public profile of a forum user.
//!
//! Profiles are mirrored from the identity provider and are read-only for
//! the forum core, apart from host-driven upserts.

use super::{require_id, require_text, UserId, ValidationError};
use serde::{Deserialize, Serialize};

/// Name shown when a user has no usable profile.
pub const ANONYMOUS_NAME: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    /// Unique, case-insensitive handle.
    pub handle: String,
    pub display_name: Option<String>,
}

impl Profile {
    pub fn new(user_id: UserId, handle: impl Into<String>) -> Self {
        Self {
            user_id,
            handle: handle.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.user_id, "profile user")?;
        require_text(&self.handle, "profile handle")
    }
}

/// Picks the label shown for an author.
///
/// Precedence: non-blank display name, then non-blank handle, then
/// [`ANONYMOUS_NAME`].
pub fn display_label(profile: Option<&Profile>) -> String {
    let Some(profile) = profile else {
        return ANONYMOUS_NAME.to_string();
    };

    profile
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| Some(profile.handle.trim()).filter(|handle| !handle.is_empty()))
        .unwrap_or(ANONYMOUS_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{display_label, Profile, ANONYMOUS_NAME};
    use uuid::Uuid;

    #[test]
    fn display_name_wins_over_handle() {
        let profile = Profile::new(Uuid::new_v4(), "ada").with_display_name("Ada Lovelace");
        assert_eq!(display_label(Some(&profile)), "Ada Lovelace");
    }

    #[test]
    fn blank_display_name_falls_back_to_handle() {
        let profile = Profile::new(Uuid::new_v4(), "ada").with_display_name("   ");
        assert_eq!(display_label(Some(&profile)), "ada");
    }

    #[test]
    fn missing_profile_is_anonymous() {
        assert_eq!(display_label(None), ANONYMOUS_NAME);
        let blank = Profile::new(Uuid::new_v4(), " ");
        assert_eq!(display_label(Some(&blank)), ANONYMOUS_NAME);
    }
}
