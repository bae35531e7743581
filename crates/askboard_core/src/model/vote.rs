//! Vote domain model and the toggle decision table.
//!
//! # Invariants
//! - A vote targets exactly one question or one answer.
//! - At most one vote exists per (user, target).
//! - Repeating the current direction removes the vote; the opposite
//!   direction flips it in place.

use super::answer::AnswerId;
use super::question::QuestionId;
use super::{require_id, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type VoteId = Uuid;

/// Record a vote applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VoteTarget {
    Question(QuestionId),
    Answer(AnswerId),
}

impl VoteTarget {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Question(id) | Self::Answer(id) => *id,
        }
    }

    /// Stable label used in log events.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Question(_) => "question",
            Self::Answer(_) => "answer",
        }
    }
}

/// Vote polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Stored value: `+1` for up, `-1` for down.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Up),
            -1 => Some(Self::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub uuid: VoteId,
    pub user_id: UserId,
    pub target: VoteTarget,
    pub direction: VoteDirection,
}

impl Vote {
    pub fn new(user_id: UserId, target: VoteTarget, direction: VoteDirection) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            user_id,
            target,
            direction,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.uuid, "vote id")?;
        require_id(self.user_id, "vote user")?;
        require_id(self.target.id(), "vote target")
    }
}

/// Result of reconciling a vote request against stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Inserted,
    Updated,
    Deleted,
}

impl Display for VoteOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Inserted => "inserted",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

/// Store mutation chosen by [`plan_vote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Insert(VoteDirection),
    Flip { vote_id: VoteId, to: VoteDirection },
    Remove { vote_id: VoteId },
}

impl VoteAction {
    pub fn outcome(&self) -> VoteOutcome {
        match self {
            Self::Insert(_) => VoteOutcome::Inserted,
            Self::Flip { .. } => VoteOutcome::Updated,
            Self::Remove { .. } => VoteOutcome::Deleted,
        }
    }
}

/// Decides how a requested direction changes the user's existing vote.
pub fn plan_vote(existing: Option<&Vote>, requested: VoteDirection) -> VoteAction {
    match existing {
        None => VoteAction::Insert(requested),
        Some(vote) if vote.direction == requested => VoteAction::Remove { vote_id: vote.uuid },
        Some(vote) => VoteAction::Flip {
            vote_id: vote.uuid,
            to: requested,
        },
    }
}
