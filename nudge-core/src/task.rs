//! Task model and lifecycle rules for `NeighborNudge`.
//!
//! A task is a small help-offer posted by a `proposer`, optionally claimed
//! by a `claimer`, and eventually completed. The lifecycle is
//! `open -> in_progress -> completed`, with `completed` terminal and the
//! claimer immutable once set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Maximum allowed location length in characters.
pub const MAX_LOCATION_LENGTH: usize = 100;

/// Maximum allowed contact method length in characters.
pub const MAX_CONTACT_LENGTH: usize = 100;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Posted and available for a helper to claim.
    Open,
    /// Claimed by a helper and being worked on.
    InProgress,
    /// Done. Terminal: no further transitions.
    Completed,
}

impl TaskStatus {
    /// Returns `true` if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns `true` if the task can still be claimed.
    ///
    /// Only `open` tasks are claimable; a claimer, once set, is never
    /// replaced.
    #[must_use]
    pub const fn can_claim(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A help-offer task on the community board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (UUID v7, time-ordered), assigned by the store.
    pub id: TaskId,
    /// What the proposer is offering to help with.
    pub description: String,
    /// Where the help is offered.
    pub location: String,
    /// How to reach the proposer (e.g. "DM", a phone number).
    pub contact_method: String,
    /// Username of the task's creator.
    pub proposer: String,
    /// Username of the helper who claimed the task; `None` while open.
    pub claimer: Option<String>,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// When the task was created, assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when validating task input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task description cannot be empty.
    #[error("task description cannot be empty")]
    DescriptionEmpty,
    /// Task description exceeds the maximum length.
    #[error("task description too long (max {MAX_DESCRIPTION_LENGTH} characters)")]
    DescriptionTooLong,
    /// Location cannot be empty.
    #[error("location cannot be empty")]
    LocationEmpty,
    /// Location exceeds the maximum length.
    #[error("location too long (max {MAX_LOCATION_LENGTH} characters)")]
    LocationTooLong,
    /// Contact method cannot be empty.
    #[error("contact method cannot be empty")]
    ContactEmpty,
    /// Contact method exceeds the maximum length.
    #[error("contact method too long (max {MAX_CONTACT_LENGTH} characters)")]
    ContactTooLong,
    /// Proposer username cannot be empty.
    #[error("proposer username cannot be empty")]
    ProposerEmpty,
}

/// Input for proposing a new task.
///
/// Validated with [`TaskDraft::validate`] before anything touches the
/// store; a draft that fails validation creates no task and awards no
/// points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// What the proposer is offering to help with.
    pub description: String,
    /// Where the help is offered.
    pub location: String,
    /// How to reach the proposer.
    pub contact_method: String,
    /// Username of the task's creator.
    pub proposer: String,
}

impl TaskDraft {
    /// Trims every field and checks the required/bounded-length rules.
    ///
    /// Returns the trimmed draft on success, so downstream code never sees
    /// leading or trailing whitespace.
    ///
    /// # Errors
    ///
    /// Returns the [`TaskError`] variant for the first field that is empty
    /// after trimming or exceeds its length bound.
    pub fn validate(self) -> Result<Self, TaskError> {
        let description = self.description.trim().to_string();
        let location = self.location.trim().to_string();
        let contact_method = self.contact_method.trim().to_string();
        let proposer = self.proposer.trim().to_string();

        if description.is_empty() {
            return Err(TaskError::DescriptionEmpty);
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(TaskError::DescriptionTooLong);
        }
        if location.is_empty() {
            return Err(TaskError::LocationEmpty);
        }
        if location.chars().count() > MAX_LOCATION_LENGTH {
            return Err(TaskError::LocationTooLong);
        }
        if contact_method.is_empty() {
            return Err(TaskError::ContactEmpty);
        }
        if contact_method.chars().count() > MAX_CONTACT_LENGTH {
            return Err(TaskError::ContactTooLong);
        }
        if proposer.is_empty() {
            return Err(TaskError::ProposerEmpty);
        }

        Ok(Self {
            description,
            location,
            contact_method,
            proposer,
        })
    }
}
