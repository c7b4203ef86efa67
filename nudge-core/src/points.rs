//! Points model: fixed awards, the immutable award-event log, and user
//! balances.
//!
//! Balances are a materialized view over the event log, so a user's
//! `nudge_points` can always be reconstructed with [`tally`] and never
//! drifts from the auditable history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;

/// Points awarded for proposing a task.
pub const PROPOSE_AWARD: u64 = 5;

/// Points awarded for completing a task.
pub const COMPLETE_AWARD: u64 = 10;

/// Why points were awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardReason {
    /// The user proposed a new task.
    ProposedTask,
    /// The user completed a task.
    CompletedTask,
    /// A direct award outside the task lifecycle.
    Manual,
}

impl std::fmt::Display for AwardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProposedTask => write!(f, "proposed_task"),
            Self::CompletedTask => write!(f, "completed_task"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// A single point award. Append-only; events are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEvent {
    /// Username the points were awarded to.
    pub username: String,
    /// Number of points awarded. Always positive; there are no deductions.
    pub amount: u64,
    /// Why the points were awarded.
    pub reason: AwardReason,
    /// The task that triggered the award, if any.
    pub task_id: Option<TaskId>,
    /// When the award was recorded.
    pub awarded_at: DateTime<Utc>,
}

/// A community member with an accumulated point balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Reddit username, the identifying key.
    pub reddit_username: String,
    /// Accumulated nudge points. Only increases, via award events.
    pub nudge_points: u64,
    /// When the user first appeared (first award).
    pub created_at: DateTime<Utc>,
}

/// Folds an event log into per-user balances.
///
/// This is the reconstruction a stored balance must always agree with.
#[must_use]
pub fn tally(events: &[AwardEvent]) -> HashMap<String, u64> {
    let mut balances = HashMap::new();
    for event in events {
        *balances.entry(event.username.clone()).or_insert(0) += event.amount;
    }
    balances
}
