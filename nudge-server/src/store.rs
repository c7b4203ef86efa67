//! Persistent-store boundary for tasks, users, and award events.
//!
//! The [`Store`] trait captures exactly the operations the ledger depends
//! on; [`MemoryStore`] is the in-process implementation. Status changes go
//! through a conditional update executed under the store's write lock, so
//! two racing claimers can never both observe an `open` task.
//!
//! Point balances are a materialized view over the append-only award-event
//! log: every [`record_award`](Store::record_award) appends an event and
//! bumps the derived balance in the same critical section.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use nudge_core::{AwardEvent, AwardReason, Task, TaskDraft, TaskId, TaskStatus, User};
use tokio::sync::RwLock;

/// Errors that can occur at the store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No task exists with the given ID.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// A conditional update found the task in a different status.
    #[error("conditional update rejected: task {task_id} is {actual}")]
    StatusConflict {
        /// The task whose update was rejected.
        task_id: TaskId,
        /// The status the task actually had at commit time.
        actual: TaskStatus,
    },
    /// The store could not be reached or failed internally.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The persistent-store operations the ledger depends on.
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates a task from a validated draft, assigning its ID and
    /// creation timestamp. New tasks are `open` with no claimer.
    async fn create_task(&self, draft: TaskDraft) -> Result<Task, StoreError>;

    /// Fetches a single task by ID.
    async fn get_task(&self, task_id: &TaskId) -> Result<Task, StoreError>;

    /// Lists all tasks, newest first.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Conditionally transitions a task's status.
    ///
    /// The update commits only if the task's current status is one of
    /// `expected`, checked and applied atomically. A `claimer` is recorded
    /// only if the task has none yet; an existing claimer is never
    /// replaced.
    async fn update_task_status(
        &self,
        task_id: &TaskId,
        expected: &[TaskStatus],
        new_status: TaskStatus,
        claimer: Option<&str>,
    ) -> Result<Task, StoreError>;

    /// Appends an award event and updates the user's balance, creating the
    /// user record on first appearance. Returns the new balance.
    async fn record_award(
        &self,
        username: &str,
        amount: u64,
        reason: AwardReason,
        task_id: Option<TaskId>,
    ) -> Result<u64, StoreError>;

    /// Returns up to `limit` users ordered by points, highest first.
    async fn leaderboard(&self, limit: usize) -> Result<Vec<User>, StoreError>;

    /// Returns all award events for a user, oldest first.
    async fn award_history(&self, username: &str) -> Result<Vec<AwardEvent>, StoreError>;
}

#[derive(Default)]
struct StoreInner {
    tasks: HashMap<TaskId, Task>,
    events: Vec<AwardEvent>,
    users: HashMap<String, User>,
}

/// In-memory store implementation.
///
/// Thread-safe via a single [`RwLock`]; every mutation holds the write
/// lock for the whole read-check-write sequence, which is what makes the
/// conditional status update a compare-and-swap.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = Task {
            id: TaskId::new(),
            description: draft.description,
            location: draft.location,
            contact_method: draft.contact_method,
            proposer: draft.proposer,
            claimer: None,
            status: TaskStatus::Open,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        inner.tasks.insert(task.id.clone(), task.clone());
        drop(inner);
        Ok(task)
    }

    async fn get_task(&self, task_id: &TaskId) -> Result<Task, StoreError> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner.tasks.values().cloned().collect();
        drop(inner);
        // Newest first; TaskId (UUID v7) breaks created_at ties in creation order.
        tasks.sort_by(|a, b| (&b.created_at, b.id.as_uuid()).cmp(&(&a.created_at, a.id.as_uuid())));
        Ok(tasks)
    }

    async fn update_task_status(
        &self,
        task_id: &TaskId,
        expected: &[TaskStatus],
        new_status: TaskStatus,
        claimer: Option<&str>,
    ) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;

        if !expected.contains(&task.status) {
            return Err(StoreError::StatusConflict {
                task_id: task_id.clone(),
                actual: task.status,
            });
        }

        task.status = new_status;
        if let Some(claimer) = claimer
            && task.claimer.is_none()
        {
            task.claimer = Some(claimer.to_string());
        }
        Ok(task.clone())
    }

    async fn record_award(
        &self,
        username: &str,
        amount: u64,
        reason: AwardReason,
        task_id: Option<TaskId>,
    ) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        inner.events.push(AwardEvent {
            username: username.to_string(),
            amount,
            reason,
            task_id,
            awarded_at: now,
        });
        let user = inner
            .users
            .entry(username.to_string())
            .or_insert_with(|| User {
                reddit_username: username.to_string(),
                nudge_points: 0,
                created_at: now,
            });
        user.nudge_points += amount;
        Ok(user.nudge_points)
    }

    async fn leaderboard(&self, limit: usize) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        drop(inner);
        users.sort_by(|a, b| {
            b.nudge_points
                .cmp(&a.nudge_points)
                .then_with(|| a.reddit_username.cmp(&b.reddit_username))
        });
        users.truncate(limit);
        Ok(users)
    }

    async fn award_history(&self, username: &str) -> Result<Vec<AwardEvent>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .events
            .iter()
            .filter(|event| event.username == username)
            .cloned()
            .collect())
    }
}
