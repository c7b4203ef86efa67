//! Task & Points Ledger: the rules layer over the store.
//!
//! Enforces the task lifecycle (`open -> in_progress -> completed`) and
//! awards points as a side effect of transitions. All failures are
//! reported synchronously to the caller; a points-award failure after a
//! successful task mutation is logged and never unwinds the mutation.

use std::sync::Arc;

use nudge_core::{
    AwardEvent, AwardReason, COMPLETE_AWARD, PROPOSE_AWARD, Task, TaskDraft, TaskError, TaskId,
    TaskStatus, User,
};

use crate::store::{Store, StoreError};

/// Default number of leaderboard entries returned.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 5;

/// Errors that can occur during ledger operations.
///
/// Each rejection is distinct so callers can explain *why* an action
/// failed rather than emit a generic failure.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A task field failed validation; nothing was created.
    #[error(transparent)]
    Validation(#[from] TaskError),
    /// The acting username was empty after trimming.
    #[error("username cannot be empty")]
    EmptyUsername,
    /// A points award must be a positive amount.
    #[error("award amount must be positive")]
    ZeroAward,
    /// No task exists with the given ID.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// A proposer tried to claim their own task.
    #[error("task {0} cannot be claimed by its own proposer")]
    SelfClaim(TaskId),
    /// The task was claimed or completed by someone else first.
    #[error("task {task_id} is no longer open (currently {status})")]
    TaskNotOpen {
        /// The task whose claim was rejected.
        task_id: TaskId,
        /// The status the task had at commit time.
        status: TaskStatus,
    },
    /// The task is terminal; completing it again is rejected.
    #[error("task already completed: {0}")]
    AlreadyCompleted(TaskId),
    /// The store could not be reached or failed internally.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TaskNotFound(id) => Self::TaskNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// The rules layer for task transitions and point accrual.
///
/// Holds the store behind an [`Arc`] so the ledger can be shared across
/// request handlers, and so tests can substitute failure-injecting stores.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
}

impl Ledger {
    /// Creates a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Proposes a new task and awards the proposer 5 points.
    ///
    /// Validation runs before anything touches the store: a rejected draft
    /// creates no task and awards no points. The award itself is a
    /// secondary effect; if it fails the created task still stands.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if any field is empty after
    /// trimming or exceeds its length bound, or [`LedgerError::Store`] if
    /// the create fails.
    pub async fn propose(&self, draft: TaskDraft) -> Result<Task, LedgerError> {
        let draft = draft.validate()?;
        let task = self.store.create_task(draft).await?;
        tracing::info!(task_id = %task.id, proposer = %task.proposer, "task proposed");

        if let Err(e) = self
            .store
            .record_award(
                &task.proposer,
                PROPOSE_AWARD,
                AwardReason::ProposedTask,
                Some(task.id.clone()),
            )
            .await
        {
            tracing::warn!(
                task_id = %task.id,
                proposer = %task.proposer,
                error = %e,
                "points award failed after propose; task stands"
            );
        }
        Ok(task)
    }

    /// Claims an open task for `claimer`, moving it to `in_progress`.
    ///
    /// The transition is conditioned on the task still being `open` at
    /// commit time, so of two concurrent claimers at most one succeeds;
    /// the loser gets [`LedgerError::TaskNotOpen`]. No points are awarded
    /// for claiming.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmptyUsername`], [`LedgerError::TaskNotFound`],
    /// [`LedgerError::SelfClaim`], or [`LedgerError::TaskNotOpen`].
    pub async fn claim(&self, task_id: &TaskId, claimer: &str) -> Result<Task, LedgerError> {
        let claimer = claimer.trim();
        if claimer.is_empty() {
            return Err(LedgerError::EmptyUsername);
        }

        let task = self.store.get_task(task_id).await?;
        if task.proposer == claimer {
            return Err(LedgerError::SelfClaim(task_id.clone()));
        }

        match self
            .store
            .update_task_status(
                task_id,
                &[TaskStatus::Open],
                TaskStatus::InProgress,
                Some(claimer),
            )
            .await
        {
            Ok(task) => {
                tracing::info!(task_id = %task.id, claimer = %claimer, "task claimed");
                Ok(task)
            }
            Err(StoreError::StatusConflict { task_id, actual }) => Err(LedgerError::TaskNotOpen {
                task_id,
                status: actual,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Completes a non-terminal task and awards the completer 10 points.
    ///
    /// Both `open` and `in_progress` tasks can be completed. The award is
    /// a secondary effect: if it fails, the failure is logged and the
    /// completion still stands.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmptyUsername`], [`LedgerError::TaskNotFound`],
    /// or [`LedgerError::AlreadyCompleted`].
    pub async fn complete(&self, task_id: &TaskId, completer: &str) -> Result<Task, LedgerError> {
        let completer = completer.trim();
        if completer.is_empty() {
            return Err(LedgerError::EmptyUsername);
        }

        let task = match self
            .store
            .update_task_status(
                task_id,
                &[TaskStatus::Open, TaskStatus::InProgress],
                TaskStatus::Completed,
                None,
            )
            .await
        {
            Ok(task) => task,
            Err(StoreError::StatusConflict { task_id, .. }) => {
                return Err(LedgerError::AlreadyCompleted(task_id));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(task_id = %task.id, completer = %completer, "task completed");

        if let Err(e) = self
            .store
            .record_award(
                completer,
                COMPLETE_AWARD,
                AwardReason::CompletedTask,
                Some(task.id.clone()),
            )
            .await
        {
            tracing::warn!(
                task_id = %task.id,
                completer = %completer,
                error = %e,
                "points award failed after completion; completion stands"
            );
        }
        Ok(task)
    }

    /// Awards points directly, creating the user record if needed.
    ///
    /// Returns the user's new balance. There is no upper bound, decay, or
    /// expiry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmptyUsername`] or [`LedgerError::ZeroAward`]
    /// before anything is recorded.
    pub async fn award_points(&self, username: &str, amount: u64) -> Result<u64, LedgerError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LedgerError::EmptyUsername);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAward);
        }
        let balance = self
            .store
            .record_award(username, amount, AwardReason::Manual, None)
            .await?;
        tracing::info!(username = %username, amount, balance, "points awarded");
        Ok(balance)
    }

    /// Fetches a single task by ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TaskNotFound`] if no such task exists.
    pub async fn get_task(&self, task_id: &TaskId) -> Result<Task, LedgerError> {
        Ok(self.store.get_task(task_id).await?)
    }

    /// Lists all tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, LedgerError> {
        Ok(self.store.list_tasks().await?)
    }

    /// Returns the top `limit` users by points.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<User>, LedgerError> {
        Ok(self.store.leaderboard(limit).await?)
    }

    /// Returns a user's award history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub async fn award_history(&self, username: &str) -> Result<Vec<AwardEvent>, LedgerError> {
        Ok(self.store.award_history(username).await?)
    }
}
