//! Decides which task status changes a requester may perform.
//!
//! Admins may move a task between any two statuses. Interns may only act on
//! tasks assigned to them, and only along the forward edges listed in
//! [`INTERN_TRANSITIONS`]. `in_review` and `done` have no entry, so they are
//! terminal for interns.

use thiserror::Error;
use crate::errors::AppError;
use crate::models::{Role, TaskSnapshot, TaskStatus};

/// Next statuses an intern may request, keyed by the task's current status.
pub const INTERN_TRANSITIONS: &[(TaskStatus, &[TaskStatus])] = &[
    (TaskStatus::Backlog, &[TaskStatus::InProgress]),
    (TaskStatus::InProgress, &[TaskStatus::InReview]),
];

/// Who is asking for the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: i64,
    pub role: Role,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Task not found")]
    NotFound,

    #[error("User {requester} may only change tasks assigned to them")]
    Forbidden { requester: i64 },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotFound => AppError::NotFound(err.to_string()),
            TransitionError::Forbidden { .. } => AppError::Forbidden(err.to_string()),
            TransitionError::InvalidTransition { from, to } => {
                AppError::InvalidTransition { from, to }
            }
        }
    }
}

/// Statuses an intern may move a task to from `from`. Empty for terminal states.
pub fn intern_targets(from: TaskStatus) -> &'static [TaskStatus] {
    INTERN_TRANSITIONS
        .iter()
        .find(|(status, _)| *status == from)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

/// Checks a requested status change and returns the status to persist.
///
/// `task` is `None` when the task does not exist. Existence is checked first,
/// then ownership, then the transition table.
pub fn authorize_transition(
    requester: Requester,
    task: Option<TaskSnapshot>,
    target: TaskStatus,
) -> Result<TaskStatus, TransitionError> {
    let task = task.ok_or(TransitionError::NotFound)?;

    match requester.role {
        Role::Admin => Ok(target),
        Role::Intern => {
            if task.assigned_to != Some(requester.id) {
                return Err(TransitionError::Forbidden { requester: requester.id });
            }
            if intern_targets(task.status).contains(&target) {
                Ok(target)
            } else {
                Err(TransitionError::InvalidTransition { from: task.status, to: target })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::models::TaskStatus::*;

    const ADMIN: Requester = Requester { id: 1, role: Role::Admin };
    const INTERN: Requester = Requester { id: 7, role: Role::Intern };

    fn owned_by(id: i64, status: TaskStatus) -> Option<TaskSnapshot> {
        Some(TaskSnapshot { status, assigned_to: Some(id) })
    }

    #[test]
    fn admin_may_move_between_any_statuses() {
        for from in TaskStatus::ALL {
            for to in TaskStatus::ALL {
                assert_eq!(authorize_transition(ADMIN, owned_by(42, from), to), Ok(to));
            }
        }
    }

    #[test]
    fn admin_ignores_assignment() {
        let unassigned = Some(TaskSnapshot { status: Done, assigned_to: None });
        assert_eq!(authorize_transition(ADMIN, unassigned, Backlog), Ok(Backlog));
    }

    #[rstest]
    #[case(Backlog, Backlog, false)]
    #[case(Backlog, InProgress, true)]
    #[case(Backlog, InReview, false)]
    #[case(Backlog, Done, false)]
    #[case(InProgress, Backlog, false)]
    #[case(InProgress, InProgress, false)]
    #[case(InProgress, InReview, true)]
    #[case(InProgress, Done, false)]
    #[case(InReview, Backlog, false)]
    #[case(InReview, InProgress, false)]
    #[case(InReview, InReview, false)]
    #[case(InReview, Done, false)]
    #[case(Done, Backlog, false)]
    #[case(Done, InProgress, false)]
    #[case(Done, InReview, false)]
    #[case(Done, Done, false)]
    fn intern_follows_transition_table(
        #[case] from: TaskStatus,
        #[case] to: TaskStatus,
        #[case] allowed: bool,
    ) {
        let result = authorize_transition(INTERN, owned_by(INTERN.id, from), to);
        if allowed {
            assert_eq!(result, Ok(to));
        } else {
            assert_eq!(result, Err(TransitionError::InvalidTransition { from, to }));
        }
    }

    #[rstest]
    #[case(Backlog)]
    #[case(InProgress)]
    #[case(InReview)]
    #[case(Done)]
    fn intern_is_forbidden_on_foreign_task(#[case] status: TaskStatus) {
        for to in TaskStatus::ALL {
            assert_eq!(
                authorize_transition(INTERN, owned_by(8, status), to),
                Err(TransitionError::Forbidden { requester: 7 })
            );
        }
    }

    #[test]
    fn intern_is_forbidden_on_unassigned_task() {
        let unassigned = Some(TaskSnapshot { status: Backlog, assigned_to: None });
        assert_eq!(
            authorize_transition(INTERN, unassigned, InProgress),
            Err(TransitionError::Forbidden { requester: 7 })
        );
    }

    #[test]
    fn missing_task_is_reported_before_rules() {
        assert_eq!(authorize_transition(INTERN, None, Done), Err(TransitionError::NotFound));
        assert_eq!(authorize_transition(ADMIN, None, Done), Err(TransitionError::NotFound));
    }

    #[test]
    fn terminal_statuses_have_no_intern_targets() {
        assert!(intern_targets(InReview).is_empty());
        assert!(intern_targets(Done).is_empty());
        assert_eq!(intern_targets(Backlog), &[InProgress]);
    }

    #[test]
    fn walkthrough_of_intern_and_admin() {
        let mut status = Backlog;

        status = authorize_transition(INTERN, owned_by(7, status), InProgress).unwrap();
        assert_eq!(status, InProgress);

        assert_eq!(
            authorize_transition(INTERN, owned_by(7, status), Done),
            Err(TransitionError::InvalidTransition { from: InProgress, to: Done })
        );

        let other = Requester { id: 8, role: Role::Intern };
        assert!(matches!(
            authorize_transition(other, owned_by(7, status), InReview),
            Err(TransitionError::Forbidden { .. })
        ));

        status = authorize_transition(ADMIN, owned_by(7, status), Done).unwrap();
        assert_eq!(status, Done);
    }
}
