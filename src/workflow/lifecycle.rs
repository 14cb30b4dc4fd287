//! Report status state machine
//!
//! ```text
//!            assign (admin)            mark fixed (admin)
//!  Pending ─────────────────> In-Progress ───────────────> Resolved
//!     └────────────── mark fixed (admin) ──────────────────────┘
//!                                                           │
//!                         confirm fixed (owner) ─ Resolved + "Fixed"
//!                         deny fix (owner) ───── Re-Opened + "Not Fixed"
//! ```
//!
//! Re-Opened has no outbound transition other than deletion.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Confirmation, Report, ReportPatch, ReportStatus};

/// Who is acting on a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Citizen { email: String },
}

impl Actor {
    pub fn citizen(email: impl Into<String>) -> Self {
        Actor::Citizen {
            email: email.into(),
        }
    }

    fn owns(&self, report: &Report) -> bool {
        match self {
            Actor::Admin => false,
            Actor::Citizen { email } => report.is_owned_by(email),
        }
    }
}

/// A status-changing action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Admin dispatches a team
    AssignForAction,
    /// Admin marks the issue fixed
    MarkFixed,
    /// Owner answers the confirmation prompt
    Confirm(Confirmation),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("only an administrator can {0}")]
    AdminOnly(&'static str),

    #[error("only the reporting citizen can confirm this report")]
    NotOwner,

    #[error("cannot {action} a report that is {from}")]
    InvalidFrom {
        action: &'static str,
        from: ReportStatus,
    },

    #[error("confirmation already recorded as {0:?}")]
    AlreadyConfirmed(Confirmation),
}

fn action_name(action: Action) -> &'static str {
    match action {
        Action::AssignForAction => "assign",
        Action::MarkFixed => "resolve",
        Action::Confirm(_) => "confirm",
    }
}

/// Work out the fields an action writes, or why it is not allowed
pub fn plan(
    report: &Report,
    actor: &Actor,
    action: Action,
    now: DateTime<Utc>,
) -> Result<ReportPatch, TransitionError> {
    let from = report.status;
    match action {
        Action::AssignForAction => {
            if *actor != Actor::Admin {
                return Err(TransitionError::AdminOnly("assign a report"));
            }
            match from {
                ReportStatus::Pending => Ok(ReportPatch::status(ReportStatus::InProgress)),
                _ => Err(TransitionError::InvalidFrom {
                    action: action_name(action),
                    from,
                }),
            }
        }
        Action::MarkFixed => {
            if *actor != Actor::Admin {
                return Err(TransitionError::AdminOnly("resolve a report"));
            }
            match from {
                ReportStatus::Pending | ReportStatus::InProgress => {
                    Ok(ReportPatch::status(ReportStatus::Resolved))
                }
                _ => Err(TransitionError::InvalidFrom {
                    action: action_name(action),
                    from,
                }),
            }
        }
        Action::Confirm(answer) => {
            if !actor.owns(report) {
                return Err(TransitionError::NotOwner);
            }
            if from != ReportStatus::Resolved {
                return Err(TransitionError::InvalidFrom {
                    action: action_name(action),
                    from,
                });
            }
            if let Some(previous) = report.citizen_confirmation {
                return Err(TransitionError::AlreadyConfirmed(previous));
            }
            let status = match answer {
                Confirmation::Fixed => ReportStatus::Resolved,
                Confirmation::NotFixed => ReportStatus::ReOpened,
            };
            Ok(ReportPatch {
                status: Some(status),
                citizen_confirmation: Some(answer),
                confirmation_date: Some(now),
            })
        }
    }
}

/// Admins may remove any report; citizens only their own
pub fn authorize_delete(report: &Report, actor: &Actor) -> Result<(), TransitionError> {
    match actor {
        Actor::Admin => Ok(()),
        citizen if citizen.owns(report) => Ok(()),
        _ => Err(TransitionError::NotOwner),
    }
}
