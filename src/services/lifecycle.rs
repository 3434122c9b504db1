//! Booking status transitions.
//!
//! A booking starts `tentative` with the payment flag cleared. Staff actions
//! are the only way to move it; submitting payment proof never does.
//!
//! | from            | action  | to        | flag  |
//! |-----------------|---------|-----------|-------|
//! | tentative       | confirm | confirmed | true  |
//! | tentative       | cancel  | cancelled | false |
//! | confirmed+paid  | cancel  | cancelled | false |
//! | confirmed+paid  | undo    | tentative | false |
//! | cancelled       | restore | tentative | false |
//!
//! Everything else is rejected. A cancelled booking has to be restored
//! before it can be confirmed again.

use serde::{Deserialize, Serialize};

use crate::models::{BookingState, BookingStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdminAction {
    Confirm,
    Cancel,
    Restore,
    Undo,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Confirm => "confirm",
            AdminAction::Cancel => "cancel",
            AdminAction::Restore => "restore",
            AdminAction::Undo => "undo",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LifecycleError {
    #[error("cannot {action} a booking that is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

pub fn describe(state: BookingState) -> &'static str {
    match (state.status, state.payment_confirmation) {
        (BookingStatus::Tentative, _) => "tentative",
        (BookingStatus::Confirmed, true) => "confirmed and paid",
        (BookingStatus::Confirmed, false) => "confirmed without payment",
        (BookingStatus::Cancelled, _) => "cancelled",
    }
}

pub fn transition(state: BookingState, action: AdminAction) -> Result<BookingState, LifecycleError> {
    use BookingStatus::*;

    let next = match (action, state.status, state.payment_confirmation) {
        (AdminAction::Confirm, Tentative, _) => (Confirmed, true),
        (AdminAction::Cancel, Tentative, _) | (AdminAction::Cancel, Confirmed, true) => {
            (Cancelled, false)
        }
        (AdminAction::Undo, Confirmed, true) => (Tentative, false),
        (AdminAction::Restore, Cancelled, _) => (Tentative, false),
        _ => {
            return Err(LifecycleError::InvalidTransition {
                from: describe(state),
                action: action.as_str(),
            })
        }
    };

    Ok(BookingState {
        status: next.0,
        payment_confirmation: next.1,
    })
}

/// State a new booking is born in. Only staff may create one already paid.
pub fn initial_state(payment_confirmed: bool) -> BookingState {
    if payment_confirmed {
        BookingState {
            status: BookingStatus::Confirmed,
            payment_confirmation: true,
        }
    } else {
        BookingState::INITIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TENTATIVE: BookingState = BookingState::INITIAL;
    const PAID: BookingState = BookingState {
        status: BookingStatus::Confirmed,
        payment_confirmation: true,
    };
    const CANCELLED: BookingState = BookingState {
        status: BookingStatus::Cancelled,
        payment_confirmation: false,
    };

    #[test]
    fn test_listed_transitions() {
        assert_eq!(transition(TENTATIVE, AdminAction::Confirm), Ok(PAID));
        assert_eq!(transition(TENTATIVE, AdminAction::Cancel), Ok(CANCELLED));
        assert_eq!(transition(PAID, AdminAction::Cancel), Ok(CANCELLED));
        assert_eq!(transition(PAID, AdminAction::Undo), Ok(TENTATIVE));
        assert_eq!(transition(CANCELLED, AdminAction::Restore), Ok(TENTATIVE));
    }

    #[test]
    fn test_cancelled_cannot_be_confirmed_directly() {
        assert_eq!(
            transition(CANCELLED, AdminAction::Confirm),
            Err(LifecycleError::InvalidTransition {
                from: "cancelled",
                action: "confirm",
            })
        );
        let restored = transition(CANCELLED, AdminAction::Restore).unwrap();
        assert_eq!(transition(restored, AdminAction::Confirm), Ok(PAID));
    }

    #[test]
    fn test_unlisted_transitions_rejected() {
        let rejected = [
            (TENTATIVE, AdminAction::Undo),
            (TENTATIVE, AdminAction::Restore),
            (PAID, AdminAction::Confirm),
            (PAID, AdminAction::Restore),
            (CANCELLED, AdminAction::Cancel),
            (CANCELLED, AdminAction::Undo),
        ];
        for (state, action) in rejected {
            assert!(
                transition(state, action).is_err(),
                "{action:?} from {state:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_restore_after_paid_cancel_clears_flag() {
        let cancelled = transition(PAID, AdminAction::Cancel).unwrap();
        assert!(!cancelled.payment_confirmation);
        let restored = transition(cancelled, AdminAction::Restore).unwrap();
        assert_eq!(restored, TENTATIVE);
        assert!(!restored.occupies_slot());
    }

    #[test]
    fn test_error_message() {
        let err = transition(PAID, AdminAction::Confirm).unwrap_err();
        assert_eq!(err.to_string(), "cannot confirm a booking that is confirmed and paid");
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(initial_state(false), TENTATIVE);
        assert_eq!(initial_state(true), PAID);
    }
}
