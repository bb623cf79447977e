//! Permission system for event operations

use crate::models::{Event, Identity};

/// Actions that can be performed on an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    // Lifecycle - host only
    Edit,
    Cancel,
    Reopen,
    Delete,

    // Participation
    Comment,
    Book,
}

impl EventAction {
    /// True for actions reserved to the event's host
    pub fn is_host_only(self) -> bool {
        matches!(
            self,
            EventAction::Edit | EventAction::Cancel | EventAction::Reopen | EventAction::Delete
        )
    }

    pub fn verb(self) -> &'static str {
        match self {
            EventAction::Edit => "edit",
            EventAction::Cancel => "cancel",
            EventAction::Reopen => "reopen",
            EventAction::Delete => "delete",
            EventAction::Comment => "comment on",
            EventAction::Book => "book",
        }
    }
}

/// Permission matrix for event actions
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if an authenticated actor may perform an action on an event
    pub fn can_perform(actor: &Identity, event: &Event, action: EventAction) -> bool {
        if action.is_host_only() {
            event.is_hosted_by(actor.user_id)
        } else {
            // Any signed-in user may take part
            true
        }
    }
}
