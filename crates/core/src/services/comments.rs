//! Event discussion

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Comment, Identity, FALLBACK_AUTHOR};
use crate::permissions::{EventAction, PermissionMatrix};
use crate::storage::Storage;
use crate::validation::validate_comment_body;

pub struct CommentService<'a, S: ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> CommentService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Append a comment signed with the author's user name
    #[instrument(skip(self, author, body), fields(user_id = %author.user_id))]
    pub fn post(&self, event_id: Uuid, author: &Identity, body: &str) -> Result<Comment> {
        let body = validate_comment_body(body)?;

        let event = self
            .storage
            .find_event_by_id(event_id)?
            .ok_or_else(|| Error::NotFound("Event not found.".into()))?;
        if !PermissionMatrix::can_perform(author, &event, EventAction::Comment) {
            return Err(Error::Authorization("You cannot comment here.".into()));
        }

        let label = match author.username.trim() {
            "" => FALLBACK_AUTHOR.to_string(),
            name => name.to_string(),
        };
        let comment = Comment::new(event_id, label, body);
        self.storage.create_comment(&comment)?;

        debug!(comment_id = %comment.id, "Posted comment");
        Ok(comment)
    }

    /// Comments on an event, newest first
    pub fn list_for(&self, event_id: Uuid) -> Result<Vec<Comment>> {
        self.storage.list_comments_for_event(event_id)
    }
}
