//! Event lifecycle: create, edit, cancel, reopen, delete, and the read side

use tracing::{info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::banners::{resolve_banner, BannerStore, BannerUpload};
use crate::error::{Error, Result};
use crate::invariants::assert_event_invariants;
use crate::models::{
    details_path, Event, EventDetails, EventForm, EventStatus, Identity, PublicUser, UserProfile,
};
use crate::permissions::{EventAction, PermissionMatrix};
use crate::storage::Storage;
use crate::validation::validate_event_fields;

/// What the client echoes back to confirm a destructive action
#[derive(Debug, Clone, Copy)]
pub struct Confirmation<'a> {
    /// Must equal the event id
    pub token: &'a str,
    /// The page the request came from
    pub referrer: Option<&'a str>,
}

impl<'a> Confirmation<'a> {
    pub fn new(token: &'a str, referrer: Option<&'a str>) -> Self {
        Self { token, referrer }
    }

    /// Token matches the event and the request came from its details page
    pub fn check(&self, event_id: Uuid) -> Result<()> {
        let token_ok = Uuid::parse_str(self.token.trim())
            .map(|t| t == event_id)
            .unwrap_or(false);
        if !token_ok || !referrer_is(self.referrer, &details_path(event_id)) {
            return Err(Error::Precondition(
                "Please confirm from the event details page.".into(),
            ));
        }
        Ok(())
    }
}

/// True when the referrer's path is exactly `expected`. Relative referrers
/// are resolved against a dummy origin.
fn referrer_is(referrer: Option<&str>, expected: &str) -> bool {
    let Some(raw) = referrer.map(str::trim).filter(|r| !r.is_empty()) else {
        return false;
    };
    let parsed = match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost").and_then(|base| base.join(raw))
        }
        Err(e) => Err(e),
    };
    parsed.map(|url| url.path() == expected).unwrap_or(false)
}

/// Reference of a banner `resolve_banner` just wrote, if it wrote one
fn fresh_banner(upload: Option<&BannerUpload>, banner: Option<&str>) -> Option<String> {
    upload
        .filter(|u| !u.is_empty())
        .and(banner)
        .map(str::to_string)
}

/// Remove a just-written banner when the event write failed
fn discard_on_error(banners: &dyn BannerStore, stored: Option<&str>, write: Result<()>) -> Result<()> {
    if let (Err(write_err), Some(reference)) = (&write, stored) {
        warn!(error = %write_err, reference, "Event write failed, removing banner");
        if let Err(e) = banners.remove(reference) {
            warn!(error = %e, reference, "Could not remove banner");
        }
    }
    write
}

pub struct EventService<'a, S: ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> EventService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    fn load(&self, event_id: Uuid) -> Result<Event> {
        self.storage
            .find_event_by_id(event_id)?
            .ok_or_else(|| Error::NotFound("Event not found.".into()))
    }

    /// Load an event the actor is allowed to act on
    fn load_for(&self, event_id: Uuid, actor: &Identity, action: EventAction) -> Result<Event> {
        let event = self.load(event_id)?;
        if !PermissionMatrix::can_perform(actor, &event, action) {
            warn!(event_id = %event_id, user_id = %actor.user_id, ?action, "Rejected non-host action");
            return Err(Error::Authorization(format!(
                "You can only {} tournaments you host.",
                action.verb()
            )));
        }
        Ok(event)
    }

    /// Create an event hosted by `host`, returning its id
    #[instrument(skip(self, form, upload, banners), fields(host_id = %host.user_id))]
    pub fn create(
        &self,
        host: &Identity,
        form: &EventForm,
        upload: Option<&BannerUpload>,
        banners: &dyn BannerStore,
    ) -> Result<Uuid> {
        let draft = validate_event_fields(form)?;
        let banner = resolve_banner(banners, upload, draft.banner_url.clone(), None)?;
        let stored = fresh_banner(upload, banner.as_deref());

        let event = Event::new(host.user_id, draft, banner);
        assert_event_invariants(&event);
        discard_on_error(banners, stored.as_deref(), self.storage.create_event(&event))?;

        info!(event_id = %event.id, "Created event");
        Ok(event.id)
    }

    /// Overwrite an event's details. Status is never touched.
    #[instrument(skip(self, actor, form, upload, banners), fields(user_id = %actor.user_id))]
    pub fn edit(
        &self,
        event_id: Uuid,
        actor: &Identity,
        form: &EventForm,
        upload: Option<&BannerUpload>,
        banners: &dyn BannerStore,
    ) -> Result<Event> {
        let mut event = self.load_for(event_id, actor, EventAction::Edit)?;
        let draft = validate_event_fields(form)?;
        let banner = resolve_banner(banners, upload, draft.banner_url.clone(), event.banner.take())?;
        let stored = fresh_banner(upload, banner.as_deref());

        event.apply(draft);
        event.banner = banner;
        assert_event_invariants(&event);
        discard_on_error(
            banners,
            stored.as_deref(),
            self.storage.update_event_details(&event),
        )?;

        info!("Updated event");
        Ok(event)
    }

    /// Open -> Cancelled
    #[instrument(skip(self, actor, confirmation), fields(user_id = %actor.user_id))]
    pub fn cancel(
        &self,
        event_id: Uuid,
        actor: &Identity,
        confirmation: Confirmation<'_>,
    ) -> Result<()> {
        let event = self.load_for(event_id, actor, EventAction::Cancel)?;
        confirmation.check(event_id)?;
        if event.is_cancelled() {
            return Err(Error::Precondition("Tournament is already cancelled.".into()));
        }

        self.storage.set_event_status(event_id, EventStatus::Cancelled)?;
        info!("Cancelled event");
        Ok(())
    }

    /// Cancelled -> Open
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub fn reopen(&self, event_id: Uuid, actor: &Identity) -> Result<()> {
        let event = self.load_for(event_id, actor, EventAction::Reopen)?;
        if !event.is_cancelled() {
            return Err(Error::Precondition(
                "Only cancelled tournaments can be reopened.".into(),
            ));
        }

        self.storage.set_event_status(event_id, EventStatus::Open)?;
        info!("Reopened event");
        Ok(())
    }

    /// Remove an event and its comments. Refused while bookings exist.
    #[instrument(skip(self, actor, confirmation), fields(user_id = %actor.user_id))]
    pub fn delete(
        &self,
        event_id: Uuid,
        actor: &Identity,
        confirmation: Confirmation<'_>,
    ) -> Result<()> {
        self.load_for(event_id, actor, EventAction::Delete)?;
        confirmation.check(event_id)?;

        let bookings = self.storage.count_bookings_for_event(event_id)?;
        if bookings > 0 {
            return Err(Error::Precondition(format!(
                "This tournament has {} booking(s); cancel it instead.",
                bookings
            )));
        }

        self.storage.delete_event(event_id)?;
        info!("Deleted event");
        Ok(())
    }

    /// Every event, earliest start first
    pub fn list_events(&self) -> Result<Vec<Event>> {
        self.storage.list_events()
    }

    /// Event with its host and comments, newest comment first
    #[instrument(skip(self))]
    pub fn event_details(&self, event_id: Uuid) -> Result<EventDetails> {
        let event = self.load(event_id)?;
        let host = self
            .storage
            .find_user_by_id(event.host_id)?
            .map(PublicUser::from);
        let comments = self.storage.list_comments_for_event(event_id)?;
        Ok(EventDetails {
            event,
            host,
            comments,
        })
    }

    pub fn hosted_by(&self, user_id: Uuid) -> Result<Vec<Event>> {
        self.storage.list_events_for_host(user_id)
    }

    #[instrument(skip(self))]
    pub fn user_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        let user = self
            .storage
            .find_user_by_id(user_id)?
            .ok_or_else(|| Error::NotFound("User not found.".into()))?;
        let hosted = self.hosted_by(user_id)?;
        Ok(UserProfile {
            user: user.into(),
            hosted,
        })
    }
}
