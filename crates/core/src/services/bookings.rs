//! Booking creation and history

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants::assert_new_booking;
use crate::models::{Booking, BookingRecord, Identity, OrderId};
use crate::permissions::{EventAction, PermissionMatrix};
use crate::storage::Storage;
use crate::validation::validate_quantity;

/// How many fresh order ids to try before giving up
pub const ORDER_ID_ATTEMPTS: usize = 5;

pub struct BookingService<'a, S: ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> BookingService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Book seats on an event with order ids drawn from the OS generator
    pub fn book(&self, event_id: Uuid, user: &Identity, quantity: &str) -> Result<Booking> {
        self.book_with_rng(event_id, user, quantity, &mut OsRng)
    }

    /// Book seats using the given source for order ids
    #[instrument(skip(self, user, rng), fields(user_id = %user.user_id))]
    pub fn book_with_rng<R: RngCore + ?Sized>(
        &self,
        event_id: Uuid,
        user: &Identity,
        quantity: &str,
        rng: &mut R,
    ) -> Result<Booking> {
        let quantity = validate_quantity(quantity)?;

        let event = self
            .storage
            .find_event_by_id(event_id)?
            .ok_or_else(|| Error::NotFound("Event not found.".into()))?;
        if !PermissionMatrix::can_perform(user, &event, EventAction::Book) {
            return Err(Error::Authorization("You cannot book this tournament.".into()));
        }
        if event.is_cancelled() {
            return Err(Error::Precondition(
                "This tournament has been cancelled and cannot be booked.".into(),
            ));
        }

        for attempt in 1..=ORDER_ID_ATTEMPTS {
            let booking = Booking::new(OrderId::generate(rng), user.user_id, event_id, quantity);
            assert_new_booking(&booking);

            if self.storage.create_booking(&booking)? {
                info!(order_id = %booking.order_id, quantity, "Booked event");
                return Ok(booking);
            }
            warn!(attempt, order_id = %booking.order_id, "Order id collision");
        }

        Err(Error::Precondition(
            "Could not allocate an order id, please try again.".into(),
        ))
    }

    /// The user's bookings, newest first
    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub fn history_for(&self, user: &Identity) -> Result<Vec<BookingRecord>> {
        self.storage.list_bookings_for_user(user.user_id)
    }
}
