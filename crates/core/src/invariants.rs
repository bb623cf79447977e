//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Event, OrderId};

/// Validate that an event's state is internally consistent
pub fn assert_event_invariants(event: &Event) {
    // Title must not be empty
    debug_assert!(
        !event.title.trim().is_empty(),
        "Event {} has empty title",
        event.id
    );

    debug_assert!(
        event.host_id != Uuid::nil(),
        "Event {} has nil host_id",
        event.id
    );
}

/// Validate that a booking is well formed
pub fn assert_booking_invariants(booking: &Booking) {
    debug_assert!(
        booking.quantity >= 1,
        "Booking {} has quantity {}",
        booking.order_id,
        booking.quantity
    );

    debug_assert!(
        OrderId::is_well_formed(booking.order_id.as_str()),
        "Booking {} has malformed order id {:?}",
        booking.id,
        booking.order_id
    );

    debug_assert!(
        booking.user_id != Uuid::nil() && booking.event_id != Uuid::nil(),
        "Booking {} has nil owner or event",
        booking.order_id
    );
}

/// Validate that a freshly created booking is confirmed
pub fn assert_new_booking(booking: &Booking) {
    assert_booking_invariants(booking);
    debug_assert!(
        booking.status == BookingStatus::Confirmed,
        "New booking {} has status {:?}",
        booking.order_id,
        booking.status
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, EventDraft, GameMode, Region, TeamSize};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_event(title: &str) -> Event {
        let draft = EventDraft {
            title: title.to_string(),
            category: Category::Pro,
            region: Region::Eu,
            team_size: TeamSize::Squad,
            mode: GameMode::ZeroBuild,
            prize: Some("$100".to_string()),
            description: None,
            banner_url: None,
            start_at: NaiveDate::from_ymd_opt(2025, 7, 4)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap(),
        };
        Event::new(Uuid::new_v4(), draft, None)
    }

    #[test]
    fn test_valid_event() {
        assert_event_invariants(&make_event("Weekly Scrim"));
    }

    #[test]
    #[should_panic(expected = "empty title")]
    fn test_blank_title_is_caught() {
        assert_event_invariants(&make_event("   "));
    }

    #[test]
    fn test_valid_booking() {
        let mut rng = StdRng::seed_from_u64(7);
        let booking = Booking::new(OrderId::generate(&mut rng), Uuid::new_v4(), Uuid::new_v4(), 2);
        assert_new_booking(&booking);
    }

    #[test]
    #[should_panic(expected = "quantity 0")]
    fn test_zero_quantity_is_caught() {
        let mut rng = StdRng::seed_from_u64(7);
        let booking = Booking::new(OrderId::generate(&mut rng), Uuid::new_v4(), Uuid::new_v4(), 0);
        assert_booking_invariants(&booking);
    }
}
