use std::collections::BTreeSet;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Booking, Slot};

/// Slots held by paid, confirmed bookings. Tentative bookings never block.
pub fn occupied_slots<'a>(bookings: impl IntoIterator<Item = &'a Booking>) -> BTreeSet<Slot> {
    bookings
        .into_iter()
        .filter(|b| b.occupies_slot())
        .map(|b| b.slot)
        .collect()
}

pub fn unavailable_slots(
    conn: &Connection,
    screen_id: &str,
    date: &NaiveDate,
) -> anyhow::Result<BTreeSet<Slot>> {
    let bookings = queries::get_bookings_for_screen_date(conn, screen_id, date)?;
    Ok(occupied_slots(&bookings))
}

pub fn available_slots(unavailable: &BTreeSet<Slot>) -> Vec<Slot> {
    Slot::ALL
        .into_iter()
        .filter(|slot| !unavailable.contains(slot))
        .collect()
}

pub fn is_slot_free(
    conn: &Connection,
    screen_id: &str,
    date: &NaiveDate,
    slot: Slot,
) -> anyhow::Result<bool> {
    Ok(!unavailable_slots(conn, screen_id, date)?.contains(&slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{BookingStatus, Tier};
    use chrono::Utc;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn insert(
        conn: &Connection,
        id: &str,
        screen_id: &str,
        day: &str,
        slot: Slot,
        status: BookingStatus,
        paid: bool,
    ) {
        let now = Utc::now().naive_utc();
        let booking = Booking {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            user_name: "Rohan".to_string(),
            user_phone: "+919800000002".to_string(),
            user_email: "rohan@example.com".to_string(),
            screen_id: screen_id.to_string(),
            screen_title: "Dhoom".to_string(),
            location: "Dahisar".to_string(),
            date: date(day),
            slot,
            package: Tier::Silver,
            duration: None,
            price: 2950,
            coupon: None,
            payment_proof: None,
            paid_at: None,
            status,
            payment_confirmation: paid,
            created_at: now,
            updated_at: now,
        };
        queries::create_booking(conn, &booking).unwrap();
    }

    #[test]
    fn test_no_bookings_everything_free() {
        let conn = setup_db();
        let taken = unavailable_slots(&conn, "5", &date("2024-06-15")).unwrap();
        assert!(taken.is_empty());
        assert_eq!(available_slots(&taken), Slot::ALL.to_vec());
    }

    #[test]
    fn test_only_confirmed_and_paid_blocks() {
        let conn = setup_db();
        insert(&conn, "a", "5", "2024-06-15", Slot::Morning, BookingStatus::Confirmed, true);
        insert(&conn, "b", "5", "2024-06-15", Slot::Afternoon, BookingStatus::Tentative, false);
        insert(&conn, "c", "5", "2024-06-15", Slot::Evening, BookingStatus::Cancelled, false);
        // Confirmed without the payment flag does not count either.
        insert(&conn, "d", "5", "2024-06-15", Slot::Night, BookingStatus::Confirmed, false);

        let taken = unavailable_slots(&conn, "5", &date("2024-06-15")).unwrap();
        assert_eq!(taken, BTreeSet::from([Slot::Morning]));
        assert_eq!(
            available_slots(&taken),
            vec![Slot::Afternoon, Slot::Evening, Slot::Night]
        );
    }

    #[test]
    fn test_other_screen_and_date_ignored() {
        let conn = setup_db();
        insert(&conn, "a", "6", "2024-06-15", Slot::Morning, BookingStatus::Confirmed, true);
        insert(&conn, "b", "5", "2024-06-16", Slot::Morning, BookingStatus::Confirmed, true);

        assert!(is_slot_free(&conn, "5", &date("2024-06-15"), Slot::Morning).unwrap());
        assert!(!is_slot_free(&conn, "5", &date("2024-06-16"), Slot::Morning).unwrap());
    }

    #[test]
    fn test_two_tentative_holds_on_same_slot_both_leave_it_open() {
        let conn = setup_db();
        insert(&conn, "a", "5", "2024-06-15", Slot::Night, BookingStatus::Tentative, false);
        insert(&conn, "b", "5", "2024-06-15", Slot::Night, BookingStatus::Tentative, false);

        assert!(is_slot_free(&conn, "5", &date("2024-06-15"), Slot::Night).unwrap());
    }
}
