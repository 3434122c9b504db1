use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingState, BookingStatus, BookingView, DisplayTheme, PackageCatalog, Screen,
    Session, SessionLength, SessionRole, Slot, Tier, User,
};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn fmt_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TS_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

/// True when the error came from a UNIQUE/CHECK constraint, e.g. two paid bookings on one slot.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// ── Screens ──

const SCREEN_COLUMNS: &str =
    "id, theme, location, image, description, features, capacity, packages";

pub fn upsert_screen(conn: &Connection, screen: &Screen) -> anyhow::Result<()> {
    let features = serde_json::to_string(&screen.features)?;
    let packages = screen
        .packages
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO screens (id, theme, location, image, description, features, capacity, packages)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
           theme = excluded.theme,
           location = excluded.location,
           image = excluded.image,
           description = excluded.description,
           features = excluded.features,
           capacity = excluded.capacity,
           packages = excluded.packages,
           updated_at = datetime('now')",
        params![
            screen.id,
            screen.theme,
            screen.location,
            screen.image,
            screen.description,
            features,
            screen.capacity,
            packages,
        ],
    )?;
    Ok(())
}

pub fn get_screen(conn: &Connection, id: &str) -> anyhow::Result<Option<Screen>> {
    let result = conn.query_row(
        &format!("SELECT {SCREEN_COLUMNS} FROM screens WHERE id = ?1"),
        params![id],
        |row| Ok(parse_screen_row(row)),
    );

    match result {
        Ok(screen) => Ok(Some(screen?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_screens(conn: &Connection, location: Option<&str>) -> anyhow::Result<Vec<Screen>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SCREEN_COLUMNS} FROM screens
         WHERE ?1 IS NULL OR location = ?1
         ORDER BY location ASC, CAST(id AS INTEGER) ASC, id ASC"
    ))?;

    let rows = stmt.query_map(params![location], |row| Ok(parse_screen_row(row)))?;

    let mut screens = vec![];
    for row in rows {
        screens.push(row??);
    }
    Ok(screens)
}

pub fn count_screens(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM screens", [], |row| row.get(0))?;
    Ok(count)
}

pub fn update_screen_packages(
    conn: &Connection,
    id: &str,
    packages: &PackageCatalog,
) -> anyhow::Result<bool> {
    let json = serde_json::to_string(packages)?;
    let count = conn.execute(
        "UPDATE screens SET packages = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![json, id],
    )?;
    Ok(count > 0)
}

fn parse_screen_row(row: &rusqlite::Row) -> anyhow::Result<Screen> {
    let features_json: String = row.get(5)?;
    let packages_json: Option<String> = row.get(7)?;

    let packages = match packages_json {
        Some(json) => Some(
            serde_json::from_str::<PackageCatalog>(&json)
                .context("screen has a malformed package catalog")?,
        ),
        None => None,
    };

    Ok(Screen {
        id: row.get(0)?,
        theme: row.get(1)?,
        location: row.get(2)?,
        image: row.get(3)?,
        description: row.get(4)?,
        features: serde_json::from_str(&features_json).unwrap_or_default(),
        capacity: row.get(6)?,
        packages,
    })
}

// ── Users ──

const USER_COLUMNS: &str = "id, name, email, phone, created_at, previous_bookings, display_theme";

pub fn insert_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    let previous = serde_json::to_string(&user.previous_bookings)?;
    conn.execute(
        "INSERT INTO users (id, name, email, phone, created_at, previous_bookings, display_theme)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            user.name,
            user.email,
            user.phone,
            fmt_ts(&user.created_at),
            previous,
            user.display_theme.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    find_user_where(conn, "id", id)
}

pub fn find_user_by_phone(conn: &Connection, phone: &str) -> anyhow::Result<Option<User>> {
    find_user_where(conn, "phone", phone)
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    find_user_where(conn, "email", email)
}

fn find_user_where(conn: &Connection, column: &str, value: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1 ORDER BY created_at ASC LIMIT 1"),
        params![value],
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_users(conn: &Connection) -> anyhow::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], parse_user_row)?;

    let mut users = vec![];
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn append_previous_booking(
    conn: &Connection,
    user_id: &str,
    booking_id: &str,
) -> anyhow::Result<bool> {
    let Some(mut user) = get_user(conn, user_id)? else {
        return Ok(false);
    };
    user.previous_bookings.push(booking_id.to_string());
    let json = serde_json::to_string(&user.previous_bookings)?;

    let count = conn.execute(
        "UPDATE users SET previous_bookings = ?1 WHERE id = ?2",
        params![json, user_id],
    )?;
    Ok(count > 0)
}

pub fn update_display_theme(
    conn: &Connection,
    user_id: &str,
    theme: DisplayTheme,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET display_theme = ?1 WHERE id = ?2",
        params![theme.as_str(), user_id],
    )?;
    Ok(count > 0)
}

pub fn update_user_phone(conn: &Connection, user_id: &str, phone: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET phone = ?1 WHERE id = ?2",
        params![phone, user_id],
    )?;
    Ok(count > 0)
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    let previous: String = row.get(5)?;
    let theme: String = row.get(6)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        created_at: parse_ts(&created_at),
        previous_bookings: serde_json::from_str(&previous).unwrap_or_default(),
        display_theme: DisplayTheme::parse(&theme),
    })
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, user_id, user_name, user_phone, user_email, screen_id, screen_title, location, \
     date, slot, package, duration, price, coupon, payment_proof, paid_at, status, payment_confirmation, \
     created_at, updated_at";

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
        ),
        params![
            booking.id,
            booking.user_id,
            booking.user_name,
            booking.user_phone,
            booking.user_email,
            booking.screen_id,
            booking.screen_title,
            booking.location,
            booking.date.format(DATE_FORMAT).to_string(),
            booking.slot.as_str(),
            booking.package.as_str(),
            booking.duration.map(|d| d.as_str()),
            booking.price,
            booking.coupon,
            booking.payment_proof,
            booking.paid_at.as_ref().map(fmt_ts),
            booking.status.as_str(),
            booking.payment_confirmation,
            fmt_ts(&booking.created_at),
            fmt_ts(&booking.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_bookings_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;

    let rows = stmt.query_map(params![user_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Every booking for one screen on one day, whatever its status.
pub fn get_bookings_for_screen_date(
    conn: &Connection,
    screen_id: &str,
    date: &NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE screen_id = ?1 AND date = ?2 ORDER BY created_at ASC"
    ))?;

    let date_str = date.format(DATE_FORMAT).to_string();
    let rows = stmt.query_map(params![screen_id, date_str], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub view: BookingView,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

pub fn get_all_bookings(conn: &Connection, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
    let view_clause = match filter.view {
        BookingView::Requests => {
            "status != 'cancelled' AND NOT (status = 'confirmed' AND payment_confirmation = 1)"
        }
        BookingView::Confirmed => "status = 'confirmed' AND payment_confirmation = 1",
        BookingView::Cancelled => "status = 'cancelled'",
        BookingView::All => "1 = 1",
    };

    let mut sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE {view_clause}");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(location) = &filter.location {
        params_vec.push(Box::new(location.clone()));
        sql.push_str(&format!(" AND location = ?{}", params_vec.len()));
    }
    if let Some(date) = &filter.date {
        params_vec.push(Box::new(date.format(DATE_FORMAT).to_string()));
        sql.push_str(&format!(" AND date = ?{}", params_vec.len()));
    }

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    bookings.sort_by(|a, b| (a.date, a.slot, a.created_at).cmp(&(b.date, b.slot, b.created_at)));
    Ok(bookings)
}

/// Moves a booking from `from` to `to` only if it is still in `from`.
/// Returns false when the row is missing or another writer got there first.
pub fn update_booking_state(
    conn: &Connection,
    id: &str,
    from: BookingState,
    to: BookingState,
) -> anyhow::Result<bool> {
    let now = fmt_ts(&Utc::now().naive_utc());
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, payment_confirmation = ?2, updated_at = ?3
         WHERE id = ?4 AND status = ?5 AND payment_confirmation = ?6",
        params![
            to.status.as_str(),
            to.payment_confirmation,
            now,
            id,
            from.status.as_str(),
            from.payment_confirmation,
        ],
    )?;
    Ok(count > 0)
}

pub fn set_payment_proof(
    conn: &Connection,
    id: &str,
    proof: &str,
    paid_at: &NaiveDateTime,
) -> anyhow::Result<bool> {
    let now = fmt_ts(&Utc::now().naive_utc());
    let count = conn.execute(
        "UPDATE bookings SET payment_proof = ?1, paid_at = ?2, updated_at = ?3 WHERE id = ?4",
        params![proof, fmt_ts(paid_at), now, id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date_str: String = row.get(8)?;
    let slot_str: String = row.get(9)?;
    let package_str: String = row.get(10)?;
    let duration_str: Option<String> = row.get(11)?;
    let paid_at_str: Option<String> = row.get(15)?;
    let status_str: String = row.get(16)?;
    let created_at_str: String = row.get(18)?;
    let updated_at_str: String = row.get(19)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .with_context(|| format!("booking has an invalid date: {date_str}"))?;
    let slot = Slot::parse(&slot_str)
        .with_context(|| format!("booking has an unknown slot: {slot_str}"))?;
    let package = Tier::parse(&package_str)
        .with_context(|| format!("booking has an unknown package: {package_str}"))?;

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        user_phone: row.get(3)?,
        user_email: row.get(4)?,
        screen_id: row.get(5)?,
        screen_title: row.get(6)?,
        location: row.get(7)?,
        date,
        slot,
        package,
        duration: duration_str.as_deref().and_then(SessionLength::parse),
        price: row.get(12)?,
        coupon: row.get(13)?,
        payment_proof: row.get(14)?,
        paid_at: paid_at_str.as_deref().map(parse_ts),
        status: BookingStatus::parse(&status_str),
        payment_confirmation: row.get(17)?,
        created_at: parse_ts(&created_at_str),
        updated_at: parse_ts(&updated_at_str),
    })
}

// ── Sessions ──

pub fn create_session(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, subject, role, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            session.token,
            session.subject,
            session.role.as_str(),
            fmt_ts(&session.expires_at),
        ],
    )?;
    Ok(())
}

/// Looks up a session that has not yet expired.
pub fn get_session(conn: &Connection, token: &str) -> anyhow::Result<Option<Session>> {
    let now = fmt_ts(&Utc::now().naive_utc());
    let result = conn.query_row(
        "SELECT token, subject, role, expires_at FROM sessions WHERE token = ?1 AND expires_at > ?2",
        params![token, now],
        |row| {
            let role: String = row.get(2)?;
            let expires_at: String = row.get(3)?;
            Ok(Session {
                token: row.get(0)?,
                subject: row.get(1)?,
                role: SessionRole::parse(&role),
                expires_at: parse_ts(&expires_at),
            })
        },
    );

    match result {
        Ok(session) => Ok(Some(session)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(count > 0)
}

pub fn purge_expired_sessions(conn: &Connection) -> anyhow::Result<usize> {
    let now = fmt_ts(&Utc::now().naive_utc());
    let count = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::Duration;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(id: &str, slot: Slot, status: BookingStatus, paid: bool) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            user_name: "Asha".to_string(),
            user_phone: "+919800000001".to_string(),
            user_email: "asha@example.com".to_string(),
            screen_id: "1".to_string(),
            screen_title: "Park and Watch".to_string(),
            location: "Wadala".to_string(),
            date: date("2024-06-15"),
            slot,
            package: Tier::Gold,
            duration: None,
            price: 3950,
            coupon: None,
            payment_proof: None,
            paid_at: None,
            status,
            payment_confirmation: paid,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_booking_round_trip() {
        let conn = setup_db();
        let mut b = booking("b-1", Slot::Evening, BookingStatus::Tentative, false);
        b.package = Tier::Standard;
        b.duration = Some(SessionLength::TwoHours);
        b.coupon = Some("LOVE10".to_string());
        create_booking(&conn, &b).unwrap();

        let loaded = get_booking_by_id(&conn, "b-1").unwrap().unwrap();
        assert_eq!(loaded.slot, Slot::Evening);
        assert_eq!(loaded.package, Tier::Standard);
        assert_eq!(loaded.duration, Some(SessionLength::TwoHours));
        assert_eq!(loaded.coupon.as_deref(), Some("LOVE10"));
        assert_eq!(loaded.date, date("2024-06-15"));
        assert!(!loaded.payment_confirmation);
    }

    #[test]
    fn test_missing_booking_is_none() {
        let conn = setup_db();
        assert!(get_booking_by_id(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_second_paid_booking_on_slot_violates_constraint() {
        let conn = setup_db();
        create_booking(&conn, &booking("b-1", Slot::Night, BookingStatus::Confirmed, true)).unwrap();

        let err = create_booking(&conn, &booking("b-2", Slot::Night, BookingStatus::Confirmed, true))
            .unwrap_err();
        assert!(is_constraint_violation(&err));

        // Unpaid bookings on the same slot are unrestricted.
        create_booking(&conn, &booking("b-3", Slot::Night, BookingStatus::Tentative, false)).unwrap();
    }

    #[test]
    fn test_update_state_is_compare_and_swap() {
        let conn = setup_db();
        create_booking(&conn, &booking("b-1", Slot::Morning, BookingStatus::Tentative, false)).unwrap();

        let confirmed = BookingState {
            status: BookingStatus::Confirmed,
            payment_confirmation: true,
        };
        assert!(update_booking_state(&conn, "b-1", BookingState::INITIAL, confirmed).unwrap());
        // Stale expectation no longer matches.
        assert!(!update_booking_state(&conn, "b-1", BookingState::INITIAL, confirmed).unwrap());
        assert!(!update_booking_state(&conn, "missing", BookingState::INITIAL, confirmed).unwrap());
    }

    #[test]
    fn test_filter_views() {
        let conn = setup_db();
        create_booking(&conn, &booking("t", Slot::Morning, BookingStatus::Tentative, false)).unwrap();
        create_booking(&conn, &booking("c", Slot::Afternoon, BookingStatus::Confirmed, true)).unwrap();
        create_booking(&conn, &booking("x", Slot::Evening, BookingStatus::Cancelled, false)).unwrap();

        let ids = |view| -> Vec<String> {
            let filter = BookingFilter {
                view,
                ..Default::default()
            };
            get_all_bookings(&conn, &filter)
                .unwrap()
                .into_iter()
                .map(|b| b.id)
                .collect()
        };

        assert_eq!(ids(BookingView::Requests), vec!["t"]);
        assert_eq!(ids(BookingView::Confirmed), vec!["c"]);
        assert_eq!(ids(BookingView::Cancelled), vec!["x"]);
        assert_eq!(ids(BookingView::All), vec!["t", "c", "x"]);
    }

    #[test]
    fn test_filter_by_location_and_date() {
        let conn = setup_db();
        let mut other = booking("dahisar", Slot::Morning, BookingStatus::Tentative, false);
        other.location = "Dahisar".to_string();
        create_booking(&conn, &other).unwrap();
        let mut later = booking("later", Slot::Morning, BookingStatus::Tentative, false);
        later.date = date("2024-06-16");
        create_booking(&conn, &later).unwrap();
        create_booking(&conn, &booking("match", Slot::Night, BookingStatus::Tentative, false)).unwrap();

        let filter = BookingFilter {
            view: BookingView::Requests,
            location: Some("Wadala".to_string()),
            date: Some(date("2024-06-15")),
        };
        let found = get_all_bookings(&conn, &filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "match");
    }

    #[test]
    fn test_user_lookup_and_previous_bookings() {
        let conn = setup_db();
        let user = User {
            id: "u-1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+919800000001".to_string(),
            created_at: Utc::now().naive_utc(),
            previous_bookings: vec![],
            display_theme: DisplayTheme::Light,
        };
        insert_user(&conn, &user).unwrap();

        assert_eq!(find_user_by_phone(&conn, "+919800000001").unwrap().unwrap().id, "u-1");
        assert_eq!(find_user_by_email(&conn, "asha@example.com").unwrap().unwrap().id, "u-1");
        assert!(find_user_by_email(&conn, "other@example.com").unwrap().is_none());

        assert!(append_previous_booking(&conn, "u-1", "b-1").unwrap());
        assert!(append_previous_booking(&conn, "u-1", "b-2").unwrap());
        assert!(!append_previous_booking(&conn, "ghost", "b-3").unwrap());
        let loaded = get_user(&conn, "u-1").unwrap().unwrap();
        assert_eq!(loaded.previous_bookings, vec!["b-1", "b-2"]);

        assert!(update_display_theme(&conn, "u-1", DisplayTheme::Dark).unwrap());
        assert_eq!(get_user(&conn, "u-1").unwrap().unwrap().display_theme, DisplayTheme::Dark);

        assert!(update_user_phone(&conn, "u-1", "+919811111111").unwrap());
        assert_eq!(get_user(&conn, "u-1").unwrap().unwrap().phone, "+919811111111");
    }

    #[test]
    fn test_screen_catalog_round_trip() {
        let conn = setup_db();
        let catalog: PackageCatalog = serde_json::from_str(
            r#"{"gold":{"persons":4,"weekday":{"3hr":3450},"weekend":{"3hr":3950}}}"#,
        )
        .unwrap();
        let screen = Screen {
            id: "10".to_string(),
            theme: "Gold Room".to_string(),
            location: "Wadala".to_string(),
            image: String::new(),
            description: "Only gold".to_string(),
            features: vec!["Cozy".to_string()],
            capacity: Some(4),
            packages: Some(catalog.clone()),
        };
        upsert_screen(&conn, &screen).unwrap();

        assert_eq!(get_screen(&conn, "10").unwrap().unwrap(), screen);
        assert_eq!(list_screens(&conn, Some("Wadala")).unwrap().len(), 1);
        assert!(list_screens(&conn, Some("Dahisar")).unwrap().is_empty());
        assert_eq!(list_screens(&conn, None).unwrap().len(), 1);
        assert_eq!(count_screens(&conn).unwrap(), 1);
    }

    #[test]
    fn test_expired_sessions_are_invisible() {
        let conn = setup_db();
        let now = Utc::now().naive_utc();
        create_session(
            &conn,
            &Session {
                token: "live".to_string(),
                subject: "u-1".to_string(),
                role: SessionRole::Customer,
                expires_at: now + Duration::hours(1),
            },
        )
        .unwrap();
        create_session(
            &conn,
            &Session {
                token: "stale".to_string(),
                subject: "admin".to_string(),
                role: SessionRole::Admin,
                expires_at: now - Duration::hours(1),
            },
        )
        .unwrap();

        assert!(get_session(&conn, "live").unwrap().is_some());
        assert!(get_session(&conn, "stale").unwrap().is_none());
        assert_eq!(purge_expired_sessions(&conn).unwrap(), 1);
        assert!(delete_session(&conn, "live").unwrap());
        assert!(get_session(&conn, "live").unwrap().is_none());
    }
}
