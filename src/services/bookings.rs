use anyhow::Context;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::queries;
use crate::models::{Booking, BookingState, Screen, SessionLength, Slot, Tier, User};
use crate::services::availability;
use crate::services::lifecycle::{self, AdminAction, LifecycleError};
use crate::services::pricing::{self, PricingError};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("screen not found: {0}")]
    ScreenNotFound(String),

    #[error("booking not found")]
    NotFound,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("the {0} slot is already booked for that date")]
    SlotUnavailable(&'static str),

    #[error("another paid booking already holds this slot")]
    SlotTaken,

    #[error("booking was changed by someone else, reload and try again")]
    Conflict,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// What a customer picks on the booking form.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub screen_id: String,
    pub date: String,
    pub slot: String,
    pub package: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub coupon: Option<String>,
}

/// Staff booking on a customer's behalf.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBookingRequest {
    pub user_name: String,
    pub user_phone: String,
    pub user_email: String,
    pub screen_id: String,
    pub date: String,
    pub slot: String,
    pub package: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub coupon: Option<String>,
    #[serde(default)]
    pub payment_confirmation: bool,
}

struct Selection {
    date: NaiveDate,
    slot: Slot,
    tier: Tier,
    duration: Option<SessionLength>,
}

struct Customer<'a> {
    id: &'a str,
    name: &'a str,
    phone: &'a str,
    email: &'a str,
}

fn parse_selection(
    date: &str,
    slot: &str,
    package: &str,
    duration: Option<&str>,
) -> Result<Selection, BookingError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::Validation(format!("date must be YYYY-MM-DD, got '{date}'")))?;
    let slot = Slot::parse(slot)
        .ok_or_else(|| BookingError::Validation(format!("unknown slot '{slot}'")))?;
    let tier = Tier::parse(package)
        .ok_or_else(|| BookingError::Validation(format!("unknown package '{package}'")))?;
    let duration = match duration.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => Some(
            SessionLength::parse(d)
                .ok_or_else(|| BookingError::Validation(format!("unknown duration '{d}'")))?,
        ),
        None => None,
    };

    Ok(Selection {
        date,
        slot,
        tier,
        duration,
    })
}

fn clean_coupon(coupon: Option<&str>) -> Option<String> {
    coupon
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn load_screen(conn: &Connection, screen_id: &str) -> Result<Screen, BookingError> {
    queries::get_screen(conn, screen_id)?
        .ok_or_else(|| BookingError::ScreenNotFound(screen_id.to_string()))
}

fn insert_booking(
    conn: &Connection,
    customer: Customer<'_>,
    screen: &Screen,
    selection: &Selection,
    coupon: Option<String>,
    state: BookingState,
) -> Result<Booking, BookingError> {
    // Price is stamped once here and never recomputed.
    let price = pricing::price_for_date(
        screen.packages.as_ref(),
        selection.tier,
        selection.date,
        selection.duration,
    )?;

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: customer.id.to_string(),
        user_name: customer.name.to_string(),
        user_phone: customer.phone.to_string(),
        user_email: customer.email.to_string(),
        screen_id: screen.id.clone(),
        screen_title: screen.theme.clone(),
        location: screen.location.clone(),
        date: selection.date,
        slot: selection.slot,
        package: selection.tier,
        duration: selection.duration,
        price,
        coupon,
        payment_proof: None,
        paid_at: None,
        status: state.status,
        payment_confirmation: state.payment_confirmation,
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = queries::create_booking(conn, &booking) {
        if queries::is_constraint_violation(&e) {
            return Err(BookingError::SlotTaken);
        }
        return Err(e.into());
    }

    if !queries::append_previous_booking(conn, &booking.user_id, &booking.id)? {
        tracing::warn!(user_id = %booking.user_id, "booking created for unknown user");
    }

    Ok(booking)
}

fn log_created(booking: &Booking) {
    tracing::info!(
        booking_id = %booking.id,
        screen_id = %booking.screen_id,
        date = %booking.date,
        slot = booking.slot.as_str(),
        package = booking.package.as_str(),
        price = booking.price,
        status = booking.status.as_str(),
        "booking created"
    );
}

/// Customer booking. Always born tentative and unpaid.
pub fn create_booking(
    conn: &Connection,
    user: &User,
    request: &BookingRequest,
) -> Result<Booking, BookingError> {
    let selection = parse_selection(
        &request.date,
        &request.slot,
        &request.package,
        request.duration.as_deref(),
    )?;
    if user.phone.trim().is_empty() {
        return Err(BookingError::Validation(
            "add a phone number to your profile before booking".to_string(),
        ));
    }
    let screen = load_screen(conn, &request.screen_id)?;

    if !availability::is_slot_free(conn, &screen.id, &selection.date, selection.slot)? {
        return Err(BookingError::SlotUnavailable(selection.slot.as_str()));
    }

    let customer = Customer {
        id: &user.id,
        name: &user.name,
        phone: &user.phone,
        email: &user.email,
    };
    let tx = conn
        .unchecked_transaction()
        .context("failed to start booking transaction")?;
    let booking = insert_booking(
        &tx,
        customer,
        &screen,
        &selection,
        clean_coupon(request.coupon.as_deref()),
        lifecycle::initial_state(false),
    )?;
    tx.commit().context("failed to commit booking")?;

    log_created(&booking);
    Ok(booking)
}

/// Finds the customer by phone, then by email, creating an account record if neither matches.
pub fn resolve_customer(
    conn: &Connection,
    name: &str,
    phone: &str,
    email: &str,
) -> Result<User, BookingError> {
    if let Some(user) = queries::find_user_by_phone(conn, phone)? {
        return Ok(user);
    }
    if let Some(user) = queries::find_user_by_email(conn, email)? {
        return Ok(user);
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        created_at: Utc::now().naive_utc(),
        previous_bookings: vec![],
        display_theme: Default::default(),
    };
    queries::insert_user(conn, &user)?;
    tracing::debug!(user_id = %user.id, "new customer record for staff booking");
    Ok(user)
}

/// Staff booking. The only path that can create a booking already paid.
pub fn create_booking_on_behalf(
    conn: &Connection,
    request: &AdminBookingRequest,
) -> Result<Booking, BookingError> {
    let name = request.user_name.trim();
    let phone = request.user_phone.trim();
    let email = request.user_email.trim();
    if name.is_empty() || phone.is_empty() || email.is_empty() {
        return Err(BookingError::Validation(
            "customer name, phone and email are required".to_string(),
        ));
    }

    let selection = parse_selection(
        &request.date,
        &request.slot,
        &request.package,
        request.duration.as_deref(),
    )?;
    let screen = load_screen(conn, &request.screen_id)?;

    // A refused booking must not leave a freshly created customer behind.
    let tx = conn
        .unchecked_transaction()
        .context("failed to start booking transaction")?;
    let user = resolve_customer(&tx, name, phone, email)?;
    let customer = Customer {
        id: &user.id,
        name,
        phone,
        email,
    };
    let booking = insert_booking(
        &tx,
        customer,
        &screen,
        &selection,
        clean_coupon(request.coupon.as_deref()),
        lifecycle::initial_state(request.payment_confirmation),
    )?;
    tx.commit().context("failed to commit booking")?;

    log_created(&booking);
    Ok(booking)
}

pub fn get_customer_booking(
    conn: &Connection,
    user_id: &str,
    booking_id: &str,
) -> Result<Booking, BookingError> {
    match queries::get_booking_by_id(conn, booking_id)? {
        Some(b) if b.user_id == user_id => Ok(b),
        _ => Err(BookingError::NotFound),
    }
}

/// Stores payment evidence for staff review. Replaces any earlier proof and
/// leaves status and payment flag untouched.
pub fn submit_payment_proof(
    conn: &Connection,
    user_id: &str,
    booking_id: &str,
    proof: &str,
) -> Result<Booking, BookingError> {
    let proof = proof.trim();
    if proof.is_empty() {
        return Err(BookingError::Validation(
            "please paste the payment proof".to_string(),
        ));
    }

    let booking = get_customer_booking(conn, user_id, booking_id)?;
    let paid_at = Utc::now().naive_utc();
    if !queries::set_payment_proof(conn, &booking.id, proof, &paid_at)? {
        return Err(BookingError::NotFound);
    }
    tracing::info!(booking_id = %booking.id, "payment proof submitted");

    get_customer_booking(conn, user_id, booking_id)
}

pub fn apply_admin_action(
    conn: &Connection,
    booking_id: &str,
    action: AdminAction,
) -> Result<Booking, BookingError> {
    let booking = queries::get_booking_by_id(conn, booking_id)?.ok_or(BookingError::NotFound)?;
    let current = booking.state();
    let next = lifecycle::transition(current, action)?;

    match queries::update_booking_state(conn, booking_id, current, next) {
        Ok(true) => {}
        Ok(false) => return Err(BookingError::Conflict),
        Err(e) if queries::is_constraint_violation(&e) => return Err(BookingError::SlotTaken),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(
        booking_id = %booking_id,
        action = action.as_str(),
        status = next.status.as_str(),
        payment_confirmation = next.payment_confirmation,
        "booking status changed"
    );

    queries::get_booking_by_id(conn, booking_id)?.ok_or(BookingError::NotFound)
}
