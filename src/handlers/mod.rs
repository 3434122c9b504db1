pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod notify;
pub mod screens;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // customer accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
        .route("/api/me/preferences", put(auth::update_preferences))
        // catalog
        .route("/api/screens", get(screens::list_screens))
        .route("/api/screens/:id", get(screens::get_screen))
        .route(
            "/api/screens/:id/availability",
            get(screens::get_availability),
        )
        // bookings
        .route(
            "/api/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route(
            "/api/bookings/:id/payment-proof",
            post(bookings::submit_payment_proof),
        )
        .route(
            "/api/send-booking-confirmation",
            post(notify::send_booking_confirmation),
        )
        // staff
        .route("/api/admin/login", post(admin::login))
        .route(
            "/api/admin/bookings",
            get(admin::get_bookings).post(admin::create_booking),
        )
        .route(
            "/api/admin/bookings/:id/confirm",
            post(admin::confirm_booking),
        )
        .route(
            "/api/admin/bookings/:id/cancel",
            post(admin::cancel_booking),
        )
        .route(
            "/api/admin/bookings/:id/restore",
            post(admin::restore_booking),
        )
        .route("/api/admin/bookings/:id/undo", post(admin::undo_booking))
        .route("/api/admin/users", get(admin::get_users))
        .route("/api/admin/screens", get(admin::get_screens))
        .route("/api/admin/screens/:id", put(admin::put_screen))
        .route(
            "/api/admin/screens/sync-packages",
            post(admin::sync_packages),
        )
        .with_state(state)
}
