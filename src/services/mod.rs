pub mod auth;
pub mod availability;
pub mod bookings;
pub mod lifecycle;
pub mod notify;
pub mod pricing;
pub mod seed;
