pub mod booking;
pub mod screen;
pub mod session;
pub mod user;

pub use booking::{Booking, BookingState, BookingStatus, BookingView, Slot};
pub use screen::{CatalogError, Package, PackageCatalog, Screen, SessionLength, Tier};
pub use session::{Session, SessionRole};
pub use user::{DisplayTheme, User};
