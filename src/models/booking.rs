use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::screen::{SessionLength, Tier};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_phone: String,
    pub user_email: String,
    pub screen_id: String,
    pub screen_title: String,
    pub location: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub package: Tier,
    pub duration: Option<SessionLength>,
    pub price: i64,
    pub coupon: Option<String>,
    pub payment_proof: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub status: BookingStatus,
    pub payment_confirmation: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn state(&self) -> BookingState {
        BookingState {
            status: self.status,
            payment_confirmation: self.payment_confirmation,
        }
    }

    /// Only a confirmed booking with verified payment holds its slot.
    pub fn occupies_slot(&self) -> bool {
        self.state().occupies_slot()
    }
}

/// Status plus the payment flag, the pair every lifecycle rule reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingState {
    pub status: BookingStatus,
    pub payment_confirmation: bool,
}

impl BookingState {
    pub const INITIAL: BookingState = BookingState {
        status: BookingStatus::Tentative,
        payment_confirmation: false,
    };

    pub fn occupies_slot(&self) -> bool {
        self.status == BookingStatus::Confirmed && self.payment_confirmation
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Tentative => "tentative",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Tentative,
        }
    }
}

/// Admin triage tabs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingView {
    /// Live bookings still waiting on payment verification.
    #[default]
    Requests,
    Confirmed,
    Cancelled,
    All,
}

impl BookingView {
    pub fn includes(&self, booking: &Booking) -> bool {
        match self {
            BookingView::Requests => {
                booking.status != BookingStatus::Cancelled && !booking.occupies_slot()
            }
            BookingView::Confirmed => booking.occupies_slot(),
            BookingView::Cancelled => booking.status == BookingStatus::Cancelled,
            BookingView::All => true,
        }
    }
}

/// The four fixed daily sessions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    #[serde(rename = "10:00 AM")]
    Morning,
    #[serde(rename = "1:00 PM")]
    Afternoon,
    #[serde(rename = "4:00 PM")]
    Evening,
    #[serde(rename = "7:00 PM")]
    Night,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Morning, Slot::Afternoon, Slot::Evening, Slot::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Morning => "10:00 AM",
            Slot::Afternoon => "1:00 PM",
            Slot::Evening => "4:00 PM",
            Slot::Night => "7:00 PM",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Slot::ALL.into_iter().find(|slot| slot.as_str() == s.trim())
    }
}
