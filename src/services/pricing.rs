use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{PackageCatalog, SessionLength, Tier};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    /// Saturday and Sunday are weekend, Monday to Friday weekday.
    /// The date is already a venue-local calendar day.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("this screen has no package catalog")]
    NoCatalog,

    #[error("no {day} price for the {tier} package{}", duration_suffix(.duration))]
    NotFound {
        tier: &'static str,
        day: &'static str,
        duration: Option<SessionLength>,
    },

    #[error("the standard package needs a duration of 2hr or 3hr")]
    DurationRequired,

    #[error("duration only applies to the standard package, not {tier}")]
    DurationNotApplicable { tier: &'static str },
}

fn duration_suffix(duration: &Option<SessionLength>) -> String {
    duration
        .map(|d| format!(" ({})", d.as_str()))
        .unwrap_or_default()
}

/// Resolves the price for one tier on one day type.
///
/// Standard is priced per session length; every other tier carries a
/// single price per day type and takes no duration.
pub fn lookup_price(
    catalog: Option<&PackageCatalog>,
    tier: Tier,
    day: DayType,
    duration: Option<SessionLength>,
) -> Result<i64, PricingError> {
    let catalog = catalog.ok_or(PricingError::NoCatalog)?;

    let not_found = || PricingError::NotFound {
        tier: tier.as_str(),
        day: day.as_str(),
        duration,
    };

    let package = catalog.package(tier).ok_or_else(not_found)?;
    let prices = match day {
        DayType::Weekday => &package.weekday,
        DayType::Weekend => &package.weekend,
    };

    let price = match (tier, duration) {
        (Tier::Standard, None) => return Err(PricingError::DurationRequired),
        (Tier::Standard, Some(length)) => prices.get(&length).copied(),
        (_, Some(_)) => {
            return Err(PricingError::DurationNotApplicable {
                tier: tier.as_str(),
            })
        }
        (_, None) if prices.len() == 1 => prices.values().next().copied(),
        (_, None) => None,
    };

    price.filter(|p| *p > 0).ok_or_else(not_found)
}

/// Price for a booking on `date`.
pub fn price_for_date(
    catalog: Option<&PackageCatalog>,
    tier: Tier,
    date: NaiveDate,
    duration: Option<SessionLength>,
) -> Result<i64, PricingError> {
    lookup_price(catalog, tier, DayType::from_date(date), duration)
}
