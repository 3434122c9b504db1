use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Screen {
    pub id: String,
    pub theme: String,
    pub location: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub packages: Option<PackageCatalog>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Silver,
    Gold,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Standard, Tier::Silver, Tier::Gold, Tier::Diamond];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Standard => "standard",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Diamond => "diamond",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionLength {
    #[serde(rename = "2hr")]
    TwoHours,
    #[serde(rename = "3hr")]
    ThreeHours,
}

impl SessionLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionLength::TwoHours => "2hr",
            SessionLength::ThreeHours => "3hr",
        }
    }

    pub const ALL: [SessionLength; 2] = [SessionLength::TwoHours, SessionLength::ThreeHours];

    pub fn parse(s: &str) -> Option<Self> {
        SessionLength::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    pub persons: u32,
    pub weekday: BTreeMap<SessionLength, i64>,
    pub weekend: BTreeMap<SessionLength, i64>,
    #[serde(default)]
    pub inclusions: Vec<String>,
}

/// Per-screen price list. Tiers a screen does not offer are simply absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silver: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diamond: Option<Package>,
    #[serde(default, rename = "extraGuest", skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_guest: BTreeMap<String, i64>,
    #[serde(default, rename = "complimentaryHamper", skip_serializing_if = "Vec::is_empty")]
    pub complimentary_hamper: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("standard package must price both 2hr and 3hr sessions on {day}")]
    StandardIncomplete { day: &'static str },

    #[error("{tier} package must have exactly one {day} price")]
    AmbiguousTierPrice { tier: &'static str, day: &'static str },

    #[error("{tier} package has a non-positive price")]
    NonPositivePrice { tier: &'static str },
}

impl PackageCatalog {
    pub fn package(&self, tier: Tier) -> Option<&Package> {
        match tier {
            Tier::Standard => self.standard.as_ref(),
            Tier::Silver => self.silver.as_ref(),
            Tier::Gold => self.gold.as_ref(),
            Tier::Diamond => self.diamond.as_ref(),
        }
    }

    pub fn package_mut(&mut self, tier: Tier) -> &mut Option<Package> {
        match tier {
            Tier::Standard => &mut self.standard,
            Tier::Silver => &mut self.silver,
            Tier::Gold => &mut self.gold,
            Tier::Diamond => &mut self.diamond,
        }
    }

    pub fn tiers(&self) -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|tier| self.package(*tier).is_some())
            .collect()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for tier in self.tiers() {
            let Some(pkg) = self.package(tier) else {
                continue;
            };

            if pkg.weekday.values().chain(pkg.weekend.values()).any(|p| *p <= 0) {
                return Err(CatalogError::NonPositivePrice { tier: tier.as_str() });
            }

            for (day, prices) in [("weekday", &pkg.weekday), ("weekend", &pkg.weekend)] {
                if tier == Tier::Standard {
                    let complete = prices.contains_key(&SessionLength::TwoHours)
                        && prices.contains_key(&SessionLength::ThreeHours);
                    if !complete {
                        return Err(CatalogError::StandardIncomplete { day });
                    }
                } else if prices.len() != 1 {
                    return Err(CatalogError::AmbiguousTierPrice {
                        tier: tier.as_str(),
                        day,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLD_ONLY: &str = r#"{
        "gold": {
            "persons": 4,
            "weekday": {"3hr": 3450},
            "weekend": {"3hr": 3950},
            "inclusions": ["LED tag", "Cake"]
        }
    }"#;

    #[test]
    fn test_parse_catalog_json() {
        let catalog: PackageCatalog = serde_json::from_str(GOLD_ONLY).unwrap();
        assert_eq!(catalog.tiers(), vec![Tier::Gold]);
        let gold = catalog.package(Tier::Gold).unwrap();
        assert_eq!(gold.weekend[&SessionLength::ThreeHours], 3950);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_extra_fields_use_reference_names() {
        let json = r#"{"extraGuest":{"5-12":299},"complimentaryHamper":["Popcorn"]}"#;
        let catalog: PackageCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.extra_guest["5-12"], 299);
        assert_eq!(catalog.complimentary_hamper, vec!["Popcorn".to_string()]);
        assert!(catalog.tiers().is_empty());
    }

    #[test]
    fn test_validate_rejects_incomplete_standard() {
        let json = r#"{"standard":{"persons":2,"weekday":{"2hr":1500},"weekend":{"2hr":2000,"3hr":2500}}}"#;
        let catalog: PackageCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::StandardIncomplete { day: "weekday" })
        );
    }

    #[test]
    fn test_validate_rejects_two_prices_on_non_standard() {
        let json = r#"{"silver":{"persons":4,"weekday":{"2hr":2000,"3hr":2450},"weekend":{"3hr":2950}}}"#;
        let catalog: PackageCatalog = serde_json::from_str(json).unwrap();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::AmbiguousTierPrice { tier: "silver", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_price() {
        let json = r#"{"gold":{"persons":4,"weekday":{"3hr":0},"weekend":{"3hr":3950}}}"#;
        let catalog: PackageCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::NonPositivePrice { tier: "gold" })
        );
    }

    #[test]
    fn test_tier_parse_is_case_insensitive() {
        assert_eq!(Tier::parse("Gold"), Some(Tier::Gold));
        assert_eq!(Tier::parse("platinum"), None);
    }

    #[test]
    fn test_session_length_parse_is_case_insensitive() {
        assert_eq!(SessionLength::parse("2HR"), Some(SessionLength::TwoHours));
        assert_eq!(SessionLength::parse(" 3Hr "), Some(SessionLength::ThreeHours));
        assert_eq!(SessionLength::parse("4hr"), None);
    }
}
