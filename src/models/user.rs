use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: NaiveDateTime,
    pub previous_bookings: Vec<String>,
    pub display_theme: DisplayTheme,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTheme {
    #[default]
    Light,
    Dark,
}

impl DisplayTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayTheme::Light => "light",
            DisplayTheme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "dark" => DisplayTheme::Dark,
            _ => DisplayTheme::Light,
        }
    }
}
