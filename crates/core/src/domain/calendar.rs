use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    // Southern-hemisphere grouping: Dec-Feb is summer.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Summer,
            3..=5 => Season::Autumn,
            6..=8 => Season::Winter,
            _ => Season::Spring,
        }
    }

    /// Category name the classifier was trained with (used for the one-hot season columns).
    pub fn model_name(self) -> &'static str {
        match self {
            Season::Summer => "Verano",
            Season::Autumn => "Otoño",
            Season::Winter => "Invierno",
            Season::Spring => "Primavera",
        }
    }

    pub fn from_model_name(name: &str) -> Option<Self> {
        [Season::Summer, Season::Autumn, Season::Winter, Season::Spring]
            .into_iter()
            .find(|s| s.model_name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateFeature {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_year: u32,
    pub iso_week: u32,
    pub season: Season,
}

impl DateFeature {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_year: date.ordinal(),
            iso_week: date.iso_week().week(),
            season: Season::from_month(date.month()),
        }
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}
