use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SERVINGS: u32 = 2;

/// Hour every planned meal is pinned to, so that converting between
/// timezones never moves it onto a neighbouring day.
pub const NEUTRAL_HOUR: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(format!("Unknown meal type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: i64,
    pub user_id: i64,
    pub recipe_id: i64,
    #[serde(with = "meal_date_format")]
    pub meal_date: NaiveDateTime,
    pub meal_type: MealType,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl MealPlan {
    pub fn day(&self) -> NaiveDate {
        self.meal_date.date()
    }

    pub fn occupies(&self, date: NaiveDate, meal_type: MealType) -> bool {
        self.day() == date && self.meal_type == meal_type
    }
}

/// Body of an add request. The server assigns id and owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMealPlan {
    pub recipe_id: i64,
    #[serde(with = "meal_date_format")]
    pub meal_date: NaiveDateTime,
    pub meal_type: MealType,
    pub servings: u32,
}

impl NewMealPlan {
    pub fn for_slot(date: NaiveDate, meal_type: MealType, recipe_id: i64, servings: u32) -> Self {
        Self {
            recipe_id,
            meal_date: at_neutral_hour(date),
            meal_type,
            servings,
        }
    }
}

pub fn at_neutral_hour(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + chrono::Duration::hours(NEUTRAL_HOUR as i64)
}

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

/// `meal_date` goes out as a naive ISO date-time. Coming back it may be
/// naive, carry an offset, or be a bare date.
pub(crate) mod meal_date_format {
    use super::*;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        let raw = raw.trim();

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Ok(with_offset.with_timezone(&Local).naive_local());
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(naive);
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(naive);
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(at_neutral_hour)
            .map_err(|_| format!("Invalid meal_date: {}", raw))
    }
}
