//! Weather reading data model.
//!
//! A single fabricated observation for one city, produced by a collection
//! worker and rendered into the display log.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const TEMPERATURE_RANGE: (i32, i32) = (-10, 40);
pub const HUMIDITY_RANGE: (u8, u8) = (20, 100);
pub const WIND_SPEED_RANGE: (u8, u8) = (0, 50);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    Windy,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::Sunny,
        Condition::Cloudy,
        Condition::Rainy,
        Condition::Stormy,
        Condition::Snowy,
        Condition::Windy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "Sunny",
            Condition::Cloudy => "Cloudy",
            Condition::Rainy => "Rainy",
            Condition::Stormy => "Stormy",
            Condition::Snowy => "Snowy",
            Condition::Windy => "Windy",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents one generated observation. Immutable once produced;
/// `Display` renders it as a single log line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub city: String,
    pub temperature: i32,
    pub humidity: u8,
    pub condition: Condition,
    pub wind_speed: u8,
    /// Wall-clock time of day, truncated to whole seconds.
    pub timestamp: NaiveTime,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}°C, {}, Humidity: {}%, Wind: {} km/h [{}]",
            self.city,
            self.temperature,
            self.condition,
            self.humidity,
            self.wind_speed,
            self.timestamp.format("%H:%M:%S")
        )
    }
}
