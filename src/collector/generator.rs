use chrono::{Local, NaiveTime, Timelike};
use rand::{seq::SliceRandom, Rng};

use crate::models::{
    reading::{HUMIDITY_RANGE, TEMPERATURE_RANGE, WIND_SPEED_RANGE},
    Condition, Reading,
};

/// Fabricates weather readings. Keeps the last reading it produced and
/// nothing else.
#[derive(Debug, Default)]
pub struct MockDataGenerator {
    last: Option<Reading>,
}

impl MockDataGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, city: &str) -> Reading {
        self.generate_with(city, &mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&mut self, city: &str, rng: &mut R) -> Reading {
        let reading = Reading {
            city: city.to_string(),
            temperature: rng.gen_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1),
            humidity: rng.gen_range(HUMIDITY_RANGE.0..=HUMIDITY_RANGE.1),
            condition: *Condition::ALL
                .choose(rng)
                .unwrap_or(&Condition::Sunny),
            wind_speed: rng.gen_range(WIND_SPEED_RANGE.0..=WIND_SPEED_RANGE.1),
            timestamp: now_to_the_second(),
        };
        self.last = Some(reading.clone());
        reading
    }

    pub fn last(&self) -> Option<&Reading> {
        self.last.as_ref()
    }
}

fn now_to_the_second() -> NaiveTime {
    let now = Local::now().time();
    now.with_nanosecond(0).unwrap_or(now)
}
