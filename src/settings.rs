use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, env, fs, path::PathBuf, time::Duration};

use crate::models::DEFAULT_CITIES;

pub const CONFIG_PATH_ENV: &str = "WEATHER_COLLECTOR_CONFIG";
pub const TIME_UNIT_ENV: &str = "WEATHER_COLLECTOR_TIME_UNIT_MS";

pub const MIN_WORKER_COUNT: usize = 1;
pub const MAX_WORKER_COUNT: usize = 10;

/// Upper bound for any single derived delay.
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Tunable timings and defaults. Every delay is expressed in time units so
/// tests can shrink the whole schedule by lowering `time_unit_ms`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectorSettings {
    /// Length of one time unit in milliseconds.
    pub time_unit_ms: u64,
    /// Period of the display drain step in milliseconds.
    pub drain_interval_ms: u64,
    pub default_worker_count: usize,
    /// Stagger added per worker slot: `(index mod workers) * stagger_step_units`.
    pub stagger_step_units: f64,
    pub min_interval_units: f64,
    pub max_interval_units: f64,
    /// How long `stop` waits on each worker before abandoning it.
    pub join_timeout_units: f64,
    pub cities: Vec<String>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            time_unit_ms: 1000,
            drain_interval_ms: 100,
            default_worker_count: 3,
            stagger_step_units: 0.5,
            min_interval_units: 1.0,
            max_interval_units: 3.0,
            join_timeout_units: 1.0,
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl CollectorSettings {
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// `units` time units as a duration. Fails for negative or non-finite
    /// multipliers and for results longer than [`MAX_DELAY`].
    pub fn units(&self, units: f64) -> Result<Duration> {
        if !units.is_finite() || units < 0.0 {
            bail!("time unit multiplier must be finite and non-negative, got {units}");
        }
        let delay = Duration::try_from_secs_f64(self.time_unit().as_secs_f64() * units)
            .with_context(|| {
                format!("{units} units of {}ms do not fit in a duration", self.time_unit_ms)
            })?;
        if delay > MAX_DELAY {
            bail!(
                "{units} units of {}ms exceed the {}s delay limit",
                self.time_unit_ms,
                MAX_DELAY.as_secs()
            );
        }
        Ok(delay)
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }

    pub fn join_timeout(&self) -> Result<Duration> {
        self.units(self.join_timeout_units)
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_unit_ms == 0 {
            bail!("timeUnitMs must be greater than zero");
        }
        if self.drain_interval_ms == 0 {
            bail!("drainIntervalMs must be greater than zero");
        }
        if !(MIN_WORKER_COUNT..=MAX_WORKER_COUNT).contains(&self.default_worker_count) {
            bail!(
                "defaultWorkerCount must be between {} and {}, got {}",
                MIN_WORKER_COUNT,
                MAX_WORKER_COUNT,
                self.default_worker_count
            );
        }
        self.units(self.stagger_step_units * (MAX_WORKER_COUNT - 1) as f64)
            .context("invalid staggerStepUnits")?;
        self.join_timeout().context("invalid joinTimeoutUnits")?;
        self.units(self.min_interval_units)
            .context("invalid minIntervalUnits")?;
        self.units(self.max_interval_units)
            .context("invalid maxIntervalUnits")?;
        if self.min_interval_units <= 0.0 || self.min_interval_units > self.max_interval_units {
            bail!(
                "collection interval must satisfy 0 < min <= max, got {}..{}",
                self.min_interval_units,
                self.max_interval_units
            );
        }
        if self.cities.is_empty() {
            bail!("city list must not be empty");
        }
        let mut seen = HashSet::new();
        for city in &self.cities {
            if city.trim().is_empty() {
                bail!("city names must not be blank");
            }
            if !seen.insert(city.as_str()) {
                bail!("duplicate city in configuration: {city}");
            }
        }
        Ok(())
    }
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    data: CollectorSettings,
}

impl SettingsStore {
    /// Load settings from `path` when it exists, falling back to defaults.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let data = match &path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings from {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse settings in {}", path.display()))?
            }
            _ => CollectorSettings::default(),
        };

        Ok(Self { path, data })
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        let path = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut store = Self::new(path)?;

        if let Ok(value) = env::var(TIME_UNIT_ENV) {
            store.data.time_unit_ms = value
                .trim()
                .parse()
                .with_context(|| format!("{TIME_UNIT_ENV} must be a whole number of milliseconds"))?;
        }

        store.data.validate()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.data
    }

    pub fn into_settings(self) -> CollectorSettings {
        self.data
    }
}
