use std::fmt;

use colored::{ColoredString, Colorize};

/// What the status line currently says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Collecting { cities: usize, threads: usize },
    Stopped,
    /// Validation problem shown in the warning color. No state changed.
    Warning(String),
}

impl Status {
    pub fn is_warning(&self) -> bool {
        matches!(self, Status::Warning(_))
    }

    pub fn colored(&self) -> ColoredString {
        let text = self.to_string();
        match self {
            Status::Ready => text.blue(),
            Status::Collecting { .. } => text.green(),
            Status::Stopped => text.red(),
            Status::Warning(_) => text.red().bold(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("Ready to collect weather data"),
            Status::Collecting { cities, threads } => write!(
                f,
                "Collecting data from {cities} cities with {threads} threads..."
            ),
            Status::Stopped => f.write_str("Collection stopped"),
            Status::Warning(message) => f.write_str(message),
        }
    }
}

/// Enabled state of the Start/Stop controls. Exactly one is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Controls {
    pub fn for_running(running: bool) -> Self {
        Self {
            start_enabled: !running,
            stop_enabled: running,
        }
    }
}

impl fmt::Display for Controls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |enabled: bool| if enabled { "enabled" } else { "disabled" };
        write!(
            f,
            "[Start Collection: {}] [Stop Collection: {}]",
            state(self.start_enabled),
            state(self.stop_enabled)
        )
    }
}
