pub mod reading;
pub mod session;

pub use reading::{Condition, Reading};
pub use session::{SessionSnapshot, StartSummary, StopSummary, WorkerInfo, WorkerPhase};

/// Cities offered for selection, in display order.
pub const DEFAULT_CITIES: [&str; 10] = [
    "New York",
    "London",
    "Tokyo",
    "Sydney",
    "Paris",
    "Berlin",
    "Mumbai",
    "Beijing",
    "Dubai",
    "Singapore",
];
