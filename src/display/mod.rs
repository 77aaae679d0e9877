pub mod reading_log;
pub mod sink;

pub use reading_log::ReadingLog;
pub use sink::DisplaySink;
