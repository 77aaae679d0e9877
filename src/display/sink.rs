use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

use crate::models::Reading;

use super::reading_log::ReadingLog;

/// Consumer end of the reading queue. `drain` moves whatever is queued
/// right now into the log and onto the output surface.
pub struct DisplaySink<W: Write> {
    rx: UnboundedReceiver<Reading>,
    log: ReadingLog,
    out: W,
}

impl<W: Write> DisplaySink<W> {
    pub fn new(rx: UnboundedReceiver<Reading>, out: W) -> Self {
        Self {
            rx,
            log: ReadingLog::new(),
            out,
        }
    }

    /// Never waits for new items. Returns how many lines were appended.
    pub fn drain(&mut self) -> Result<usize> {
        let mut appended = 0;

        loop {
            match self.rx.try_recv() {
                Ok(reading) => {
                    let line = reading.to_string();
                    writeln!(self.out, "{line}").context("failed to write reading to display")?;
                    self.log.append(line);
                    appended += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if appended > 0 {
            self.out.flush().context("failed to flush display")?;
            self.log.scroll_to_end();
        }

        Ok(appended)
    }

    pub fn log(&self) -> &ReadingLog {
        &self.log
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_parts(self) -> (ReadingLog, W) {
        (self.log, self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;
    use chrono::NaiveTime;
    use tokio::sync::mpsc;

    fn reading(city: &str) -> Reading {
        Reading {
            city: city.into(),
            temperature: 21,
            humidity: 40,
            condition: Condition::Cloudy,
            wind_speed: 7,
            timestamp: NaiveTime::from_hms_opt(12, 0, 1).unwrap(),
        }
    }

    #[test]
    fn drains_everything_available() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sink = DisplaySink::new(rx, Vec::new());

        tx.send(reading("Tokyo")).unwrap();
        tx.send(reading("Paris")).unwrap();

        assert_eq!(sink.drain().unwrap(), 2);
        assert_eq!(sink.log().len(), 2);
        assert!(sink.log().is_scrolled_to_end());
        assert_eq!(
            sink.log().last(),
            Some("Paris: 21°C, Cloudy, Humidity: 40%, Wind: 7 km/h [12:00:01]")
        );

        let (_, out) = sink.into_parts();
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 2);
        assert!(printed.starts_with("Tokyo: 21°C"));
    }

    #[test]
    fn empty_drain_leaves_log_unchanged() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sink = DisplaySink::new(rx, Vec::new());

        tx.send(reading("Berlin")).unwrap();
        sink.drain().unwrap();
        let before = sink.log().lines().to_vec();

        assert_eq!(sink.drain().unwrap(), 0);
        assert_eq!(sink.drain().unwrap(), 0);
        assert_eq!(sink.log().lines(), before.as_slice());
    }

    #[test]
    fn tolerates_closed_queue() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sink = DisplaySink::new(rx, Vec::new());

        tx.send(reading("Dubai")).unwrap();
        drop(tx);

        assert_eq!(sink.drain().unwrap(), 1);
        assert_eq!(sink.drain().unwrap(), 0);
    }
}
