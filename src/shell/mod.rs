//! Console front end: the city checkboxes, thread spinbox, start/stop
//! buttons, status line and scrolling log, driven by one cooperative
//! event loop.

pub mod command;
pub mod selection;
pub mod status;

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Duration, MissedTickBehavior};

use crate::collector::CollectionController;
use crate::display::DisplaySink;
use crate::settings::{MAX_WORKER_COUNT, MIN_WORKER_COUNT};

pub use command::{Command, HELP};
pub use selection::CitySelection;
pub use status::{Controls, Status};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<W: Write> {
    controller: CollectionController,
    sink: DisplaySink<W>,
    selection: CitySelection,
    worker_count: usize,
    status: Status,
}

impl<W: Write> Shell<W> {
    pub fn new(controller: CollectionController, sink: DisplaySink<W>) -> Self {
        let settings = controller.settings();
        let selection = CitySelection::new(settings.cities.iter().cloned());
        let worker_count = settings.default_worker_count;

        Self {
            controller,
            sink,
            selection,
            worker_count,
            status: Status::Ready,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn controls(&self) -> Controls {
        Controls::for_running(self.controller.is_running())
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn selection(&self) -> &CitySelection {
        &self.selection
    }

    pub fn controller(&self) -> &CollectionController {
        &self.controller
    }

    pub fn sink(&self) -> &DisplaySink<W> {
        &self.sink
    }

    pub fn drain_interval(&self) -> Duration {
        self.controller.settings().drain_interval()
    }

    /// The periodic drain step.
    pub fn tick(&mut self) -> Result<usize> {
        self.sink.drain()
    }

    pub fn render_intro(&mut self) -> Result<()> {
        self.print("Weather Data Collection System")?;
        self.render_cities()?;
        self.print(&format!("Threads: {}", self.worker_count))?;
        self.print("Type 'help' for commands.")?;
        self.render_status()
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => self.handle(command).await,
            Ok(None) => Ok(Flow::Continue),
            Err(err) => {
                self.set_status(Status::Warning(err.to_string()))?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Cities => self.render_cities()?,
            Command::Toggle(key) => match self.selection.toggle(&key) {
                Ok((city, checked)) => {
                    let mark = if checked { "x" } else { " " };
                    self.print(&format!("[{mark}] {city}"))?;
                }
                Err(err) => self.set_status(Status::Warning(err.to_string()))?,
            },
            Command::SelectAll => {
                self.selection.set_all(true);
                self.render_cities()?;
            }
            Command::SelectNone => {
                self.selection.set_all(false);
                self.render_cities()?;
            }
            Command::Threads(count) => {
                if (MIN_WORKER_COUNT..=MAX_WORKER_COUNT).contains(&count) {
                    self.worker_count = count;
                    self.print(&format!("Threads: {count}"))?;
                } else {
                    self.set_status(Status::Warning(format!(
                        "Thread count must be between {MIN_WORKER_COUNT} and {MAX_WORKER_COUNT}"
                    )))?;
                }
            }
            Command::Start => self.start()?,
            Command::Stop => self.stop().await?,
            Command::Status => self.render_status()?,
            Command::Log => {
                let lines = self.sink.log().lines().to_vec();
                for line in lines {
                    self.print(&line)?;
                }
            }
            Command::Snapshot => {
                let json = serde_json::to_string_pretty(&self.controller.snapshot())
                    .context("failed to serialize session snapshot")?;
                self.print(&json)?;
            }
            Command::Help => self.print(HELP)?,
            Command::Quit => {
                self.shutdown().await?;
                return Ok(Flow::Exit);
            }
        }

        Ok(Flow::Continue)
    }

    fn start(&mut self) -> Result<()> {
        // Start is disabled while collecting.
        if !self.controls().start_enabled {
            return self.render_status();
        }

        let cities = self.selection.selected();
        match self.controller.start(&cities, self.worker_count) {
            Ok(summary) => {
                self.sink.clear();
                self.set_status(Status::Collecting {
                    cities: summary.city_count,
                    threads: summary.worker_count,
                })
            }
            Err(err) => {
                log_warn!("start rejected: {err}");
                self.set_status(Status::Warning(err.to_string()))
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        // Stop is disabled while idle.
        if !self.controls().stop_enabled {
            return self.render_status();
        }

        self.controller.stop().await;
        self.sink.drain()?;
        self.set_status(Status::Stopped)
    }

    /// Window-close path: stop if collecting, then flush the queue.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.controller.is_running() {
            self.stop().await?;
        }
        log_info!("shell shutting down");
        Ok(())
    }

    fn set_status(&mut self, status: Status) -> Result<()> {
        self.status = status;
        self.render_status()
    }

    fn render_status(&mut self) -> Result<()> {
        let line = format!("{} {}", self.status.colored(), self.controls());
        self.print(&line)
    }

    fn render_cities(&mut self) -> Result<()> {
        let listing = self
            .selection
            .entries()
            .iter()
            .enumerate()
            .map(|(i, (city, checked))| {
                format!("{:>2}. [{}] {}", i + 1, if *checked { "x" } else { " " }, city)
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.print(&listing)
    }

    fn print(&mut self, text: &str) -> Result<()> {
        let out = self.sink.out_mut();
        writeln!(out, "{text}").context("failed to write to console")?;
        out.flush().context("failed to flush console")
    }
}

/// Run the event loop until `quit`, end of input, or Ctrl-C. The drain
/// step fires on its own period whether or not collection is running.
pub async fn run_shell<R, W>(mut shell: Shell<W>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut ticker = tokio::time::interval(shell.drain_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    shell.render_intro()?;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                shell.tick()?;
            }
            line = lines.next_line() => {
                match line.context("failed to read command")? {
                    Some(line) => {
                        if shell.handle_line(&line).await? == Flow::Exit {
                            break;
                        }
                    }
                    None => {
                        shell.shutdown().await?;
                        break;
                    }
                }
            }
            _ = &mut ctrl_c => {
                log_info!("interrupt received");
                shell.shutdown().await?;
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CollectorSettings;
    use tokio::sync::mpsc;

    fn shell() -> Shell<Vec<u8>> {
        let settings = CollectorSettings {
            time_unit_ms: 10,
            drain_interval_ms: 5,
            ..CollectorSettings::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        Shell::new(
            CollectionController::new(settings, tx),
            DisplaySink::new(rx, Vec::new()),
        )
    }

    #[tokio::test]
    async fn starts_with_defaults() {
        let shell = shell();
        assert_eq!(shell.status(), &Status::Ready);
        assert_eq!(shell.worker_count(), 3);
        assert_eq!(shell.selection().selected().len(), 10);
        assert_eq!(shell.controls(), Controls::for_running(false));
    }

    #[tokio::test]
    async fn start_without_cities_only_warns() {
        let mut shell = shell();
        shell.handle(Command::SelectNone).await.unwrap();
        shell.handle(Command::Start).await.unwrap();

        assert_eq!(
            shell.status(),
            &Status::Warning("Please select at least one city!".into())
        );
        assert!(!shell.controller().is_running());
        assert_eq!(shell.controller().active_workers(), 0);
        assert!(shell.controls().start_enabled);
    }

    #[tokio::test]
    async fn start_stop_cycle_updates_status_and_controls() {
        let mut shell = shell();
        shell.handle_line("select none").await.unwrap();
        shell.handle_line("toggle Tokyo").await.unwrap();
        shell.handle_line("toggle paris").await.unwrap();
        shell.handle_line("threads 2").await.unwrap();
        shell.handle_line("start").await.unwrap();

        assert_eq!(
            shell.status(),
            &Status::Collecting { cities: 2, threads: 2 }
        );
        assert_eq!(shell.controls(), Controls::for_running(true));
        assert_eq!(shell.controller().active_workers(), 2);

        shell.handle_line("start").await.unwrap();
        assert_eq!(
            shell.status(),
            &Status::Collecting { cities: 2, threads: 2 }
        );
        assert_eq!(shell.controller().active_workers(), 2);

        tokio::time::sleep(Duration::from_millis(30)).await;
        shell.handle_line("stop").await.unwrap();

        assert_eq!(shell.status(), &Status::Stopped);
        assert_eq!(shell.controls(), Controls::for_running(false));
        assert_eq!(shell.controller().active_workers(), 0);
        assert!(!shell.sink().log().is_empty());
    }

    #[tokio::test]
    async fn rejects_out_of_range_thread_count() {
        let mut shell = shell();
        shell.handle_line("threads 11").await.unwrap();
        assert!(shell.status().is_warning());
        assert_eq!(shell.worker_count(), 3);

        shell.handle_line("threads 0").await.unwrap();
        assert_eq!(shell.worker_count(), 3);
    }

    #[tokio::test]
    async fn stop_when_idle_keeps_status() {
        let mut shell = shell();
        shell.handle(Command::Stop).await.unwrap();
        assert_eq!(shell.status(), &Status::Ready);
        assert_eq!(shell.controls(), Controls::for_running(false));

        let printed = String::from_utf8(shell.sink.out_mut().clone()).unwrap();
        assert!(printed.contains("[Stop Collection: disabled]"));
    }

    #[tokio::test]
    async fn unknown_command_warns() {
        let mut shell = shell();
        assert_eq!(shell.handle_line("launch").await.unwrap(), Flow::Continue);
        assert!(shell.status().is_warning());
    }

    #[tokio::test]
    async fn quit_stops_running_collection() {
        let mut shell = shell();
        shell.handle(Command::Start).await.unwrap();
        assert!(shell.controller().is_running());

        assert_eq!(shell.handle(Command::Quit).await.unwrap(), Flow::Exit);
        assert!(!shell.controller().is_running());
        assert_eq!(shell.controller().active_workers(), 0);
    }

    #[tokio::test]
    async fn snapshot_prints_json() {
        let mut shell = shell();
        shell.handle(Command::Snapshot).await.unwrap();
        let printed = String::from_utf8(shell.sink.out_mut().clone()).unwrap();
        assert!(printed.contains("\"running\": false"));
    }

    #[tokio::test]
    async fn event_loop_exits_on_end_of_input() {
        let mut shell = shell();
        shell.handle_line("select none").await.unwrap();
        shell.handle_line("toggle Tokyo").await.unwrap();

        let input: &[u8] = b"start\n";
        tokio::time::timeout(Duration::from_secs(5), run_shell(shell, input))
            .await
            .expect("event loop should finish")
            .unwrap();
    }
}
