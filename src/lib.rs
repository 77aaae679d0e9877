pub mod collector;
pub mod display;
pub mod models;
pub mod settings;
pub mod shell;
pub mod utils;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::time::Duration;

use collector::CollectionController;
use display::DisplaySink;
use settings::SettingsStore;
use shell::{run_shell, Shell};

/// Grace period for runtime teardown. Stdin reads run on a blocking thread
/// that cannot be interrupted.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    utils::logging::init();

    log::info!("Weather collector starting up...");

    let store = SettingsStore::from_env()?;
    if let Some(path) = store.path() {
        log::info!("Loaded settings from {}", path.display());
    }
    let settings = store.into_settings();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("collector")
        .build()
        .context("failed to build tokio runtime")?;

    let result = runtime.block_on(async move {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = CollectionController::new(settings, tx);
        let sink = DisplaySink::new(rx, std::io::stdout());
        let shell = Shell::new(controller, sink);

        run_shell(shell, BufReader::new(tokio::io::stdin())).await
    });

    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    log::info!("Weather collector exited");
    result
}
