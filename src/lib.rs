pub mod clock;
pub mod config;
pub mod db;
pub mod medications; // Medication list: cards, search, scan stub
pub mod models;
pub mod reminders; // Reminder derivation engine + reminders screen views
pub mod tracker;

use tracing_subscriber::EnvFilter;

pub use db::StoreError;
pub use tracker::Tracker;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the
/// built-in filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Open the store from the environment, seed it on first run, and print
/// the current reminder board as JSON.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let tracker = Tracker::open(&config::TrackerConfig::from_env())?;
    tracker.initialize()?;

    let board = tracker.reminder_board()?;
    println!("{}", serde_json::to_string_pretty(&board)?);
    Ok(())
}
