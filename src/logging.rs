//! Log setup. The terminal belongs to the UI, so logs go to a file in the
//! cache directory (`~/.cache/issuescope/issuescope.log` on Linux).
//! Filter with `RUST_LOG`, e.g. `RUST_LOG=issuescope=debug`.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn log_path() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("issuescope");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("issuescope.log"))
}

fn open_log() -> Option<File> {
    let path = log_path()?;
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber. Without a writable log file nothing is logged.
pub fn init() {
    let Some(file) = open_log() else {
        return;
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
}
