use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config;

/// Install a file-backed `tracing` subscriber.
///
/// The terminal belongs to the TUI, so nothing is written to stdout/stderr
/// once it is up. `RUST_LOG` wins over `log.level`. Any failure here only
/// means running without logs.
pub fn init(settings: &config::Settings) {
    let Some(path) = settings.log_path() else {
        eprintln!("musicshare: no log path available, logging disabled");
        return;
    };

    let file = match open_log_file(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "musicshare: cannot open log file {}, logging disabled: {e}",
                path.display()
            );
            return;
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_line_number(true)
        .with_target(false)
        .with_file(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("musicshare: failed to install log subscriber: {e}");
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
