use directories::ProjectDirs;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Default log location in the platform data dir
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "typesprint").map(|pd| pd.data_local_dir().join("typesprint.log"))
}

/// Route `log` output to `path`. The terminal is owned by the UI, so log lines
/// never go to stdout or stderr. Level comes from `RUST_LOG`, default info.
///
/// Fails when the file cannot be created; the caller reports that before the
/// terminal enters raw mode.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = File::create(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(io::Error::other)
}
