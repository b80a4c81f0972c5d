use env_logger::Target;
use std::fs;
use std::path::PathBuf;

/// Initialise the global logger.
///
/// Logs go to `log_file` (appended) when it can be opened and to stderr
/// otherwise. `RUST_LOG` overrides the default `info` level.
pub fn init_with(log_file: Option<PathBuf>) {
    let target = log_file
        .and_then(|path| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).ok()?;
            }
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .ok()
        })
        .map(|file| Target::Pipe(Box::new(file)))
        .unwrap_or(Target::Stderr);

    // A second init (tests, embedding) keeps the first logger.
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(target)
        .try_init();
}
