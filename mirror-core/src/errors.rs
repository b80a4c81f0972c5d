use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Raised when the mirror-list document cannot be read.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read mirror list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("mirrorlist_file must not be empty")]
    EmptyFileName,

    #[error("mirrorlist_file must be a bare file name, got: {0}")]
    FileNameHasSeparator(String),

    #[error("mirror_list_source_path must not be empty")]
    EmptySourcePath,
}

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("No mirror selected")]
    NothingSelected,

    #[error("Failed to write mirror list {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
