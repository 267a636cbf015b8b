use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while producing the tree file.
#[derive(Debug, Error)]
pub enum FtgError {
    /// The destination could not be created or truncated.
    #[error("Cannot write to output location {}", path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write or the final flush to the destination failed.
    #[error("Failed to write to output location {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory could not be enumerated or an entry could not be queried.
    #[error("Failed to get entries for directory {}", path.display())]
    FilesystemQuery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures raised by the walker, before the output path is known to it.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("failed to emit tree line")]
    Write(#[source] io::Error),

    #[error(transparent)]
    Query(#[from] FtgError),
}

impl WalkError {
    /// Attaches the destination path to a write failure.
    pub fn into_ftg_error(self, output: PathBuf) -> FtgError {
        match self {
            WalkError::Write(source) => FtgError::OutputWrite {
                path: output,
                source,
            },
            WalkError::Query(err) => err,
        }
    }
}
