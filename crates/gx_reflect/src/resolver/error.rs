use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::name::NameError;

/// An error that occurs when probing a module file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProbeError {
    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{}` does not contain a module stamp", path.display())]
    MissingStamp { path: PathBuf },
    #[error("`{}` contains an invalid module stamp", path.display())]
    InvalidStamp {
        path: PathBuf,
        #[source]
        source: NameError,
    },
}
