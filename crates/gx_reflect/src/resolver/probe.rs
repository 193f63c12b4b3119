use std::fs;
use std::path::Path;

use super::ProbeError;
use crate::name::ModuleIdentity;

/// Reads the identity of a module file.
pub trait ModuleProbe: Send + Sync {
    fn probe(&self, path: &Path) -> Result<ModuleIdentity, ProbeError>;
}

/// Reads the first non-empty line of a module file as its display name,
/// e.g. `shapes, Version=2.1.0.0, Culture=neutral, PublicKeyToken=null`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StampProbe;

impl ModuleProbe for StampProbe {
    fn probe(&self, path: &Path) -> Result<ModuleIdentity, ProbeError> {
        let text = fs::read_to_string(path).map_err(|source| ProbeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| ProbeError::MissingStamp {
                path: path.to_path_buf(),
            })?;
        line.parse().map_err(|source| ProbeError::InvalidStamp {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<F> ModuleProbe for F
where
    F: Fn(&Path) -> Result<ModuleIdentity, ProbeError> + Send + Sync,
{
    #[inline]
    fn probe(&self, path: &Path) -> Result<ModuleIdentity, ProbeError> {
        self(path)
    }
}
