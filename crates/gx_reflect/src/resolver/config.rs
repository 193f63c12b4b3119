use alloc::string::String;
use alloc::vec::Vec;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the [`TypeNameResolver`](super::TypeNameResolver) looks for modules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Directories to search. Empty means the working directory and the
    /// directory of the running executable.
    pub search_roots: Vec<PathBuf>,
    /// File extension of module files, without the dot.
    pub extension: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_roots: Vec::new(),
            extension: String::from("dll"),
        }
    }
}
