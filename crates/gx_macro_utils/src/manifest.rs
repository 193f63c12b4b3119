use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how a `gx` crate is reachable
/// from generated code.
///
/// # Resolution rules
///
/// For a requested crate such as `gx_reflect`:
///
/// 1. listed directly in `dependencies`: `::gx_reflect`;
/// 2. the umbrella crate `gx_core` is listed: `::gx_core::reflect`;
/// 3. steps 1-2 again for `dev-dependencies`;
/// 4. otherwise `::gx_reflect`.
///
/// Crates that refer to themselves should add `extern crate self as <name>;`
/// at their root so the absolute path also works inside the crate.
///
/// # Example
///
/// ```rust
/// # use gx_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.crate_path("gx_reflect"));
/// ```
#[derive(Debug)]
pub struct Manifest {
    document: Document<Box<str>>,
    modified: SystemTime,
}

const UMBRELLA_CRATE: &str = "gx_core";
const MEMBER_PREFIX: &str = "gx_";

impl Manifest {
    fn manifest_path() -> PathBuf {
        let Some(dir) = env::var_os("CARGO_MANIFEST_DIR") else {
            panic!("CARGO_MANIFEST_DIR should be defined by cargo");
        };
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display()
        );
        path
    }

    fn modified_time(path: &Path) -> SystemTime {
        std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH)
    }

    fn load(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn path_of(text: &str) -> syn::Path {
        syn::parse_str(text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&format!("::{name}")));
        }
        let module = name.strip_prefix(MEMBER_PREFIX)?;
        deps.contains_key(UMBRELLA_CRATE)
            .then(|| Self::path_of(&format!("::{UMBRELLA_CRATE}::{module}")))
    }

    /// Returns the path generated code should use to reach crate `name`.
    pub fn crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|section| match self.document.get(section) {
                Some(Item::Table(deps)) => Self::lookup(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::path_of(&format!("::{name}")))
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Parsed manifests are cached per path and re-read when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified = Self::modified_time(&path);

        {
            let cache = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified == modified
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            document: Self::load(&path),
            modified,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}
