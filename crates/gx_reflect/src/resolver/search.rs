use alloc::collections::VecDeque;
use alloc::vec::Vec;
use std::fs;
use std::path::{Path, PathBuf};

/// Finds `file_name` under `roots`.
///
/// For each root: the root itself, then its subdirectories breadth-first in
/// name order, then each ancestor directory (not recursive). Symlinked
/// directories are not followed.
pub(super) fn find_module_file(roots: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    roots.iter().find_map(|root| {
        find_below(root, file_name).or_else(|| find_above(root, file_name))
    })
}

fn find_below(root: &Path, file_name: &str) -> Option<PathBuf> {
    let mut queue = VecDeque::from([root.to_path_buf()]);
    while let Some(dir) = queue.pop_front() {
        let candidate = dir.join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        queue.extend(subdirectories(&dir));
    }
    None
}

fn find_above(root: &Path, file_name: &str) -> Option<PathBuf> {
    root.ancestors()
        .skip(1)
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::trace!("skipping `{}`: {e}", dir.display());
            return Vec::new();
        }
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|ty| ty.is_dir()))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn search_order() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("app");
        fs::create_dir_all(root.join("b/deep")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();

        fs::write(root.join("b/deep/m.dll"), "deep").unwrap();
        fs::write(root.join("a/m.dll"), "a").unwrap();
        fs::write(temp.path().join("m.dll"), "parent").unwrap();
        let roots = [root.clone()];

        // Shallowest subdirectory wins over the parent.
        assert_eq!(find_module_file(&roots, "m.dll"), Some(root.join("a/m.dll")));

        fs::write(root.join("m.dll"), "root").unwrap();
        assert_eq!(find_module_file(&roots, "m.dll"), Some(root.join("m.dll")));

        assert_eq!(
            find_module_file(&roots, "other.dll"),
            None
        );
        fs::remove_file(root.join("m.dll")).unwrap();
        fs::remove_file(root.join("a/m.dll")).unwrap();
        fs::remove_file(root.join("b/deep/m.dll")).unwrap();
        assert_eq!(find_module_file(&roots, "m.dll"), Some(temp.path().join("m.dll")));
    }
}
