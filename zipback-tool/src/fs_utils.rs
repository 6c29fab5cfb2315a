use log::{debug, warn};
use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};
use zipback_lib::BackupError;

/// Lists every regular file reachable from `source`.
///
/// A file source yields itself. Directories are walked recursively and
/// never yielded. Paths are produced by joining onto `source`, so they keep
/// whatever leading components the caller passed in. `exclude` must be a
/// canonical path; a file resolving to it is skipped.
pub fn walk_source(source: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>, BackupError> {
    let meta = match fs::metadata(source) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(BackupError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }
        Err(e) => return Err(BackupError::source_read(source, e)),
    };

    let mut result = Vec::new();
    if meta.is_dir() {
        walk_dir(source, exclude, &mut result)?;
    } else if meta.is_file() {
        if !is_excluded(source, exclude) {
            result.push(source.to_path_buf());
        }
    } else {
        warn!("skipping {source:?}: not a regular file or directory");
    }
    Ok(result)
}

fn walk_dir(dir: &Path, exclude: Option<&Path>, result: &mut Vec<PathBuf>) -> Result<(), BackupError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| BackupError::source_read(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BackupError::source_read(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| BackupError::source_read(&path, e))?;

        if file_type.is_dir() {
            walk_dir(&path, exclude, result)?;
        } else if file_type.is_file() {
            push_file(path, exclude, result);
        } else if file_type.is_symlink() {
            // links to files are archived, links to directories are not followed
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => push_file(path, exclude, result),
                Ok(_) => debug!("not following link {path:?}"),
                Err(e) => warn!("skipping dangling link {path:?}: {e}"),
            }
        } else {
            debug!("skipping special file {path:?}");
        }
    }
    Ok(())
}

fn push_file(path: PathBuf, exclude: Option<&Path>, result: &mut Vec<PathBuf>) {
    if is_excluded(&path, exclude) {
        warn!("skipping {path:?}: it is the archive being written");
        return;
    }
    result.push(path);
}

fn is_excluded(path: &Path, exclude: Option<&Path>) -> bool {
    let Some(exclude) = exclude else {
        return false;
    };
    // cheap name check before touching the filesystem
    if path.file_name() != exclude.file_name() {
        return false;
    }
    fs::canonicalize(path)
        .map(|p| p == exclude)
        .unwrap_or(false)
}

/// Entry name for a walked path: the path as walked, with `/` separators and
/// without root, prefix or `.` components. `..` is kept.
pub fn entry_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_source_yields_itself() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        let files = walk_source(&file, None).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn directory_is_walked_recursively() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("src");
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::create_dir(root.join("empty")).unwrap();
        fs::write(root.join("top.txt"), "1").unwrap();
        fs::write(root.join("nested/mid.txt"), "2").unwrap();
        fs::write(root.join("nested/deeper/low.txt"), "3").unwrap();

        let files = walk_source(&root, None).unwrap();
        assert_eq!(
            files,
            vec![
                root.join("nested/deeper/low.txt"),
                root.join("nested/mid.txt"),
                root.join("top.txt"),
            ]
        );
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        match walk_source(&missing, None) {
            Err(BackupError::SourceNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected SourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn archive_being_written_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "k").unwrap();
        let archive = dir.path().join("backup.zip");
        fs::write(&archive, "").unwrap();
        let exclude = fs::canonicalize(&archive).unwrap();

        let files = walk_source(dir.path(), Some(&exclude)).unwrap();
        assert_eq!(files, vec![dir.path().join("keep.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn links_to_files_are_kept_and_links_to_dirs_are_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("target.txt"), "t").unwrap();

        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        symlink(outside.join("target.txt"), root.join("file_link")).unwrap();
        symlink(&outside, root.join("dir_link")).unwrap();
        symlink(dir.path().join("gone"), root.join("dangling")).unwrap();

        let files = walk_source(&root, None).unwrap();
        assert_eq!(files, vec![root.join("file_link")]);
    }

    #[test]
    fn entry_name_keeps_walked_components() {
        assert_eq!(entry_name(Path::new("subdir/b.txt")), "subdir/b.txt");
        assert_eq!(entry_name(Path::new("./subdir/b.txt")), "subdir/b.txt");
        assert_eq!(entry_name(Path::new("/tmp/x/a.txt")), "tmp/x/a.txt");
        assert_eq!(entry_name(Path::new("../up/c.txt")), "../up/c.txt");
        assert_ne!(
            entry_name(Path::new("../a.txt")),
            entry_name(Path::new("a.txt"))
        );
    }
}
