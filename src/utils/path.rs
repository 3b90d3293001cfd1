use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// False for anything that is not a directory, including paths that do not exist.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

pub fn path_exists(path: &Path) -> bool {
    // symlink_metadata so a dangling link still counts as occupied
    fs::symlink_metadata(path).is_ok()
}

/// Names of the immediate subdirectories of `dir`, sorted by name.
pub fn list_child_directories(dir: &Path) -> io::Result<Vec<OsString>> {
    list_children(dir, |file_type| file_type.is_dir())
}

/// Names of the immediate non-directory entries of `dir`, sorted by name.
pub fn list_child_files(dir: &Path) -> io::Result<Vec<OsString>> {
    list_children(dir, |file_type| !file_type.is_dir())
}

/// Symbolic links are never followed and never listed.
fn list_children(dir: &Path, keep: impl Fn(&fs::FileType) -> bool) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let kind = err.io_error().map_or(io::ErrorKind::Other, |e| e.kind());
            io::Error::new(
                kind,
                format!("Error reading entry in directory {}: {}", dir.display(), err),
            )
        })?;

        if entry.path_is_symlink() {
            warn!("Skipping symbolic link {}", entry.path().display());
            continue;
        }
        if keep(&entry.file_type()) {
            names.push(entry.file_name().to_os_string());
        }
    }

    Ok(names)
}

/// Creates `path` and any missing parents. Existing directories are left as they are.
pub fn create_directory(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Renames `source` to `destination`, falling back to copy-and-delete when a
/// rename is not possible (e.g. across filesystems). Never checks for an
/// existing destination; callers pick a free one first.
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if !source.is_file() {
                return Err(rename_err);
            }
            debug!(
                "rename {} -> {} failed ({}), copying instead",
                source.display(),
                destination.display(),
                rename_err
            );
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
    }
}

/// Deletes a file if it exists.
pub fn delete_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Deletes a directory tree if it exists.
pub fn remove_directory_recursive(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_children_are_partitioned_and_sorted() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("b_dir")).unwrap();
        fs::create_dir(root.join("a_dir")).unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();
        fs::write(root.join("m.txt"), "m").unwrap();
        fs::write(root.join("a_dir").join("nested.txt"), "n").unwrap();

        assert_eq!(list_child_directories(root).unwrap(), vec!["a_dir", "b_dir"]);
        assert_eq!(list_child_files(root).unwrap(), vec!["m.txt", "z.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_listed() {
        use std::os::unix::fs::symlink;

        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("good.mkv"), "g").unwrap();
        symlink(root.join("nowhere"), root.join("broken")).unwrap();
        symlink(root, root.join("real").join("up")).unwrap();

        assert_eq!(list_child_files(root).unwrap(), vec!["good.mkv"]);
        assert_eq!(list_child_directories(root).unwrap(), vec!["real"]);
        assert!(list_child_directories(&root.join("real")).unwrap().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_names_keep_their_raw_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempdir().unwrap();
        let name = OsStr::from_bytes(b"ep\xff1.mkv");
        fs::write(tmp.path().join(name), "x").unwrap();

        let files = list_child_files(tmp.path()).unwrap();
        assert_eq!(files, vec![name.to_os_string()]);
        assert!(tmp.path().join(&files[0]).is_file());
    }

    #[test]
    fn test_create_directory_is_idempotent() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("one").join("two");
        create_directory(&dir).unwrap();
        fs::write(dir.join("keep.txt"), "keep").unwrap();

        create_directory(&dir).unwrap();

        assert!(is_directory(&dir));
        assert_eq!(fs::read_to_string(dir.join("keep.txt")).unwrap(), "keep");
    }

    #[test]
    fn test_move_file() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        fs::write(&src, "payload").unwrap();

        move_file(&src, &dst).unwrap();

        assert!(!path_exists(&src));
        assert_eq!(fs::read_to_string(&dst).unwrap(), "payload");
    }

    #[test]
    fn test_delete_helpers_tolerate_missing_paths() {
        let tmp = tempdir().unwrap();
        delete_file(&tmp.path().join("missing.txt")).unwrap();
        remove_directory_recursive(&tmp.path().join("missing")).unwrap();

        let dir = tmp.path().join("tree");
        create_directory(&dir.join("inner")).unwrap();
        fs::write(dir.join("inner").join("f"), "x").unwrap();
        remove_directory_recursive(&dir).unwrap();
        assert!(!path_exists(&dir));
    }

    #[test]
    fn test_is_directory_on_file() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        assert!(!is_directory(&file));
        assert!(is_directory(tmp.path()));
        assert!(!is_directory(&tmp.path().join("missing")));
    }
}
