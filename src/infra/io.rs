use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Read a source file as UTF-8
pub fn read_source(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Replace `path` with `data` without ever leaving a partial file behind.
/// Temp file lives in the same directory so `persist` is a rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Keep the original mode bits
    let perms = fs::metadata(path).map(|m| m.permissions()).ok();

    let tmp = tempfile::NamedTempFile::new_in(dir)?;

    let mut file = tmp.as_file();
    file.write_all(data)?;
    file.sync_all()?;

    if let Some(perms) = perms {
        fs::set_permissions(tmp.path(), perms)?;
    }

    tmp.persist(path).map_err(|e| e.error)?;

    // fsync parent dir for rename durability
    #[cfg(unix)]
    {
        if let Ok(parent) = fs::File::open(dir) {
            let _ = parent.sync_all();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_replaces_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.js");
        fs::write(&path, "import a from './a'\n").unwrap();

        write_atomic(&path, b"import a from './a.js'\n").unwrap();

        assert_eq!(read_source(&path).unwrap(), "import a from './a.js'\n");

        // No stray temp files left next to the target
        let entries = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cli.js");
        fs::write(&path, "x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        write_atomic(&path, b"y").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn read_source_reports_missing_files() {
        let err = read_source(Path::new("/definitely/not/here.js")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
