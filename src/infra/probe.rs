use std::fs;
use std::path::Path;

use crate::core::rewrite::FsProbe;

/// `FsProbe` backed by the real filesystem. Metadata errors (permissions,
/// broken links) count as "not there".
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskProbe;

impl FsProbe for DiskProbe {
    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }
}
