//! Test helpers for writing street map and deliveries fixtures.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub(super) const CORNER_MAP: &str = "\
Weyburn Avenue
1
34.0625 -118.4480 34.0625 -118.4470

Broxton Avenue
1
34.0625 -118.4470 34.0635 -118.4470
";

pub(super) const CORNER_DELIVERIES: &str = "\
34.0625 -118.4480
34.0635 -118.4470:Chicken tenders
";

pub(super) const OFF_MAP_DELIVERIES: &str = "\
34.0625 -118.4480
40.0000 -100.0000:Lost parcel
";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// Temporary directory holding a map and a deliveries file.
#[derive(Debug)]
pub(super) struct PlanFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl PlanFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn with_corner() -> Self {
        let files = Self::new();
        write_utf8(&files.map(), CORNER_MAP.as_bytes());
        write_utf8(&files.deliveries(), CORNER_DELIVERIES.as_bytes());
        files
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn map(&self) -> Utf8PathBuf {
        self.root.join("mapdata.txt")
    }

    pub(super) fn deliveries(&self) -> Utf8PathBuf {
        self.root.join("deliveries.txt")
    }
}
