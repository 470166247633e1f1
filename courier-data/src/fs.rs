//! Capability-based file helpers built on `cap-std` and `camino`.

use std::io::{self, BufReader};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path for buffered reading using ambient authority.
pub fn open_utf8_reader(path: &Utf8Path) -> io::Result<BufReader<fs_utf8::File>> {
    fs_utf8::File::open_ambient(path, ambient_authority()).map(BufReader::new)
}

/// Return whether `path` is a regular file using capability-based IO.
///
/// `Ok(false)` means the path exists but is something else, such as a
/// directory. A missing path or parent directory is reported as an
/// [`io::ErrorKind::NotFound`] error.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let Some(name) = path.file_name() else {
        // `/`, `..` and similar name a directory if they resolve at all.
        return fs_utf8::Dir::open_ambient_dir(path, ambient_authority()).map(|_| false);
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}
