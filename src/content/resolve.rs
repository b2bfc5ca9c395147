//! Candidate file path computation.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// File served for a path ending in `/`.
pub const INDEX_FILE: &str = "index.html";

/// Map a request pathname onto a file under `root`.
///
/// The pathname is percent-decoded once; `.` segments are dropped and `..`
/// segments never climb above `root`. A trailing `/` selects `index.html`.
pub fn candidate_path(root: &Path, pathname: &str) -> PathBuf {
    let decoded = percent_decode_str(pathname).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for part in decoded.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    if pathname.ends_with('/') {
        path.push(INDEX_FILE);
    }
    path
}

/// `path` with a trailing `.html` removed from its file name.
pub fn strip_html_extension(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".html")?;
    Some(path.with_file_name(stem))
}
