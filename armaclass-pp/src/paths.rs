//! Include-path resolution.
//!
//! Arma config includes are written with backslash-separated Windows-style
//! paths (`\z\ace\addons\main\script_mod.hpp`) regardless of the host
//! platform the parser runs on, so this module does its own splitting
//! instead of deferring to `std::path`'s platform-specific separator
//! handling.

use std::path::{Path, PathBuf};

/// Splits a leading `X:` drive letter off a path string, the way
/// `os.path.splitdrive` does on Windows. Returns `("", whole_path)` when
/// there is no drive letter, matching that function's POSIX behavior.
fn split_drive(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        path.split_at(2)
    } else {
        ("", path)
    }
}

fn components(spec: &str) -> Vec<&str> {
    spec.split(['\\', '/']).filter(|c| !c.is_empty()).collect()
}

fn join_drive_and_components(drive: &str, spec: &str) -> PathBuf {
    let mut path = PathBuf::from(drive);
    for component in components(spec) {
        path.push(component);
    }
    path
}

/// One or more candidate filesystem paths to try for an `#include` spec,
/// in resolution order. Absolute specs (leading `\`) yield two candidates:
/// the current file's own drive, then the conventional `P:` project root.
/// Relative specs yield exactly one candidate, resolved against the
/// including file's directory.
pub fn candidates(current_file: &Path, spec: &str) -> Vec<PathBuf> {
    if spec.starts_with('\\') {
        let current_str = current_file.to_string_lossy();
        let (drive, _) = split_drive(&current_str);
        let on_current_drive = join_drive_and_components(drive, spec);
        let on_p_drive = join_drive_and_components("P:", spec);
        vec![on_current_drive, on_p_drive]
    } else {
        let dir = current_file.parent().unwrap_or_else(|| Path::new("."));
        let mut resolved = dir.to_path_buf();
        for component in components(spec) {
            resolved.push(component);
        }
        vec![resolved]
    }
}
