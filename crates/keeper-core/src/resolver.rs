//! Resolution of command path arguments against the session cwd.

use crate::error::Result;
use crate::path::{NodePath, SEPARATOR};

/// Resolves `input` relative to `cwd`.
///
/// Absolute inputs ignore `cwd`. `.` is dropped, `..` pops one segment and
/// is a no-op at the root. An empty input resolves to `cwd` itself.
pub fn resolve(cwd: &NodePath, input: &str) -> Result<NodePath> {
    let mut resolved = if input.starts_with(SEPARATOR) {
        NodePath::root()
    } else {
        cwd.clone()
    };

    for segment in input.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => resolved.pop_segment(),
            name => resolved.push_segment(name)?,
        }
    }

    Ok(resolved)
}

/// Resolves an optional argument, defaulting to `cwd`.
pub fn resolve_or_cwd(cwd: &NodePath, input: Option<&str>) -> Result<NodePath> {
    match input {
        Some(raw) => resolve(cwd, raw),
        None => Ok(cwd.clone()),
    }
}
