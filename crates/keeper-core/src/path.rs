//! Absolute node paths in the coordination namespace.

use std::fmt;

use crate::error::{KeeperError, Result};

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// An absolute, normalized path into the namespace.
///
/// The root has zero segments. No segment is empty or contains [`SEPARATOR`].
/// Ordering compares segment by segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// The namespace root, `/`.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from already-split segments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` when a segment is empty or contains the separator.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Parses an absolute path such as `/a/b`. Repeated and trailing
    /// separators are ignored; `.` and `..` are not interpreted here.
    pub fn parse_absolute(raw: &str) -> Result<Self> {
        if !raw.starts_with(SEPARATOR) {
            return Err(KeeperError::InvalidPath(format!(
                "'{raw}' is not an absolute path"
            )));
        }
        Self::from_segments(raw.split(SEPARATOR).filter(|s| !s.is_empty()))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Parent path; the root is its own parent.
    pub fn parent(&self) -> Self {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    /// Appends one child segment.
    pub fn child(&self, name: &str) -> Result<Self> {
        validate_segment(name)?;
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Ok(Self(segments))
    }

    pub(crate) fn push_segment(&mut self, segment: &str) -> Result<()> {
        validate_segment(segment)?;
        self.0.push(segment.to_string());
        Ok(())
    }

    pub(crate) fn pop_segment(&mut self) {
        self.0.pop();
    }

    /// True when `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(KeeperError::InvalidPath("empty path segment".to_string()));
    }
    if segment.contains(SEPARATOR) {
        return Err(KeeperError::InvalidPath(format!(
            "segment '{segment}' contains '{SEPARATOR}'"
        )));
    }
    Ok(())
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_displays_as_separator() {
        assert_eq!(NodePath::root().to_string(), "/");
        assert!(NodePath::root().is_root());
    }

    #[test]
    fn test_parse_absolute_ignores_redundant_separators() {
        let path = NodePath::parse_absolute("//clickhouse///backups/").unwrap();
        assert_eq!(path.segments(), ["clickhouse", "backups"]);
        assert_eq!(path.to_string(), "/clickhouse/backups");
    }

    #[test]
    fn test_parse_absolute_rejects_relative() {
        assert!(matches!(
            NodePath::parse_absolute("a/b"),
            Err(KeeperError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_from_segments_rejects_embedded_separator() {
        assert!(NodePath::from_segments(["a", "b/c"]).is_err());
        assert!(NodePath::from_segments(["a", ""]).is_err());
    }

    #[test]
    fn test_ordering_is_segment_wise() {
        let short = NodePath::parse_absolute("/a/b").unwrap();
        let longer = NodePath::parse_absolute("/a/b/c").unwrap();
        let dash = NodePath::parse_absolute("/a-b").unwrap();
        assert!(short < longer);
        // Byte-wise on the joined string '-' sorts before '/', segment-wise it does not.
        assert!(NodePath::parse_absolute("/a").unwrap() < dash);
        assert!(short < dash);
    }

    #[test]
    fn test_parent_of_root_is_root() {
        assert_eq!(NodePath::root().parent(), NodePath::root());
        let path = NodePath::parse_absolute("/x/y").unwrap();
        assert_eq!(path.parent().to_string(), "/x");
        assert_eq!(path.name(), Some("y"));
    }
}
