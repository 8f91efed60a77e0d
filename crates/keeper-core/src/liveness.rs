//! Liveness rules for backup records.

use crate::path::NodePath;

/// Decides whether a backup is still being worked on, given the marker
/// names found under its `stage` node.
pub trait LivenessPolicy: Send + Sync {
    fn is_active(&self, backup: &NodePath, stage_markers: &[String]) -> bool;
}

/// A backup is active while any stage marker starts with `prefix`.
///
/// Writers create an `alive...` marker tied to their session; once the
/// writer's session ends the marker disappears.
#[derive(Debug, Clone)]
pub struct MarkerPrefixPolicy {
    prefix: String,
}

impl MarkerPrefixPolicy {
    pub const DEFAULT_PREFIX: &'static str = "alive";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for MarkerPrefixPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

impl LivenessPolicy for MarkerPrefixPolicy {
    fn is_active(&self, _backup: &NodePath, stage_markers: &[String]) -> bool {
        stage_markers
            .iter()
            .any(|marker| marker.starts_with(&self.prefix))
    }
}
