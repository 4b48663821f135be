use serde::{Deserialize, Serialize};

/// Default bound on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Flags that shape a render call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Rendering before changes are applied: unresolved values are shown as
    /// typed placeholders such as `computed<string>`.
    pub planning: bool,
    /// Suppress unchanged rows.
    pub summary: bool,
    /// Show serialized program code instead of eliding it.
    pub debug: bool,
    /// Deepest nesting the renderer will descend into before giving up.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            planning: false,
            summary: false,
            debug: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    /// Options for a preview run.
    pub fn planning() -> Self {
        Self {
            planning: true,
            ..Default::default()
        }
    }

    /// Options that hide unchanged rows.
    pub fn summary() -> Self {
        Self {
            summary: true,
            ..Default::default()
        }
    }
}
