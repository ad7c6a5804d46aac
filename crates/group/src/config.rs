//! Depth policy for a group.

use serde::{Deserialize, Serialize};

/// Starting depth of an auto-growing group.
pub const DEFAULT_DEPTH: usize = 1;

/// Deepest tree a group will build (2^32 leaves).
pub const MAX_DEPTH: usize = 32;

/// How the tree depth is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthPolicy {
    /// Start at `initial` and grow to fit the members.
    Auto { initial: usize },
    /// Never grow; adds beyond `2^depth` fail.
    Fixed(usize),
}

impl Default for DepthPolicy {
    fn default() -> Self {
        DepthPolicy::Auto {
            initial: DEFAULT_DEPTH,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub depth: DepthPolicy,
    /// Upper bound for auto growth. Clamped to [`MAX_DEPTH`].
    pub max_depth: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            depth: DepthPolicy::default(),
            max_depth: MAX_DEPTH,
        }
    }
}

impl GroupConfig {
    /// Config for a tree pinned at `depth`.
    pub fn fixed(depth: usize) -> Self {
        Self {
            depth: DepthPolicy::Fixed(depth),
            ..Self::default()
        }
    }

    /// Config for an auto-growing tree starting at `initial`.
    pub fn auto(initial: usize) -> Self {
        Self {
            depth: DepthPolicy::Auto { initial },
            ..Self::default()
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.depth, DepthPolicy::Fixed(_))
    }

    pub fn initial_depth(&self) -> usize {
        match self.depth {
            DepthPolicy::Auto { initial } => initial,
            DepthPolicy::Fixed(depth) => depth,
        }
    }

    /// The deepest tree this config allows.
    pub fn depth_limit(&self) -> usize {
        match self.depth {
            DepthPolicy::Auto { .. } => self.max_depth.min(MAX_DEPTH),
            DepthPolicy::Fixed(depth) => depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_auto() {
        let config = GroupConfig::default();
        assert!(!config.is_fixed());
        assert_eq!(config.initial_depth(), DEFAULT_DEPTH);
        assert_eq!(config.depth_limit(), MAX_DEPTH);
    }

    #[test]
    fn test_fixed_limit_is_its_depth() {
        let config = GroupConfig::fixed(10);
        assert!(config.is_fixed());
        assert_eq!(config.initial_depth(), 10);
        assert_eq!(config.depth_limit(), 10);
    }

    #[test]
    fn test_max_depth_is_clamped() {
        let config = GroupConfig {
            max_depth: 64,
            ..GroupConfig::auto(4)
        };
        assert_eq!(config.depth_limit(), MAX_DEPTH);
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: GroupConfig =
            serde_json::from_str(r#"{"depth": {"fixed": 16}}"#).unwrap();
        assert_eq!(config, GroupConfig::fixed(16));

        let config: GroupConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GroupConfig::default());
    }
}
