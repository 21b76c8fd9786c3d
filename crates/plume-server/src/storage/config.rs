use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for captured frames. Created on startup if missing.
    pub media_root: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./media")),
        })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: root.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root() {
        let config = StorageConfig::with_root("/var/lib/plume/media");
        assert_eq!(config.media_root, PathBuf::from("/var/lib/plume/media"));
    }
}
