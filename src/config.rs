use crate::store::StoreFormat;
use crate::tier::TierPolicy;
use std::path::PathBuf;

/// Runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `<user>_pokedex.*` files and the `photos/` folder.
    pub data_dir: PathBuf,
    pub format: StoreFormat,
    pub tier_policy: TierPolicy,
    /// Inclusive upper bound for submitted scores.
    pub max_score: u32,
    pub require_photo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("snap_data"),
            format: StoreFormat::Json,
            tier_policy: TierPolicy::Derived,
            max_score: 5000,
            require_photo: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_tier_policy(mut self, policy: TierPolicy) -> Self {
        self.tier_policy = policy;
        self
    }

    pub fn with_max_score(mut self, max_score: u32) -> Self {
        self.max_score = max_score;
        self
    }

    pub fn with_require_photo(mut self, require: bool) -> Self {
        self.require_photo = require;
        self
    }

    pub fn photo_dir(&self) -> PathBuf {
        self.data_dir.join("photos")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.data_dir, PathBuf::from("snap_data"));
        assert_eq!(config.format, StoreFormat::Json);
        assert_eq!(config.tier_policy, TierPolicy::Derived);
        assert_eq!(config.max_score, 5000);
        assert!(config.require_photo);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_data_dir("/tmp/dex")
            .with_format(StoreFormat::Csv)
            .with_tier_policy(TierPolicy::Chosen)
            .with_max_score(6000)
            .with_require_photo(false);

        assert_eq!(config.photo_dir(), PathBuf::from("/tmp/dex/photos"));
        assert_eq!(config.format, StoreFormat::Csv);
        assert_eq!(config.tier_policy, TierPolicy::Chosen);
        assert_eq!(config.max_score, 6000);
        assert!(!config.require_photo);
    }
}
