//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_mash::{DEFAULT_LETTERS, GameSetup, SetupAction, default_categories};
use tracing::{debug, info, instrument};

/// A category as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Stable key.
    key: String,

    /// Label shown to the player.
    display_name: String,

    /// Options entered ahead of time.
    #[serde(default)]
    options: Vec<String>,

    /// Lock the options as soon as the game loads.
    #[serde(default)]
    finished: bool,
}

impl CategoryConfig {
    /// Creates a category entry.
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            options,
            finished: false,
        }
    }
}

/// Configuration for a play-through.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Title word whose letters join the elimination.
    #[serde(default = "default_letters")]
    letters: String,

    /// Fixed magic number; drawn at random when absent.
    #[serde(default)]
    magic_number: Option<u32>,

    /// Smallest magic number drawn at random.
    #[serde(default = "default_magic_min")]
    magic_min: u32,

    /// Largest magic number drawn at random.
    #[serde(default = "default_magic_max")]
    magic_max: u32,

    /// Milliseconds between animation steps.
    #[serde(default = "default_tick_millis")]
    tick_millis: u64,

    /// Categories in display order.
    #[serde(default = "default_category_configs")]
    categories: Vec<CategoryConfig>,
}

fn default_letters() -> String {
    DEFAULT_LETTERS.to_string()
}

fn default_magic_min() -> u32 {
    3
}

fn default_magic_max() -> u32 {
    9
}

fn default_tick_millis() -> u64 {
    150
}

fn default_category_configs() -> Vec<CategoryConfig> {
    default_categories()
        .into_iter()
        .map(|c| CategoryConfig::new(c.name(), c.display_name(), Vec::new()))
        .collect()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            letters: default_letters(),
            magic_number: None,
            magic_min: default_magic_min(),
            magic_max: default_magic_max(),
            tick_millis: default_tick_millis(),
            categories: default_category_configs(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            categories = config.categories.len(),
            letters = %config.letters,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads the file if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the magic number (a command-line flag wins over the file).
    pub fn with_magic_number(mut self, magic_number: Option<u32>) -> Self {
        if magic_number.is_some() {
            self.magic_number = magic_number;
        }
        self
    }

    /// Checks ranges and keys.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.letters.trim().is_empty() {
            return Err(ConfigError::new("letters must not be empty".to_string()));
        }
        if self.magic_number == Some(0) {
            return Err(ConfigError::new("magic_number must be at least 1".to_string()));
        }
        if self.magic_min == 0 || self.magic_min > self.magic_max {
            return Err(ConfigError::new(format!(
                "magic range {}..={} is invalid",
                self.magic_min, self.magic_max
            )));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::new("tick_millis must be at least 1".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.key.as_str()) {
                return Err(ConfigError::new(format!(
                    "duplicate category key {:?}",
                    category.key
                )));
            }
        }
        Ok(())
    }

    /// The configured magic number, or one drawn from the configured range.
    #[instrument(skip(self))]
    pub fn resolve_magic_number(&self) -> u32 {
        match self.magic_number {
            Some(n) => n,
            None => {
                let n = rand::thread_rng().gen_range(self.magic_min..=self.magic_max);
                debug!(magic_number = n, "Drew magic number");
                n
            }
        }
    }

    /// Builds a setup from this config.
    ///
    /// With `finish_all`, every category is locked regardless of its
    /// `finished` flag, as a headless run needs.
    #[instrument(skip(self))]
    pub fn to_setup(&self, finish_all: bool) -> Result<GameSetup, ConfigError> {
        let mut setup = GameSetup::new(&self.letters);
        let mut apply = |action: SetupAction| {
            let described = action.to_string();
            setup
                .apply(action)
                .map_err(|e| ConfigError::new(format!("{} failed: {}", described, e)))
        };

        for category in &self.categories {
            apply(SetupAction::AddCategory {
                key: category.key.clone(),
                display_name: category.display_name.clone(),
            })?;
            for text in &category.options {
                apply(SetupAction::AddOption {
                    key: category.key.clone(),
                    text: text.clone(),
                })?;
            }
            if finish_all || category.finished {
                apply(SetupAction::FinishCategory(category.key.clone()))?;
            }
        }
        apply(SetupAction::SetMagicNumber(self.resolve_magic_number()))?;

        Ok(setup)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GameConfig::from_toml("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.categories().len(), 5);
    }

    #[test]
    fn test_random_magic_number_in_range() {
        let config = GameConfig::from_toml("magic_min = 4\nmagic_max = 6").unwrap();
        for _ in 0..20 {
            let n = config.resolve_magic_number();
            assert!((4..=6).contains(&n));
        }
    }

    #[test]
    fn test_flag_overrides_file() {
        let config = GameConfig::from_toml("magic_number = 3")
            .unwrap()
            .with_magic_number(Some(7));
        assert_eq!(config.resolve_magic_number(), 7);
        let config = config.with_magic_number(None);
        assert_eq!(config.resolve_magic_number(), 7);
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        assert!(GameConfig::from_toml("magic_number = 0").is_err());
        assert!(GameConfig::from_toml("magic_min = 8\nmagic_max = 2").is_err());
        assert!(GameConfig::from_toml("letters = \"  \"").is_err());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let toml = r#"
            [[categories]]
            key = "car"
            display_name = "Car"

            [[categories]]
            key = "car"
            display_name = "Other car"
        "#;
        let err = GameConfig::from_toml(toml).unwrap_err();
        assert!(err.message.contains("duplicate"));
    }

    #[test]
    fn test_to_setup_reports_failing_action() {
        let toml = r#"
            [[categories]]
            key = "car"
            display_name = "Car"
            finished = true
        "#;
        let err = GameConfig::from_toml(toml).unwrap().to_setup(false).unwrap_err();
        assert!(err.message.contains("finish car"));
    }
}
