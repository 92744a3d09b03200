//! Configuration module for Plume

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stream layout and paging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of layout columns
    #[serde(default = "default_column_count")]
    pub column_count: usize,

    /// Width of the stream in points
    #[serde(default = "default_stream_width")]
    pub stream_width: f32,

    /// Horizontal gap between columns
    #[serde(default = "default_gutter")]
    pub gutter: f32,

    /// Height of one line of text
    #[serde(default = "default_line_height")]
    pub line_height: f32,

    /// Average glyph width, used to turn widths into columns of text
    #[serde(default = "default_glyph_width")]
    pub glyph_width: f32,

    /// Number of posts to fetch per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Number of comments to fetch per page
    #[serde(default = "default_comments_page_size")]
    pub comments_page_size: usize,
}

fn default_column_count() -> usize {
    1
}

fn default_stream_width() -> f32 {
    375.0
}

fn default_gutter() -> f32 {
    10.0
}

fn default_line_height() -> f32 {
    20.0
}

fn default_glyph_width() -> f32 {
    8.0
}

fn default_page_size() -> usize {
    25
}

fn default_comments_page_size() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            column_count: default_column_count(),
            stream_width: default_stream_width(),
            gutter: default_gutter(),
            line_height: default_line_height(),
            glyph_width: default_glyph_width(),
            page_size: default_page_size(),
            comments_page_size: default_comments_page_size(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        crate::paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Width available to one column
    pub fn column_width(&self) -> f32 {
        crate::stream::column_width(self.stream_width, self.gutter, self.column_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            column_count: 2,
            page_size: 50,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "column_count = 3\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.column_count, 3);
        assert_eq!(config.comments_page_size, 10);
    }

    #[test]
    fn test_column_width() {
        let config = Config {
            column_count: 2,
            stream_width: 410.0,
            gutter: 10.0,
            ..Config::default()
        };
        assert!((config.column_width() - 200.0).abs() < f32::EPSILON);
    }
}
