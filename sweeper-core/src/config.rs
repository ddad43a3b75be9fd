//! Game configuration: board dimensions, mine count, presets

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweeperError};

/// Board dimensions and mine count
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub mines: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

impl GameConfig {
    pub const fn new(width: i32, height: i32, mines: i32) -> Self {
        Self { width, height, mines }
    }

    /// 8x8 with 10 mines
    pub const fn beginner() -> Self {
        Self::new(8, 8, 10)
    }

    /// 16x16 with 40 mines
    pub const fn intermediate() -> Self {
        Self::new(16, 16, 40)
    }

    /// 30x16 with 99 mines
    pub const fn expert() -> Self {
        Self::new(30, 16, 99)
    }

    /// Check dimensions >= 1 and 0 <= mines <= width*height
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(SweeperError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.mines < 0 || self.mines > self.width * self.height {
            return Err(SweeperError::InvalidConfig(format!(
                "mine count {} not in [0, {}]",
                self.mines,
                self.width * self.height
            )));
        }
        Ok(())
    }

    /// Load from a JSON file and validate
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SweeperError::InvalidConfig(format!("read {}: {}", path.display(), e)))?;
        let config: GameConfig = serde_json::from_str(&content)
            .map_err(|e| SweeperError::InvalidConfig(format!("parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SweeperError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| SweeperError::InvalidConfig(format!("write {}: {}", path.display(), e)))?;
        Ok(())
    }
}
