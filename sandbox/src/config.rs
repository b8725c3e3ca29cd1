use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub assets: AssetConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
            title: "gl sandbox".to_string(),
            vsync: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    pub basic_shader: PathBuf,
    pub batch_shader: PathBuf,
    pub texture: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");

        Self {
            basic_shader: root.join("shaders/basic.shader"),
            batch_shader: root.join("shaders/batch.shader"),
            texture: root.join("textures/checker.png"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Invalid config structure: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_owned(), e))?;

        let mut config: Config = toml::from_str(&text)?;
        config.assets.resolve_relative_to(path.parent().unwrap_or(Path::new(".")));
        Ok(config)
    }
}

impl AssetConfig {
    /// Makes relative asset paths relative to the config file instead of the
    /// working directory.
    fn resolve_relative_to(&mut self, dir: &Path) {
        for path in [
            &mut self.basic_shader,
            &mut self.batch_shader,
            &mut self.texture,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}
