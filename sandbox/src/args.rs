use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
pub struct ArgsSandbox {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Scene to open on start, the menu is shown otherwise
    #[arg(short, long, value_enum)]
    pub scene: Option<SceneArg>,
    /// Window width, overrides the config file
    #[arg(long)]
    pub width: Option<u32>,
    /// Window height, overrides the config file
    #[arg(long)]
    pub height: Option<u32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneArg {
    ClearColor,
    Texture2d,
    BatchRender,
}

impl SceneArg {
    /// Name the scene is registered under in the menu.
    pub fn scene_name(self) -> &'static str {
        match self {
            SceneArg::ClearColor => crate::scene::clear_color::NAME,
            SceneArg::Texture2d => crate::scene::texture_2d::NAME,
            SceneArg::BatchRender => crate::scene::batch_render::NAME,
        }
    }
}
