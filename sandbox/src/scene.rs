use gl_wrapper::shader::ShaderError;
use gl_wrapper::texture::TextureError;
use gl_wrapper::{Context, Renderer};

use thiserror::Error;

use winit::event::{ModifiersState, VirtualKeyCode};

use crate::config::AssetConfig;

pub mod batch_render;
pub mod clear_color;
pub mod texture_2d;

/// A self-contained demo. Dropping it releases its GPU resources.
pub trait Scene {
    fn on_update(&mut self, _dt: f32) {}
    fn on_render(&mut self, renderer: &Renderer);
    fn on_key(&mut self, _key: VirtualKeyCode, _modifiers: ModifiersState) {}
}

/// What scene factories get to build their resources with.
pub struct SceneEnv {
    pub gl: Context,
    pub assets: AssetConfig,
    pub viewport: (u32, u32),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Texture(#[from] TextureError),
}

type Factory<E> = Box<dyn Fn(&E) -> Result<Box<dyn Scene>, SceneError>>;

/// Named scene factories, opened by index or name.
pub struct SceneMenu<E = SceneEnv> {
    scenes: Vec<(&'static str, Factory<E>)>,
}

impl<E: 'static> SceneMenu<E> {
    pub fn new() -> Self {
        Self { scenes: Vec::new() }
    }

    pub fn register<S, F>(&mut self, name: &'static str, factory: F)
    where
        S: Scene + 'static,
        F: Fn(&E) -> Result<S, SceneError> + 'static,
    {
        log::info!("Register scene: {name}");

        let boxed: Factory<E> =
            Box::new(move |env: &E| Ok(Box::new(factory(env)?) as Box<dyn Scene>));
        self.scenes.push((name, boxed));
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scenes.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.scenes.iter().position(|(n, _)| *n == name)
    }

    /// Builds the scene at `index`, `None` when there is no such entry.
    pub fn open(
        &self,
        index: usize,
        env: &E,
    ) -> Option<Result<(&'static str, Box<dyn Scene>), SceneError>> {
        let (name, factory) = self.scenes.get(index)?;
        Some(factory(env).map(|scene| (*name, scene)))
    }
}

impl<E: 'static> Default for SceneMenu<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Menu entry selected by a number key, `1` being the first entry.
pub fn menu_index(key: VirtualKeyCode) -> Option<usize> {
    let index = match key {
        VirtualKeyCode::Key1 | VirtualKeyCode::Numpad1 => 0,
        VirtualKeyCode::Key2 | VirtualKeyCode::Numpad2 => 1,
        VirtualKeyCode::Key3 | VirtualKeyCode::Numpad3 => 2,
        VirtualKeyCode::Key4 | VirtualKeyCode::Numpad4 => 3,
        VirtualKeyCode::Key5 | VirtualKeyCode::Numpad5 => 4,
        VirtualKeyCode::Key6 | VirtualKeyCode::Numpad6 => 5,
        VirtualKeyCode::Key7 | VirtualKeyCode::Numpad7 => 6,
        VirtualKeyCode::Key8 | VirtualKeyCode::Numpad8 => 7,
        VirtualKeyCode::Key9 | VirtualKeyCode::Numpad9 => 8,
        _ => return None,
    };
    Some(index)
}

/// The sandbox's scene list.
pub fn default_menu() -> SceneMenu {
    let mut menu = SceneMenu::new();
    menu.register(clear_color::NAME, |_| Ok(clear_color::ClearColor::default()));
    menu.register(texture_2d::NAME, texture_2d::Texture2D::new);
    menu.register(batch_render::NAME, batch_render::BatchRender::new);
    menu
}
