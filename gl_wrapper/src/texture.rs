use std::path::{Path, PathBuf};

use gl::types::GLuint;
use thiserror::Error;

use crate::backend::Context;
use crate::check::{check_call, clear_errors};
use crate::image::{self, ImageError};

/// An RGBA8 2D texture with linear filtering and clamp-to-edge wrapping.
///
/// Only the handle and dimensions are kept, pixel data is released as soon as
/// it has been uploaded.
pub struct Texture {
    ctx: Context,
    id: GLuint,
    width: u32,
    height: u32,
    path: Option<PathBuf>,
}

impl Texture {
    /// Decodes an image file (flipped to GL row order) and uploads it.
    pub fn from_file(ctx: &Context, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::decode_file(path, true).map_err(|source| TextureError::Image {
            path: path.to_owned(),
            source,
        })?;

        let mut texture = Self::from_rgba(ctx, image.width, image.height, &image.pixels)?;
        texture.path = Some(path.to_owned());

        log::debug!(
            "Loaded texture {:?} ({}x{}, {} channels)",
            path,
            image.width,
            image.height,
            image.channels
        );
        Ok(texture)
    }

    /// Uploads tightly packed RGBA8 pixels, first row at the bottom.
    pub fn from_rgba(
        ctx: &Context,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, TextureError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(pixels.len()) {
            return Err(TextureError::InvalidSrcLength);
        }
        let (w, h) = match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(TextureError::TooLarge(width, height)),
        };

        clear_errors(ctx.as_ref());

        let id = ctx.gen_texture();
        ctx.bind_texture(id);

        ctx.tex_parameter(gl::TEXTURE_MIN_FILTER, gl::LINEAR as i32);
        ctx.tex_parameter(gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);
        ctx.tex_parameter(gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
        ctx.tex_parameter(gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);

        ctx.tex_image_rgba8(w, h, pixels);
        ctx.bind_texture(0);

        if !check_call(ctx.as_ref(), "texture upload") {
            ctx.delete_texture(id);
            return Err(TextureError::Upload);
        }

        Ok(Self {
            ctx: ctx.clone(),
            id,
            width,
            height,
            path: None,
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// File the texture was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn bind(&self, slot: u32) {
        self.ctx.active_texture(slot);
        self.ctx.bind_texture(self.id);
    }

    pub fn unbind(&self, slot: u32) {
        self.ctx.active_texture(slot);
        self.ctx.bind_texture(0);
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.ctx.delete_texture(self.id);
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error("Texture size {0}x{1} is too large")]
    TooLarge(u32, u32),
    #[error("Could not load {path:?}: {source}")]
    Image { path: PathBuf, source: ImageError },
    #[error("Driver rejected the texture upload")]
    Upload,
}
