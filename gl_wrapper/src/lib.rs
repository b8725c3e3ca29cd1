pub mod backend;
pub mod buffer;
pub mod check;
pub mod image;
pub mod layout;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod vertex_array;

#[cfg(test)]
mod mock;

pub use backend::{Context, GlApi, NativeGl};
pub use buffer::{IndexBuffer, VertexBuffer};
pub use layout::VertexBufferLayout;
pub use renderer::Renderer;
pub use shader::{Shader, ShaderSource};
pub use texture::Texture;
pub use vertex_array::VertexArray;
