use gl::types::GLuint;

use crate::backend::{BufferTarget, Context};

/// Write-once vertex data living in GPU memory.
pub struct VertexBuffer {
    ctx: Context,
    id: GLuint,
    size: usize,
}

impl VertexBuffer {
    pub fn new<T: bytemuck::Pod>(ctx: &Context, data: &[T]) -> Self {
        Self::from_bytes(ctx, bytemuck::cast_slice(data))
    }

    pub fn from_bytes(ctx: &Context, data: &[u8]) -> Self {
        let id = upload(ctx, BufferTarget::Array, data);
        log::debug!("Created vertex buffer {id} ({} bytes)", data.len());

        Self {
            ctx: ctx.clone(),
            id,
            size: data.len(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Size of the uploaded data in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bind(&self) {
        self.ctx.bind_buffer(BufferTarget::Array, self.id);
    }

    pub fn unbind(&self) {
        self.ctx.bind_buffer(BufferTarget::Array, 0);
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.ctx.delete_buffer(self.id);
    }
}

/// Write-once `u32` indices living in GPU memory.
pub struct IndexBuffer {
    ctx: Context,
    id: GLuint,
    count: usize,
}

impl IndexBuffer {
    pub fn new(ctx: &Context, indices: &[u32]) -> Self {
        let id = upload(ctx, BufferTarget::ElementArray, bytemuck::cast_slice(indices));
        log::debug!("Created index buffer {id} ({} indices)", indices.len());

        Self {
            ctx: ctx.clone(),
            id,
            count: indices.len(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Number of indices, not bytes.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bind(&self) {
        self.ctx.bind_buffer(BufferTarget::ElementArray, self.id);
    }

    pub fn unbind(&self) {
        self.ctx.bind_buffer(BufferTarget::ElementArray, 0);
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        self.ctx.delete_buffer(self.id);
    }
}

fn upload(ctx: &Context, target: BufferTarget, data: &[u8]) -> GLuint {
    let id = ctx.gen_buffer();
    ctx.bind_buffer(target, id);
    ctx.buffer_data(target, data);
    id
}
