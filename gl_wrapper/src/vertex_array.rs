use gl::types::GLuint;

use crate::backend::Context;
use crate::buffer::VertexBuffer;
use crate::layout::VertexBufferLayout;

/// Records which buffers feed which vertex attributes.
///
/// The vertex array does not own the buffers added to it. A buffer has to stay
/// alive for as long as draws go through a vertex array that references it.
pub struct VertexArray {
    ctx: Context,
    id: GLuint,
}

impl VertexArray {
    pub fn new(ctx: &Context) -> Self {
        let id = ctx.gen_vertex_array();
        log::debug!("Created vertex array {id}");

        Self {
            ctx: ctx.clone(),
            id,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Binds `buffer` to this vertex array using `layout`.
    ///
    /// Element `i` of the layout becomes attribute `i`, so the layout order has
    /// to match the shader's input declaration order.
    pub fn add_buffer(&self, buffer: &VertexBuffer, layout: &VertexBufferLayout) {
        self.bind();
        buffer.bind();

        let stride = layout.stride() as i32;
        for (index, element, offset) in layout.attributes() {
            self.ctx.vertex_attrib_pointer(
                index,
                element.count as i32,
                element.ty.gl_enum(),
                element.normalized,
                stride,
                offset,
            );
            self.ctx.enable_vertex_attrib_array(index);
        }
    }

    pub fn bind(&self) {
        self.ctx.bind_vertex_array(self.id);
    }

    pub fn unbind(&self) {
        self.ctx.bind_vertex_array(0);
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.ctx.delete_vertex_array(self.id);
    }
}
