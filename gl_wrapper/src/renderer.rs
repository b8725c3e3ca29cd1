use gl::types::GLsizei;

use crate::backend::Context;
use crate::buffer::IndexBuffer;
use crate::shader::Shader;
use crate::vertex_array::VertexArray;

pub struct Renderer {
    ctx: Context,
}

impl Renderer {
    pub fn new(ctx: &Context) -> Self {
        Self { ctx: ctx.clone() }
    }

    pub fn clear(&self) {
        self.ctx.clear(gl::COLOR_BUFFER_BIT);
    }

    pub fn set_clear_color(&self, color: [f32; 4]) {
        self.ctx.clear_color(color);
    }

    pub fn draw(&self, vertex_array: &VertexArray, index_buffer: &IndexBuffer, shader: &Shader) {
        shader.bind();
        vertex_array.bind();
        index_buffer.bind();

        match GLsizei::try_from(index_buffer.count()) {
            Ok(count) => self.ctx.draw_elements(count),
            Err(_) => log::error!("Index count {} exceeds GLsizei", index_buffer.count()),
        }
    }

    /// Sizes past `GLsizei::MAX` leave the viewport unchanged.
    pub fn resize(&self, width: u32, height: u32) {
        match (GLsizei::try_from(width), GLsizei::try_from(height)) {
            (Ok(w), Ok(h)) => self.ctx.viewport(w, h),
            _ => log::error!("Viewport {width}x{height} exceeds GLsizei"),
        }
    }

    /// Standard alpha blending, `src * a + dst * (1 - a)`.
    pub fn enable_blending(&self) {
        self.ctx.enable_blending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BufferTarget;
    use crate::buffer::VertexBuffer;
    use crate::layout::VertexBufferLayout;
    use crate::mock::{Call, MockGl};
    use crate::shader::ShaderSource;

    #[test]
    fn draw_binds_then_draws_all_indices() {
        let mock = MockGl::new();
        let ctx = MockGl::context(&mock);

        let vb = VertexBuffer::new(&ctx, &[0.0_f32; 8]);
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2);
        let va = VertexArray::new(&ctx);
        va.add_buffer(&vb, &layout);
        let ib = IndexBuffer::new(&ctx, &[0, 1, 2, 2, 3, 0]);
        let shader = Shader::from_source(
            &ctx,
            &ShaderSource::parse("#shader vertex\nv\n#shader fragment\nf\n"),
        );
        let renderer = Renderer::new(&ctx);
        mock.reset_calls();

        renderer.draw(&va, &ib, &shader);

        assert_eq!(
            mock.calls(),
            vec![
                Call::UseProgram(shader.id()),
                Call::BindVertexArray(va.id()),
                Call::BindBuffer(BufferTarget::ElementArray, ib.id()),
                Call::DrawElements(6),
            ]
        );
    }

    #[test]
    fn clear_and_state() {
        let mock = MockGl::new();
        let ctx = MockGl::context(&mock);
        let renderer = Renderer::new(&ctx);

        renderer.set_clear_color([0.2, 0.3, 0.3, 1.0]);
        renderer.clear();
        renderer.resize(800, 600);
        renderer.enable_blending();

        assert_eq!(
            mock.calls(),
            vec![
                Call::ClearColor([0.2, 0.3, 0.3, 1.0]),
                Call::Clear(gl::COLOR_BUFFER_BIT),
                Call::Viewport(800, 600),
                Call::EnableBlending,
            ]
        );
    }

    #[test]
    fn oversized_viewport_is_skipped() {
        let mock = MockGl::new();
        let ctx = MockGl::context(&mock);
        let renderer = Renderer::new(&ctx);

        renderer.resize(u32::MAX, 600);
        renderer.resize(800, 1 << 31);
        assert!(mock.calls().is_empty());

        renderer.resize(i32::MAX as u32, 1);
        assert_eq!(mock.calls(), vec![Call::Viewport(i32::MAX, 1)]);
    }
}
