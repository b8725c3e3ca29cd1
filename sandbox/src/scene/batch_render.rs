use cgmath::{Matrix4, Vector3};

use gl_wrapper::{IndexBuffer, Renderer, Shader, VertexArray, VertexBuffer, VertexBufferLayout};

use super::{Scene, SceneEnv, SceneError};

pub const NAME: &str = "Batch render";

#[rustfmt::skip]
const POSITIONS: [f32; 16] = [
    100.0, 100.0,   200.0, 100.0,   200.0, 200.0,   100.0, 200.0,
    300.0, 100.0,   400.0, 100.0,   400.0, 200.0,   300.0, 200.0,
];

const INDICES: [u32; 12] = [0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4];

/// Two quads drawn from one vertex buffer with a single draw call.
pub struct BatchRender {
    vertex_array: VertexArray,
    _vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    shader: Shader,
    mvp: Matrix4<f32>,
}

impl BatchRender {
    pub fn new(env: &SceneEnv) -> Result<Self, SceneError> {
        let gl = &env.gl;

        let vertex_array = VertexArray::new(gl);
        let vertex_buffer = VertexBuffer::new(gl, &POSITIONS);
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2);
        vertex_array.add_buffer(&vertex_buffer, &layout);

        let index_buffer = IndexBuffer::new(gl, &INDICES);
        let shader = Shader::from_file(gl, &env.assets.batch_shader)?;

        let (width, height) = env.viewport;
        let proj = cgmath::ortho(0.0, width as f32, 0.0, height as f32, -1.0, 1.0);
        let view = Matrix4::from_translation(Vector3::new(-100.0, 0.0, 0.0));

        Ok(Self {
            vertex_array,
            _vertex_buffer: vertex_buffer,
            index_buffer,
            shader,
            mvp: proj * view,
        })
    }
}

impl Scene for BatchRender {
    fn on_render(&mut self, renderer: &Renderer) {
        renderer.set_clear_color([0.0, 0.0, 0.0, 1.0]);
        renderer.clear();

        self.shader.bind();
        self.shader.set_uniform_mat4f("u_mvp", &self.mvp);
        renderer.draw(&self.vertex_array, &self.index_buffer, &self.shader);
    }
}
