use cgmath::{Matrix4, Vector3};

use gl_wrapper::{
    IndexBuffer, Renderer, Shader, Texture, VertexArray, VertexBuffer, VertexBufferLayout,
};

use winit::event::{ModifiersState, VirtualKeyCode};

use super::{Scene, SceneEnv, SceneError};

pub const NAME: &str = "Texture 2D";

const MOVE_STEP: f32 = 10.0;
const FALLBACK_SIZE: u32 = 64;

#[rustfmt::skip]
const QUAD: [f32; 16] = [
    // position       tex coord
    100.0, 100.0,     0.0, 0.0,
    200.0, 100.0,     1.0, 0.0,
    200.0, 200.0,     1.0, 1.0,
    100.0, 200.0,     0.0, 1.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Two copies of a textured quad. Arrow keys move the first one, `WASD` the
/// second. The blue tint channel pulses over time.
pub struct Texture2D {
    vertex_array: VertexArray,
    _vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    shader: Shader,
    texture: Texture,
    proj: Matrix4<f32>,
    view: Matrix4<f32>,
    translation_a: Vector3<f32>,
    translation_b: Vector3<f32>,
    tint: Pulse,
}

impl Texture2D {
    pub fn new(env: &SceneEnv) -> Result<Self, SceneError> {
        let gl = &env.gl;
        let renderer = Renderer::new(gl);
        renderer.enable_blending();

        let vertex_array = VertexArray::new(gl);
        let vertex_buffer = VertexBuffer::new(gl, &QUAD);
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2).push::<f32>(2);
        vertex_array.add_buffer(&vertex_buffer, &layout);

        let index_buffer = IndexBuffer::new(gl, &QUAD_INDICES);

        let shader = Shader::from_file(gl, &env.assets.basic_shader)?;
        shader.bind();
        shader.set_uniform_4f("u_color", 0.2, 0.3, 0.8, 1.0);
        shader.set_uniform_1i("u_texture", 0);

        let texture = match Texture::from_file(gl, &env.assets.texture) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("{e}, using a generated checkerboard");
                Texture::from_rgba(
                    gl,
                    FALLBACK_SIZE,
                    FALLBACK_SIZE,
                    &checkerboard(FALLBACK_SIZE, 8),
                )?
            }
        };

        let (width, height) = env.viewport;

        Ok(Self {
            vertex_array,
            _vertex_buffer: vertex_buffer,
            index_buffer,
            shader,
            texture,
            proj: cgmath::ortho(0.0, width as f32, 0.0, height as f32, -1.0, 1.0),
            view: Matrix4::from_translation(Vector3::new(-100.0, 0.0, 0.0)),
            translation_a: Vector3::new(200.0, 200.0, 0.0),
            translation_b: Vector3::new(400.0, 200.0, 0.0),
            tint: Pulse::new(1.0, 1.0),
        })
    }

    fn draw_at(&self, renderer: &Renderer, translation: Vector3<f32>) {
        let model = Matrix4::from_translation(translation);
        let mvp = self.proj * self.view * model;

        self.shader.bind();
        self.shader.set_uniform_mat4f("u_mvp", &mvp);
        renderer.draw(&self.vertex_array, &self.index_buffer, &self.shader);
    }
}

impl Scene for Texture2D {
    fn on_update(&mut self, dt: f32) {
        self.tint.advance(dt);
    }

    fn on_render(&mut self, renderer: &Renderer) {
        renderer.set_clear_color([0.0, 0.0, 0.0, 1.0]);
        renderer.clear();

        self.texture.bind(0);
        self.shader.bind();
        self.shader
            .set_uniform_4f("u_color", 1.0, 0.5, self.tint.value(), 1.0);

        self.draw_at(renderer, self.translation_a);
        self.draw_at(renderer, self.translation_b);
    }

    fn on_key(&mut self, key: VirtualKeyCode, _modifiers: ModifiersState) {
        let (target, dx, dy) = match key {
            VirtualKeyCode::Left => (&mut self.translation_a, -1.0, 0.0),
            VirtualKeyCode::Right => (&mut self.translation_a, 1.0, 0.0),
            VirtualKeyCode::Up => (&mut self.translation_a, 0.0, 1.0),
            VirtualKeyCode::Down => (&mut self.translation_a, 0.0, -1.0),
            VirtualKeyCode::A => (&mut self.translation_b, -1.0, 0.0),
            VirtualKeyCode::D => (&mut self.translation_b, 1.0, 0.0),
            VirtualKeyCode::W => (&mut self.translation_b, 0.0, 1.0),
            VirtualKeyCode::S => (&mut self.translation_b, 0.0, -1.0),
            _ => return,
        };

        target.x += dx * MOVE_STEP;
        target.y += dy * MOVE_STEP;
    }
}

/// A value bouncing between 0 and 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pulse {
    value: f32,
    rate: f32,
}

impl Pulse {
    /// `rate` is in units per second, starting downwards.
    pub fn new(value: f32, rate: f32) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            rate: -rate.abs(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn advance(&mut self, dt: f32) {
        self.value += self.rate * dt;

        if self.value >= 1.0 {
            self.value = 1.0;
            self.rate = -self.rate.abs();
        } else if self.value <= 0.0 {
            self.value = 0.0;
            self.rate = self.rate.abs();
        }
    }
}

/// RGBA8 checkerboard of `size`x`size` pixels with `cell` sized squares.
pub fn checkerboard(size: u32, cell: u32) -> Vec<u8> {
    let cell = cell.max(1);

    (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            if (x / cell + y / cell) % 2 == 0 {
                [235, 120, 40, 255]
            } else {
                [40, 40, 48, 255]
            }
        })
        .collect()
}
