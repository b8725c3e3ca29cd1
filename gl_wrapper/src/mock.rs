//! Recording `GlApi` used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

use crate::backend::{BufferTarget, Context, GlApi, ShaderStage};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    GenBuffer(GLuint),
    BindBuffer(BufferTarget, GLuint),
    BufferData(BufferTarget, usize),
    DeleteBuffer(GLuint),
    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    VertexAttribPointer {
        index: GLuint,
        count: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    },
    EnableVertexAttribArray(GLuint),
    CreateShader(ShaderStage, GLuint),
    ShaderSource(GLuint, String),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    ValidateProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    GetUniformLocation(GLuint, String),
    Uniform1i(GLint, i32),
    Uniform1f(GLint, f32),
    Uniform4f(GLint, [f32; 4]),
    UniformMatrix4f(GLint, [f32; 16]),
    GenTexture(GLuint),
    ActiveTexture(u32),
    BindTexture(GLuint),
    TexParameter(GLenum, GLint),
    TexImageRgba8(GLsizei, GLsizei, usize),
    DeleteTexture(GLuint),
    ClearColor([f32; 4]),
    Clear(GLbitfield),
    Viewport(GLsizei, GLsizei),
    EnableBlending,
    DrawElements(GLsizei),
}

#[derive(Default)]
pub struct MockGl {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<GLuint>,
    shader_stages: RefCell<HashMap<GLuint, ShaderStage>>,
    /// Uniforms resolvable in every program, with their locations.
    pub uniforms: RefCell<HashMap<String, GLint>>,
    pub failing_stages: RefCell<HashSet<ShaderStage>>,
    pub fail_link: Cell<bool>,
    pub pending_errors: RefCell<Vec<GLenum>>,
    /// Error raised by every texture upload.
    pub upload_error: Cell<Option<GLenum>>,
}

impl MockGl {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn context(gl: &Rc<Self>) -> Context {
        gl.clone()
    }

    pub fn add_uniform(&self, name: &str, location: GLint) {
        self.uniforms.borrow_mut().insert(name.to_string(), location);
    }

    pub fn fail_stage(&self, stage: ShaderStage) {
        self.failing_stages.borrow_mut().insert(stage);
    }

    pub fn push_error(&self, error: GLenum) {
        self.pending_errors.borrow_mut().push(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn fresh_id(&self) -> GLuint {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl GlApi for MockGl {
    fn gen_buffer(&self) -> GLuint {
        let id = self.fresh_id();
        self.record(Call::GenBuffer(id));
        id
    }

    fn bind_buffer(&self, target: BufferTarget, id: GLuint) {
        self.record(Call::BindBuffer(target, id));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.record(Call::BufferData(target, data.len()));
    }

    fn delete_buffer(&self, id: GLuint) {
        self.record(Call::DeleteBuffer(id));
    }

    fn gen_vertex_array(&self) -> GLuint {
        let id = self.fresh_id();
        self.record(Call::GenVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, id: GLuint) {
        self.record(Call::BindVertexArray(id));
    }

    fn delete_vertex_array(&self, id: GLuint) {
        self.record(Call::DeleteVertexArray(id));
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        count: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        self.record(Call::VertexAttribPointer {
            index,
            count,
            ty,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let id = self.fresh_id();
        self.shader_stages.borrow_mut().insert(id, stage);
        self.record(Call::CreateShader(stage, id));
        id
    }

    fn shader_source(&self, id: GLuint, source: &str) {
        self.record(Call::ShaderSource(id, source.to_string()));
    }

    fn compile_shader(&self, id: GLuint) {
        self.record(Call::CompileShader(id));
    }

    fn compile_status(&self, id: GLuint) -> bool {
        match self.shader_stages.borrow().get(&id) {
            Some(stage) => !self.failing_stages.borrow().contains(stage),
            None => false,
        }
    }

    fn shader_info_log(&self, id: GLuint) -> String {
        format!("0:1(1): error: mock failure in shader {id}")
    }

    fn delete_shader(&self, id: GLuint) {
        self.record(Call::DeleteShader(id));
    }

    fn create_program(&self) -> GLuint {
        let id = self.fresh_id();
        self.record(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        self.record(Call::LinkProgram(program));
    }

    fn link_status(&self, _program: GLuint) -> bool {
        !self.fail_link.get()
    }

    fn program_info_log(&self, program: GLuint) -> String {
        format!("error: mock link failure in program {program}")
    }

    fn validate_program(&self, program: GLuint) {
        self.record(Call::ValidateProgram(program));
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint {
        self.record(Call::GetUniformLocation(program, name.to_string()));
        self.uniforms.borrow().get(name).copied().unwrap_or(-1)
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        self.record(Call::Uniform1i(location, value));
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        self.record(Call::Uniform1f(location, value));
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        self.record(Call::Uniform4f(location, value));
    }

    fn uniform_matrix_4f(&self, location: GLint, value: &[f32; 16]) {
        self.record(Call::UniformMatrix4f(location, *value));
    }

    fn gen_texture(&self) -> GLuint {
        let id = self.fresh_id();
        self.record(Call::GenTexture(id));
        id
    }

    fn active_texture(&self, slot: u32) {
        self.record(Call::ActiveTexture(slot));
    }

    fn bind_texture(&self, id: GLuint) {
        self.record(Call::BindTexture(id));
    }

    fn tex_parameter(&self, name: GLenum, value: GLint) {
        self.record(Call::TexParameter(name, value));
    }

    fn tex_image_rgba8(&self, width: GLsizei, height: GLsizei, pixels: &[u8]) {
        self.record(Call::TexImageRgba8(width, height, pixels.len()));
        if let Some(error) = self.upload_error.get() {
            self.push_error(error);
        }
    }

    fn delete_texture(&self, id: GLuint) {
        self.record(Call::DeleteTexture(id));
    }

    fn clear_color(&self, color: [f32; 4]) {
        self.record(Call::ClearColor(color));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record(Call::Clear(mask));
    }

    fn viewport(&self, width: GLsizei, height: GLsizei) {
        self.record(Call::Viewport(width, height));
    }

    fn enable_blending(&self) {
        self.record(Call::EnableBlending);
    }

    fn draw_elements(&self, count: GLsizei) {
        self.record(Call::DrawElements(count));
    }

    fn get_error(&self) -> GLenum {
        let mut errors = self.pending_errors.borrow_mut();
        if errors.is_empty() {
            gl::NO_ERROR
        } else {
            errors.remove(0)
        }
    }
}
