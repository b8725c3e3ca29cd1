use std::ffi::{c_char, c_void, CString};
use std::rc::Rc;

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

/// Shared handle to the driver. Every resource keeps a clone so it can release
/// its GPU object on drop. `Rc` keeps resources on the context thread.
pub type Context = Rc<dyn GlApi>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub fn gl_enum(self) -> GLenum {
        match self {
            BufferTarget::Array => gl::ARRAY_BUFFER,
            BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// The subset of OpenGL the wrappers are built on.
///
/// Calls are only meaningful while the context that loaded the implementation
/// is current on the calling thread.
pub trait GlApi {
    fn gen_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: BufferTarget, id: GLuint);
    /// Uploads `data` to the buffer bound at `target` with `STATIC_DRAW` usage.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, id: GLuint);

    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, id: GLuint);
    fn delete_vertex_array(&self, id: GLuint);
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        count: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );
    fn enable_vertex_attrib_array(&self, index: GLuint);

    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, id: GLuint, source: &str);
    fn compile_shader(&self, id: GLuint);
    fn compile_status(&self, id: GLuint) -> bool;
    fn shader_info_log(&self, id: GLuint) -> String;
    fn delete_shader(&self, id: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn validate_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint;
    fn uniform_1i(&self, location: GLint, value: i32);
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_4f(&self, location: GLint, value: [f32; 4]);
    fn uniform_matrix_4f(&self, location: GLint, value: &[f32; 16]);

    fn gen_texture(&self) -> GLuint;
    fn active_texture(&self, slot: u32);
    fn bind_texture(&self, id: GLuint);
    fn tex_parameter(&self, name: GLenum, value: GLint);
    /// Uploads tightly packed RGBA8 pixels to the bound 2D texture.
    fn tex_image_rgba8(&self, width: GLsizei, height: GLsizei, pixels: &[u8]);
    fn delete_texture(&self, id: GLuint);

    fn clear_color(&self, color: [f32; 4]);
    fn clear(&self, mask: GLbitfield);
    fn viewport(&self, width: GLsizei, height: GLsizei);
    fn enable_blending(&self);
    /// Indexed triangle list draw of `count` `u32` indices from the bound
    /// element buffer.
    fn draw_elements(&self, count: GLsizei);

    fn get_error(&self) -> GLenum;
}

/// `GlApi` backed by the global function pointers of the `gl` crate.
pub struct NativeGl {
    _private: (),
}

impl NativeGl {
    /// Loads the GL symbols through `loader`. The context the symbols belong to
    /// has to stay current for as long as this value is used.
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self { _private: () }
    }

    pub fn into_context(self) -> Context {
        Rc::new(self)
    }
}

fn info_log_to_string(mut buf: Vec<u8>, written: GLsizei) -> String {
    buf.truncate(written.max(0) as usize);
    while buf.last() == Some(&0) {
        buf.pop();
    }
    String::from_utf8_lossy(&buf).trim_end().to_string()
}

impl GlApi for NativeGl {
    fn gen_buffer(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn bind_buffer(&self, target: BufferTarget, id: GLuint) {
        unsafe { gl::BindBuffer(target.gl_enum(), id) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                target.gl_enum(),
                data.len() as isize,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, id: GLuint) {
        unsafe { gl::DeleteBuffers(1, &id) }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        id
    }

    fn bind_vertex_array(&self, id: GLuint) {
        unsafe { gl::BindVertexArray(id) }
    }

    fn delete_vertex_array(&self, id: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &id) }
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
        let normalized = if normalized { gl::TRUE } else { gl::FALSE };
        unsafe {
            gl::VertexAttribPointer(
                index,
                count,
                ty,
                normalized,
                stride,
                offset as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, id: GLuint, source: &str) {
        // explicit length, the source does not need a nul terminator
        let ptr = source.as_ptr() as *const c_char;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(id, 1, &ptr, &len) }
    }

    fn compile_shader(&self, id: GLuint) {
        unsafe { gl::CompileShader(id) }
    }

    fn compile_status(&self, id: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, id: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0_u8; len as usize];
        let mut written = 0;
        unsafe {
            gl::GetShaderInfoLog(id, len, &mut written, buf.as_mut_ptr() as *mut c_char);
        }
        info_log_to_string(buf, written)
    }

    fn delete_shader(&self, id: GLuint) {
        unsafe { gl::DeleteShader(id) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0_u8; len as usize];
        let mut written = 0;
        unsafe {
            gl::GetProgramInfoLog(program, len, &mut written, buf.as_mut_ptr() as *mut c_char);
        }
        info_log_to_string(buf, written)
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint {
        match CString::new(name) {
            Ok(name) => unsafe { gl::GetUniformLocation(program, name.as_ptr()) },
            // a name with an interior nul can never match a GLSL identifier
            Err(_) => -1,
        }
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        let [x, y, z, w] = value;
        unsafe { gl::Uniform4f(location, x, y, z, w) }
    }

    fn uniform_matrix_4f(&self, location: GLint, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }

    fn gen_texture(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        id
    }

    fn active_texture(&self, slot: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + slot) }
    }

    fn bind_texture(&self, id: GLuint) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, id) }
    }

    fn tex_parameter(&self, name: GLenum, value: GLint) {
        unsafe { gl::TexParameteri(gl::TEXTURE_2D, name, value) }
    }

    fn tex_image_rgba8(&self, width: GLsizei, height: GLsizei, pixels: &[u8]) {
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as GLint,
                width,
                height,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const c_void,
            );
        }
    }

    fn delete_texture(&self, id: GLuint) {
        unsafe { gl::DeleteTextures(1, &id) }
    }

    fn clear_color(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn viewport(&self, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(0, 0, width, height) }
    }

    fn enable_blending(&self) {
        unsafe {
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn draw_elements(&self, count: GLsizei) {
        unsafe {
            gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_INT, std::ptr::null());
        }
    }

    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }
}
