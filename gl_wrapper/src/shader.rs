use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cgmath::Matrix4;
use gl::types::{GLint, GLuint};
use thiserror::Error;

use crate::backend::{Context, GlApi, ShaderStage};
use crate::check::{check_call, clear_errors};

const MARKER: &str = "#shader";

/// The two stages of a `#shader vertex` / `#shader fragment` source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Splits a dual-section shader text.
    ///
    /// Marker lines are discarded, every other line is copied verbatim with a
    /// trailing newline. Text outside a recognised section is dropped.
    pub fn parse(text: &str) -> Self {
        let mut source = Self::default();
        let mut current: Option<ShaderStage> = None;

        for (number, line) in text.lines().enumerate() {
            if let Some(keyword) = line.trim_start().strip_prefix(MARKER) {
                current = match keyword.trim() {
                    "vertex" => Some(ShaderStage::Vertex),
                    "fragment" => Some(ShaderStage::Fragment),
                    other => {
                        log::warn!(
                            "Unknown shader section '{other}' on line {}, skipping it",
                            number + 1
                        );
                        None
                    }
                };
                continue;
            }

            let section = match current {
                Some(ShaderStage::Vertex) => &mut source.vertex,
                Some(ShaderStage::Fragment) => &mut source.fragment,
                None => {
                    log::warn!("Line {} is outside of any shader section", number + 1);
                    continue;
                }
            };
            section.push_str(line);
            section.push('\n');
        }

        source
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Could not read shader file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A linked vertex + fragment program.
///
/// Compilation problems are logged and leave the shader inert (handle 0)
/// instead of failing construction.
pub struct Shader {
    ctx: Context,
    id: GLuint,
    uniform_locations: RefCell<HashMap<String, GLint>>,
}

impl Shader {
    pub fn from_file(ctx: &Context, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_owned(),
            source,
        })?;

        log::debug!("Loaded shader source from {path:?}");
        Ok(Self::from_source(ctx, &ShaderSource::parse(&text)))
    }

    pub fn from_source(ctx: &Context, source: &ShaderSource) -> Self {
        let id = create_program(ctx.as_ref(), source).unwrap_or(0);

        Self {
            ctx: ctx.clone(),
            id,
            uniform_locations: RefCell::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// `false` when compilation or linking failed.
    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    pub fn bind(&self) {
        self.ctx.use_program(self.id);
    }

    pub fn unbind(&self) {
        self.ctx.use_program(0);
    }

    pub fn set_uniform_1i(&self, name: &str, value: i32) {
        if let Some(location) = self.uniform_location(name) {
            self.ctx.uniform_1i(location, value);
        }
    }

    pub fn set_uniform_1f(&self, name: &str, value: f32) {
        if let Some(location) = self.uniform_location(name) {
            self.ctx.uniform_1f(location, value);
        }
    }

    pub fn set_uniform_4f(&self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) {
        if let Some(location) = self.uniform_location(name) {
            self.ctx.uniform_4f(location, [v0, v1, v2, v3]);
        }
    }

    pub fn set_uniform_mat4f(&self, name: &str, matrix: &Matrix4<f32>) {
        if let Some(location) = self.uniform_location(name) {
            let values: &[f32; 16] = matrix.as_ref();
            self.ctx.uniform_matrix_4f(location, values);
        }
    }

    /// Cached location lookup; `None` for names the program does not have.
    fn uniform_location(&self, name: &str) -> Option<GLint> {
        if let Some(&location) = self.uniform_locations.borrow().get(name) {
            return (location != -1).then_some(location);
        }

        let location = if self.is_valid() {
            self.ctx.get_uniform_location(self.id, name)
        } else {
            -1
        };
        if location == -1 {
            log::warn!("Uniform '{name}' doesn't exist in program {}", self.id);
        }

        self.uniform_locations
            .borrow_mut()
            .insert(name.to_string(), location);
        (location != -1).then_some(location)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if self.is_valid() {
            self.ctx.delete_program(self.id);
        }
    }
}

fn compile_stage(api: &dyn GlApi, stage: ShaderStage, source: &str) -> Option<GLuint> {
    if source.trim().is_empty() {
        log::warn!("Empty {} shader source", stage.name());
    }

    clear_errors(api);
    let id = api.create_shader(stage);
    api.shader_source(id, source);
    api.compile_shader(id);

    if !api.compile_status(id) {
        log::error!(
            "Failed to compile {} shader:\n{}",
            stage.name(),
            api.shader_info_log(id)
        );
        api.delete_shader(id);
        return None;
    }

    check_call(api, "compile shader");
    Some(id)
}

fn create_program(api: &dyn GlApi, source: &ShaderSource) -> Option<GLuint> {
    // a failed vertex stage does not skip the fragment stage
    let vert = compile_stage(api, ShaderStage::Vertex, source.stage(ShaderStage::Vertex));
    let frag = compile_stage(api, ShaderStage::Fragment, source.stage(ShaderStage::Fragment));

    let (vert, frag) = match (vert, frag) {
        (Some(vert), Some(frag)) => (vert, frag),
        (vert, frag) => {
            vert.into_iter().chain(frag).for_each(|id| api.delete_shader(id));
            return None;
        }
    };

    let program = api.create_program();
    api.attach_shader(program, vert);
    api.attach_shader(program, frag);
    api.link_program(program);

    let linked = api.link_status(program);
    if linked {
        api.validate_program(program);
    } else {
        log::error!("Failed to link shader program:\n{}", api.program_info_log(program));
    }

    api.delete_shader(vert);
    api.delete_shader(frag);

    if !linked {
        api.delete_program(program);
        return None;
    }

    check_call(api, "link program");
    log::debug!("Created shader program {program}");
    Some(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockGl};

    const BASIC: &str = "#shader vertex\nA\n#shader fragment\nB\n";

    #[test]
    fn parse_basic() {
        let source = ShaderSource::parse(BASIC);
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn parse_reversed_order() {
        let source = ShaderSource::parse("#shader fragment\nfrag\n#shader vertex\nvert\n");
        assert_eq!(source.vertex, "vert\n");
        assert_eq!(source.fragment, "frag\n");
    }

    #[test]
    fn parse_keeps_blank_lines() {
        let text = "#shader vertex\n#version 330 core\n\nvoid main() {}\n#shader fragment\n\n";
        let source = ShaderSource::parse(text);
        assert_eq!(source.vertex, "#version 330 core\n\nvoid main() {}\n");
        assert_eq!(source.fragment, "\n");
    }

    #[test]
    fn parse_without_markers() {
        let source = ShaderSource::parse("void main() {}\n");
        assert_eq!(source, ShaderSource::default());
    }

    #[test]
    fn parse_unknown_section_is_skipped() {
        let text = "#shader vertex\nA\n#shader geometry\nG\n#shader fragment\nB";
        let source = ShaderSource::parse(text);
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn compiles_and_links() {
        let mock = MockGl::new();
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        assert!(shader.is_valid());

        let calls = mock.calls();
        assert!(calls.contains(&Call::LinkProgram(shader.id())));
        assert!(calls.contains(&Call::ValidateProgram(shader.id())));
        assert_eq!(mock.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert!(calls.contains(&Call::ShaderSource(1, "A\n".to_string())));
    }

    #[test]
    fn uniform_location_is_cached() {
        let mock = MockGl::new();
        mock.add_uniform("u_color", 3);
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        shader.set_uniform_4f("u_color", 1.0, 0.5, 0.2, 1.0);
        shader.set_uniform_4f("u_color", 0.0, 0.0, 0.0, 1.0);

        assert_eq!(
            mock.count(|c| matches!(c, Call::GetUniformLocation(_, name) if name == "u_color")),
            1
        );
        assert_eq!(mock.count(|c| matches!(c, Call::Uniform4f(3, _))), 2);
    }

    #[test]
    fn missing_uniform_is_a_cached_noop() {
        let mock = MockGl::new();
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        shader.set_uniform_1i("u_texture", 0);
        shader.set_uniform_1i("u_texture", 1);

        assert_eq!(
            mock.count(|c| matches!(c, Call::GetUniformLocation(..))),
            1
        );
        assert_eq!(mock.count(|c| matches!(c, Call::Uniform1i(..))), 0);
    }

    #[test]
    fn matrix_uniform_is_column_major() {
        let mock = MockGl::new();
        mock.add_uniform("u_mvp", 0);
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        let matrix = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0));
        shader.set_uniform_mat4f("u_mvp", &matrix);

        let uploaded = mock.calls().into_iter().find_map(|c| match c {
            Call::UniformMatrix4f(0, m) => Some(m),
            _ => None,
        });
        let uploaded = uploaded.expect("matrix was not uploaded");
        assert_eq!(&uploaded[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn failed_stage_yields_inert_shader() {
        let mock = MockGl::new();
        mock.fail_stage(ShaderStage::Fragment);
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        assert!(!shader.is_valid());
        assert_eq!(shader.id(), 0);

        // both the failed fragment and the already compiled vertex stage
        assert_eq!(mock.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert_eq!(mock.count(|c| matches!(c, Call::CreateProgram(_))), 0);

        shader.set_uniform_1f("u_time", 1.0);
        assert_eq!(mock.count(|c| matches!(c, Call::GetUniformLocation(..))), 0);

        drop(shader);
        assert_eq!(mock.count(|c| matches!(c, Call::DeleteProgram(_))), 0);
    }

    #[test]
    fn both_failed_stages_are_reported() {
        let mock = MockGl::new();
        mock.fail_stage(ShaderStage::Vertex);
        mock.fail_stage(ShaderStage::Fragment);
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        assert!(!shader.is_valid());

        assert_eq!(mock.count(|c| matches!(c, Call::CreateShader(..))), 2);
        assert_eq!(mock.count(|c| matches!(c, Call::CompileShader(_))), 2);
        assert_eq!(mock.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert_eq!(mock.count(|c| matches!(c, Call::CreateProgram(_))), 0);
    }

    #[test]
    fn failed_vertex_stage_releases_fragment() {
        let mock = MockGl::new();
        mock.fail_stage(ShaderStage::Vertex);
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        assert!(!shader.is_valid());

        let created: Vec<_> = mock
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateShader(_, id) => Some(id),
                _ => None,
            })
            .collect();
        let deleted: Vec<_> = mock
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteShader(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(created, deleted);
    }

    #[test]
    fn failed_link_deletes_program() {
        let mock = MockGl::new();
        mock.fail_link.set(true);
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        assert!(!shader.is_valid());
        assert_eq!(mock.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
        assert_eq!(mock.count(|c| matches!(c, Call::ValidateProgram(_))), 0);
    }

    #[test]
    fn bind_and_drop() {
        let mock = MockGl::new();
        let ctx = MockGl::context(&mock);

        let shader = Shader::from_source(&ctx, &ShaderSource::parse(BASIC));
        let id = shader.id();
        shader.bind();
        shader.unbind();
        drop(shader);

        let calls = mock.calls();
        let tail = &calls[calls.len() - 3..];
        assert_eq!(
            tail,
            &[
                Call::UseProgram(id),
                Call::UseProgram(0),
                Call::DeleteProgram(id)
            ]
        );
    }

    #[test]
    fn missing_file() {
        let mock = MockGl::new();
        let ctx = MockGl::context(&mock);

        let res = Shader::from_file(&ctx, "/nonexistent/basic.shader");
        assert!(matches!(res, Err(ShaderError::Io { .. })));
    }
}
