//! glint runtime (glow/OpenGL backend)
//
// This crate intentionally contains **only** the GL shim a sketch needs:
// - compile/link a vertex+fragment pair with surfaced diagnostics
// - resolve named attribute/uniform bindings (prefix convention)
// - upload vertex/index data and bind the position attribute
// - write float-vector uniforms through a tagged value type
//
// It does NOT contain windowing, pointer input, frame pacing, or demo policy.
#![allow(clippy::missing_safety_doc)]

use glow::HasContext;
use std::collections::HashMap;

pub use glint_core::SketchError;

/// A vertex/fragment pair handed to [`Program::new`] verbatim.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub vert: String,
    pub frag: String,
    /// Optional human-friendly origin (path/label) for logs.
    pub origin: Option<String>,
}

impl ShaderSource {
    pub fn new(vert: impl Into<String>, frag: impl Into<String>) -> Self {
        Self {
            vert: vert.into(),
            frag: frag.into(),
            origin: None,
        }
    }
}

/// Per-frame context supplied by the host to the sketch callback.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    pub width: i32,
    pub height: i32,
    /// Elapsed wall-clock time since the loop started, in seconds.
    pub time: f32,
    /// Last known pointer position, in the units the host config selected.
    pub pointer: [f32; 2],
    pub frame: u64,
}

// -------------------------------------------------------------------------------------------------
// Binding names
// -------------------------------------------------------------------------------------------------

/// Kind of a named binding, decided by the prefix convention:
/// `a…` is a per-vertex attribute, `u…` is a per-draw uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Attribute,
    Uniform,
}

/// Names every program resolves whether listed or not: the position
/// attribute and the two transform uniforms written at build time.
pub const IMPLICIT_BINDINGS: [&str; 3] =
    ["aVertexPosition", "uProjectionMatrix", "uModelViewMatrix"];

pub fn classify_binding(name: &str) -> Result<BindingKind, SketchError> {
    match name.as_bytes().first() {
        Some(b'a') => Ok(BindingKind::Attribute),
        Some(b'u') => Ok(BindingKind::Uniform),
        _ => Err(SketchError::BindingNotFound {
            name: name.to_string(),
        }),
    }
}

/// The listed names plus [`IMPLICIT_BINDINGS`], first occurrence wins.
pub fn binding_names<'a>(listed: &[&'a str]) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::with_capacity(listed.len() + IMPLICIT_BINDINGS.len());
    for name in listed.iter().copied().chain(IMPLICIT_BINDINGS) {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

// -------------------------------------------------------------------------------------------------
// Uniform values
// -------------------------------------------------------------------------------------------------

/// Tagged float-vector uniform value.
///
/// Replaces duck-typed arity dispatch: the variant fixes the upload call,
/// so an unsupported component count cannot reach the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl UniformValue {
    /// Build from a flat slice; lengths outside 1..=4 are [`SketchError::InvalidArity`].
    pub fn from_slice(v: &[f32]) -> Result<Self, SketchError> {
        match *v {
            [x] => Ok(UniformValue::Scalar(x)),
            [x, y] => Ok(UniformValue::Vec2([x, y])),
            [x, y, z] => Ok(UniformValue::Vec3([x, y, z])),
            [x, y, z, w] => Ok(UniformValue::Vec4([x, y, z, w])),
            _ => Err(SketchError::InvalidArity { len: v.len() }),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            UniformValue::Scalar(_) => 1,
            UniformValue::Vec2(_) => 2,
            UniformValue::Vec3(_) => 3,
            UniformValue::Vec4(_) => 4,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Scalar(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

// -------------------------------------------------------------------------------------------------
// View matrices
// -------------------------------------------------------------------------------------------------

/// Fixed camera installed into every program at build time.
pub const FIELD_OF_VIEW_DEG: f32 = 20.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
pub const CAMERA_TRANSLATION: [f32; 3] = [0.0, 0.0, -6.0];

pub fn projection_matrix(aspect: f32) -> glam::Mat4 {
    glam::Mat4::perspective_rh_gl(FIELD_OF_VIEW_DEG.to_radians(), aspect, Z_NEAR, Z_FAR)
}

pub fn model_view_matrix() -> glam::Mat4 {
    glam::Mat4::from_translation(glam::Vec3::from(CAMERA_TRANSLATION))
}

// -------------------------------------------------------------------------------------------------
// Program
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VS",
            ShaderStage::Fragment => "FS",
        }
    }

    /// The error that carries this stage's driver info log.
    fn compile_error(self, log: String) -> SketchError {
        match self {
            ShaderStage::Vertex => SketchError::VertexCompile(log),
            ShaderStage::Fragment => SketchError::FragmentCompile(log),
        }
    }
}

unsafe fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    src: &str,
) -> Result<glow::NativeShader, SketchError> {
    let shader = gl.create_shader(stage.gl_kind()).map_err(|e| {
        SketchError::GlCreate(format!("create_shader({}) failed: {e:?}", stage.label()))
    })?;
    gl.shader_source(shader, src);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(stage.compile_error(log));
    }
    Ok(shader)
}

pub unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::NativeProgram, SketchError> {
    let vs = compile_stage(gl, ShaderStage::Vertex, vert_src)?;
    let fs = match compile_stage(gl, ShaderStage::Fragment, frag_src) {
        Ok(fs) => fs,
        Err(e) => {
            gl.delete_shader(vs);
            return Err(e);
        }
    };

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(e) => {
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(SketchError::GlCreate(format!(
                "create_program failed: {e:?}"
            )));
        }
    };
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(SketchError::Link(log));
    }

    Ok(program)
}

/// A linked shader pair plus its resolved attribute/uniform locations.
///
/// Immutable after creation except for values written through the uniform
/// locations. The fixed projection/view pair is installed at build time.
#[derive(Debug)]
pub struct Program {
    pub program: glow::NativeProgram,
    attribs: HashMap<String, u32>,
    uniforms: HashMap<String, glow::NativeUniformLocation>,
}

impl Program {
    /// Compile + link `source`, resolve `listed` names plus the implicit
    /// three, and write the fixed camera into the transform uniforms.
    ///
    /// `aspect` is the viewport width/height ratio used for the projection.
    pub unsafe fn new(
        gl: &glow::Context,
        source: &ShaderSource,
        listed: &[&str],
        aspect: f32,
    ) -> Result<Self, SketchError> {
        let program = compile_program(gl, &source.vert, &source.frag)?;

        let mut attribs = HashMap::new();
        let mut uniforms = HashMap::new();
        for name in binding_names(listed) {
            let kind = match classify_binding(name) {
                Ok(kind) => kind,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };
            match kind {
                BindingKind::Attribute => match gl.get_attrib_location(program, name) {
                    Some(loc) => {
                        attribs.insert(name.to_string(), loc);
                    }
                    None => {
                        gl.delete_program(program);
                        return Err(SketchError::BindingNotFound {
                            name: name.to_string(),
                        });
                    }
                },
                BindingKind::Uniform => match gl.get_uniform_location(program, name) {
                    Some(loc) => {
                        uniforms.insert(name.to_string(), loc);
                    }
                    None => {
                        gl.delete_program(program);
                        return Err(SketchError::BindingNotFound {
                            name: name.to_string(),
                        });
                    }
                },
            }
        }

        if let Some(origin) = &source.origin {
            log::info!("linked program from {origin}");
        }

        let built = Self {
            program,
            attribs,
            uniforms,
        };
        built.install_view_matrices(gl, aspect)?;
        clear_surface(gl, [0.0, 0.0, 0.0, 1.0]);
        Ok(built)
    }

    /// Write the fixed perspective projection and camera translation.
    pub unsafe fn install_view_matrices(
        &self,
        gl: &glow::Context,
        aspect: f32,
    ) -> Result<(), SketchError> {
        gl.use_program(Some(self.program));
        let proj = self.uniform("uProjectionMatrix")?;
        gl.uniform_matrix_4_f32_slice(Some(proj), false, &projection_matrix(aspect).to_cols_array());
        let view = self.uniform("uModelViewMatrix")?;
        gl.uniform_matrix_4_f32_slice(Some(view), false, &model_view_matrix().to_cols_array());
        Ok(())
    }

    pub fn attrib(&self, name: &str) -> Result<u32, SketchError> {
        self.attribs
            .get(name)
            .copied()
            .ok_or_else(|| SketchError::BindingNotFound {
                name: name.to_string(),
            })
    }

    fn uniform(&self, name: &str) -> Result<&glow::NativeUniformLocation, SketchError> {
        self.uniforms
            .get(name)
            .ok_or_else(|| SketchError::BindingNotFound {
                name: name.to_string(),
            })
    }

    /// Write a float-vector uniform; arity is fixed by the value's variant.
    pub unsafe fn set_uniform(
        &self,
        gl: &glow::Context,
        name: &str,
        value: UniformValue,
    ) -> Result<(), SketchError> {
        let loc = self.uniform(name)?;
        gl.use_program(Some(self.program));
        match value {
            UniformValue::Scalar(x) => gl.uniform_1_f32(Some(loc), x),
            UniformValue::Vec2([x, y]) => gl.uniform_2_f32(Some(loc), x, y),
            UniformValue::Vec3([x, y, z]) => gl.uniform_3_f32(Some(loc), x, y, z),
            UniformValue::Vec4([x, y, z, w]) => gl.uniform_4_f32(Some(loc), x, y, z, w),
        }
        Ok(())
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_program(self.program);
    }
}

// -------------------------------------------------------------------------------------------------
// Buffers + clear
// -------------------------------------------------------------------------------------------------

pub unsafe fn create_buffer(gl: &glow::Context) -> Result<glow::NativeBuffer, SketchError> {
    gl.create_buffer()
        .map_err(|e| SketchError::GlCreate(format!("create_buffer failed: {e:?}")))
}

/// Bind `buffer` as ARRAY_BUFFER and (re)fill it with `data`.
pub unsafe fn upload_vertices(gl: &glow::Context, buffer: glow::NativeBuffer, data: &[f32]) {
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
    gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(data), glow::STATIC_DRAW);
}

/// Bind `buffer` as ELEMENT_ARRAY_BUFFER and (re)fill it with `data`.
pub unsafe fn upload_indices(gl: &glow::Context, buffer: glow::NativeBuffer, data: &[u16]) {
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
    gl.buffer_data_u8_slice(
        glow::ELEMENT_ARRAY_BUFFER,
        bytemuck::cast_slice(data),
        glow::STATIC_DRAW,
    );
}

/// Point `location` at the currently bound ARRAY_BUFFER (tightly packed f32).
pub unsafe fn bind_position_attrib(gl: &glow::Context, location: u32, components: i32) {
    gl.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
    gl.enable_vertex_attrib_array(location);
}

/// Clear color+depth and (re)arm the depth test, as every frame starts.
pub unsafe fn clear_surface(gl: &glow::Context, color: [f32; 4]) {
    gl.clear_color(color[0], color[1], color[2], color[3]);
    gl.clear_depth_f32(1.0);
    gl.enable(glow::DEPTH_TEST);
    gl.depth_func(glow::LEQUAL);
    gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_stage_reports_through_its_own_error_variant() {
        let vs_err = ShaderStage::Vertex.compile_error("bad vs".into());
        assert!(matches!(vs_err, SketchError::VertexCompile(log) if log == "bad vs"));

        let fs_err = ShaderStage::Fragment.compile_error("bad fs".into());
        assert!(matches!(fs_err, SketchError::FragmentCompile(log) if log == "bad fs"));

        assert_eq!(ShaderStage::Vertex.gl_kind(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_kind(), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn prefix_convention_classifies_names() {
        assert_eq!(classify_binding("uTime").unwrap(), BindingKind::Uniform);
        assert_eq!(
            classify_binding("aVertexPosition").unwrap(),
            BindingKind::Attribute
        );
    }

    #[test]
    fn unprefixed_name_is_binding_not_found() {
        let err = classify_binding("time").unwrap_err();
        assert!(matches!(err, SketchError::BindingNotFound { name } if name == "time"));
        assert!(classify_binding("").is_err());
    }

    #[test]
    fn listed_names_gain_the_implicit_three() {
        let names = binding_names(&["uTime", "uColor"]);
        assert_eq!(
            names,
            vec![
                "uTime",
                "uColor",
                "aVertexPosition",
                "uProjectionMatrix",
                "uModelViewMatrix"
            ]
        );
    }

    #[test]
    fn implicit_names_are_not_duplicated() {
        let names = binding_names(&["uProjectionMatrix", "uMouse"]);
        assert_eq!(
            names.iter().filter(|n| **n == "uProjectionMatrix").count(),
            1
        );
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn uniform_value_from_slice_maps_arity() {
        assert_eq!(
            UniformValue::from_slice(&[1.0]).unwrap(),
            UniformValue::Scalar(1.0)
        );
        assert_eq!(
            UniformValue::from_slice(&[1.0, 2.0]).unwrap().arity(),
            2
        );
        assert_eq!(
            UniformValue::from_slice(&[1.0, 2.0, 3.0]).unwrap(),
            UniformValue::Vec3([1.0, 2.0, 3.0])
        );
        assert_eq!(
            UniformValue::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap().arity(),
            4
        );
    }

    #[test]
    fn uniform_value_rejects_bad_arity() {
        assert!(matches!(
            UniformValue::from_slice(&[]),
            Err(SketchError::InvalidArity { len: 0 })
        ));
        assert!(matches!(
            UniformValue::from_slice(&[0.0; 5]),
            Err(SketchError::InvalidArity { len: 5 })
        ));
    }

    #[test]
    fn camera_matrices_match_the_fixed_rig() {
        let proj = projection_matrix(16.0 / 9.0);
        // Perspective matrices put -1 in the w-from-z slot.
        assert_eq!(proj.z_axis.w, -1.0);
        assert!(proj.to_cols_array().iter().all(|v| v.is_finite()));

        let view = model_view_matrix();
        assert_eq!(view.w_axis.z, -6.0);
        assert_eq!(view.w_axis.x, 0.0);
    }
}
