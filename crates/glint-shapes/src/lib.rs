//! Shape abstraction: a [`Program`] plus vertex data and a draw kind.
//!
//! Two variants, matching the two draw paths sketches actually use:
//! - [`Polygon`] draws its vertices directly (strip/loop/points).
//! - [`Quad`] draws exactly 4 vertices through a fixed 6-entry index list.
//!
//! `set_positions` replaces the vertex buffer and issues the draw in the
//! same call; `set_uniform` is a direct, synchronous GL write. Shapes own
//! their VAO/VBO, so several shapes can draw in one frame without
//! clobbering each other's state.
#![allow(clippy::missing_safety_doc)]

use glow::HasContext;

use glint_runtime_glow::{
    bind_position_attrib, create_buffer, upload_indices, upload_vertices, Program, ShaderSource,
    SketchError, UniformValue,
};

pub mod geometry;

/// Draw primitive for [`Polygon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    TriangleStrip,
    Triangles,
    LineLoop,
    Points,
}

impl PrimitiveKind {
    pub fn gl_mode(self) -> u32 {
        match self {
            PrimitiveKind::TriangleStrip => glow::TRIANGLE_STRIP,
            PrimitiveKind::Triangles => glow::TRIANGLES,
            PrimitiveKind::LineLoop => glow::LINE_LOOP,
            PrimitiveKind::Points => glow::POINTS,
        }
    }
}

/// Index list the quad path always uploads: two triangles sharing the
/// 3→1 edge, independent of vertex content.
pub const QUAD_INDICES: [u16; 6] = [3, 2, 1, 3, 1, 0];

fn check_positions(positions: &[f32], components: usize) -> Result<usize, SketchError> {
    if positions.is_empty() || positions.len() % components != 0 {
        return Err(SketchError::BadGeometry(format!(
            "{} floats is not a whole number of {components}-component vertices",
            positions.len()
        )));
    }
    Ok(positions.len() / components)
}

fn check_quad_positions(positions: &[f32]) -> Result<(), SketchError> {
    if positions.len() != 12 {
        return Err(SketchError::BadGeometry(format!(
            "quad needs exactly 4 vertices (12 floats), got {} floats",
            positions.len()
        )));
    }
    Ok(())
}

/// A non-indexed shape: program + primitive kind + the latest vertex buffer.
#[derive(Debug)]
pub struct Polygon {
    program: Program,
    kind: PrimitiveKind,
    /// Floats per vertex (2 for flat sketches, 3 with depth).
    components: usize,
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
}

impl Polygon {
    pub unsafe fn new(
        gl: &glow::Context,
        source: &ShaderSource,
        listed: &[&str],
        kind: PrimitiveKind,
        components: usize,
        aspect: f32,
    ) -> Result<Self, SketchError> {
        if !(2..=3).contains(&components) {
            return Err(SketchError::BadGeometry(format!(
                "positions must have 2 or 3 components, got {components}"
            )));
        }
        let program = Program::new(gl, source, listed, aspect)?;
        let vao = gl
            .create_vertex_array()
            .map_err(|e| SketchError::GlCreate(format!("create_vertex_array: {e}")))?;
        let vbo = create_buffer(gl)?;
        Ok(Self {
            program,
            kind,
            components,
            vao,
            vbo,
        })
    }

    /// Replace the vertex buffer and immediately draw.
    pub unsafe fn set_positions(
        &self,
        gl: &glow::Context,
        positions: &[f32],
    ) -> Result<(), SketchError> {
        let count = check_positions(positions, self.components)?;

        gl.use_program(Some(self.program.program));
        gl.bind_vertex_array(Some(self.vao));
        upload_vertices(gl, self.vbo, positions);
        bind_position_attrib(
            gl,
            self.program.attrib("aVertexPosition")?,
            self.components as i32,
        );
        gl.draw_arrays(self.kind.gl_mode(), 0, count as i32);
        gl.bind_vertex_array(None);
        Ok(())
    }

    pub unsafe fn set_uniform(
        &self,
        gl: &glow::Context,
        name: &str,
        value: UniformValue,
    ) -> Result<(), SketchError> {
        self.program.set_uniform(gl, name, value)
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        self.program.destroy(gl);
    }
}

/// The indexed variant: always 4 vertices, always [`QUAD_INDICES`].
#[derive(Debug)]
pub struct Quad {
    program: Program,
    kind: PrimitiveKind,
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
    ebo: glow::NativeBuffer,
}

impl Quad {
    pub unsafe fn new(
        gl: &glow::Context,
        source: &ShaderSource,
        listed: &[&str],
        aspect: f32,
    ) -> Result<Self, SketchError> {
        Self::with_kind(gl, source, listed, PrimitiveKind::TriangleStrip, aspect)
    }

    pub unsafe fn with_kind(
        gl: &glow::Context,
        source: &ShaderSource,
        listed: &[&str],
        kind: PrimitiveKind,
        aspect: f32,
    ) -> Result<Self, SketchError> {
        let program = Program::new(gl, source, listed, aspect)?;
        let vao = gl
            .create_vertex_array()
            .map_err(|e| SketchError::GlCreate(format!("create_vertex_array: {e}")))?;
        let vbo = create_buffer(gl)?;
        let ebo = create_buffer(gl)?;
        Ok(Self {
            program,
            kind,
            vao,
            vbo,
            ebo,
        })
    }

    /// Replace the 4 corner vertices (12 floats) and draw both triangles.
    ///
    /// The vertex count is checked before any GL state is touched.
    pub unsafe fn set_positions(
        &self,
        gl: &glow::Context,
        positions: &[f32],
    ) -> Result<(), SketchError> {
        check_quad_positions(positions)?;

        gl.use_program(Some(self.program.program));
        gl.bind_vertex_array(Some(self.vao));
        upload_vertices(gl, self.vbo, positions);
        upload_indices(gl, self.ebo, &QUAD_INDICES);
        bind_position_attrib(gl, self.program.attrib("aVertexPosition")?, 3);
        gl.draw_elements(
            self.kind.gl_mode(),
            QUAD_INDICES.len() as i32,
            glow::UNSIGNED_SHORT,
            0,
        );
        gl.bind_vertex_array(None);
        Ok(())
    }

    pub unsafe fn set_uniform(
        &self,
        gl: &glow::Context,
        name: &str,
        value: UniformValue,
    ) -> Result<(), SketchError> {
        self.program.set_uniform(gl, name, value)
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        gl.delete_buffer(self.ebo);
        self.program.destroy(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_index_list_is_two_triangles_sharing_an_edge() {
        assert_eq!(QUAD_INDICES, [3, 2, 1, 3, 1, 0]);
        // Both triangles reference the 3-1 diagonal.
        assert_eq!(&QUAD_INDICES[0..3], &[3, 2, 1]);
        assert_eq!(&QUAD_INDICES[3..6], &[3, 1, 0]);
    }

    #[test]
    fn quad_rejects_anything_but_four_vertices() {
        assert!(check_quad_positions(&[0.0; 12]).is_ok());
        for n in [0usize, 3, 9, 11, 13, 24] {
            let err = check_quad_positions(&vec![0.0; n]).unwrap_err();
            assert!(matches!(err, SketchError::BadGeometry(_)), "n={n}: {err}");
        }
    }

    #[test]
    fn polygon_positions_must_divide_by_components() {
        assert_eq!(check_positions(&[0.0; 6], 3).unwrap(), 2);
        assert_eq!(check_positions(&[0.0; 6], 2).unwrap(), 3);
        assert!(check_positions(&[0.0; 7], 3).is_err());
        assert!(check_positions(&[], 2).is_err());
    }

    #[test]
    fn primitive_kinds_map_to_gl_modes() {
        assert_eq!(PrimitiveKind::TriangleStrip.gl_mode(), glow::TRIANGLE_STRIP);
        assert_eq!(PrimitiveKind::LineLoop.gl_mode(), glow::LINE_LOOP);
        assert_eq!(PrimitiveKind::Points.gl_mode(), glow::POINTS);
    }
}
