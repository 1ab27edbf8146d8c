//! A line-loop circle resampled every frame, radius breathing with time,
//! color steered by the pointer.

use glint_core::SketchConfig;
use glint_host_winit::{run_sketch, LoopControl};
use glint_runtime_glow::{ShaderSource, SketchError, UniformValue};
use glint_shapes::{geometry::circle_points, Polygon, PrimitiveKind};

const VERT: &str = r#"#version 330 core
in vec4 aVertexPosition;
uniform mat4 uModelViewMatrix;
uniform mat4 uProjectionMatrix;
void main(void) {
    gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition;
}
"#;

const FRAG: &str = r#"#version 330 core
uniform vec3 uColor;
out vec4 fragColor;
void main() {
    fragColor = vec4(uColor, 1.0);
}
"#;

const CIRCLE_SEGMENTS: usize = 120;

fn config() -> Result<SketchConfig, SketchError> {
    match std::env::args().nth(1) {
        Some(path) => SketchConfig::from_json_path(path),
        None => Ok(SketchConfig::with_title("glint: circle loop")),
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("[glint demo] error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SketchError> {
    let source = ShaderSource::new(VERT, FRAG);

    run_sketch(
        config()?,
        move |gl, w, h| unsafe {
            Polygon::new(
                gl,
                &source,
                &["uColor"],
                PrimitiveKind::LineLoop,
                2,
                w as f32 / h as f32,
            )
        },
        |gl, circle, ctx| unsafe {
            let radius = 1.0 + 0.25 * (ctx.time * 2.0).sin();
            circle.set_uniform(
                gl,
                "uColor",
                UniformValue::Vec3([ctx.pointer[0], 0.4, ctx.pointer[1]]),
            )?;
            circle.set_positions(gl, &circle_points(CIRCLE_SEGMENTS, radius, 0.0, 0.0))?;
            Ok(LoopControl::Continue)
        },
    )
}
