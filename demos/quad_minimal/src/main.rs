//! A quad whose color pulses with time and follows the pointer.

use glint_core::SketchConfig;
use glint_host_winit::{run_sketch, LoopControl};
use glint_runtime_glow::{ShaderSource, SketchError, UniformValue};
use glint_shapes::Quad;

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
uniform vec2 uMouse;
uniform float uTime;
out vec4 fragColor;
void main() {
    vec3 color = uColor;
    color.r += 0.5 + 0.5 * sin(uTime * 10.0);
    color.g += color.r * uMouse.x * 0.5;
    color.b -= color.r * uMouse.y * 0.5;
    fragColor = vec4(color, 1.0);
}
"#;

fn config() -> Result<SketchConfig, SketchError> {
    match std::env::args().nth(1) {
        Some(path) => SketchConfig::from_json_path(path),
        None => Ok(SketchConfig::with_title("glint: quad minimal")),
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
            Quad::new(gl, &source, &["uTime", "uColor", "uMouse"], w as f32 / h as f32)
        },
        |gl, quad, ctx| unsafe {
            quad.set_uniform(gl, "uColor", UniformValue::Vec3([0.0, 0.0, 1.0]))?;
            quad.set_uniform(gl, "uTime", UniformValue::Scalar(ctx.time))?;
            quad.set_uniform(gl, "uMouse", UniformValue::Vec2(ctx.pointer))?;
            #[rustfmt::skip]
            let corners = [
                -0.5,  0.5, 0.0,
                -0.5, -0.5, 0.0,
                 0.5, -0.5, 0.0,
                 0.5,  0.5, 0.0,
            ];
            quad.set_positions(gl, &corners)?;
            Ok(LoopControl::Continue)
        },
    )
}
