//! Host glue (policy layer): window + GL context creation and the paced
//! render loop.
//!
//! One parameterized runner replaces per-sketch entry scripts: a sketch is
//! a `setup` that builds its shapes and an `update` called once per frame
//! with a [`FrameCtx`]. The runtime crates stay embed-friendly; everything
//! winit/glutin lives here.

use std::num::NonZeroU32;
use std::time::Instant;

use glow::HasContext;
use winit::event::{Event, StartCause, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use glutin::display::GetGlDisplay;
use glutin::prelude::*;

// raw-window-handle 0.5 traits (matches glutin 0.30)
use raw_window_handle::HasRawWindowHandle;

use glint_core::{SketchConfig, SketchError};
use glint_runtime_glow::{clear_surface, FrameCtx};

pub mod pacing;
pub mod pointer;

pub use pacing::{FramePacer, SketchClock};
pub use pointer::PointerTracker;

/// What the per-frame callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Process exit status when the loop ends because of an error.
const ERROR_EXIT_CODE: i32 = 1;

/// What the loop does with one callback result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameOutcome {
    Continue,
    Stop,
    Fail,
}

fn resolve_frame(result: Result<LoopControl, SketchError>, frame: u64) -> FrameOutcome {
    match result {
        Ok(LoopControl::Continue) => FrameOutcome::Continue,
        Ok(LoopControl::Stop) => FrameOutcome::Stop,
        Err(e) if e.is_recoverable() => {
            log::warn!("frame {frame}: {e} (draw skipped)");
            FrameOutcome::Continue
        }
        Err(e) => {
            log::error!("frame {frame}: {e}");
            FrameOutcome::Fail
        }
    }
}

struct WindowedContext {
    event_loop: EventLoop<()>,
    window: winit::window::Window,
    gl_surface: glutin::surface::Surface<glutin::surface::WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,
    gl: glow::Context,
}

fn create_windowed_context(config: &SketchConfig) -> Result<WindowedContext, SketchError> {
    let event_loop = EventLoop::new();

    let window_builder = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.width as f64,
            config.height as f64,
        ));

    let template = glutin::config::ConfigTemplateBuilder::new()
        .with_alpha_size(8)
        .with_depth_size(24)
        .with_stencil_size(0)
        .with_transparency(false);

    let display_builder =
        glutin_winit::DisplayBuilder::new().with_window_builder(Some(window_builder));

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .unwrap()
        })
        .map_err(|e| SketchError::GlCreate(format!("DisplayBuilder.build: {e}")))?;

    let window = window
        .ok_or_else(|| SketchError::GlCreate("DisplayBuilder did not create a window".into()))?;
    let gl_display = gl_config.display();

    let raw_window_handle = window.raw_window_handle();

    let context_attributes = glutin::context::ContextAttributesBuilder::new()
        .with_profile(glutin::context::GlProfile::Core)
        .build(Some(raw_window_handle));

    let fallback_context_attributes = glutin::context::ContextAttributesBuilder::new()
        .with_profile(glutin::context::GlProfile::Core)
        .build(None);

    let not_current_gl_context = unsafe {
        gl_display
            .create_context(&gl_config, &context_attributes)
            .or_else(|_| gl_display.create_context(&gl_config, &fallback_context_attributes))
            .map_err(|e| SketchError::GlCreate(format!("create_context: {e}")))?
    };

    let (width, height) = {
        let s = window.inner_size();
        (s.width.max(1), s.height.max(1))
    };

    let attrs = glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new()
        .build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        );

    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &attrs)
            .map_err(|e| SketchError::GlCreate(format!("create_window_surface: {e}")))?
    };

    let gl_context = not_current_gl_context
        .make_current(&gl_surface)
        .map_err(|e| SketchError::GlCreate(format!("make_current: {e}")))?;

    let gl = unsafe {
        glow::Context::from_loader_function(|s| {
            gl_display.get_proc_address(std::ffi::CString::new(s).unwrap().as_c_str()) as *const _
        })
    };

    Ok(WindowedContext {
        event_loop,
        window,
        gl_surface,
        gl_context,
        gl,
    })
}

/// Open a window, build the sketch, and redraw at the configured rate.
///
/// `setup` runs once with the live GL context and the drawable size;
/// `update` runs once per frame tick and can stop the loop by returning
/// [`LoopControl::Stop`]. Recoverable per-frame errors (unknown binding,
/// bad geometry, bad arity) are logged and the loop keeps running; anything
/// else ends the sketch.
pub fn run_sketch<S, F, U>(config: SketchConfig, setup: F, mut update: U) -> Result<(), SketchError>
where
    S: 'static,
    F: FnOnce(&glow::Context, i32, i32) -> Result<S, SketchError>,
    U: FnMut(&glow::Context, &mut S, &FrameCtx) -> Result<LoopControl, SketchError> + 'static,
{
    config
        .validate()
        .map_err(|msg| SketchError::InvalidConfig {
            path: "<inline>".into(),
            msg,
        })?;

    let WindowedContext {
        event_loop,
        window,
        gl_surface,
        gl_context,
        gl,
    } = create_windowed_context(&config)?;

    let (mut width, mut height) = {
        let s = window.inner_size();
        (s.width.max(1), s.height.max(1))
    };

    let mut state = setup(&gl, width as i32, height as i32)?;
    log::info!(
        "sketch '{}' running at {}x{} / {} fps",
        config.title,
        width,
        height,
        config.fps
    );

    let mut pacer = FramePacer::new(config.fps);
    let clock = SketchClock::start();
    let mut tracker = PointerTracker::new(config.pointer_units, width, height);
    let clear_color = config.clear_color;
    let mut frame: u64 = 0;

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                WindowEvent::CursorMoved { position, .. } => {
                    tracker.update(position.x, position.y);
                }

                WindowEvent::Resized(physical_size) => {
                    width = physical_size.width.max(1);
                    height = physical_size.height.max(1);

                    gl_surface.resize(
                        &gl_context,
                        NonZeroU32::new(width).unwrap(),
                        NonZeroU32::new(height).unwrap(),
                    );
                    tracker.set_window_size(width, height);
                    window.request_redraw();
                }

                _ => {}
            },

            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                window.request_redraw();
            }

            Event::MainEventsCleared => {
                let now = Instant::now();
                if pacer.frame_due(now) {
                    window.request_redraw();
                } else if let Some(deadline) = pacer.next_deadline() {
                    *control_flow = ControlFlow::WaitUntil(deadline);
                }
            }

            Event::RedrawRequested(_) => {
                // Redraws we did not schedule (resize drags, OS expose
                // events) must not run the callback early.
                let deadline = match pacer.try_admit(Instant::now()) {
                    Some(deadline) => deadline,
                    None => {
                        if let Some(pending) = pacer.next_deadline() {
                            *control_flow = ControlFlow::WaitUntil(pending);
                        }
                        return;
                    }
                };

                unsafe {
                    gl.viewport(0, 0, width as i32, height as i32);
                    clear_surface(&gl, clear_color);
                }

                let ctx = FrameCtx {
                    width: width as i32,
                    height: height as i32,
                    time: clock.elapsed_secs(),
                    pointer: tracker.sample(),
                    frame,
                };
                frame += 1;

                match resolve_frame(update(&gl, &mut state, &ctx), ctx.frame) {
                    FrameOutcome::Continue => {}
                    FrameOutcome::Stop => {
                        log::info!("sketch stopped after {frame} frames");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    FrameOutcome::Fail => {
                        *control_flow = ControlFlow::ExitWithCode(ERROR_EXIT_CODE);
                        return;
                    }
                }

                if let Err(e) = gl_surface.swap_buffers(&gl_context) {
                    log::error!("swap_buffers: {e}");
                    *control_flow = ControlFlow::ExitWithCode(ERROR_EXIT_CODE);
                    return;
                }

                *control_flow = ControlFlow::WaitUntil(deadline);
            }

            _ => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_frame_errors_end_the_loop_with_a_failure() {
        // A sketch that dies must be distinguishable from one that
        // returned Stop; Fail maps to a non-zero process exit.
        let err = SketchError::Link("program failed to link".into());
        assert_eq!(resolve_frame(Err(err), 0), FrameOutcome::Fail);
        assert_ne!(ERROR_EXIT_CODE, 0);
    }

    #[test]
    fn recoverable_frame_errors_keep_the_loop_running() {
        let err = SketchError::BindingNotFound {
            name: "uMissing".into(),
        };
        assert_eq!(resolve_frame(Err(err), 3), FrameOutcome::Continue);
    }

    #[test]
    fn callback_results_map_straight_through() {
        assert_eq!(
            resolve_frame(Ok(LoopControl::Continue), 0),
            FrameOutcome::Continue
        );
        assert_eq!(resolve_frame(Ok(LoopControl::Stop), 0), FrameOutcome::Stop);
    }
}
