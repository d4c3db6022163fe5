use anyhow::{Context, Result};

use cardioid_engine::camera::Camera;
use cardioid_engine::coords::Viewport;
use cardioid_engine::core::{App, AppControl, FrameCtx};
use cardioid_engine::device::GpuInit;
use cardioid_engine::input::InputEvent;
use cardioid_engine::logging;
use cardioid_engine::render::{DetailRamp, FractalRenderer, FRAGMENT_SOURCE, VERTEX_SOURCE};
use cardioid_engine::shader::FractalProgram;
use cardioid_engine::window::{Runtime, RuntimeConfig};

/// The classic framing: the whole set centered with breathing room.
const HOME_CENTER: (f64, f64) = (-0.5, 0.0);
const HOME_SPAN: f64 = 3.0;

/// Iteration budget at rest; the ramp trades it away while zooming.
const BASE_ITERATIONS: f32 = 512.0;

struct Viewer {
    /// Held until a device exists, then consumed to build the renderer.
    program: Option<FractalProgram>,
    renderer: Option<FractalRenderer>,
    camera: Option<Camera>,
    viewport: Viewport,
    ramp: DetailRamp,
}

impl Viewer {
    fn new(program: FractalProgram) -> Self {
        Self {
            program: Some(program),
            renderer: None,
            camera: None,
            viewport: Viewport::default(),
            ramp: DetailRamp::new(BASE_ITERATIONS),
        }
    }
}

impl App for Viewer {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.renderer.is_none() {
            if let Some(program) = self.program.take() {
                self.renderer = Some(FractalRenderer::new(
                    ctx.gpu.device(),
                    ctx.gpu.surface_format(),
                    &program,
                ));
            }
        }

        // Before the first resize record arrives, adopt the surface size.
        if !self.viewport.is_valid() {
            self.viewport = ctx.viewport;
        }

        if self.camera.is_none() && self.viewport.is_valid() {
            match Camera::new(self.viewport, HOME_CENTER, HOME_SPAN) {
                Ok(camera) => self.camera = Some(camera),
                Err(e) => {
                    log::error!("camera initialization failed: {e}");
                    return AppControl::Exit;
                }
            }
        }

        // Drain the queue once, in arrival order: anchor-preserving zoom is
        // not commutative with pan, so events are never reordered.
        let mut zoomed = false;
        let events: Vec<InputEvent> = ctx.input.drain().collect();
        for event in events {
            match event {
                InputEvent::Resize(resize) => {
                    self.viewport = Viewport::new(resize.width, resize.height);
                }
                InputEvent::PanZoom(pan_zoom) => {
                    if let Some(camera) = &mut self.camera {
                        camera.apply_pan_zoom(&pan_zoom, self.viewport);
                        zoomed |= pan_zoom.dz != 0.0;
                    }
                }
            }
        }

        if zoomed {
            self.ramp.note_zoom();
        }
        let ramp_active = self.ramp.tick(ctx.time.dt);

        let (Some(camera), Some(renderer)) = (&self.camera, &mut self.renderer) else {
            return AppControl::Continue;
        };

        renderer.set_camera(camera.uniform_matrix());
        renderer.set_max_iterations(self.ramp.budget());

        let control = ctx.render(|queue, encoder, view, viewport| {
            renderer.render(queue, encoder, view, viewport);
        });

        if ramp_active {
            ctx.runtime.request_redraw();
        }

        control
    }
}

fn main() -> Result<()> {
    logging::init_logging(None);

    // Shader failures are fatal before any window exists; the compiler
    // diagnostic rides along in the error chain.
    let program = FractalProgram::compile_and_link(VERTEX_SOURCE, FRAGMENT_SOURCE)
        .context("fractal shader program failed to build")?;

    log::info!("starting cardioid viewer");

    Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        Viewer::new(program),
    )
}
