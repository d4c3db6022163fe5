use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputQueue;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// `viewport` is the drawable size the surface was configured with for this
/// frame; the renderer's GPU viewport call and any pixel-to-world math must
/// read it from here so both always agree.
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a mut InputQueue,
    pub viewport: Viewport,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Acquires a frame, hands `draw` the queue/encoder/target view, and
    /// submits. Skips silently while the viewport is invalid (minimized or
    /// mid-resize) — rendering resumes with the next valid size.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView, Viewport),
    {
        if !self.viewport.is_valid() {
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured => {
                        // The skipped frame still needs to reach the screen.
                        self.runtime.request_redraw();
                        AppControl::Continue
                    }
                    SurfaceErrorAction::SkipFrame => AppControl::Continue,
                };
            }
        };

        draw(
            self.gpu.queue(),
            &mut frame.encoder,
            &frame.view,
            self.viewport,
        );

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
