use super::ctx::FrameCtx;

/// Control directive returned by the per-frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the viewer.
pub trait App {
    /// Called once per rendered frame, after input has been queued and
    /// before anything is presented. The app drains the queue, applies the
    /// events in arrival order, and issues its render through the context.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
