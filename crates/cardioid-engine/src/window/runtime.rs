use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{InputEvent, InputQueue, PanZoomEvent, ResizeEvent};
use crate::time::FrameClock;

/// One wheel "line" in device-pixel-equivalent zoom units.
const WHEEL_LINE_PIXELS: f64 = 40.0;

/// Pinch gesture scale fraction → device-pixel-equivalent zoom units.
const PINCH_GESTURE_PIXELS: f64 = 600.0;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cardioid".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Schedules another frame right after this one — the hook the detail
    /// ramp uses while it is recovering.
    pub fn request_redraw(&mut self) {
        self.commands.push(Command::RequestRedraw);
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    RequestRedraw,
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// Pointer tracking for gesture translation.
///
/// Positions are device pixels (winit delivers `CursorMoved` in physical
/// coordinates); nothing here is ever converted to logical pixels.
#[derive(Debug, Default)]
struct PointerState {
    position: Option<(f64, f64)>,
    dragging: bool,
}

#[self_referencing]
struct WindowEntry {
    queue: InputQueue,
    pointer: PointerState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryBuilder {
            queue: InputQueue::new(),
            pointer: PointerState::default(),
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).expect("GPU initialization failed")
            },
        }
        .build();

        self.entry = Some(entry);
        Ok(())
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::RequestRedraw => {
                    if let Some(entry) = &self.entry {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            event_loop.exit();
            return;
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Event-driven rendering: idle means no frame callbacks at all.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.entry = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.with_mut(|fields| {
                    fields.gpu.resize(*new_size);
                    fields.queue.push(InputEvent::Resize(ResizeEvent {
                        width: new_size.width,
                        height: new_size.height,
                    }));
                });
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_mut(|fields| {
                    fields.gpu.resize(new_size);
                    fields.queue.push(InputEvent::Resize(ResizeEvent {
                        width: new_size.width,
                        height: new_size.height,
                    }));
                });
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let mut queued = false;
                entry.with_mut(|fields| {
                    let (x, y) = (position.x, position.y);
                    if fields.pointer.dragging {
                        if let Some((px, py)) = fields.pointer.position {
                            fields.queue.push(InputEvent::PanZoom(PanZoomEvent {
                                dx: x - px,
                                dy: y - py,
                                dz: 0.0,
                                x,
                                y,
                            }));
                            queued = true;
                        }
                    }
                    fields.pointer.position = Some((x, y));
                });
                if queued {
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                entry.with_pointer_mut(|pointer| {
                    pointer.dragging = *state == ElementState::Pressed;
                });
            }

            WindowEvent::CursorLeft { .. } => {
                entry.with_pointer_mut(|pointer| {
                    pointer.dragging = false;
                    pointer.position = None;
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                entry.with_mut(|fields| {
                    // Wheel-up zooms in: a positive scroll shrinks the world
                    // span, so the zoom magnitude is negated here.
                    let dz = match delta {
                        MouseScrollDelta::LineDelta(_, y) => -f64::from(*y) * WHEEL_LINE_PIXELS,
                        MouseScrollDelta::PixelDelta(p) => -p.y,
                    };
                    let (x, y) = anchor_or_center(fields.pointer.position, fields.gpu);
                    fields
                        .queue
                        .push(InputEvent::PanZoom(PanZoomEvent {
                            dx: 0.0,
                            dy: 0.0,
                            dz,
                            x,
                            y,
                        }));
                });
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::PinchGesture { delta, .. } => {
                entry.with_mut(|fields| {
                    let dz = -delta * PINCH_GESTURE_PIXELS;
                    let (x, y) = anchor_or_center(fields.pointer.position, fields.gpu);
                    fields
                        .queue
                        .push(InputEvent::PanZoom(PanZoomEvent {
                            dx: 0.0,
                            dy: 0.0,
                            dz,
                            x,
                            y,
                        }));
                });
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut app_control = AppControl::Continue;

                // Split borrows so the app is callable inside the ouroboros
                // closure without capturing `self`.
                let app = &mut self.app;

                entry.with_mut(|fields| {
                    let time = fields.clock.tick();
                    let viewport = Viewport::from(fields.gpu.size());

                    let mut ctx = FrameCtx {
                        window: fields.window,
                        gpu: fields.gpu,
                        input: fields.queue,
                        viewport,
                        time,
                        runtime: &mut runtime_ctx,
                    };

                    app_control = app.on_frame(&mut ctx);
                });

                if app_control == AppControl::Exit {
                    runtime_ctx.exit();
                }

                self.apply_commands(event_loop, runtime_ctx);
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

/// Zoom anchor: the tracked cursor position, or the viewport center before
/// the cursor has entered the window.
fn anchor_or_center(position: Option<(f64, f64)>, gpu: &Gpu<'_>) -> (f64, f64) {
    position.unwrap_or_else(|| {
        let size = gpu.size();
        (f64::from(size.width) * 0.5, f64::from(size.height) * 0.5)
    })
}
