use std::error::Error;
use std::time::Instant;

use pixels::{PixelsBuilder, SurfaceTexture};
use tracing::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Canvas;
use crate::pixels_renderer::PixelsCanvas;
use crate::schedule::{FrameClock, Tick};
use crate::surface::SurfaceSize;

pub struct AppConfig {
    pub title: String,
    /// Logical canvas size the game draws into.
    pub canvas_size: SurfaceSize,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
    pub frame_hz: f64,
}

pub struct AppContext {
    pub window: Window,
    pub canvas: PixelsCanvas,
}

/// A windowed game driven by [`run_game`].
///
/// Key events arrive between frames; `update` runs once per due frame while the frame clock is
/// running. When `update` returns [`Tick::Halt`] the clock stops and no more frames are scheduled
/// until `handle_key` asks for the loop again.
pub trait GameApp {
    fn init(&mut self, _ctx: &mut AppContext) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    /// Raw key transition. Return [`Tick::Continue`] to (re)start the frame loop.
    fn handle_key(&mut self, key: VirtualKeyCode, state: ElementState) -> Tick;

    fn update(&mut self) -> Tick;

    fn render(&mut self, canvas: &mut dyn Canvas);

    /// Called once when the window is closing.
    fn exit(&mut self) {}
}

pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let desired = PhysicalSize::new(config.canvas_size.width, config.canvas_size.height);
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = match monitor_size {
        Some(monitor) => PhysicalSize::new(
            desired.width.min(monitor.width),
            desired.height.min(monitor.height),
        ),
        None => desired,
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels_builder = PixelsBuilder::new(
        config.canvas_size.width,
        config.canvas_size.height,
        surface_texture,
    );
    if let Some(vsync) = config.vsync {
        pixels_builder = pixels_builder.enable_vsync(vsync);
    }
    let pixels = pixels_builder.build()?;
    let canvas = PixelsCanvas::new(pixels, config.canvas_size)?;

    let mut ctx = AppContext { window, canvas };
    game.init(&mut ctx)?;

    let mut clock = FrameClock::from_hz(config.frame_hz);
    clock.start(Instant::now());
    info!(
        width = config.canvas_size.width,
        height = config.canvas_size.height,
        hz = config.frame_hz,
        "window ready"
    );

    event_loop.run(move |event, _, control_flow| {
        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("window closing");
                    game.exit();
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                WindowEvent::Resized(size) => {
                    let size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.canvas.resize_surface(size) {
                        warn!("resize failed: {err}");
                    }
                    ctx.window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(key),
                            state,
                            ..
                        },
                    ..
                } => {
                    if game.handle_key(*key, *state).is_continue() && !clock.is_running() {
                        debug!("input resumed frame loop");
                        clock.start(Instant::now());
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                if clock.poll(Instant::now()) && !game.update().is_continue() {
                    debug!("game halted frame loop");
                    clock.stop();
                }
                ctx.canvas.draw_frame(|gfx| game.render(gfx));
                if let Err(err) = ctx.canvas.present() {
                    warn!("present failed: {err}");
                }
            }
            Event::MainEventsCleared => {
                if let Some(due) = clock.next_due() {
                    if Instant::now() >= due {
                        ctx.window.request_redraw();
                    }
                }
            }
            _ => {}
        }

        *control_flow = match clock.next_due() {
            Some(due) => ControlFlow::WaitUntil(due),
            None => ControlFlow::Wait,
        };
    });
}
