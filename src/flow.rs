//! Application event loop.
//!
//! [`run`] opens the window and drives [`Game`] from winit events:
//!
//! 1. `resumed` creates the window, the GPU [`Context`] and the game
//! 2. window and device events are fed into [`Input`]
//! 3. every `RedrawRequested` runs update, draw and resets per-frame input
//! 4. `Resized` reconfigures the surface and calls [`Game::on_resize`]
//!
//! Asynchronous setup (adapter, device, assets) is blocked on with a tokio
//! runtime owned by the [`App`].

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::DemoConfig,
    context::Context,
    game::{Game, UpdateOutcome},
    input::Input,
};

/// How often the frame rate is written to the log.
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(2);

/// Everything that exists once the window is up.
#[derive(Debug)]
struct Running {
    ctx: Context,
    game: Game,
    input: Input,
    start_time: Instant,
    last_time: Instant,
    frames: u32,
    fps_timer: Duration,
}

impl Running {
    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.game.on_resize(&self.ctx);
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.ctx.window.request_redraw();

        let now = Instant::now();
        let dt = now - self.last_time;
        self.last_time = now;
        let total = (now - self.start_time).as_secs_f32();

        if self.game.update(&self.input, dt.as_secs_f32(), total) == UpdateOutcome::Exit {
            log::info!("Exit requested");
            event_loop.exit();
            return;
        }

        match self.game.draw(&self.ctx) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.ctx.window.inner_size();
                self.resize(size.width, size.height);
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
        self.input.end_frame();

        self.frames += 1;
        self.fps_timer += dt;
        if self.fps_timer >= FPS_LOG_INTERVAL {
            let fps = self.frames as f32 / self.fps_timer.as_secs_f32();
            log::debug!("{fps:.1} fps ({:.2} ms/frame)", 1000.0 / fps);
            self.frames = 0;
            self.fps_timer = Duration::ZERO;
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: DemoConfig,
    running: Option<Running>,
}

impl App {
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            config,
            running: None,
        })
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Running> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let config = &self.config;
        let (ctx, game) = self.async_runtime.block_on(async move {
            let ctx = Context::new(window, config).await?;
            let game = Game::initialize(&ctx, config).await?;
            anyhow::Ok((ctx, game))
        })?;
        log::info!("Initialised {}x{} {:?}", ctx.config.width, ctx.config.height, ctx.config.format);

        let now = Instant::now();
        Ok(Running {
            ctx,
            game,
            input: Input::new(),
            start_time: now,
            last_time: now,
            frames: 0,
            fps_timer: Duration::ZERO,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.ctx.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                log::error!("App initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(running) = &mut self.running else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            running.input.handle_mouse_motion(delta.0, delta.1);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };
        running.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => running.resize(size.width, size.height),
            WindowEvent::RedrawRequested => running.frame(event_loop),
            _ => {}
        }
    }
}

/// Opens the demo window and blocks until it is closed.
pub fn run(config: DemoConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };
    log::info!("Starting with {config:?}");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
