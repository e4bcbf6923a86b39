mod mount;

use anyhow::Result;
use checkerlogo_render_wgpu::WgpuSurface;
use checkerlogo_surface::{AnimatedRenderSurface, Clock, FrameQueue, LOGO_SIZE, MonotonicClock};
use clap::Parser;
use mount::WindowMount;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(
    name = "checkerlogo-desktop",
    about = "Show the Platform.dev checkerboard logo in a window"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tear down and exit after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

struct LogoApp {
    window: Option<Arc<Window>>,
    mount: Option<WindowMount>,
    logo: Option<AnimatedRenderSurface<WgpuSurface>>,
    scheduler: FrameQueue,
    clock: MonotonicClock,
    max_frames: Option<u64>,
}

impl LogoApp {
    fn new(max_frames: Option<u64>) -> Self {
        Self {
            window: None,
            mount: None,
            logo: None,
            scheduler: FrameQueue::new(),
            clock: MonotonicClock::new(),
            max_frames,
        }
    }

    fn teardown(&mut self) {
        if let Some(logo) = self.logo.as_mut() {
            logo.unmount(self.mount.as_mut(), &mut self.scheduler);
        }
    }

    fn frame_limit_reached(&self) -> bool {
        match (self.max_frames, self.logo.as_ref()) {
            (Some(max), Some(logo)) => logo.frames() >= max,
            _ => false,
        }
    }
}

impl ApplicationHandler for LogoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Platform.dev")
            .with_inner_size(LogicalSize::new(
                f64::from(LOGO_SIZE.width),
                f64::from(LOGO_SIZE.height),
            ))
            .with_resizable(false)
            .with_transparent(true);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // Frame requests become redraw requests on this window.
        let redraw = window.clone();
        self.scheduler = FrameQueue::with_waker(move || redraw.request_redraw());

        let mut mount = WindowMount::new(window.clone());
        let logo = AnimatedRenderSurface::mount(Some(&mut mount), &mut self.scheduler, &self.clock);
        match logo.surface() {
            Some(surface) => tracing::info!(
                backend = surface.backend(),
                sample_count = ?surface.sample_count(),
                "logo mounted"
            ),
            None => tracing::warn!("logo is inert; the window will stay empty"),
        }

        self.window = Some(window);
        self.mount = Some(mount);
        self.logo = Some(logo);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Destroyed => {
                if let Some(mount) = self.mount.as_mut() {
                    mount.close();
                }
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(surface) = self.logo.as_mut().and_then(|l| l.surface_mut()) {
                    surface.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(logo) = self.logo.as_mut() else {
                    return;
                };
                for request in self.scheduler.take_due() {
                    logo.on_frame(request, self.clock.now_millis(), &mut self.scheduler);
                }

                if self.frame_limit_reached() {
                    tracing::info!("frame limit reached");
                    self.teardown();
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("checkerlogo-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = LogoApp::new(cli.frames);
    event_loop.run_app(&mut app)?;

    Ok(())
}
