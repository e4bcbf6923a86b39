use anyhow::{Context, ensure};
use checkerlogo_render::{DebugTextRenderer, Renderer, SnapshotRenderer};
use checkerlogo_scene::animation::{BOB_AMPLITUDE, BOB_FREQUENCY, ROTATION_STEP};
use checkerlogo_scene::{CellColor, Scene};
use checkerlogo_surface::headless::{HeadlessSurface, HeadlessTarget};
use checkerlogo_surface::{
    AnimatedRenderSurface, Clock, FrameQueue, LOGO_SIZE, ManualClock, MountTarget,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "checkerlogo-cli", about = "Headless tools for the checkerboard logo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the fixed scene constants
    Info,
    /// Mount the logo headlessly and run frames on a manual clock
    Simulate {
        /// Number of frames to run after the first one
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Clock advance per frame, in milliseconds
        #[arg(short, long, default_value = "16.667")]
        interval_ms: f64,
        /// Print one JSON snapshot per frame instead of a text summary
        #[arg(long)]
        json: bool,
        /// List every cell in the text summary
        #[arg(long)]
        cells: bool,
    },
    /// Run the mount/frame/teardown lifecycle and verify its guarantees
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => info(),
        Commands::Simulate {
            frames,
            interval_ms,
            json,
            cells,
        } => {
            if json {
                simulate::<SnapshotRenderer>(frames, interval_ms, |snapshot| {
                    let line = serde_json::to_string(snapshot).context("encode snapshot")?;
                    println!("{line}");
                    Ok(())
                })?;
            } else {
                let scene = simulate::<DebugTextRenderer>(frames, interval_ms, |_| Ok(()))?;
                let renderer = DebugTextRenderer { verbose: cells };
                print!("{}", renderer.render(&scene));
            }
        }
        Commands::Check => check()?,
    }

    Ok(())
}

fn info() {
    let scene = Scene::new();
    let board = scene.board();
    let camera = scene.camera();
    println!("checkerlogo-cli v{}", env!("CARGO_PKG_VERSION"));
    println!("render: {}", checkerlogo_render::crate_info());
    println!("surface: {}", checkerlogo_surface::crate_info());
    println!("surface size: {}x{}", LOGO_SIZE.width, LOGO_SIZE.height);
    println!(
        "board: {} cells ({} white, {} black), cell {}x{}x{}",
        board.cell_count(),
        board.count_color(CellColor::White),
        board.count_color(CellColor::Black),
        board.shape().width,
        board.shape().height,
        board.shape().depth
    );
    println!(
        "camera: fov={} near={} far={} eye=({}, {}, {})",
        camera.fov_degrees,
        camera.near,
        camera.far,
        camera.position.x,
        camera.position.y,
        camera.position.z
    );
    println!(
        "motion: rotation {ROTATION_STEP} rad/frame, bob {BOB_AMPLITUDE} * sin(t_ms * {BOB_FREQUENCY})"
    );
}

/// Mount on a headless target, run `frames` frames, tear down, and return
/// the final scene. `on_output` sees each rendered frame.
fn simulate<R>(
    frames: u64,
    interval_ms: f64,
    mut on_output: impl FnMut(&R::Output) -> anyhow::Result<()>,
) -> anyhow::Result<Scene>
where
    R: Renderer + Default,
{
    ensure!(
        interval_ms.is_finite() && interval_ms >= 0.0,
        "interval must be a finite, non-negative number of milliseconds"
    );

    let mut target = HeadlessTarget::<R>::new();
    let mut queue = FrameQueue::new();
    let clock = ManualClock::new(0.0);

    let mut logo = AnimatedRenderSurface::mount(Some(&mut target), &mut queue, &clock);
    ensure!(logo.is_running(), "headless mount failed");
    emit(&logo, &mut on_output)?;

    for _ in 0..frames {
        clock.advance(interval_ms);
        for request in queue.take_due() {
            if logo.on_frame(request, clock.now_millis(), &mut queue) {
                emit(&logo, &mut on_output)?;
            }
        }
    }

    let scene = logo.scene().clone();
    logo.unmount(Some(&mut target), &mut queue);
    tracing::debug!(frames = scene.frame(), "simulation finished");
    Ok(scene)
}

fn emit<R: Renderer>(
    logo: &AnimatedRenderSurface<HeadlessSurface<R>>,
    on_output: &mut impl FnMut(&R::Output) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    match logo.surface().and_then(|s| s.last_output()) {
        Some(output) => on_output(output),
        None => Ok(()),
    }
}

fn check() -> anyhow::Result<()> {
    let mut target = HeadlessTarget::<DebugTextRenderer>::new();
    let mut queue = FrameQueue::new();
    let clock = ManualClock::new(0.0);

    let mut logo = AnimatedRenderSurface::mount(Some(&mut target), &mut queue, &clock);
    ensure!(logo.is_running(), "mount did not start the loop");
    ensure!(target.surface_count() == 1, "mount must attach exactly one surface");
    println!("ok: mount attaches one surface");

    let board = logo.scene().board();
    ensure!(
        board.count_color(CellColor::White) == 8 && board.count_color(CellColor::Black) == 8,
        "board must split 8/8"
    );
    println!("ok: 16 cells, 8 white / 8 black");

    let mut previous = board.rotation_y();
    for _ in 0..120 {
        clock.advance(16.0);
        for request in queue.take_due() {
            logo.on_frame(request, clock.now_millis(), &mut queue);
        }
        let board = logo.scene().board();
        ensure!(
            (board.rotation_y() - previous - ROTATION_STEP).abs() < 1e-4,
            "rotation must advance by {ROTATION_STEP} per frame"
        );
        ensure!(
            board.offset_y().abs() <= BOB_AMPLITUDE,
            "offset {} out of bounds",
            board.offset_y()
        );
        ensure!(queue.pending_count() == 1, "exactly one frame must be pending");
        previous = board.rotation_y();
    }
    println!("ok: 120 frames, fixed rotation step, bounded bob");

    let stale = logo.pending_request().context("running logo has no pending frame")?;
    logo.unmount(Some(&mut target), &mut queue);
    logo.unmount(Some(&mut target), &mut queue);
    ensure!(target.surface_count() == 0, "teardown must detach the surface");
    ensure!(target.removed_count() == 1, "teardown must detach exactly once");
    println!("ok: teardown twice detaches once");

    let frames = logo.frames();
    ensure!(!logo.on_frame(stale, clock.now_millis(), &mut queue), "stale frame ran");
    ensure!(logo.frames() == frames && queue.pending_count() == 0, "loop kept running");
    println!("ok: no frames after teardown");

    let mut inert = AnimatedRenderSurface::mount(
        None::<&mut HeadlessTarget<DebugTextRenderer>>,
        &mut queue,
        &clock,
    );
    ensure!(!inert.is_running() && queue.pending_count() == 0, "inert mount scheduled work");
    inert.unmount(None::<&mut HeadlessTarget<DebugTextRenderer>>, &mut queue);
    println!("ok: missing target is a no-op");

    println!("lifecycle check passed");
    Ok(())
}
