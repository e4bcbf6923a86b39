use crate::gpu::{BoardRenderer, pick_sample_count};
use checkerlogo_scene::{BoxShape, Scene};
use checkerlogo_surface::{DrawingSurface, SurfaceError};

/// Everything that lives on the GPU for one drawing surface.
struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: BoardRenderer,
}

/// A wgpu-backed drawing surface with its own device and queue.
///
/// The context is exclusive to this surface and released by
/// [`DrawingSurface::dispose`]; rendering afterwards reports
/// [`SurfaceError::Disposed`].
pub struct WgpuSurface {
    gpu: Option<GpuContext>,
    backend: String,
}

impl WgpuSurface {
    /// Acquire a graphics context for `target` and configure it at
    /// `width`×`height` physical pixels.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, SurfaceError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| SurfaceError::ContextUnavailable(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| SurfaceError::ContextUnavailable("no compatible adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("checkerlogo_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
            },
            None,
        ))
        .map_err(|e| SurfaceError::ContextUnavailable(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or_else(|| SurfaceError::ContextUnavailable("surface has no formats".into()))?;
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|m| caps.alpha_modes.contains(m))
        .or(caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let features = adapter.get_texture_format_features(format);
        let sample_count = pick_sample_count(|count| features.flags.sample_count_supported(count));
        let renderer = BoardRenderer::new(
            &device,
            &BoxShape::CELL,
            format,
            sample_count,
            config.width,
            config.height,
        );

        let backend = adapter.get_info().backend.to_str().to_string();
        tracing::info!(
            backend = %backend,
            format = ?format,
            alpha = ?alpha_mode,
            sample_count,
            "GPU context acquired"
        );

        Ok(Self {
            gpu: Some(GpuContext {
                surface,
                device,
                queue,
                config,
                renderer,
            }),
            backend,
        })
    }

    /// Name of the graphics API backing this surface.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn sample_count(&self) -> Option<u32> {
        self.gpu.as_ref().map(|gpu| gpu.renderer.sample_count())
    }

    /// Reconfigure for a new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.config.width = width.max(1);
        gpu.config.height = height.max(1);
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.renderer
            .resize(&gpu.device, gpu.config.width, gpu.config.height);
    }
}

impl DrawingSurface for WgpuSurface {
    fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        let Some(gpu) = self.gpu.as_ref() else {
            return Err(SurfaceError::Disposed);
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Err(SurfaceError::Lost);
            }
            Err(wgpu::SurfaceError::Timeout) => return Err(SurfaceError::Lost),
            Err(e) => return Err(SurfaceError::Render(e.to_string())),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        gpu.renderer.render(&gpu.device, &gpu.queue, &view, scene);
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        let GpuContext {
            surface,
            device,
            queue,
            renderer,
            ..
        } = gpu;
        renderer.destroy();
        drop(surface);
        drop(queue);
        device.destroy();
        tracing::info!(backend = %self.backend, "GPU context released");
    }

    fn is_disposed(&self) -> bool {
        self.gpu.is_none()
    }
}

impl Drop for WgpuSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}
