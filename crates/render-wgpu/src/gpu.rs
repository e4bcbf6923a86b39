use crate::shaders;
use bytemuck::{Pod, Zeroable};
use checkerlogo_common::Color;
use checkerlogo_scene::{BoxShape, CELL_COUNT, Scene};
use glam::Vec3;
use wgpu::util::DeviceExt;

/// Phong shininess of the cell material.
pub const SHININESS: f32 = 100.0;

/// Specular tint of the cell material.
const SPECULAR: Color = Color::from_hex(0x111111);

/// MSAA level requested when the adapter supports it.
pub const PREFERRED_SAMPLE_COUNT: u32 = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
    material: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

fn linear_rgba(color: Color, scale: f32) -> [f32; 4] {
    let [r, g, b] = color.to_linear_f32();
    [r * scale, g * scale, b * scale, 1.0]
}

/// Generate box vertices and indices for the given half extents.
fn box_mesh(half: Vec3) -> (Vec<Vertex>, Vec<u16>) {
    let (x, y, z) = (half.x, half.y, half.z);
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-x, -y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ x, -y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ x,  y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-x,  y,  z], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ x, -y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-x, -y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-x,  y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ x,  y, -z], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ x, -y,  z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x, -y, -z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x,  y, -z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x,  y,  z], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-x, -y, -z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x, -y,  z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x,  y,  z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x,  y, -z], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-x,  y,  z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ x,  y,  z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ x,  y, -z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-x,  y, -z], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-x, -y, -z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ x, -y, -z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ x, -y,  z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-x, -y,  z], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Per-cell instance data for the current board pose.
fn board_instances(scene: &Scene) -> Vec<InstanceData> {
    scene
        .board()
        .cell_matrices()
        .map(|(cell, model)| {
            let cols = model.to_cols_array_2d();
            InstanceData {
                model_0: cols[0],
                model_1: cols[1],
                model_2: cols[2],
                model_3: cols[3],
                color: linear_rgba(cell.color.color(), 1.0),
            }
        })
        .collect()
}

fn scene_uniforms(scene: &Scene) -> Uniforms {
    let camera = scene.camera();
    let sun = scene.directional_light();
    let ambient = scene.ambient_light();
    let [sr, sg, sb] = SPECULAR.to_linear_f32();
    Uniforms {
        view_proj: camera.view_projection().to_cols_array_2d(),
        eye: camera.position.extend(1.0).to_array(),
        light_dir: sun.direction_to_light().extend(0.0).to_array(),
        light_color: linear_rgba(sun.color, sun.intensity),
        ambient: linear_rgba(ambient.color, ambient.intensity),
        material: [SHININESS, sr, sg, sb],
    }
}

/// Highest supported sample count not above the preferred one.
pub fn pick_sample_count(supported: impl Fn(u32) -> bool) -> u32 {
    [PREFERRED_SAMPLE_COUNT, 2]
        .into_iter()
        .find(|&count| supported(count))
        .unwrap_or(1)
}

/// GPU-resident resources for drawing the board.
///
/// Everything here is owned by one drawing surface and released in
/// [`BoardRenderer::destroy`].
pub struct BoardRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,
}

impl BoardRenderer {
    pub fn new(
        device: &wgpu::Device,
        shape: &BoxShape,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("logo_uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("logo_uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("logo_uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("logo_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("logo_board_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BOARD_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("logo_board_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        // One shared box mesh for every cell.
        let (verts, indices) = box_mesh(shape.half_extents());
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("logo_cell_vertex_buffer"),
            contents: bytemuck::cast_slice(&verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("logo_cell_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let index_count = indices.len() as u32;

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("logo_instance_buffer"),
            size: (CELL_COUNT * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (depth_texture, depth_view) = Self::create_target(
            device,
            wgpu::TextureFormat::Depth32Float,
            sample_count,
            width,
            height,
        );
        let msaa = (sample_count > 1)
            .then(|| Self::create_target(device, surface_format, sample_count, width, height));

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            index_buffer,
            index_count,
            instance_buffer,
            depth_texture,
            depth_view,
            msaa,
            surface_format,
            sample_count,
        }
    }

    /// Recreate the size-dependent attachments.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (depth_texture, depth_view) = Self::create_target(
            device,
            wgpu::TextureFormat::Depth32Float,
            self.sample_count,
            width,
            height,
        );
        self.depth_texture.destroy();
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;

        if let Some((old, _)) = self.msaa.take() {
            old.destroy();
            self.msaa = Some(Self::create_target(
                device,
                self.surface_format,
                self.sample_count,
                width,
                height,
            ));
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Render one frame of the board into `view`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&scene_uniforms(scene)),
        );

        let instances = board_instances(scene);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("logo_render_encoder"),
        });

        let (color_view, resolve_target) = match &self.msaa {
            Some((_, msaa_view)) => (msaa_view, Some(view)),
            None => (view, None),
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("logo_main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.index_count, 0, 0..instances.len() as u32);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Free every buffer and texture now rather than when the device goes away.
    pub fn destroy(self) {
        self.uniform_buffer.destroy();
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.instance_buffer.destroy();
        self.depth_texture.destroy();
        if let Some((texture, _)) = &self.msaa {
            texture.destroy();
        }
        tracing::debug!("board renderer GPU resources destroyed");
    }

    fn create_target(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("logo_render_target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        (texture, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn box_mesh_matches_cell_shape() {
        let (verts, indices) = box_mesh(BoxShape::CELL.half_extents());
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        for v in &verts {
            assert_eq!(v.position[0].abs(), 0.5);
            assert_eq!(v.position[1].abs(), 0.05);
            assert_eq!(v.position[2].abs(), 0.5);
        }
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn box_faces_wind_outward() {
        let (verts, indices) = box_mesh(Vec3::new(0.5, 0.05, 0.5));
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(verts[i as usize].position));
            let face_normal = (b - a).cross(c - a).normalize();
            let normal = Vec3::from(verts[tri[0] as usize].normal);
            assert!(face_normal.dot(normal) > 0.99, "{face_normal} vs {normal}");
        }
    }

    #[test]
    fn instances_cover_board_with_colors() {
        let scene = Scene::new();
        let instances = board_instances(&scene);
        assert_eq!(instances.len(), CELL_COUNT);
        let white = instances.iter().filter(|i| i.color[0] > 0.5).count();
        assert_eq!(white, 8);
        // First cell sits at lattice corner (-1.5, 0, -1.5).
        assert_eq!(instances[0].model_3, [-1.5, 0.0, -1.5, 1.0]);
    }

    #[test]
    fn uniforms_carry_lights_and_material() {
        let scene = Scene::new();
        let u = scene_uniforms(&scene);
        assert_eq!(u.eye, [3.0, 4.0, 5.0, 1.0]);
        assert_eq!(u.material[0], SHININESS);
        assert!(u.light_color.iter().all(|c| (c - 1.0).abs() < 1e-6));
        assert!(u.ambient[0] > 0.0 && u.ambient[0] < 0.1);
        let dir = Vec3::new(u.light_dir[0], u.light_dir[1], u.light_dir[2]);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(Mat4::from_cols_array_2d(&u.view_proj), scene.camera().view_projection());
    }

    #[test]
    fn sample_count_falls_back() {
        assert_eq!(pick_sample_count(|_| true), 4);
        assert_eq!(pick_sample_count(|c| c == 2), 2);
        assert_eq!(pick_sample_count(|_| false), 1);
    }
}
