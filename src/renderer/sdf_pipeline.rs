//! SDF-based WebGPU render pipeline
//!
//! Renders the whole frame in the fragment shader: each draw command becomes
//! a shape (box or heart) evaluated as a signed distance field.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::scene::{DrawCommand, DrawList, Rgba};

/// Maximum number of shapes per frame (must match shader)
const MAX_SHAPES: usize = 128;

const SHAPE_RECT: u32 = 0;
const SHAPE_HEART: u32 = 1;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],  // offset 0
    canvas_size: [f32; 2], // offset 8
    time: f32,             // offset 16
    shape_count: u32,      // offset 20
    dim: f32,              // offset 24 - game over overlay strength
    _pad: u32,             // offset 28
    clear_color: [f32; 4], // offset 32 (16-byte aligned for WGSL vec4)
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ShapeData {
    /// Rect: x, y, width, height. Heart: center x, center y, size, size.
    rect: [f32; 4],
    color: [f32; 4],
    kind: u32,
    _pad: [u32; 3], // Pad to 48 bytes (uniform array stride)
}

impl ShapeData {
    const EMPTY: Self = Self {
        rect: [0.0; 4],
        color: [0.0; 4],
        kind: SHAPE_RECT,
        _pad: [0; 3],
    };

    fn from_command(command: &DrawCommand) -> Option<Self> {
        match *command {
            DrawCommand::Clear(_) => None,
            DrawCommand::FillRect { rect, color } => Some(Self {
                rect: [rect.min.x, rect.min.y, rect.size.x, rect.size.y],
                color,
                kind: SHAPE_RECT,
                _pad: [0; 3],
            }),
            DrawCommand::Heart {
                center,
                size,
                color,
            } => Some(Self {
                rect: [center.x, center.y, size, size],
                color,
                kind: SHAPE_HEART,
                _pad: [0; 3],
            }),
        }
    }
}

/// Pack a draw list into the fixed-size shape array. Returns the shape count.
fn pack_shapes(list: &DrawList, out: &mut [ShapeData; MAX_SHAPES]) -> u32 {
    let mut count = 0;
    for shape in list.shapes().iter().filter_map(ShapeData::from_command) {
        if count == MAX_SHAPES {
            log::warn!("Draw list exceeds {} shapes; truncating", MAX_SHAPES);
            break;
        }
        out[count] = shape;
        count += 1;
    }
    count as u32
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    shapes_buffer: wgpu::Buffer,
    shapes: Box<[ShapeData; MAX_SHAPES]>,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    canvas_size: [f32; 2],
    start_time: f64,
}

impl SdfRenderState {
    /// `canvas_size` is the game's internal coordinate space, independent of
    /// the surface resolution.
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        canvas_size: [f32; 2],
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        // Colors are authored as sRGB hex values, so write them unconverted
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                canvas_size,
                time: 0.0,
                shape_count: 0,
                dim: 0.0,
                _pad: 0,
                clear_color: super::scene::BACKGROUND_COLOR,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shapes = Box::new([ShapeData::EMPTY; MAX_SHAPES]);
        let shapes_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shapes"),
            contents: bytemuck::cast_slice(shapes.as_slice()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shapes_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            shapes_buffer,
            shapes,
            bind_group,
            size: (width, height),
            canvas_size,
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Upload a draw list and render it. `dim` darkens the frame (0 = none).
    pub fn render(&mut self, list: &DrawList, dim: f32, time: f64) -> Result<(), wgpu::SurfaceError> {
        let elapsed = ((time - self.start_time) / 1000.0) as f32;

        let shape_count = pack_shapes(list, &mut self.shapes);
        let clear_color: Rgba = list.clear_color().unwrap_or(super::scene::BACKGROUND_COLOR);

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            canvas_size: self.canvas_size,
            time: elapsed,
            shape_count,
            dim: dim.clamp(0.0, 1.0),
            _pad: 0,
            clear_color,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue.write_buffer(
            &self.shapes_buffer,
            0,
            bytemuck::cast_slice(&self.shapes[..shape_count as usize]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::scene::RenderSurface;
    use crate::sim::Aabb;
    use glam::Vec2;

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<Globals>(), 48);
        assert_eq!(std::mem::size_of::<ShapeData>(), 48);
    }

    #[test]
    fn test_pack_shapes_skips_clear() {
        let mut list = DrawList::new(Vec2::new(320.0, 480.0));
        list.clear([0.0, 0.0, 0.0, 1.0]);
        list.fill_rect(Aabb::new(Vec2::ZERO, Vec2::splat(10.0)), [1.0; 4]);
        list.heart(Vec2::new(5.0, 5.0), 20.0, [1.0; 4]);

        let mut out = [ShapeData::EMPTY; MAX_SHAPES];
        assert_eq!(pack_shapes(&list, &mut out), 2);
        assert_eq!(out[0].kind, SHAPE_RECT);
        assert_eq!(out[1].kind, SHAPE_HEART);
        assert_eq!(out[1].rect, [5.0, 5.0, 20.0, 20.0]);
    }

    #[test]
    fn test_pack_shapes_truncates() {
        let mut list = DrawList::new(Vec2::new(320.0, 480.0));
        for _ in 0..(MAX_SHAPES + 10) {
            list.heart(Vec2::ZERO, 10.0, [1.0; 4]);
        }
        let mut out = [ShapeData::EMPTY; MAX_SHAPES];
        assert_eq!(pack_shapes(&list, &mut out), MAX_SHAPES as u32);
    }
}
