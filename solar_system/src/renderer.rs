//! Rendering of bodies and their orbit trails

use common::{
    create_uniform_buffer, create_vertex_buffer, GraphicsContext, ScreenTransform, ScreenUniform,
    ScreenVertex,
};
use solar_system::Body;

/// Instance data for one body disc, in pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub color: [f32; 4],
}

impl BodyInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32,
        3 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BodyInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Quad vertex for body discs
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Initial trail buffer size; it grows as the trails do
const INITIAL_TRAIL_VERTICES: usize = 4096;

/// What one frame draws: body instances and one vertex range per trail
pub struct FrameData {
    pub num_instances: u32,
    pub trail_ranges: Vec<(u32, u32)>,
}

pub struct Renderer {
    body_pipeline: wgpu::RenderPipeline,
    trail_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    trail_buffer: wgpu::Buffer,
    trail_capacity: usize,
    max_trail_vertices: usize,
    trails_clipped: bool,
    screen_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    max_instances: usize,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, transform: &ScreenTransform, max_instances: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Orbit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/orbit.wgsl").into()),
        });

        let screen_buffer = create_uniform_buffer(device, &ScreenUniform::from_transform(transform));

        let screen_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Screen Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Bind Group"),
            layout: &screen_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&screen_bind_group_layout],
            push_constant_ranges: &[],
        });

        let color_target = [Some(wgpu::ColorTargetState {
            format: ctx.config.format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let body_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Body Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_body",
                buffers: &[QuadVertex::layout(), BodyInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_body",
                targets: &color_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let trail_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Trail Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_trail",
                buffers: &[ScreenVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_trail",
                targets: &color_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let quad_buffer = create_vertex_buffer(device, QUAD_VERTICES);

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (std::mem::size_of::<BodyInstance>() * max_instances.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let trail_buffer = Self::create_trail_buffer(device, INITIAL_TRAIL_VERTICES);
        let max_trail_vertices =
            (device.limits().max_buffer_size / std::mem::size_of::<ScreenVertex>() as u64) as usize;

        Self {
            body_pipeline,
            trail_pipeline,
            quad_buffer,
            instance_buffer,
            trail_buffer,
            trail_capacity: INITIAL_TRAIL_VERTICES,
            max_trail_vertices,
            trails_clipped: false,
            screen_buffer,
            screen_bind_group,
            max_instances,
        }
    }

    fn create_trail_buffer(device: &wgpu::Device, vertices: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Trail Buffer"),
            size: (std::mem::size_of::<ScreenVertex>() * vertices) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn update_screen(&self, queue: &wgpu::Queue, transform: &ScreenTransform) {
        let uniform = ScreenUniform::from_transform(transform);
        queue.write_buffer(&self.screen_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload this frame's bodies and trails. `colors` are linear RGBA,
    /// in the same order as `bodies`.
    pub fn update_bodies(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        transform: &ScreenTransform,
        bodies: &[Body],
        colors: &[[f32; 4]],
    ) -> FrameData {
        let instances: Vec<BodyInstance> = bodies
            .iter()
            .zip(colors)
            .take(self.max_instances)
            .map(|(body, color)| BodyInstance {
                center: transform.to_screen(body.position),
                radius: body.radius,
                color: *color,
            })
            .collect();

        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let budget = self.max_trail_vertices / bodies.len().max(1);
        if !self.trails_clipped && bodies.iter().any(|b| b.trail().len() > budget) {
            log::warn!("trails exceed the GPU buffer limit; drawing the newest {budget} points per body");
            self.trails_clipped = true;
        }

        let (trail_vertices, trail_ranges) = build_trails(bodies, colors, transform, budget);

        if trail_vertices.len() > self.trail_capacity {
            self.trail_capacity = trail_vertices
                .len()
                .next_power_of_two()
                .min(self.max_trail_vertices);
            self.trail_buffer = Self::create_trail_buffer(device, self.trail_capacity);
            log::debug!("trail buffer grown to {} vertices", self.trail_capacity);
        }
        if !trail_vertices.is_empty() {
            queue.write_buffer(&self.trail_buffer, 0, bytemuck::cast_slice(&trail_vertices));
        }

        FrameData {
            num_instances: instances.len() as u32,
            trail_ranges,
        }
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &FrameData,
        show_trails: bool,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Orbit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.screen_bind_group, &[]);

        if show_trails && !frame.trail_ranges.is_empty() {
            render_pass.set_pipeline(&self.trail_pipeline);
            render_pass.set_vertex_buffer(0, self.trail_buffer.slice(..));

            for (start, count) in &frame.trail_ranges {
                render_pass.draw(*start..(*start + *count), 0..1);
            }
        }

        if frame.num_instances > 0 {
            render_pass.set_pipeline(&self.body_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..frame.num_instances);
        }
    }
}

/// Trail line strips in pixels, packed into one vertex list.
///
/// Trails with fewer than two points are skipped; longer ones keep only their
/// newest `budget` points.
fn build_trails(
    bodies: &[Body],
    colors: &[[f32; 4]],
    transform: &ScreenTransform,
    budget: usize,
) -> (Vec<ScreenVertex>, Vec<(u32, u32)>) {
    let mut vertices = Vec::new();
    let mut ranges = Vec::new();

    for (body, color) in bodies.iter().zip(colors) {
        let trail = body.trail();
        let visible = &trail[trail.len().saturating_sub(budget)..];
        if visible.len() < 2 {
            continue;
        }

        let start = vertices.len() as u32;
        vertices.extend(
            visible
                .iter()
                .map(|point| ScreenVertex::new(transform.to_screen(*point), *color)),
        );
        ranges.push((start, visible.len() as u32));
    }

    (vertices, ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    const WHITE: [f32; 4] = [1.0; 4];

    fn walker(name: &str, steps: usize) -> Body {
        let mut body = Body::new(name, DVec2::ZERO, 1.0)
            .unwrap()
            .with_velocity(DVec2::new(1.0, 0.0));
        for _ in 0..steps {
            body.advance(DVec2::ZERO, 1.0, 1.0);
        }
        body
    }

    #[test]
    fn short_trails_are_skipped() {
        let bodies = [walker("a", 1), walker("b", 3)];
        let transform = ScreenTransform::new(1.0, 100, 100);

        let (vertices, ranges) = build_trails(&bodies, &[WHITE, WHITE], &transform, usize::MAX);

        assert_eq!(ranges, vec![(0, 3)]);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].position, [51.0, 50.0]);
        assert_eq!(vertices[2].position, [53.0, 50.0]);
    }

    #[test]
    fn ranges_are_contiguous() {
        let bodies = [walker("a", 4), walker("b", 2)];
        let transform = ScreenTransform::new(1.0, 0, 0);

        let (vertices, ranges) = build_trails(&bodies, &[WHITE, WHITE], &transform, usize::MAX);

        assert_eq!(ranges, vec![(0, 4), (4, 2)]);
        assert_eq!(vertices.len(), 6);
    }

    #[test]
    fn budget_keeps_newest_points() {
        let bodies = [walker("a", 10)];
        let transform = ScreenTransform::new(1.0, 0, 0);

        let (vertices, ranges) = build_trails(&bodies, &[WHITE], &transform, 3);

        assert_eq!(ranges, vec![(0, 3)]);
        assert_eq!(vertices[0].position, [8.0, 0.0]);
        assert_eq!(vertices[2].position, [10.0, 0.0]);
    }
}
