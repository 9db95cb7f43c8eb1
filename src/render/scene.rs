//! Scene pass: draws a [`RenderList`] into the HDR target.
//!
//! Items are grouped by draw kind and primitive into one instance buffer per
//! frame; line strips are flattened into segment pairs carrying the distance
//! along the strip for dashing.

use super::helpers::{DynamicBuffer, DEPTH_FORMAT};
use super::meshes::{MeshLibrary, Vertex};
use crate::core::camera::OrbitCamera;
use crate::core::scene::{Primitive, RenderItem, RenderList, Shading, Starfield};
use std::ops::Range;
use std::rc::Rc;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light: [f32; 4],
    ambient: [f32; 4],
    fog_color: [f32; 4],
    fog_range: [f32; 4],
    misc: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
        6 => Float32x4, 7 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    fn from_item(item: &RenderItem) -> Self {
        let m = &item.material;
        Self {
            model: item.model.to_cols_array_2d(),
            color: [m.color[0], m.color[1], m.color[2], m.opacity],
            params: [m.emissive, shading_code(m.shading), 0.0, 0.0],
        }
    }
}

fn shading_code(shading: Shading) -> f32 {
    match shading {
        Shading::Lit => 0.0,
        Shading::Unlit => 1.0,
        Shading::Wireframe => 2.0,
        Shading::Glow => 3.0,
        Shading::Soft => 4.0,
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct LineVertex {
    pos: [f32; 3],
    distance: f32,
    color: [f32; 4],
    dash: [f32; 4],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, 1 => Float32, 2 => Float32x4, 3 => Float32x4
    ];
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct StarVertex {
    pos: [f32; 3],
    brightness: f32,
}

impl StarVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];
}

/// Draw order within the pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DrawKind {
    Opaque,
    Wire,
    Translucent,
    Additive,
}

fn draw_kind(item: &RenderItem) -> DrawKind {
    match item.material.shading {
        Shading::Wireframe => DrawKind::Wire,
        Shading::Glow => DrawKind::Additive,
        _ if item.material.is_translucent() => DrawKind::Translucent,
        _ => DrawKind::Opaque,
    }
}

struct Batch {
    kind: DrawKind,
    primitive: Primitive,
    instances: Range<u32>,
}

struct StarBuffer {
    source: Rc<Starfield>,
    buffer: wgpu::Buffer,
    count: u32,
}

pub(crate) struct ScenePass {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    opaque_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    additive_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    meshes: MeshLibrary,
    instance_buffer: DynamicBuffer,
    line_buffer: DynamicBuffer,
    stars: Option<StarBuffer>,
    // Per-frame scratch, kept to avoid reallocating
    order: Vec<usize>,
    instances: Vec<InstanceRaw>,
    batches: Vec<Batch>,
    line_vertices: Vec<LineVertex>,
}

struct PipelineDesc<'a> {
    label: &'a str,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

fn make_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vs),
            buffers: desc.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

impl ScenePass {
    pub(crate) fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let mesh_buffers = [Vertex::layout(), InstanceRaw::layout()];
        let line_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &LineVertex::ATTRIBS,
        }];
        let star_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &StarVertex::ATTRIBS,
        }];
        let mesh = |label: &'static str,
                    topology: wgpu::PrimitiveTopology,
                    blend: wgpu::BlendState,
                    depth_write: bool| PipelineDesc {
            label,
            vs: "vs_mesh",
            fs: "fs_mesh",
            buffers: &mesh_buffers,
            topology,
            blend,
            depth_write,
            depth_compare: wgpu::CompareFunction::Less,
        };
        let opaque_pipeline = make_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            mesh(
                "mesh_opaque",
                wgpu::PrimitiveTopology::TriangleList,
                wgpu::BlendState::REPLACE,
                true,
            ),
        );
        let wire_pipeline = make_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            mesh(
                "mesh_wire",
                wgpu::PrimitiveTopology::LineList,
                wgpu::BlendState::REPLACE,
                true,
            ),
        );
        let translucent_pipeline = make_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            mesh(
                "mesh_translucent",
                wgpu::PrimitiveTopology::TriangleList,
                wgpu::BlendState::ALPHA_BLENDING,
                false,
            ),
        );
        let additive_pipeline = make_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            mesh(
                "mesh_additive",
                wgpu::PrimitiveTopology::TriangleList,
                ADDITIVE,
                false,
            ),
        );
        let line_pipeline = make_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            PipelineDesc {
                label: "lines",
                vs: "vs_line",
                fs: "fs_line",
                buffers: &line_buffers,
                topology: wgpu::PrimitiveTopology::LineList,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );
        let star_pipeline = make_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            PipelineDesc {
                label: "stars",
                vs: "vs_star",
                fs: "fs_star",
                buffers: &star_buffers,
                topology: wgpu::PrimitiveTopology::PointList,
                blend: wgpu::BlendState::REPLACE,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Always,
            },
        );

        Self {
            uniform_buffer,
            bind_group,
            opaque_pipeline,
            wire_pipeline,
            translucent_pipeline,
            additive_pipeline,
            line_pipeline,
            star_pipeline,
            meshes: MeshLibrary::new(device),
            instance_buffer: DynamicBuffer::new(
                device,
                "instances",
                256 * std::mem::size_of::<InstanceRaw>() as u64,
                wgpu::BufferUsages::VERTEX,
            ),
            line_buffer: DynamicBuffer::new(
                device,
                "line_vertices",
                4096 * std::mem::size_of::<LineVertex>() as u64,
                wgpu::BufferUsages::VERTEX,
            ),
            stars: None,
            order: Vec::new(),
            instances: Vec::new(),
            batches: Vec::new(),
            line_vertices: Vec::new(),
        }
    }

    /// Upload everything the pass needs for `list`.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        list: &RenderList,
        camera: &OrbitCamera,
        aspect: f32,
        time: f32,
    ) {
        let eye = camera.eye();
        let lighting = list.lighting;
        let (fog_color, fog_range) = match list.fog {
            Some(fog) => (
                [fog.color[0], fog.color[1], fog.color[2], 1.0],
                [fog.near, fog.far, 0.0, 0.0],
            ),
            None => ([0.0; 4], [0.0; 4]),
        };
        let uniforms = SceneUniforms {
            view_proj: camera.view_proj(aspect).to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
            light: [
                lighting.point_position.x,
                lighting.point_position.y,
                lighting.point_position.z,
                lighting.point_intensity,
            ],
            ambient: [lighting.ambient, 0.0, 0.0, 0.0],
            fog_color,
            fog_range,
            misc: [time, 0.0, 0.0, 0.0],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.batch_items(&list.items);
        self.instance_buffer
            .write(device, queue, bytemuck::cast_slice(&self.instances));

        self.flatten_lines(list);
        self.line_buffer
            .write(device, queue, bytemuck::cast_slice(&self.line_vertices));

        self.sync_stars(device, list.starfield.as_ref());
    }

    fn batch_items(&mut self, items: &[RenderItem]) {
        self.order.clear();
        self.order.extend(0..items.len());
        self.order
            .sort_by_key(|&i| (draw_kind(&items[i]), items[i].primitive));
        self.instances.clear();
        self.batches.clear();
        for &i in &self.order {
            let item = &items[i];
            let kind = draw_kind(item);
            let index = self.instances.len() as u32;
            self.instances.push(InstanceRaw::from_item(item));
            match self.batches.last_mut() {
                Some(b) if b.kind == kind && b.primitive == item.primitive => {
                    b.instances.end = index + 1;
                }
                _ => self.batches.push(Batch {
                    kind,
                    primitive: item.primitive,
                    instances: index..index + 1,
                }),
            }
        }
    }

    fn flatten_lines(&mut self, list: &RenderList) {
        self.line_vertices.clear();
        for strip in &list.lines {
            let color = [strip.color[0], strip.color[1], strip.color[2], 1.0];
            let dash = strip
                .dash
                .map_or([0.0; 4], |d| [d.size, d.gap, d.offset, 0.0]);
            let mut travelled = 0.0;
            for pair in strip.points.windows(2) {
                let len = pair[0].distance(pair[1]);
                self.line_vertices.push(LineVertex {
                    pos: pair[0].to_array(),
                    distance: travelled,
                    color,
                    dash,
                });
                travelled += len;
                self.line_vertices.push(LineVertex {
                    pos: pair[1].to_array(),
                    distance: travelled,
                    color,
                    dash,
                });
            }
        }
    }

    fn sync_stars(&mut self, device: &wgpu::Device, starfield: Option<&Rc<Starfield>>) {
        let Some(source) = starfield else {
            self.stars = None;
            return;
        };
        if let Some(current) = &self.stars {
            if Rc::ptr_eq(&current.source, source) {
                return;
            }
        }
        let vertices: Vec<StarVertex> = source
            .positions
            .iter()
            .zip(&source.brightness)
            .map(|(p, &b)| StarVertex {
                pos: p.to_array(),
                brightness: b,
            })
            .collect();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("stars"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        log::info!("[gpu] uploaded {} stars", vertices.len());
        self.stars = Some(StarBuffer {
            source: Rc::clone(source),
            buffer,
            count: vertices.len() as u32,
        });
    }

    pub(crate) fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_bind_group(0, &self.bind_group, &[]);

        if let Some(stars) = &self.stars {
            rpass.set_pipeline(&self.star_pipeline);
            rpass.set_vertex_buffer(0, stars.buffer.slice(..));
            rpass.draw(0..stars.count, 0..1);
        }

        // Lines go after opaque meshes and before translucent ones
        let mut lines_drawn = false;
        for batch in &self.batches {
            if !lines_drawn && batch.kind >= DrawKind::Translucent {
                self.draw_lines(&mut rpass);
                lines_drawn = true;
            }
            let Some(mesh) = self.meshes.get(batch.primitive) else {
                continue;
            };
            let pipeline = match batch.kind {
                DrawKind::Opaque => &self.opaque_pipeline,
                DrawKind::Wire => &self.wire_pipeline,
                DrawKind::Translucent => &self.translucent_pipeline,
                DrawKind::Additive => &self.additive_pipeline,
            };
            rpass.set_pipeline(pipeline);
            rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            rpass.set_vertex_buffer(1, self.instance_buffer.buffer.slice(..));
            if batch.kind == DrawKind::Wire {
                rpass.set_index_buffer(mesh.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.edge_count, 0, batch.instances.clone());
            } else {
                rpass.set_index_buffer(
                    mesh.triangle_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                rpass.draw_indexed(0..mesh.triangle_count, 0, batch.instances.clone());
            }
        }
        if !lines_drawn {
            self.draw_lines(&mut rpass);
        }
    }

    fn draw_lines(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.line_vertices.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.line_pipeline);
        rpass.set_vertex_buffer(0, self.line_buffer.buffer.slice(..));
        rpass.draw(0..self.line_vertices.len() as u32, 0..1);
    }
}
