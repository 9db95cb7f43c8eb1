use crate::core::variant::PostStack;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    time: f32,
    noise: f32,
    blur_dir: [f32; 2],
    bloom_strength: f32,
    threshold: f32,
    smoothing: f32,
    vignette_offset: f32,
    vignette_darkness: f32,
    _pad: f32,
}

impl PostUniforms {
    /// Fold a variant's post stack into shader uniforms. A missing effect gets
    /// the neutral value: no bloom strength, no grain, zero vignette offset.
    pub(crate) fn from_stack(
        stack: &PostStack,
        resolution: [f32; 2],
        time: f32,
        blur_dir: [f32; 2],
    ) -> Self {
        let (bloom_strength, threshold, smoothing) = stack
            .bloom
            .map_or((0.0, 1.0, 0.0), |b| (b.intensity, b.threshold, b.smoothing));
        let (vignette_offset, vignette_darkness) = stack
            .vignette
            .map_or((0.0, 0.0), |v| (v.offset, v.darkness));
        Self {
            resolution,
            time,
            noise: stack.noise,
            blur_dir,
            bloom_strength,
            threshold,
            smoothing,
            vignette_offset,
            vignette_darkness,
            _pad: 0.0,
        }
    }
}

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    // Each pass reads its own uniforms; writes land before the encoder runs
    pub(crate) composite_uniforms: wgpu::Buffer,
    pub(crate) blur_h_uniforms: wgpu::Buffer,
    pub(crate) blur_v_uniforms: wgpu::Buffer,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

pub(crate) struct PostBindGroups {
    pub(crate) hdr: wgpu::BindGroup,
    pub(crate) from_bloom_a: wgpu::BindGroup,
    pub(crate) from_bloom_b: wgpu::BindGroup,
    pub(crate) bloom_a_only: wgpu::BindGroup,
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<PostUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    bloom_format: wgpu::TextureFormat,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            texture_entry(0),
            sampler_entry(1),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &[texture_entry(0), sampler_entry(1)],
    });
    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let bright_pipeline = super::helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_bright",
        bloom_format,
        None,
    );
    let blur_pipeline = super::helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_blur",
        bloom_format,
        None,
    );
    let composite_pipeline = super::helpers::make_post_pipeline(
        device,
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        bgl0,
        bgl1,
        composite_uniforms: uniform_buffer(device, "post_composite_uniforms"),
        blur_h_uniforms: uniform_buffer(device, "post_blur_h_uniforms"),
        blur_v_uniforms: uniform_buffer(device, "post_blur_v_uniforms"),
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

/// Write the three uniform blocks for one frame.
pub(crate) fn write_post_uniforms(
    queue: &wgpu::Queue,
    post: &PostResources,
    stack: &PostStack,
    full_res: [f32; 2],
    bloom_res: [f32; 2],
    time: f32,
) {
    let composite = PostUniforms::from_stack(stack, full_res, time, [0.0, 0.0]);
    let blur_h = PostUniforms::from_stack(stack, bloom_res, time, [1.0, 0.0]);
    let blur_v = PostUniforms::from_stack(stack, bloom_res, time, [0.0, 1.0]);
    queue.write_buffer(&post.composite_uniforms, 0, bytemuck::bytes_of(&composite));
    queue.write_buffer(&post.blur_h_uniforms, 0, bytemuck::bytes_of(&blur_h));
    queue.write_buffer(&post.blur_v_uniforms, 0, bytemuck::bytes_of(&blur_v));
}

fn source_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniforms: Option<&wgpu::Buffer>,
) -> wgpu::BindGroup {
    let mut entries = vec![
        wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(view),
        },
        wgpu::BindGroupEntry {
            binding: 1,
            resource: wgpu::BindingResource::Sampler(sampler),
        },
    ];
    if let Some(buf) = uniforms {
        entries.push(wgpu::BindGroupEntry {
            binding: 2,
            resource: buf.as_entire_binding(),
        });
    }
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    })
}

pub(crate) fn rebuild_bind_groups(
    device: &wgpu::Device,
    post: &PostResources,
    sampler: &wgpu::Sampler,
    hdr_view: &wgpu::TextureView,
    bloom_a_view: &wgpu::TextureView,
    bloom_b_view: &wgpu::TextureView,
) -> PostBindGroups {
    PostBindGroups {
        hdr: source_group(
            device,
            "bg_hdr",
            &post.bgl0,
            hdr_view,
            sampler,
            Some(&post.composite_uniforms),
        ),
        from_bloom_a: source_group(
            device,
            "bg_from_bloom_a",
            &post.bgl0,
            bloom_a_view,
            sampler,
            Some(&post.blur_h_uniforms),
        ),
        from_bloom_b: source_group(
            device,
            "bg_from_bloom_b",
            &post.bgl0,
            bloom_b_view,
            sampler,
            Some(&post.blur_v_uniforms),
        ),
        bloom_a_only: source_group(
            device,
            "bg_bloom_a_only",
            &post.bgl1,
            bloom_a_view,
            sampler,
            None,
        ),
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
