use crate::core::camera::OrbitCamera;
use crate::core::scene::RenderList;
use web_sys as web;

mod helpers;
mod meshes;
mod post;
mod scene;
mod targets;
use post::{PostBindGroups, PostResources};
use scene::ScenePass;
use targets::RenderTargets;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene: ScenePass,
    // Post-processing resources
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: PostResources,
    bind_groups: PostBindGroups,

    width: u32,
    height: u32,
    time_accum: f32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let hdr_format = RenderTargets::hdr_format();
        let targets = RenderTargets::new(&device, width, height);
        let scene = ScenePass::new(&device, hdr_format);

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, hdr_format, format);
        let bind_groups = post::rebuild_bind_groups(
            &device,
            &post,
            &linear_sampler,
            &targets.hdr_view,
            &targets.bloom_a_view,
            &targets.bloom_b_view,
        );
        log::info!("[gpu] ready {}x{} format={:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene,
            targets,
            linear_sampler,
            post,
            bind_groups,
            width,
            height,
            time_accum: 0.0,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            // Offscreen targets follow the canvas; bind groups reference their views
            self.targets.recreate(&self.device, width, height);
            self.rebuild_post_bind_groups();
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        dt_sec: f32,
        list: &RenderList,
        camera: &OrbitCamera,
    ) -> Result<(), wgpu::SurfaceError> {
        self.time_accum += dt_sec.max(0.0);
        let aspect = self.aspect();
        self.scene.prepare(
            &self.device,
            &self.queue,
            list,
            camera,
            aspect,
            self.time_accum,
        );
        let full_res = [self.width as f32, self.height as f32];
        let bloom_res = [
            self.targets.bloom_size[0] as f32,
            self.targets.bloom_size[1] as f32,
        ];
        post::write_post_uniforms(
            &self.queue,
            &self.post,
            &list.post,
            full_res,
            bloom_res,
            self.time_accum,
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        let bg = list.background;
        let clear = wgpu::Color {
            r: bg[0] as f64,
            g: bg[1] as f64,
            b: bg[2] as f64,
            a: 1.0,
        };

        // Pass 1: scene → HDR
        self.scene.draw(
            &mut encoder,
            &self.targets.hdr_view,
            &self.targets.depth_view,
            clear,
        );

        if list.bloom().is_some() {
            // Pass 2: bright pass → bloom_a
            post::blit(
                &mut encoder,
                "bright_pass",
                &self.targets.bloom_a_view,
                wgpu::Color::BLACK,
                &self.post.bright_pipeline,
                &self.bind_groups.hdr,
                None,
            );
            // Pass 3: blur horizontal bloom_a → bloom_b
            post::blit(
                &mut encoder,
                "blur_h",
                &self.targets.bloom_b_view,
                wgpu::Color::BLACK,
                &self.post.blur_pipeline,
                &self.bind_groups.from_bloom_a,
                None,
            );
            // Pass 4: blur vertical bloom_b → bloom_a
            post::blit(
                &mut encoder,
                "blur_v",
                &self.targets.bloom_a_view,
                wgpu::Color::BLACK,
                &self.post.blur_pipeline,
                &self.bind_groups.from_bloom_b,
                None,
            );
        }

        // Pass 5: composite to swapchain; bloom strength is 0 without bloom
        post::blit(
            &mut encoder,
            "composite",
            &view,
            clear,
            &self.post.composite_pipeline,
            &self.bind_groups.hdr,
            Some(&self.bind_groups.bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn rebuild_post_bind_groups(&mut self) {
        self.bind_groups = post::rebuild_bind_groups(
            &self.device,
            &self.post,
            &self.linear_sampler,
            &self.targets.hdr_view,
            &self.targets.bloom_a_view,
            &self.targets.bloom_b_view,
        );
    }
}
