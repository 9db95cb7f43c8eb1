use super::helpers;

const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen targets for the scene and post passes.
///
/// - `hdr_*` hold the scene color in Rgba16Float, with `depth_*` alongside.
/// - `bloom_*` are half-res ping-pong buffers for the bright pass and blur.
pub(crate) struct RenderTargets {
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) bloom_size: [u32; 2],
}

impl RenderTargets {
    pub(crate) fn hdr_format() -> wgpu::TextureFormat {
        HDR_FORMAT
    }

    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) = create_hdr(device, "hdr_tex", width, height);
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, width, height);
        let bloom_size = bloom_size(width, height);
        let (bloom_a, bloom_a_view) = create_hdr(device, "bloom_a", bloom_size[0], bloom_size[1]);
        let (bloom_b, bloom_b_view) = create_hdr(device, "bloom_b", bloom_size[0], bloom_size[1]);
        Self {
            hdr_tex,
            hdr_view,
            depth_tex,
            depth_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
            bloom_size,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height);
    }
}

fn bloom_size(width: u32, height: u32) -> [u32; 2] {
    [(width.max(1) / 2).max(1), (height.max(1) / 2).max(1)]
}

fn create_hdr(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    helpers::create_color_texture_device(
        device,
        label,
        width.max(1),
        height.max(1),
        HDR_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    )
}
