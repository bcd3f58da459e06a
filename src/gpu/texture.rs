//! Off-screen color + depth target with a CPU-side readback cache.

/// Color format of coordinate targets: one byte per channel, read back
/// exactly as written.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
/// Depth format of coordinate targets.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const BYTES_PER_PIXEL: u32 = 4;

/// A coordinate render target.
///
/// The color texture is created with `RENDER_ATTACHMENT | COPY_SRC` so each
/// draw can be copied into `staging` and cached in `pixels` before the draw
/// returns.
pub struct CoordinateTarget {
    /// Color texture the coordinate program writes.
    pub texture: wgpu::Texture,
    /// Default view of `texture`.
    pub view: wgpu::TextureView,
    /// Default view of the depth texture.
    pub depth_view: wgpu::TextureView,
    /// Mappable buffer the color texture is copied into.
    pub staging: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    /// Row-padded RGBA bytes of the last completed draw.
    pixels: Option<Vec<u8>>,
}

impl CoordinateTarget {
    /// Create a target with the given dimensions.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Coordinate Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Coordinate Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view =
            depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_bytes_per_row = padded_bytes_per_row(width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Coordinate Staging Buffer"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            texture,
            view,
            depth_view,
            staging,
            width,
            height,
            padded_bytes_per_row,
            pixels: None,
        }
    }

    /// Target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row pitch of the staging buffer in bytes.
    pub fn padded_bytes_per_row(&self) -> u32 {
        self.padded_bytes_per_row
    }

    /// Record a full-texture copy into the staging buffer.
    pub fn copy_to_staging(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Forget the cached pixels; reads fail until the next readback.
    pub fn invalidate(&mut self) {
        self.pixels = None;
    }

    /// Replace the cached pixels with the mapped staging contents.
    pub fn store_pixels(&mut self, bytes: Vec<u8>) {
        self.pixels = Some(bytes);
    }

    /// RGBA bytes of pixel `(x, y)` from the last readback.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let pixels = self.pixels.as_ref()?;
        let start = y as usize * self.padded_bytes_per_row as usize
            + x as usize * BYTES_PER_PIXEL as usize;
        let bytes = pixels.get(start..start + BYTES_PER_PIXEL as usize)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Bytes per staging row for `width` RGBA8 pixels, rounded up to wgpu's copy
/// alignment.
#[must_use]
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    unpadded.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}
