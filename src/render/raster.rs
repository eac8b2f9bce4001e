use crate::foundation::{
    core::Rgba8Premul,
    error::{StitchError, StitchResult},
    math::Fnv1a64,
};

/// Stable content hash of a buffer, two independent FNV lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct BufferFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for BufferFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Persistent texture surface: row-major premultiplied RGBA8.
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Allocate a transparent buffer.
    pub fn new(width: u32, height: u32) -> StitchResult<Self> {
        if width == 0 || height == 0 {
            return Err(StitchError::render("raster buffer must have a non-zero size"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| StitchError::render(format!("raster buffer {width}x{height} overflows")))?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, px: Rgba8Premul) {
        let px = px.to_array();
        for dst in self.data.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    pub fn fingerprint(&self) -> BufferFingerprint {
        let mut a = Fnv1a64::new_default();
        let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);
        for h in [&mut a, &mut b] {
            h.write_u32(self.width);
            h.write_u32(self.height);
            h.write_bytes(&self.data);
        }
        BufferFingerprint {
            hi: a.finish(),
            lo: b.finish(),
        }
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> StitchResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        for px in straight.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| StitchError::render("raster buffer length does not match its size"))
    }
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
