use kurbo::{Rect, Size};

use crate::{
    assets::{
        decode::{DesignPixels, render_design},
        handle::{DesignSource, HandleId},
    },
    config::geometry::{GeometryProfile, PanelGeometry},
    foundation::{
        core::{ColorValue, Panel, Rgba8Premul},
        error::StitchResult,
    },
    render::{blend, raster::RasterBuffer},
};

/// Grid line pitch in pixels.
pub const GRID_PITCH: u32 = 8;
/// Straight alpha of grid lines (about 3%).
pub const GRID_ALPHA: u8 = 8;

/// The tuple a composite pass is computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompositeInputs {
    pub color: ColorValue,
    pub design: Option<HandleId>,
    pub view: Panel,
}

/// Where a design lands on the texture, in whole pixels.
///
/// `x`/`y` may be negative or run past the buffer edge; drawing is clipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

/// Fit an `img_w` x `img_h` image into a panel: aspect preserved, never upscaled, centred on
/// the panel's anchor point.
///
/// Returns `None` for an empty image or when the fitted size rounds down to nothing.
pub fn place_design(geom: &PanelGeometry, img_w: u32, img_h: u32) -> Option<Placement> {
    if img_w == 0 || img_h == 0 {
        return None;
    }
    let region = geom.region;
    let rule = geom.placement;

    let max_w = f64::from(region.width) * rule.max_width_ratio;
    let max_h = f64::from(region.height) * rule.max_height_ratio;
    let (w, h) = (f64::from(img_w), f64::from(img_h));
    let scale = (max_w / w).min(max_h / h).min(1.0);
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }

    let (draw_w, draw_h) = if scale < 1.0 {
        ((w * scale).floor(), (h * scale).floor())
    } else {
        (w, h)
    };
    if draw_w < 1.0 || draw_h < 1.0 {
        return None;
    }

    let center = (
        f64::from(region.x) + f64::from(region.width) * rule.offset_x_ratio,
        f64::from(region.y) + f64::from(region.height) * rule.offset_y_ratio,
    );
    let rect = Rect::from_center_size(center, Size::new(draw_w, draw_h));

    Some(Placement {
        x: rect.x0.round() as i64,
        y: rect.y0.round() as i64,
        width: draw_w as u32,
        height: draw_h as u32,
        scale,
    })
}

/// What the design layer of a pass turned into.
#[derive(Clone, Debug, PartialEq)]
pub enum DesignLayer {
    None,
    Drawn(Placement),
    Failed(String),
}

/// Result of the load phase of a pass: everything needed to paint without further I/O.
pub struct PreparedPass {
    pub inputs: CompositeInputs,
    design: Option<(Placement, DesignPixels)>,
    layer: DesignLayer,
}

impl PreparedPass {
    pub fn layer(&self) -> &DesignLayer {
        &self.layer
    }
}

impl std::fmt::Debug for PreparedPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedPass")
            .field("inputs", &self.inputs)
            .field("layer", &self.layer)
            .finish()
    }
}

/// Paints base colour, grid and design onto the texture for one geometry profile.
#[derive(Clone, Debug)]
pub struct Compositor {
    profile: GeometryProfile,
}

impl Compositor {
    pub fn new(profile: GeometryProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &GeometryProfile {
        &self.profile
    }

    /// Allocate a buffer of the profile's texture size.
    pub fn new_buffer(&self) -> StitchResult<RasterBuffer> {
        RasterBuffer::new(self.profile.texture_size, self.profile.texture_size)
    }

    /// Resolve, place and decode the design. A failure here never aborts the pass.
    #[tracing::instrument(skip(self, source), fields(color = %inputs.color, view = %inputs.view))]
    pub fn prepare(&self, inputs: CompositeInputs, source: &dyn DesignSource) -> PreparedPass {
        let (design, layer) = match inputs.design {
            None => (None, DesignLayer::None),
            Some(id) => match self.load_design(id, inputs.view, source) {
                Ok(Some((placement, pixels))) => {
                    (Some((placement, pixels)), DesignLayer::Drawn(placement))
                }
                Ok(None) => (None, DesignLayer::None),
                Err(msg) => {
                    tracing::warn!(handle = id.as_u64(), error = %msg, "design draw failed; showing base colour");
                    (None, DesignLayer::Failed(msg))
                }
            },
        };
        PreparedPass {
            inputs,
            design,
            layer,
        }
    }

    fn load_design(
        &self,
        id: HandleId,
        view: Panel,
        source: &dyn DesignSource,
    ) -> Result<Option<(Placement, DesignPixels)>, String> {
        let blob = source
            .fetch(id)
            .ok_or_else(|| "design handle is no longer live".to_string())?;
        let Some(placement) = place_design(self.profile.panel(view), blob.width, blob.height)
        else {
            return Ok(None);
        };
        let pixels =
            render_design(&blob, placement.width, placement.height).map_err(|e| e.to_string())?;
        Ok(Some((placement, pixels)))
    }

    /// Synchronous paint: fill, grid, design. Every pixel is rewritten, so nothing from an
    /// earlier pass survives.
    pub fn paint(&self, buffer: &mut RasterBuffer, pass: &PreparedPass) {
        let color = pass.inputs.color;
        buffer.fill(color.to_premul());
        draw_grid(buffer, grid_color(color));
        if let Some((placement, pixels)) = &pass.design {
            blit(buffer, placement, pixels);
        }
    }

    /// Load then paint in one go.
    pub fn composite(
        &self,
        buffer: &mut RasterBuffer,
        inputs: CompositeInputs,
        source: &dyn DesignSource,
    ) -> DesignLayer {
        let pass = self.prepare(inputs, source);
        self.paint(buffer, &pass);
        pass.layer
    }
}

/// Near-white on dark garments, near-black on light ones.
pub fn grid_color(base: ColorValue) -> Rgba8Premul {
    if base.is_dark() {
        Rgba8Premul::from_straight_rgba(255, 255, 255, GRID_ALPHA)
    } else {
        Rgba8Premul::from_straight_rgba(0, 0, 0, GRID_ALPHA)
    }
}

fn draw_grid(buffer: &mut RasterBuffer, color: Rgba8Premul) {
    let src = color.to_array();
    let (w, h) = (buffer.width(), buffer.height());
    for y in 0..h {
        let row_start = buffer.offset(0, y);
        let row = &mut buffer.data_mut()[row_start..row_start + (w as usize) * 4];
        if y % GRID_PITCH == 0 {
            for px in row.chunks_exact_mut(4) {
                blend::over_px(px, src);
            }
        } else {
            for px in row.chunks_exact_mut(4).step_by(GRID_PITCH as usize) {
                blend::over_px(px, src);
            }
        }
    }
}

fn blit(buffer: &mut RasterBuffer, placement: &Placement, pixels: &DesignPixels) {
    let (bw, bh) = (i64::from(buffer.width()), i64::from(buffer.height()));
    let x0 = placement.x.max(0);
    let y0 = placement.y.max(0);
    let x1 = (placement.x + i64::from(pixels.width)).min(bw);
    let y1 = (placement.y + i64::from(pixels.height)).min(bh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_stride = (pixels.width as usize) * 4;
    let span = ((x1 - x0) as usize) * 4;
    let src_x = ((x0 - placement.x) as usize) * 4;
    for y in y0..y1 {
        let src_y = (y - placement.y) as usize;
        let src_start = src_y * src_stride + src_x;
        let dst_start = buffer.offset(x0 as u32, y as u32);
        blend::over_row(
            &mut buffer.data_mut()[dst_start..dst_start + span],
            &pixels.rgba8_premul[src_start..src_start + span],
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
