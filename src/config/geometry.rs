use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    core::Panel,
    error::{StitchError, StitchResult},
};

/// Side length of the shared square texture, in pixels.
pub const TEXTURE_SIZE: u32 = 2048;

/// Pixel rectangle on the shared texture that one panel samples from.
///
/// Must match the UV layout baked into the mesh asset. A mismatch misplaces artwork silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UvRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where the design centre lands and how large it may get, relative to a [`UvRegion`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRule {
    pub offset_x_ratio: f64,
    pub offset_y_ratio: f64,
    pub max_width_ratio: f64,
    pub max_height_ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelGeometry {
    pub region: UvRegion,
    pub placement: PlacementRule,
}

/// One swappable UV layout table, tied to whichever mesh asset is deployed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryProfile {
    pub name: String,
    #[serde(default = "default_texture_size")]
    pub texture_size: u32,
    pub front: PanelGeometry,
    pub back: PanelGeometry,
}

fn default_texture_size() -> u32 {
    TEXTURE_SIZE
}

impl GeometryProfile {
    /// Layout of the generated placeholder mesh.
    ///
    /// Front body spans U 0.12..0.88, V 0.38..0.92; back body spans U 0.12..0.88, V 0.04..0.36.
    pub fn placeholder() -> Self {
        Self {
            name: "placeholder".to_string(),
            texture_size: TEXTURE_SIZE,
            front: PanelGeometry {
                region: UvRegion {
                    x: 246,
                    y: 778,
                    width: 1556,
                    height: 1106,
                },
                placement: PlacementRule {
                    offset_x_ratio: 0.5,
                    offset_y_ratio: 0.65,
                    max_width_ratio: 0.55,
                    max_height_ratio: 0.38,
                },
            },
            back: PanelGeometry {
                region: UvRegion {
                    x: 246,
                    y: 82,
                    width: 1556,
                    height: 655,
                },
                placement: PlacementRule {
                    offset_x_ratio: 0.5,
                    offset_y_ratio: 0.55,
                    max_width_ratio: 0.55,
                    max_height_ratio: 0.38,
                },
            },
        }
    }

    pub fn panel(&self, panel: Panel) -> &PanelGeometry {
        match panel {
            Panel::Front => &self.front,
            Panel::Back => &self.back,
        }
    }

    /// Parse and validate a profile from JSON.
    pub fn from_json_str(json: &str) -> StitchResult<Self> {
        let profile: Self = serde_json::from_str(json)
            .map_err(|e| StitchError::config(format!("parse geometry profile: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read, parse, and validate a profile JSON file.
    pub fn load(path: &Path) -> StitchResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read geometry profile '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> StitchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StitchError::config(format!("serialize geometry profile: {e}")))
    }

    pub fn validate(&self) -> StitchResult<()> {
        if self.name.trim().is_empty() {
            return Err(StitchError::config("geometry profile name must not be empty"));
        }
        if self.texture_size == 0 {
            return Err(StitchError::config("texture_size must be > 0"));
        }
        for panel in Panel::ALL {
            let geom = self.panel(panel);
            let r = geom.region;
            if r.width == 0 || r.height == 0 {
                return Err(StitchError::config(format!(
                    "{panel} region must have a non-zero size"
                )));
            }
            let right = u64::from(r.x) + u64::from(r.width);
            let bottom = u64::from(r.y) + u64::from(r.height);
            if right > u64::from(self.texture_size) || bottom > u64::from(self.texture_size) {
                return Err(StitchError::config(format!(
                    "{panel} region {}x{}+{}+{} exceeds the {}px texture",
                    r.width, r.height, r.x, r.y, self.texture_size
                )));
            }

            let p = geom.placement;
            for (field, v) in [
                ("offsetXRatio", p.offset_x_ratio),
                ("offsetYRatio", p.offset_y_ratio),
                ("maxWidthRatio", p.max_width_ratio),
                ("maxHeightRatio", p.max_height_ratio),
            ] {
                if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                    return Err(StitchError::config(format!(
                        "{panel} placement {field} must be within [0, 1], got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for GeometryProfile {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/geometry.rs"]
mod tests;
