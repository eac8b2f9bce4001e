use crate::foundation::core::ColorValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ColorPreset {
    pub label: &'static str,
    pub color: ColorValue,
}

pub const COLOR_PRESETS: [ColorPreset; 8] = [
    ColorPreset {
        label: "White",
        color: ColorValue::rgb(0xFF, 0xFF, 0xFF),
    },
    ColorPreset {
        label: "Black",
        color: ColorValue::rgb(0x1A, 0x1A, 0x1A),
    },
    ColorPreset {
        label: "Navy",
        color: ColorValue::rgb(0x1A, 0x1A, 0x2E),
    },
    ColorPreset {
        label: "Red",
        color: ColorValue::rgb(0xE6, 0x39, 0x46),
    },
    ColorPreset {
        label: "Grey",
        color: ColorValue::rgb(0x6C, 0x75, 0x7D),
    },
    ColorPreset {
        label: "Sage",
        color: ColorValue::rgb(0x87, 0xA8, 0x78),
    },
    ColorPreset {
        label: "Sky",
        color: ColorValue::rgb(0x87, 0xCE, 0xEB),
    },
    ColorPreset {
        label: "Cream",
        color: ColorValue::rgb(0xFF, 0xF8, 0xE7),
    },
];

/// Case-insensitive lookup by label.
pub fn preset_by_label(label: &str) -> Option<&'static ColorPreset> {
    COLOR_PRESETS
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(label.trim()))
}
