use crate::{
    config::palette::ColorPreset,
    foundation::core::ColorValue,
    state::store::DesignerStore,
};

pub const INVALID_HEX_MESSAGE: &str = "Enter a valid hex color (e.g. #FF5733)";

/// Colour picker state: preset swatches plus a free-text hex field.
///
/// Only a strictly valid colour ever reaches the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorInput {
    text: String,
    error: bool,
}

impl ColorInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field contents after trimming and `#` completion.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.then_some(INVALID_HEX_MESSAGE)
    }

    /// Free-text entry. Trims, adds a missing `#`, and pushes the colour to the store when it
    /// is `#` plus six hex digits. A bare `#` (or nothing) is not flagged as an error.
    pub fn enter_text(&mut self, raw: &str, store: &mut DesignerStore) -> Option<ColorValue> {
        let trimmed = raw.trim();
        let candidate = if trimmed.starts_with('#') {
            trimmed.to_string()
        } else {
            format!("#{trimmed}")
        };

        let parsed = ColorValue::parse_hex(&candidate);
        self.text = candidate;
        match parsed {
            Ok(color) => {
                self.error = false;
                store.set_base_color(color);
                Some(color)
            }
            Err(_) => {
                self.error = self.text.len() > 1;
                None
            }
        }
    }

    /// Swatch click: clears the text field and any error.
    pub fn select_preset(&mut self, preset: &ColorPreset, store: &mut DesignerStore) {
        self.text.clear();
        self.error = false;
        store.set_base_color(preset.color);
    }

    /// True when `preset` is the colour currently in the store (swatch check mark).
    pub fn is_selected(preset: &ColorPreset, store: &DesignerStore) -> bool {
        store.state().base_color == preset.color
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/color.rs"]
mod tests;
