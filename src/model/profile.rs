use serde::{Deserialize, Serialize};

use crate::{
    assets::color::TextColor,
    foundation::{
        core::Rgba8,
        error::{SlideError, SlideResult},
    },
};

pub const FONT_SIZE_MIN: f32 = 24.0;
pub const FONT_SIZE_MAX: f32 = 72.0;
pub const OVERLAY_OPACITY_MAX: f32 = 0.8;

/// Vertical placement of the text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Top,
    #[default]
    Center,
    Bottom,
}

/// User-editable styling shared by every slide of a render pass.
///
/// Field names follow the wizard's camelCase form keys so a saved customization can be fed back
/// in unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomizationProfile {
    #[serde(default)]
    pub text_color: TextColor,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub text_position: TextPosition,
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: f32,
}

fn default_font_size() -> f32 {
    48.0
}

fn default_overlay_opacity() -> f32 {
    0.4
}

impl Default for CustomizationProfile {
    fn default() -> Self {
        Self {
            text_color: TextColor::default(),
            font_size: default_font_size(),
            text_position: TextPosition::default(),
            overlay_opacity: default_overlay_opacity(),
        }
    }
}

impl CustomizationProfile {
    /// Freeze the profile for one render pass.
    ///
    /// Out-of-range values are clamped (font size also rounds to whole pixels); non-finite values
    /// fail with a layout error.
    pub fn snapshot(&self) -> SlideResult<ProfileSnapshot> {
        if !self.font_size.is_finite() {
            return Err(SlideError::layout(format!(
                "font size must be finite, got {}",
                self.font_size
            )));
        }
        if !self.overlay_opacity.is_finite() {
            return Err(SlideError::layout(format!(
                "overlay opacity must be finite, got {}",
                self.overlay_opacity
            )));
        }

        let font_size = self.font_size.round().clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
        if font_size != self.font_size.round() {
            tracing::warn!(
                requested = self.font_size,
                clamped = font_size,
                "font size out of range"
            );
        }
        let overlay_opacity = self.overlay_opacity.clamp(0.0, OVERLAY_OPACITY_MAX);
        if overlay_opacity != self.overlay_opacity {
            tracing::warn!(
                requested = self.overlay_opacity,
                clamped = overlay_opacity,
                "overlay opacity out of range"
            );
        }

        Ok(ProfileSnapshot {
            text_color: self.text_color.rgba(),
            font_size_px: font_size as u32,
            text_position: self.text_position,
            overlay_opacity,
        })
    }
}

/// Validated, immutable copy of a [`CustomizationProfile`], passed by value into every render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileSnapshot {
    pub text_color: Rgba8,
    pub font_size_px: u32,
    pub text_position: TextPosition,
    pub overlay_opacity: f32,
}

impl ProfileSnapshot {
    /// Distance between successive line centers.
    pub fn line_height(self) -> f64 {
        f64::from(self.font_size_px) + 20.0
    }
}
