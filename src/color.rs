use serde::{Deserialize, Serialize};

/// An RGB triple with saturating arithmetic.
///
/// Values are immutable; every operation returns a new color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorValue {
    r: u8,
    g: u8,
    b: u8,
}

fn clamp_channel(value: f32) -> u8 {
    // NaN falls through both comparisons and ends up as 0
    value.round().clamp(0.0, 255.0) as u8
}

impl ColorValue {
    pub const BLACK: ColorValue = ColorValue::new(0, 0, 0);
    pub const WHITE: ColorValue = ColorValue::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> ColorValue {
        ColorValue { r, g, b }
    }

    pub fn r(&self) -> u8 {
        self.r
    }

    pub fn g(&self) -> u8 {
        self.g
    }

    pub fn b(&self) -> u8 {
        self.b
    }

    pub fn into_components(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn is_black(&self) -> bool {
        *self == ColorValue::BLACK
    }

    /// Per-channel saturating sum.
    pub fn add(self, other: ColorValue) -> ColorValue {
        ColorValue {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
        }
    }

    /// Adds (possibly negative, possibly fractional) deltas to each channel.
    ///
    /// Results are rounded to the nearest integer and clamped to [0, 255].
    pub fn add_components(self, dr: f32, dg: f32, db: f32) -> ColorValue {
        ColorValue {
            r: clamp_channel(self.r as f32 + dr),
            g: clamp_channel(self.g as f32 + dg),
            b: clamp_channel(self.b as f32 + db),
        }
    }

    /// Scales every channel by `intensity`, which is clamped to [0, 1] first.
    pub fn dim(self, intensity: f32) -> ColorValue {
        let intensity = intensity.clamp(0.0, 1.0);
        ColorValue {
            r: clamp_channel(self.r as f32 * intensity),
            g: clamp_channel(self.g as f32 * intensity),
            b: clamp_channel(self.b as f32 * intensity),
        }
    }
}

impl From<palette::Srgb<u8>> for ColorValue {
    fn from(rgb: palette::Srgb<u8>) -> Self {
        ColorValue::new(rgb.red, rgb.green, rgb.blue)
    }
}
