//! Color-generating functions for emitters.

use palette::{FromColor, Hsv, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::color::ColorValue;

pub type ColorFn = Box<dyn FnMut() -> ColorValue>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum ColorScheme {
    Fixed {
        color: ColorValue,
    },
    RandomHue {
        #[serde(default)]
        seed: Option<u64>,
    },
    HueCycle {
        #[serde(default)]
        start: f32,
        step: f32,
    },
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::RandomHue { seed: None }
    }
}

/// Fully saturated, full-value color for a hue in degrees.
pub fn hue_to_color(hue: f32) -> ColorValue {
    let hsv: Hsv = Hsv::new(hue.rem_euclid(360.0), 1.0, 1.0);
    let rgb: Srgb = Srgb::from_color(hsv);
    rgb.into_format::<u8>().into()
}

impl ColorScheme {
    pub fn into_fn(self) -> ColorFn {
        match self {
            ColorScheme::Fixed { color } => Box::new(move || color),
            ColorScheme::RandomHue { seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Box::new(move || hue_to_color(rng.gen_range(0.0..360.0)))
            }
            ColorScheme::HueCycle { start, step } => {
                let mut hue = start;
                Box::new(move || {
                    let color = hue_to_color(hue);
                    hue = (hue + step).rem_euclid(360.0);
                    color
                })
            }
        }
    }
}
