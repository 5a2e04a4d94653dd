use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Cyan wheel on dark, closest to the classic analyser look
    #[default]
    Ion,
    Spectrum,
    Fire,
    Aurora,
    Monochrome,
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ion" => Ok(Self::Ion),
            "spectrum" => Ok(Self::Spectrum),
            "fire" => Ok(Self::Fire),
            "aurora" => Ok(Self::Aurora),
            "mono" | "monochrome" => Ok(Self::Monochrome),
            _ => Err(format!("Unknown color scheme: {}", s)),
        }
    }
}

impl ColorScheme {
    /// Color for a bin mark. `position` is the angular fraction around the
    /// wheel (0.0 to 1.0), `intensity` the radial gradient fraction (0.0 at
    /// the inset end of a mark, 1.0 on the rim).
    pub fn get_color(&self, position: f32, intensity: f32) -> (u8, u8, u8) {
        let (h, s, l) = match self {
            ColorScheme::Ion => (187.0, 0.95, 0.25 + intensity * 0.4),
            ColorScheme::Spectrum => {
                // Purple -> blue -> cyan -> green -> yellow -> red around the wheel
                let hue = 270.0 - (position * 270.0);
                (hue, 0.9, 0.35 + intensity * 0.3)
            }
            ColorScheme::Fire => {
                let hue = position * 60.0;
                (hue, 0.95, 0.3 + intensity * 0.4)
            }
            ColorScheme::Aurora => {
                let hue = 120.0 + position * 120.0;
                (hue, 0.8, 0.3 + intensity * 0.35)
            }
            ColorScheme::Monochrome => (0.0, 0.0, 0.2 + intensity * 0.6),
        };

        let hsl = Hsl::new(h, s, l);
        let rgb: Srgb = hsl.into_color();

        (
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Ion => "ion",
            ColorScheme::Spectrum => "spectrum",
            ColorScheme::Fire => "fire",
            ColorScheme::Aurora => "aurora",
            ColorScheme::Monochrome => "monochrome",
        }
    }

    pub fn all() -> &'static [ColorScheme] {
        &[
            ColorScheme::Ion,
            ColorScheme::Spectrum,
            ColorScheme::Fire,
            ColorScheme::Aurora,
            ColorScheme::Monochrome,
        ]
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let current = all.iter().position(|c| c == self).unwrap_or(0);
        all[(current + 1) % all.len()]
    }
}

/// Scale a color toward black. Stands in for stroke alpha on a terminal,
/// where there is no compositing.
pub fn dim(color: (u8, u8, u8), factor: f32) -> (u8, u8, u8) {
    let f = factor.clamp(0.0, 1.0);
    (
        (color.0 as f32 * f) as u8,
        (color.1 as f32 * f) as u8,
        (color.2 as f32 * f) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_names_parse_back() {
        for scheme in ColorScheme::all() {
            assert_eq!(scheme.name().parse::<ColorScheme>().unwrap(), *scheme);
        }
    }

    #[test]
    fn dim_scales_toward_black() {
        assert_eq!(dim((200, 100, 50), 0.5), (100, 50, 25));
        assert_eq!(dim((200, 100, 50), 0.0), (0, 0, 0));
        assert_eq!(dim((200, 100, 50), 2.0), (200, 100, 50));
    }
}
