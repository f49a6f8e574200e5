use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::color::*;
use super::error::*;
use super::tables::{BLUE_RED, VIRIDIS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteName {
    Viridis,
    #[default]
    BlueRed,
}

impl FromStr for PaletteName {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, PaletteError> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "viridis" => Ok(PaletteName::Viridis),
            "blue_red" | "bured" => Ok(PaletteName::BlueRed),
            _ => Err(PaletteError::UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaletteName::Viridis => "viridis",
            PaletteName::BlueRed => "blue_red",
        })
    }
}

/// How normalized values in `[0, 1]` are split into bins between palette
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binning {
    /// `N - 1` bins of width `1 / (N - 1)`, so `0` and `1` land exactly on
    /// the first and last colors.
    #[default]
    Uniform,
    /// Bins of width `1 / (N - 2)` blended by the raw (unscaled) remainder.
    /// Reproduces older curvature renderings exactly; the last color is
    /// never reached.
    Legacy,
}

impl Binning {
    pub fn min_colors(self) -> usize {
        match self {
            Binning::Uniform => 2,
            Binning::Legacy => 3,
        }
    }

    pub fn check(self, len: usize) -> Result<(), MapError> {
        if len < self.min_colors() {
            return Err(MapError::BinningTooFewColors {
                binning: self.as_str(),
                needed: self.min_colors(),
                len,
            });
        }
        Ok(())
    }

    fn as_str(self) -> &'static str {
        match self {
            Binning::Uniform => "uniform",
            Binning::Legacy => "legacy",
        }
    }
}

impl FromStr for Binning {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, MapError> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Binning::Uniform),
            "legacy" => Ok(Binning::Legacy),
            _ => Err(MapError::UnknownBinning(s.to_string())),
        }
    }
}

impl fmt::Display for Binning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, ordered list of at least two colors used as interpolation
/// anchors. Built-in palettes borrow the static tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "self::_serde::PaletteSource", into = "self::_serde::PaletteSource")]
pub struct Palette {
    name: Option<PaletteName>,
    colors: Cow<'static, [Color]>,
}

impl Palette {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Result<Palette, PaletteError> {
        let colors: Vec<Color> = colors.into_iter().collect();

        if colors.len() < 2 {
            return Err(PaletteError::TooFewColors(colors.len()));
        }
        if let Some(i) = colors.iter().position(|c| !c.is_normalized()) {
            return Err(PaletteError::OutOfBounds(i));
        }

        Ok(Palette {
            name: None,
            colors: Cow::Owned(colors),
        })
    }

    pub fn named(name: PaletteName) -> Palette {
        let colors: &'static [Color] = match name {
            PaletteName::Viridis => &VIRIDIS,
            PaletteName::BlueRed => &BLUE_RED,
        };
        Palette {
            name: Some(name),
            colors: Cow::Borrowed(colors),
        }
    }

    pub fn viridis() -> Palette {
        Palette::named(PaletteName::Viridis)
    }

    pub fn blue_red() -> Palette {
        Palette::named(PaletteName::BlueRed)
    }

    pub fn name(&self) -> Option<PaletteName> {
        self.name
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at normalized position `t`. Values outside `[0, 1]` are
    /// saturated to the nearest end first.
    pub fn sample(&self, t: f64, binning: Binning) -> Color {
        let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };
        let last = self.colors.len() - 2;

        let (i, frac) = match binning {
            Binning::Uniform => {
                let scaled = t * (self.colors.len() - 1) as f64;
                let i = (scaled.floor() as usize).min(last);
                (i, scaled - i as f64)
            }
            Binning::Legacy => {
                let chunk = 1. / (self.colors.len() - 2) as f64;
                let rem = t % chunk;
                let i = ((t - rem) / chunk).round() as usize;
                (i.min(last), rem)
            }
        };

        Color::lerp(self.colors[i], self.colors[i + 1], frac as f32)
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette::named(PaletteName::default())
    }
}

mod _serde {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum PaletteSource {
        Named(PaletteName),
        Colors(Vec<Color>),
    }

    impl TryFrom<PaletteSource> for Palette {
        type Error = PaletteError;

        fn try_from(src: PaletteSource) -> Result<Palette, PaletteError> {
            match src {
                PaletteSource::Named(name) => Ok(Palette::named(name)),
                PaletteSource::Colors(colors) => Palette::new(colors),
            }
        }
    }

    impl From<Palette> for PaletteSource {
        fn from(p: Palette) -> PaletteSource {
            match p.name {
                Some(name) => PaletteSource::Named(name),
                None => PaletteSource::Colors(p.colors.into_owned()),
            }
        }
    }
}
