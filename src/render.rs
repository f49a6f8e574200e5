use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use super::color::*;
use super::error::*;
use super::palette::*;

#[derive(Debug, Clone, Copy)]
pub struct ColorbarConfig {
    pub width: u32,
    pub height: u32,
    pub binning: Binning,
}

impl Default for ColorbarConfig {
    fn default() -> ColorbarConfig {
        ColorbarConfig {
            width: 512,
            height: 32,
            binning: Binning::Uniform,
        }
    }
}

impl From<Color> for Rgb<u8> {
    fn from(c: Color) -> Rgb<u8> {
        Rgb(c.to_rgb8())
    }
}

impl Palette {
    /// Horizontal strip running from the first color (left) to the value
    /// sampled at `t = 1` (right).
    pub fn colorbar(&self, cfg: ColorbarConfig) -> RgbImage {
        let denom = cfg.width.saturating_sub(1).max(1) as f64;
        let column: Vec<Rgb<u8>> = (0..cfg.width)
            .map(|x| self.sample(x as f64 / denom, cfg.binning).into())
            .collect();
        ImageBuffer::from_fn(cfg.width, cfg.height, |x, _| column[x as usize])
    }

    pub fn save_colorbar(&self, cfg: ColorbarConfig, path: impl AsRef<Path>) -> Result<(), ColormapError> {
        self.colorbar(cfg).save(path)?;
        Ok(())
    }
}
