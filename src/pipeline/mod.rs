pub mod delegate;
pub mod distance;
pub mod partition;
pub mod sample;

use std::cmp::Ordering;
use std::path::Path;

use crate::color::Color;
use crate::colorspace::{Colorimetry, LabD50};
use crate::error::Result;
use crate::role::Palette;
use crate::theme::{Overrides, Theme};

use self::sample::SamplerConfig;

/// A dominant image color with its Lab equivalent and the number of sampled
/// pixels quantized to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub rgb: Color,
    pub lab: LabD50,
    pub count: u32,
}

impl ColorSample {
    pub fn new(rgb: Color, count: u32, colorimetry: &Colorimetry) -> Self {
        Self {
            rgb,
            lab: colorimetry.to_lab(rgb),
            count,
        }
    }
}

/// The fixed enumeration order: Count descending, then RGB ascending.
pub fn enumeration_order(a: &ColorSample, b: &ColorSample) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.rgb.cmp(&b.rgb))
}

/// Sample, partition and delegate: everything between an image file and a Palette.
pub fn palette_from_image(
    path: &Path,
    colors: usize,
    config: &SamplerConfig,
    colorimetry: &Colorimetry,
) -> Result<Palette> {
    let samples = sample::sample_file(path, colors, config, colorimetry)?;
    let (dark, light) = partition::partition(&samples)?;
    delegate::delegate(&dark, &light, colorimetry)
}

/// Run the full pipeline and assemble the resulting Theme.
pub fn theme_from_image(
    path: &Path,
    colors: usize,
    config: &SamplerConfig,
    overrides: &Overrides,
    colorimetry: &Colorimetry,
) -> Result<Theme> {
    let palette = palette_from_image(path, colors, config, colorimetry)?;
    Theme::assemble(&palette, overrides)
}
