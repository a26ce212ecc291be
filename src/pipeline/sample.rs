use std::collections::HashMap;
use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use kmeans_colors::get_kmeans_hamerly;
use palette::Lab;
use tracing::debug;

use crate::color::Color;
use crate::colorspace::Colorimetry;
use crate::error::{Error, Result};

use super::{enumeration_order, ColorSample};

/// K-means indices are stored as u8, which caps the cluster count.
pub const MAX_COLORS: usize = 256;

/// Tunables for decoding and quantizing an image.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Visit every `stride`-th pixel on both axes. 1 visits every pixel.
    pub stride: u32,
    /// Colors covering less than this fraction of sampled pixels are dropped as noise.
    pub min_prevalence: f32,
    /// Downscale so the longest side fits, preserving aspect ratio. `None` keeps the
    /// original size.
    pub max_dimension: Option<u32>,
    pub max_iterations: usize,
    pub converge: f32,
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            stride: 1,
            min_prevalence: 0.0005,
            max_dimension: Some(256),
            max_iterations: 20,
            converge: 5.0,
            seed: 42,
        }
    }
}

/// Decode the image at `path`, applying the configured downscale.
pub fn load_image(path: &Path, config: &SamplerConfig) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| Error::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let img = match config.max_dimension {
        Some(max) if img.width() > max || img.height() > max => {
            img.resize(max, max, FilterType::Lanczos3)
        }
        _ => img,
    };
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "decoded image"
    );
    Ok(img.to_rgba8())
}

/// Load an image file and reduce it to exactly `colors` dominant colors.
pub fn sample_file(
    path: &Path,
    colors: usize,
    config: &SamplerConfig,
    colorimetry: &Colorimetry,
) -> Result<Vec<ColorSample>> {
    let image = load_image(path, config)?;
    sample_image(
        &image,
        &path.display().to_string(),
        colors,
        config,
        colorimetry,
    )
}

/// Reduce a decoded image to exactly `colors` dominant colors.
///
/// `source` names the image in errors. Returns samples in enumeration order
/// (Count descending, then RGB ascending). Fails with
/// [`Error::InsufficientVariation`] rather than returning fewer colors.
pub fn sample_image(
    image: &RgbaImage,
    source: &str,
    colors: usize,
    config: &SamplerConfig,
    colorimetry: &Colorimetry,
) -> Result<Vec<ColorSample>> {
    if !(2..=MAX_COLORS).contains(&colors) {
        return Err(Error::InvalidColorCount {
            requested: colors,
            max: MAX_COLORS,
        });
    }

    let pixels = scan(image, config.stride);
    let histogram = quantize(&pixels, colors, config);

    let total = pixels.len() as f32;
    let mut samples: Vec<ColorSample> = histogram
        .into_iter()
        .filter(|(_, count)| *count as f32 / total >= config.min_prevalence)
        .map(|(rgb, count)| ColorSample::new(rgb, count, colorimetry))
        .collect();

    debug!(
        source,
        sampled = pixels.len(),
        distinct = samples.len(),
        requested = colors,
        "built color histogram"
    );

    if samples.len() < colors {
        return Err(Error::InsufficientVariation {
            source_name: source.to_string(),
            requested: colors,
        });
    }

    samples.sort_by(enumeration_order);
    samples.truncate(colors);
    Ok(samples)
}

/// Collect the opaque pixels on the sampling grid.
fn scan(image: &RgbaImage, stride: u32) -> Vec<Color> {
    let step = stride.max(1) as usize;
    let mut pixels = Vec::new();
    for y in (0..image.height()).step_by(step) {
        for x in (0..image.width()).step_by(step) {
            let p = image.get_pixel(x, y);
            if p[3] == 0 {
                continue;
            }
            pixels.push(Color::new(p[0], p[1], p[2]));
        }
    }
    pixels
}

/// Map each pixel onto at most `k` colors and count them.
///
/// Images that already hold `k` or fewer distinct colors keep their exact
/// histogram. Otherwise K-means (Hamerly, K-means++ init) runs in Lab and each
/// pixel counts toward its centroid; centroids that round to the same 8-bit
/// color are merged.
fn quantize(pixels: &[Color], k: usize, config: &SamplerConfig) -> HashMap<Color, u32> {
    let mut exact: HashMap<Color, u32> = HashMap::new();
    for &color in pixels {
        *exact.entry(color).or_insert(0) += 1;
    }
    if exact.len() <= k {
        return exact;
    }

    let labs: Vec<Lab> = pixels.iter().map(|c| c.to_lab()).collect();
    let result = get_kmeans_hamerly(
        k,
        config.max_iterations,
        config.converge,
        false,
        &labs,
        config.seed,
    );

    let centroids: Vec<Color> = result.centroids.iter().map(|lab| Color::from_lab(*lab)).collect();
    let mut histogram: HashMap<Color, u32> = HashMap::new();
    for &idx in &result.indices {
        *histogram.entry(centroids[idx as usize]).or_insert(0) += 1;
    }
    histogram
}
