//! RGB to CIELAB conversion and the canonical terminal reference hues.
//!
//! Everything here is fixed at construction: sRGB is decoded to D65 XYZ, adapted to the
//! D50 reference white with the Bradford transform, then projected to Lab. A
//! [`Colorimetry`] value bundles that conversion with the reference tables and the
//! CIEDE2000 weights, is built once, and is shared by reference through the pipeline.

use palette::chromatic_adaptation::{AdaptInto, Method};
use palette::white_point::{D50, D65};
use palette::{FromColor, Lab, Xyz};

use crate::color::Color;
use crate::pipeline::distance::{self, Weights};

/// Lab under the D50 reference white, the space all perceptual comparisons use.
pub type LabD50 = Lab<D50, f32>;

/// Number of hues in each reference tier.
pub const TIER_SIZE: usize = 8;

/// Standard-intensity terminal hues, in slot order 0..=7.
pub const NORMAL_REFERENCE: [Color; TIER_SIZE] = [
    Color::new(0, 0, 0),
    Color::new(205, 0, 0),
    Color::new(0, 205, 0),
    Color::new(205, 205, 0),
    Color::new(0, 0, 238),
    Color::new(205, 0, 205),
    Color::new(0, 205, 205),
    Color::new(229, 229, 229),
];

/// Full-intensity terminal hues, in slot order 8..=15.
pub const BRIGHT_REFERENCE: [Color; TIER_SIZE] = [
    Color::new(127, 127, 127),
    Color::new(255, 0, 0),
    Color::new(0, 255, 0),
    Color::new(255, 255, 0),
    Color::new(92, 92, 255),
    Color::new(255, 0, 255),
    Color::new(0, 255, 255),
    Color::new(255, 255, 255),
];

pub const HUE_NAMES: [&str; TIER_SIZE] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Intensity tier of the numbered roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Normal,
    Bright,
}

impl Tier {
    /// First numbered slot belonging to this tier.
    pub const fn first_slot(self) -> u8 {
        match self {
            Tier::Normal => 0,
            Tier::Bright => TIER_SIZE as u8,
        }
    }
}

/// Immutable conversion context shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct Colorimetry {
    weights: Weights,
    normal: [LabD50; TIER_SIZE],
    bright: [LabD50; TIER_SIZE],
}

impl Colorimetry {
    pub fn new() -> Self {
        Self::with_weights(Weights::default())
    }

    pub fn with_weights(weights: Weights) -> Self {
        Self {
            weights,
            normal: NORMAL_REFERENCE.map(to_lab_d50),
            bright: BRIGHT_REFERENCE.map(to_lab_d50),
        }
    }

    /// Convert an 8-bit sRGB color to D50 Lab. Bit-for-bit deterministic.
    pub fn to_lab(&self, color: Color) -> LabD50 {
        to_lab_d50(color)
    }

    /// Lab values of the reference hues for `tier`, in slot order.
    pub fn reference(&self, tier: Tier) -> &[LabD50; TIER_SIZE] {
        match tier {
            Tier::Normal => &self.normal,
            Tier::Bright => &self.bright,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// ΔE00 between two colors under this context's weights.
    pub fn distance(&self, a: &LabD50, b: &LabD50) -> f32 {
        distance::ciede2000(a, b, &self.weights)
    }

    /// Positive if `c0` is farther from `base` than `c1`, negative if closer.
    pub fn diff(&self, base: &LabD50, c0: &LabD50, c1: &LabD50) -> f32 {
        distance::diff(base, c0, c1, &self.weights)
    }
}

impl Default for Colorimetry {
    fn default() -> Self {
        Self::new()
    }
}

fn to_lab_d50(color: Color) -> LabD50 {
    let xyz: Xyz<D65, f32> = Xyz::from_color(color.to_srgb_f32());
    let adapted: Xyz<D50, f32> = xyz.adapt_into_using(Method::Bradford);
    Lab::from_color(adapted)
}
