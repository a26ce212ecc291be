//! CIEDE2000 color difference and the relative comparator built on it.

use palette::white_point::D50;
use palette::Lab;

/// Parametric weighting factors (kL, kC, kH) of the CIEDE2000 formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub lightness: f32,
    pub chroma: f32,
    pub hue: f32,
}

impl Default for Weights {
    /// Reference conditions: kL = kC = kH = 1.
    fn default() -> Self {
        Self {
            lightness: 1.0,
            chroma: 1.0,
            hue: 1.0,
        }
    }
}

/// CIEDE2000 color difference ΔE00 between two Lab colors.
pub fn ciede2000(lab1: &Lab<D50, f32>, lab2: &Lab<D50, f32>, weights: &Weights) -> f32 {
    let (l1, a1, b1) = (lab1.l, lab1.a, lab1.b);
    let (l2, a2, b2) = (lab2.l, lab2.a, lab2.b);

    let c1 = a1.hypot(b1);
    let c2 = a2.hypot(b2);
    let avg_c7 = (0.5 * (c1 + c2)).powi(7);
    let g = 0.5 * (1.0 - (avg_c7 / (avg_c7 + 25.0_f32.powi(7))).sqrt());

    let a1p = (1.0 + g) * a1;
    let a2p = (1.0 + g) * a2;
    let c1p = a1p.hypot(b1);
    let c2p = a2p.hypot(b2);
    let h1p = hue_angle(b1, a1p);
    let h2p = hue_angle(b2, a2p);

    let delta_lp = l2 - l1;
    let delta_cp = c2p - c1p;
    let chroma_product = c1p * c2p;

    let delta_h = if chroma_product == 0.0 {
        0.0
    } else if (h2p - h1p).abs() <= 180.0 {
        h2p - h1p
    } else if h2p <= h1p {
        h2p - h1p + 360.0
    } else {
        h2p - h1p - 360.0
    };
    let delta_hp = 2.0 * chroma_product.sqrt() * (0.5 * delta_h).to_radians().sin();

    let avg_lp = 0.5 * (l1 + l2);
    let avg_cp = 0.5 * (c1p + c2p);
    let avg_hp = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        0.5 * (h1p + h2p)
    } else if h1p + h2p < 360.0 {
        0.5 * (h1p + h2p + 360.0)
    } else {
        0.5 * (h1p + h2p - 360.0)
    };

    let t = 1.0 - 0.17 * (avg_hp - 30.0).to_radians().cos()
        + 0.24 * (2.0 * avg_hp).to_radians().cos()
        + 0.32 * (3.0 * avg_hp + 6.0).to_radians().cos()
        - 0.20 * (4.0 * avg_hp - 63.0).to_radians().cos();

    let lp50 = (avg_lp - 50.0).powi(2);
    let sl = 1.0 + 0.015 * lp50 / (20.0 + lp50).sqrt();
    let sc = 1.0 + 0.045 * avg_cp;
    let sh = 1.0 + 0.015 * avg_cp * t;

    let delta_theta = 30.0 * (-((avg_hp - 275.0) / 25.0).powi(2)).exp();
    let avg_cp7 = avg_cp.powi(7);
    let rc = 2.0 * (avg_cp7 / (avg_cp7 + 25.0_f32.powi(7))).sqrt();
    let rt = -rc * (2.0 * delta_theta).to_radians().sin();

    let dl = delta_lp / (weights.lightness * sl);
    let dc = delta_cp / (weights.chroma * sc);
    let dh = delta_hp / (weights.hue * sh);

    (dl * dl + dc * dc + dh * dh + rt * dc * dh).max(0.0).sqrt()
}

/// Relative comparator against a shared base: positive when `c0` is farther from
/// `base` than `c1`, negative when closer, zero when equally far.
pub fn diff(
    base: &Lab<D50, f32>,
    c0: &Lab<D50, f32>,
    c1: &Lab<D50, f32>,
    weights: &Weights,
) -> f32 {
    ciede2000(c0, base, weights) - ciede2000(c1, base, weights)
}

fn hue_angle(b: f32, a_prime: f32) -> f32 {
    if b == 0.0 && a_prime == 0.0 {
        0.0
    } else {
        b.atan2(a_prime).to_degrees().rem_euclid(360.0)
    }
}
