use tracing::debug;

use crate::error::{Error, Result};

use super::{enumeration_order, ColorSample};

/// Split samples into dark and light halves at the median Lab lightness.
///
/// Samples are ordered by lightness, with equal lightness falling back to the
/// enumeration order, and the lower ⌊n/2⌋ become the dark half. Both halves are
/// non-empty for two or more samples.
pub fn partition(samples: &[ColorSample]) -> Result<(Vec<ColorSample>, Vec<ColorSample>)> {
    if samples.len() < 2 {
        let dark = samples.len();
        return Err(Error::EmptyPartition { dark, light: 0 });
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| {
        a.lab
            .l
            .total_cmp(&b.lab.l)
            .then_with(|| enumeration_order(a, b))
    });

    let light = sorted.split_off(sorted.len() / 2);
    debug!(
        dark = sorted.len(),
        light = light.len(),
        median_l = light[0].lab.l,
        "partitioned samples"
    );
    Ok((sorted, light))
}
