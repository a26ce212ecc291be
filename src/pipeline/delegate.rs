use tracing::{debug, warn};

use crate::colorspace::{Colorimetry, Tier, HUE_NAMES, TIER_SIZE};
use crate::error::{Error, Result};
use crate::role::{Palette, Role};

use super::{enumeration_order, ColorSample};

/// Assign dark and light samples to terminal roles.
///
/// Background is the most frequent dark sample. Foreground is the light sample
/// farthest from it. The remaining dark samples then greedily claim the nearest
/// unclaimed normal-tier hue (slots 0-7) and the remaining light samples the nearest
/// unclaimed bright-tier hue (slots 8-15). Both passes walk samples in enumeration
/// order, so the result is reproducible. Slots nobody claims stay empty; samples
/// left over once a tier is full are dropped.
pub fn delegate(
    dark: &[ColorSample],
    light: &[ColorSample],
    colorimetry: &Colorimetry,
) -> Result<Palette> {
    if dark.is_empty() || light.is_empty() {
        return Err(Error::EmptyPartition {
            dark: dark.len(),
            light: light.len(),
        });
    }

    let mut dark = dark.to_vec();
    let mut light = light.to_vec();
    dark.sort_by(enumeration_order);
    light.sort_by(enumeration_order);

    let mut palette = Palette::new();

    let background = dark.remove(0);
    palette.insert(Role::BACKGROUND, background);

    let foreground = light.remove(farthest_from(&background, &light, colorimetry));
    palette.insert(Role::FOREGROUND, foreground);
    debug!(
        background = %background.rgb,
        foreground = %foreground.rgb,
        "selected background and foreground"
    );

    claim_tier(&mut palette, Tier::Normal, &dark, colorimetry);
    claim_tier(&mut palette, Tier::Bright, &light, colorimetry);

    Ok(palette)
}

/// Index of the candidate farthest from `base`; the first one wins ties.
fn farthest_from(base: &ColorSample, candidates: &[ColorSample], colorimetry: &Colorimetry) -> usize {
    let mut best = 0;
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        if colorimetry.diff(&base.lab, &candidate.lab, &candidates[best].lab) > 0.0 {
            best = i;
        }
    }
    best
}

fn claim_tier(
    palette: &mut Palette,
    tier: Tier,
    samples: &[ColorSample],
    colorimetry: &Colorimetry,
) {
    let references = colorimetry.reference(tier);
    let mut claimed = [false; TIER_SIZE];

    for (position, sample) in samples.iter().enumerate() {
        let nearest = (0..TIER_SIZE)
            .filter(|&hue| !claimed[hue])
            .reduce(|best, hue| {
                if colorimetry.diff(&sample.lab, &references[hue], &references[best]) < 0.0 {
                    hue
                } else {
                    best
                }
            });

        let Some(hue) = nearest else {
            warn!(
                ?tier,
                dropped = samples.len() - position,
                "more colors than roles; dropping the least frequent"
            );
            break;
        };

        claimed[hue] = true;
        let slot = tier.first_slot() + hue as u8;
        if let Some(role) = Role::color(slot) {
            debug!(%role, hue = HUE_NAMES[hue], color = %sample.rgb, "claimed role");
            palette.insert(role, *sample);
        }
    }
}
