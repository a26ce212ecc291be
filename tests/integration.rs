use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use themer::pipeline::partition::partition;
use themer::pipeline::sample::sample_image;
use themer::pipeline::{delegate::delegate, palette_from_image, theme_from_image};
use themer::{Colorimetry, Error, Overrides, Role, SamplerConfig, Theme, ThemeValue};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Nine dark and nine light colors, each close to a different terminal hue.
const EIGHTEEN: [[u8; 3]; 18] = [
    [8, 8, 12],
    [20, 20, 20],
    [150, 20, 20],
    [20, 130, 20],
    [130, 130, 20],
    [20, 20, 170],
    [130, 20, 130],
    [20, 130, 130],
    [110, 110, 110],
    [160, 160, 160],
    [250, 60, 60],
    [60, 250, 60],
    [250, 250, 60],
    [120, 120, 250],
    [250, 60, 250],
    [60, 250, 250],
    [235, 235, 235],
    [255, 255, 255],
];

fn create_striped(path: &Path, colors: &[[u8; 3]]) {
    let img = image::RgbImage::from_fn(4 * colors.len() as u32, 16, |x, _| {
        image::Rgb(colors[(x / 4) as usize])
    });
    img.save(path).unwrap();
}

fn create_solid(path: &Path) {
    image::RgbImage::from_pixel(64, 64, image::Rgb([70, 90, 110]))
        .save(path)
        .unwrap();
}

fn fixture(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    match name {
        "solid.png" => create_solid(&path),
        _ => create_striped(&path, &EIGHTEEN),
    }
    path
}

fn validate_theme(theme: &Theme) {
    let hex_re = regex::Regex::new(r"^#[0-9a-f]{6}$").unwrap();
    for role in Role::all() {
        let value = theme
            .get(role.name())
            .unwrap_or_else(|| panic!("missing {role}"));
        assert!(
            hex_re.is_match(&value.to_string()),
            "{role} is not lowercase hex: {value}"
        );
    }
    assert_eq!(theme.get("transparency"), Some(&ThemeValue::Number(1.0)));
}

// ---------------------------------------------------------------------------
// Pipeline tests
// ---------------------------------------------------------------------------

#[test]
fn eighteen_color_image_fills_every_role() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "stripes.png");
    let cm = Colorimetry::new();

    let palette = palette_from_image(&path, 18, &SamplerConfig::default(), &cm).unwrap();
    assert!(palette.is_complete());

    let mut placed: Vec<_> = palette.iter().map(|(_, s)| s.rgb).collect();
    placed.sort();
    placed.dedup();
    assert_eq!(placed.len(), Role::COUNT, "a color was assigned twice");

    let theme = Theme::assemble(&palette, &Overrides::new()).unwrap();
    validate_theme(&theme);
    assert_eq!(theme.len(), Role::COUNT + 1);
}

#[test]
fn solid_image_reports_insufficient_variation() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "solid.png");

    let err = theme_from_image(
        &path,
        16,
        &SamplerConfig::default(),
        &Overrides::new(),
        &Colorimetry::new(),
    )
    .unwrap_err();

    match &err {
        Error::InsufficientVariation {
            source_name,
            requested,
        } => {
            assert_eq!(source_name, &path.display().to_string());
            assert_eq!(*requested, 16);
        }
        other => panic!("expected InsufficientVariation, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("solid.png") && message.contains("16"), "{message}");
}

#[test]
fn pipeline_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "stripes.png");
    let cm = Colorimetry::new();
    let run = || {
        theme_from_image(&path, 18, &SamplerConfig::default(), &Overrides::new(), &cm).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn overrides_reach_the_final_theme() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "stripes.png");
    let mut overrides = Overrides::new();
    overrides.insert("foreground".into(), ThemeValue::Text("#FFFFFF".into()));
    overrides.insert("transparency".into(), ThemeValue::Number(0.8));

    let theme = theme_from_image(
        &path,
        18,
        &SamplerConfig::default(),
        &overrides,
        &Colorimetry::new(),
    )
    .unwrap();
    assert_eq!(
        theme.get("foreground"),
        Some(&ThemeValue::Text("#ffffff".into()))
    );
    assert_eq!(theme.get("transparency"), Some(&ThemeValue::Number(0.8)));
}

#[test]
fn background_comes_from_the_darkest_half() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "stripes.png");
    let palette = palette_from_image(&path, 18, &SamplerConfig::default(), &Colorimetry::new())
        .unwrap();

    let background = palette.background().unwrap();
    let foreground = palette.foreground().unwrap();
    assert!(background.lab.l < foreground.lab.l);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Generate a random synthetic image.
    fn arb_image() -> impl Strategy<Value = image::RgbaImage> {
        (4u32..=16u32, 4u32..=16u32).prop_flat_map(|(w, h)| {
            proptest::collection::vec(proptest::array::uniform3(0u8..=255u8), (w * h) as usize)
                .prop_map(move |pixels| {
                    image::RgbaImage::from_fn(w, h, |x, y| {
                        let [r, g, b] = pixels[(y * w + x) as usize];
                        image::Rgba([r, g, b, 255])
                    })
                })
        })
    }

    proptest! {
        #[test]
        fn random_images_yield_valid_themes_or_a_variation_error(img in arb_image()) {
            let cm = Colorimetry::new();
            let samples = match sample_image(&img, "random", 6, &SamplerConfig::default(), &cm) {
                Ok(samples) => samples,
                Err(Error::InsufficientVariation { requested, .. }) => {
                    prop_assert_eq!(requested, 6);
                    return Ok(());
                }
                Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
            };
            prop_assert_eq!(samples.len(), 6);
            prop_assert!(samples.iter().all(|s| s.count >= 1));

            let (dark, light) = partition(&samples).unwrap();
            let palette = delegate(&dark, &light, &cm).unwrap();
            prop_assert_eq!(palette.len(), 6);

            let theme = Theme::assemble(&palette, &Overrides::new()).unwrap();
            prop_assert!(theme.color("background").unwrap().is_some());
            prop_assert!(theme.color("foreground").unwrap().is_some());
        }
    }
}

// ---------------------------------------------------------------------------
// CLI integration tests (run the actual binary)
// ---------------------------------------------------------------------------

fn themer(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_themer"));
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_no_save_prints_theme_json() {
    let dir = TempDir::new().unwrap();
    let image = fixture(&dir, "stripes.png");

    let output = themer(dir.path())
        .args(["create", image.to_str().unwrap(), "-k", "18", "--no-save"])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let theme = Theme::from_json(&String::from_utf8_lossy(&output.stdout)).unwrap();
    validate_theme(&theme);
}

#[test]
fn cli_output_flag_writes_file() {
    let dir = TempDir::new().unwrap();
    let image = fixture(&dir, "stripes.png");
    let out_path = dir.path().join("theme.json");

    let output = themer(dir.path())
        .args(["create", image.to_str().unwrap(), "-k", "18", "-o"])
        .arg(&out_path)
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    validate_theme(&Theme::read_from(&out_path).unwrap());
}

#[test]
fn cli_create_list_and_switch() {
    let dir = TempDir::new().unwrap();
    let image = fixture(&dir, "stripes.png");

    let created = themer(dir.path())
        .args(["create", image.to_str().unwrap(), "-k", "18", "-n", "stripes"])
        .args(["-s", "transparency=0.75"])
        .output()
        .expect("failed to run binary");
    assert!(created.status.success(), "{}", String::from_utf8_lossy(&created.stderr));
    let saved = dir.path().join("themer").join("themes").join("stripes");
    assert!(saved.exists(), "theme should be saved under XDG_CONFIG_HOME");

    let listed = themer(dir.path()).arg("list").output().unwrap();
    assert_eq!(String::from_utf8_lossy(&listed.stdout).trim(), "stripes");

    let template = dir.path().join("termite.tmpl");
    std::fs::write(
        &template,
        "background = {{ background }}\nalpha = {{ transparency }}\nred = {{ color1 | rgb }}\n",
    )
    .unwrap();
    let switched = themer(dir.path())
        .args(["switch", "stripes", "-t"])
        .arg(&template)
        .output()
        .unwrap();
    assert!(switched.status.success(), "{}", String::from_utf8_lossy(&switched.stderr));

    let rendered = String::from_utf8_lossy(&switched.stdout);
    let re = regex::Regex::new(r"(?m)^background = #[0-9a-f]{6}\nalpha = 0\.75\nred = \d+,\d+,\d+$")
        .unwrap();
    assert!(re.is_match(&rendered), "unexpected render: {rendered}");
}

#[test]
fn cli_switch_unknown_theme_fails() {
    let dir = TempDir::new().unwrap();
    let output = themer(dir.path())
        .args(["switch", "nope", "-t", "whatever.tmpl"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no saved theme"));
}

#[test]
fn cli_help_output() {
    let dir = TempDir::new().unwrap();
    let output = themer(dir.path()).args(["create", "--help"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--colors", "--stride", "--min-prevalence", "--set", "--preview"] {
        assert!(stdout.contains(flag), "help should mention {flag}");
    }
}

#[test]
fn cli_file_not_found_error() {
    let dir = TempDir::new().unwrap();
    let output = themer(dir.path())
        .args(["create", "/nonexistent/image.png"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No such file") || stderr.contains("not found"),
        "expected file-not-found error, got: {stderr}"
    );
}

#[test]
fn cli_solid_image_names_path_and_count() {
    let dir = TempDir::new().unwrap();
    let image = fixture(&dir, "solid.png");
    let output = themer(dir.path())
        .args(["create", image.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("solid.png"), "{stderr}");
    assert!(stderr.contains("18 color palette"), "{stderr}");
}

#[test]
fn cli_default_color_count_writes_every_numbered_role() {
    let dir = TempDir::new().unwrap();
    let image = fixture(&dir, "stripes.png");

    let output = themer(dir.path())
        .args(["create", image.to_str().unwrap(), "--no-save"])
        .args(["-s", "color1=112233"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let theme = Theme::from_json(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let missing: Vec<String> = (0..16)
        .map(|n| format!("color{n}"))
        .filter(|key| theme.get(key).is_none())
        .collect();
    assert!(missing.is_empty(), "missing numbered roles: {missing:?}");
    validate_theme(&theme);
    assert_eq!(theme.get("color1"), Some(&ThemeValue::Text("#112233".into())));
}

#[test]
fn cli_switch_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    let image = fixture(&dir, "stripes.png");
    let created = themer(dir.path())
        .args(["create", image.to_str().unwrap(), "-n", "stripes"])
        .output()
        .unwrap();
    assert!(created.status.success(), "{}", String::from_utf8_lossy(&created.stderr));

    let template = dir.path().join("kitty.tmpl");
    std::fs::write(&template, "foreground {{ foreground }}\n").unwrap();
    let target = dir.path().join("kitty").join("theme.conf");
    let config = serde_json::json!({ "template": template, "output": target });
    std::fs::write(
        dir.path().join("themer").join("config.json"),
        config.to_string(),
    )
    .unwrap();

    let switched = themer(dir.path()).args(["switch", "stripes"]).output().unwrap();
    assert!(switched.status.success(), "{}", String::from_utf8_lossy(&switched.stderr));
    let rendered = std::fs::read_to_string(&target).unwrap();
    assert!(
        regex::Regex::new(r"^foreground #[0-9a-f]{6}\n$").unwrap().is_match(&rendered),
        "{rendered}"
    );
}

#[test]
fn cli_rejects_theme_names_outside_the_themes_dir() {
    let dir = TempDir::new().unwrap();
    let image = fixture(&dir, "stripes.png");

    let output = themer(dir.path())
        .args(["create", image.to_str().unwrap(), "-n", "../../escaped"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid theme name"));
    assert!(!dir.path().join("escaped").exists());

    let output = themer(dir.path())
        .args(["switch", "../x", "-t", "whatever.tmpl"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid theme name"));
}
