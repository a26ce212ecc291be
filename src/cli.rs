use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing::info;

use crate::colorspace::Colorimetry;
use crate::config::{self, Config};
use crate::pipeline::{self, sample::SamplerConfig};
use crate::preview;
use crate::render;
use crate::theme::{self, Overrides, ThemeValue};

/// Generate terminal color themes from images.
#[derive(Parser, Debug)]
#[command(name = "themer", version, about)]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a theme from an image
    Create(CreateArgs),
    /// Render a saved theme through a template
    Switch(SwitchArgs),
    /// List saved themes
    List,
}

#[derive(ClapArgs, Debug)]
pub struct CreateArgs {
    /// Path to the input image
    pub image: PathBuf,

    /// Theme name (defaults to image filename stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Number of colors to quantize the image to (18 fills all sixteen colors plus
    /// background and foreground)
    #[arg(short = 'k', long = "colors", default_value_t = 18)]
    pub colors: usize,

    /// Sample every Nth pixel on both axes
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub stride: u32,

    /// Drop colors covering less than this fraction of the image
    #[arg(long, default_value_t = 0.0005)]
    pub min_prevalence: f32,

    /// Downscale the image so its longest side fits (0 disables)
    #[arg(long, default_value_t = 256)]
    pub max_dim: u32,

    /// Override a theme entry, e.g. -s foreground=#ffffff -s transparency=0.9
    #[arg(short = 's', long = "set", value_parser = parse_override)]
    pub overrides: Vec<(String, ThemeValue)>,

    /// Write the theme to this file instead of the themes directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the theme JSON to stdout instead of saving it
    #[arg(long, conflicts_with = "output")]
    pub no_save: bool,

    /// Print a colored terminal preview of the theme
    #[arg(long)]
    pub preview: bool,
}

#[derive(ClapArgs, Debug)]
pub struct SwitchArgs {
    /// Name of a saved theme
    pub name: String,

    /// Template file to render (defaults to "template" in config.json)
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Write the rendered file here (defaults to "output" in config.json, else stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_override(raw: &str) -> std::result::Result<(String, ThemeValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    Ok((key.to_string(), ThemeValue::parse_entry(key, value.trim())))
}

impl CreateArgs {
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            stride: self.stride,
            min_prevalence: self.min_prevalence,
            max_dimension: (self.max_dim > 0).then_some(self.max_dim),
            ..SamplerConfig::default()
        }
    }

    fn theme_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.image
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "theme".to_string())
        })
    }

    pub fn run(&self, colorimetry: &Colorimetry) -> Result<()> {
        let overrides: Overrides = self.overrides.iter().cloned().collect();
        let theme = pipeline::theme_from_image(
            &self.image,
            self.colors,
            &self.sampler_config(),
            &overrides,
            colorimetry,
        )
        .with_context(|| format!("failed to create a theme from {}", self.image.display()))?;

        if self.preview {
            println!("{}", preview::render(&theme));
        }

        if self.no_save {
            print!("{}", theme.to_json()?);
        } else if let Some(path) = &self.output {
            theme
                .write_to(path)
                .with_context(|| format!("failed to write theme to {}", path.display()))?;
            info!(path = %path.display(), "wrote theme");
        } else {
            let path = theme.save(&self.theme_name())?;
            println!("{}", path.display());
        }
        Ok(())
    }
}

impl SwitchArgs {
    pub fn run(&self) -> Result<()> {
        let config = Config::load().context("failed to read config.json")?;
        self.run_with(&config)
    }

    fn run_with(&self, config: &Config) -> Result<()> {
        let Some(template) = self.template.as_ref().or(config.template.as_ref()) else {
            bail!(
                "no template given: pass -t or set \"template\" in {}",
                config::config_dir().join(config::CONFIG_FILE).display()
            );
        };
        let theme = theme::load_theme(&self.name)?;
        match self.output.as_ref().or(config.output.as_ref()) {
            Some(output) => render::render_to(template, &theme, output)?,
            None => print!("{}", render::render_file(template, &theme)?),
        }
        Ok(())
    }
}

pub fn list() -> Result<()> {
    for name in theme::list_themes()? {
        println!("{name}");
    }
    Ok(())
}
