//! Derive terminal color themes from the dominant colors of an image.
//!
//! The pipeline samples an image down to a handful of colors, splits them into dark
//! and light halves, and assigns them to the sixteen numbered terminal roles plus
//! background and foreground:
//!
//! ```no_run
//! use std::path::Path;
//! use themer::{Colorimetry, Overrides, SamplerConfig};
//!
//! let colorimetry = Colorimetry::new();
//! let theme = themer::pipeline::theme_from_image(
//!     Path::new("wallpaper.png"),
//!     18,
//!     &SamplerConfig::default(),
//!     &Overrides::new(),
//!     &colorimetry,
//! )?;
//! println!("{}", theme.to_json()?);
//! # Ok::<(), themer::Error>(())
//! ```

pub mod cli;
pub mod color;
pub mod colorspace;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod preview;
pub mod render;
pub mod role;
pub mod theme;

pub use color::Color;
pub use colorspace::Colorimetry;
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::sample::SamplerConfig;
pub use pipeline::ColorSample;
pub use role::{Palette, Role};
pub use theme::{Overrides, Theme, ThemeValue};
