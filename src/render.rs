//! Render saved themes into application config files.
//!
//! Templates are Jinja-style (minijinja). Every theme key is a top-level variable, so
//! `{{ color1 }}` expands to `#rrggbb`. Referencing a key the theme lacks is an error. Filters decompose colors for formats that
//! want components instead of hex:
//!
//! | filter  | `{{ color1 \| filter }}` |
//! |---------|--------------------------|
//! | `rgb`   | `205,0,0`                |
//! | `red`   | `205`                    |
//! | `green` | `0`                      |
//! | `blue`  | `0`                      |
//! | `strip` | `cd0000`                 |

use std::path::Path;

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use tracing::info;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::theme::Theme;

fn parse(value: &str) -> std::result::Result<Color, minijinja::Error> {
    Color::from_hex(value)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_filter("rgb", |value: String| {
        parse(&value).map(|c| format!("{},{},{}", c.r, c.g, c.b))
    });
    env.add_filter("red", |value: String| parse(&value).map(|c| c.r));
    env.add_filter("green", |value: String| parse(&value).map(|c| c.g));
    env.add_filter("blue", |value: String| parse(&value).map(|c| c.b));
    env.add_filter("strip", |value: String| {
        parse(&value).map(|c| c.to_hex().trim_start_matches('#').to_string())
    });
    env
}

/// Render template source with the theme as context.
pub fn render_str(template: &str, theme: &Theme) -> Result<String> {
    Ok(environment().render_str(template, theme)?)
}

/// Render the template file at `template` with the theme as context.
pub fn render_file(template: &Path, theme: &Theme) -> Result<String> {
    let source = std::fs::read_to_string(template).map_err(|e| Error::io(template, e))?;
    render_str(&source, theme)
}

/// Render `template` and write the result to `output`.
pub fn render_to(template: &Path, theme: &Theme, output: &Path) -> Result<()> {
    let rendered = render_file(template, theme)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(output, rendered).map_err(|e| Error::io(output, e))?;
    info!(template = %template.display(), output = %output.display(), "rendered theme");
    Ok(())
}
