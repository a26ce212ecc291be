use crossterm::style::{Color as TermColor, Stylize};

use crate::color::Color;
use crate::role::Role;
use crate::theme::Theme;

const SWATCH: &str = "      ";

fn to_term(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Choose black or white text for readability on the given background.
fn contrast_fg(c: Color) -> TermColor {
    if c.relative_luminance() > 0.4 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

/// One line per color entry: a truecolor swatch, then `name = #hex` written in
/// the theme's foreground on its background. Roles come first in role order;
/// other color-valued keys follow alphabetically.
pub fn render(theme: &Theme) -> String {
    let background = theme.color("background").ok().flatten();
    let foreground = theme.color("foreground").ok().flatten();

    let mut keys: Vec<&str> = Vec::with_capacity(theme.len() + Role::COUNT);
    for role in Role::all() {
        keys.push(role.name());
    }
    keys.extend(
        theme
            .iter()
            .map(|(key, _)| key)
            .filter(|key| Role::from_name(key).is_none()),
    );

    let mut lines = Vec::new();
    for key in keys {
        let Ok(Some(color)) = theme.color(key) else {
            continue;
        };
        let swatch = SWATCH.on(to_term(color));
        let label = format!(" {key:<12} = {} ", color.to_hex());
        let label = match (foreground, background) {
            (Some(fg), Some(bg)) => label.with(to_term(fg)).on(to_term(bg)),
            _ => label.with(contrast_fg(color)).on(to_term(color)),
        };
        lines.push(format!("{swatch}{label}"));
    }
    lines.join("\n")
}
