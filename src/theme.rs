use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::color::Color;
use crate::config;
use crate::error::{Error, Result};
use crate::role::{Palette, Role};

pub const TRANSPARENCY: &str = "transparency";

/// A theme entry: a `#rrggbb` color string, a number such as `transparency`, or any
/// other caller-supplied text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Number(f64),
    Text(String),
}

impl ThemeValue {
    pub fn color(color: Color) -> Self {
        Self::Text(color.to_hex())
    }

    /// Parse a command-line style value: finite numbers become `Number`, anything
    /// else `Text`.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Parse the value of a `key=value` entry. Values for role keys, and values
    /// starting with `#`, stay text so digit-only hex such as `112233` survives.
    pub fn parse_entry(key: &str, raw: &str) -> Self {
        if is_color_key(key) || raw.starts_with('#') {
            Self::Text(raw.to_string())
        } else {
            Self::parse(raw)
        }
    }

    pub fn as_color(&self) -> Result<Color> {
        match self {
            Self::Text(text) => Color::from_hex(text),
            Self::Number(n) => Err(Error::invalid_hex(&n.to_string(), "not a color string")),
        }
    }
}

impl std::fmt::Display for ThemeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Caller-supplied entries that take precedence over anything derived from the image.
pub type Overrides = BTreeMap<String, ThemeValue>;

/// A flat role-name → value mapping, ready to persist or render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    values: BTreeMap<String, ThemeValue>,
}

impl Theme {
    /// Build a theme from a palette and overrides.
    ///
    /// Palette roles become `#rrggbb` strings, overrides are merged on top, and
    /// `background`, `foreground` and `transparency` are defaulted when still absent.
    /// Color overrides are validated and normalized to lowercase.
    pub fn assemble(palette: &Palette, overrides: &Overrides) -> Result<Self> {
        let mut values: BTreeMap<String, ThemeValue> = palette
            .iter()
            .map(|(role, sample)| (role.name().to_string(), ThemeValue::color(sample.rgb)))
            .collect();

        for (key, value) in overrides {
            values.insert(key.clone(), normalize_override(key, value)?);
        }

        let mut theme = Self { values };
        theme.apply_defaults();
        Ok(theme)
    }

    fn apply_defaults(&mut self) {
        self.default_from("background", &["color0", "color8"]);
        self.default_from("foreground", &["color7", "color15"]);
        self.values
            .entry(TRANSPARENCY.to_string())
            .or_insert(ThemeValue::Number(1.0));
    }

    fn default_from(&mut self, key: &str, fallbacks: &[&str]) {
        if self.values.contains_key(key) {
            return;
        }
        if let Some(value) = fallbacks.iter().find_map(|k| self.values.get(*k)).cloned() {
            debug!(key, %value, "defaulted theme entry");
            self.values.insert(key.to_string(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ThemeValue> {
        self.values.get(key)
    }

    /// The color stored under `key`, if present.
    pub fn color(&self, key: &str) -> Result<Option<Color>> {
        self.values.get(key).map(ThemeValue::as_color).transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize as a tab-indented JSON object.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the theme to an arbitrary path.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?).map_err(|e| Error::io(path, e))
    }

    /// Save the theme as `<dir>/<name>`, creating `dir` as needed.
    pub fn save_in(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let path = theme_path(dir, name)?;
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        self.write_to(&path)?;
        info!(path = %path.display(), "saved theme");
        Ok(path)
    }

    /// Save the theme under the user themes directory.
    pub fn save(&self, name: &str) -> Result<PathBuf> {
        self.save_in(&themes_dir(), name)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }
}

fn is_color_key(key: &str) -> bool {
    Role::from_name(key).is_some()
}

fn normalize_override(key: &str, value: &ThemeValue) -> Result<ThemeValue> {
    match value {
        ThemeValue::Text(text) if is_color_key(key) || text.starts_with('#') => {
            Color::from_hex(text).map(ThemeValue::color)
        }
        ThemeValue::Number(_) if is_color_key(key) => value.as_color().map(ThemeValue::color),
        ThemeValue::Number(n) if !n.is_finite() => Err(Error::NonFiniteNumber {
            key: key.to_string(),
            value: *n,
        }),
        _ => Ok(value.clone()),
    }
}

/// `<dir>/<name>`, provided `name` is a single plain path component.
fn theme_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name() == Some(std::ffi::OsStr::new(name));
    if !plain {
        return Err(Error::InvalidThemeName {
            name: name.to_string(),
        });
    }
    Ok(dir.join(name))
}

/// Resolve the themes directory: `$XDG_CONFIG_HOME/themer/themes`, falling back to
/// `$HOME/.config/themer/themes`.
pub fn themes_dir() -> PathBuf {
    config::config_dir().join("themes")
}

/// Load a saved theme by name from `dir`.
pub fn load_theme_in(dir: &Path, name: &str) -> Result<Theme> {
    let path = theme_path(dir, name)?;
    if !path.is_file() {
        return Err(Error::UnknownTheme {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        });
    }
    Theme::read_from(&path)
}

pub fn load_theme(name: &str) -> Result<Theme> {
    load_theme_in(&themes_dir(), name)
}

/// Names of the saved themes in `dir`, sorted. A missing directory holds no themes.
pub fn list_themes_in(dir: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

pub fn list_themes() -> Result<Vec<String>> {
    list_themes_in(&themes_dir())
}
