use std::path::Path;

use super::color::*;
use super::error::*;
use super::map::*;

enum Format {
    Json,
    Ron,
    Yaml,
    Text,
}

fn format_of(path: &Path) -> Format {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Format::Json,
        Some("ron") => Format::Ron,
        Some("yaml") | Some("yml") => Format::Yaml,
        _ => Format::Text,
    }
}

impl ColorMapper {
    pub fn from_json(src: &str) -> serde_json::Result<ColorMapper> {
        serde_json::from_str(src)
    }

    pub fn from_ron(src: &str) -> ron::error::SpannedResult<ColorMapper> {
        ron::from_str(src)
    }

    pub fn from_yaml(src: &str) -> Result<ColorMapper, serde_yaml::Error> {
        serde_yaml::from_str(src)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<ColorMapper, ColormapError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mapper = match format_of(path.as_ref()) {
            Format::Json => ColorMapper::from_json(&contents)?,
            Format::Ron => ColorMapper::from_ron(&contents)?,
            Format::Yaml => ColorMapper::from_yaml(&contents)?,
            Format::Text => return Err(ColormapError::ExtensionError),
        };
        mapper.binning.check(mapper.palette.len())?;
        Ok(mapper)
    }
}

/// Parses numbers separated by whitespace or commas. `#` starts a comment.
pub fn parse_values(src: &str) -> Result<Vec<f64>, ColormapError> {
    let mut values = Vec::new();
    for (n, line) in src.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("");
        for token in line.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            let v = token.parse().map_err(|_| ColormapError::ValueParseError {
                line: n + 1,
                token: token.to_string(),
            })?;
            values.push(v);
        }
    }
    Ok(values)
}

/// Reads scalar values: a serialized list for `.json`, `.ron` and `.yaml`
/// files, [`parse_values`] text otherwise.
pub fn read_values(path: impl AsRef<Path>) -> Result<Vec<f64>, ColormapError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    Ok(match format_of(path.as_ref()) {
        Format::Json => serde_json::from_str(&contents)?,
        Format::Ron => ron::from_str(&contents)?,
        Format::Yaml => serde_yaml::from_str(&contents)?,
        Format::Text => parse_values(&contents)?,
    })
}

pub fn format_colors(colors: &[Color]) -> String {
    let mut out = String::with_capacity(colors.len() * 24);
    for c in colors {
        out.push_str(&format!("{} {} {}\n", c.red, c.green, c.blue));
    }
    out
}

/// Writes one `[r, g, b]` triple per color, serialized according to the
/// extension of `path`; unknown extensions get one `r g b` line per color.
pub fn write_colors(path: impl AsRef<Path>, colors: &[Color]) -> Result<(), ColormapError> {
    let out = match format_of(path.as_ref()) {
        Format::Json => serde_json::to_string(colors)?,
        Format::Ron => ron::to_string(colors)?,
        Format::Yaml => serde_yaml::to_string(colors)?,
        Format::Text => format_colors(colors),
    };
    std::fs::write(path, out)?;
    Ok(())
}
