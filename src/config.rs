use std::path::Path;

use anyhow::{Context, Result};

use crate::parser::lexer::LineError;
use crate::parser::types::Rgb;
use crate::state::TurtleState;
use crate::validator::PEN_WIDTH_RANGE;

/// Session settings. The pen fields are the defaults that `clear` and replay return to.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub canvas_width: u16,
    pub canvas_height: u16,
    pub pen: TurtleState,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            pen: TurtleState::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read settings file {}", path.display()))?;
        parse_settings(&content).with_context(|| format!("in {}", path.display()))
    }
}

/// Parse `key: value` lines. `#` starts a comment; unknown keys are ignored.
pub fn parse_settings(input: &str) -> Result<Settings, LineError> {
    let mut settings = Settings::default();

    for (i, line) in input.lines().enumerate() {
        let line_number = i + 1;
        let without_comment = match line.find('#') {
            Some(hash_pos) => line[..hash_pos].trim(),
            None => line.trim(),
        };
        if without_comment.is_empty() {
            continue;
        }

        let error = |message: String| LineError {
            line_number,
            line_content: line.to_string(),
            message,
        };

        let Some((key, value)) = without_comment.split_once(':') else {
            return Err(error("Expected 'key: value' format".to_string()));
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "canvas_width" => {
                settings.canvas_width = parse_dimension(value)
                    .ok_or_else(|| error(format!("Invalid canvas_width value: '{value}'")))?;
            }
            "canvas_height" => {
                settings.canvas_height = parse_dimension(value)
                    .ok_or_else(|| error(format!("Invalid canvas_height value: '{value}'")))?;
            }
            "pen_color" => {
                let parts: Vec<i32> = value
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .map_err(|_| error(format!("Invalid pen_color value: '{value}'")))?;
                let [r, g, b] = parts[..] else {
                    return Err(error(format!(
                        "pen_color needs three components, got '{value}'"
                    )));
                };
                settings.pen.color = Rgb::new(r, g, b);
            }
            "pen_width" => {
                settings.pen.width = value
                    .parse::<u8>()
                    .ok()
                    .filter(|w| PEN_WIDTH_RANGE.contains(&i32::from(*w)))
                    .ok_or_else(|| error(format!("pen_width must be 1-10, got '{value}'")))?;
            }
            "pen_down" => {
                settings.pen.pen_down = value
                    .parse()
                    .map_err(|_| error(format!("Invalid pen_down value: '{value}'")))?;
            }
            _ => {
                tracing::debug!("ignoring unknown settings key '{key}'");
            }
        }
    }

    Ok(settings)
}

/// A canvas side in cells; zero is rejected.
fn parse_dimension(value: &str) -> Option<u16> {
    value.parse::<u16>().ok().filter(|&v| v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.canvas_width, 800);
        assert_eq!(settings.pen.color, Rgb::BLUE);
    }

    #[test]
    fn test_settings_all_fields() {
        let input = "\
canvas_width: 1024
canvas_height: 768   # tall
pen_color: 255 0 0
pen_width: 3
pen_down: false
";
        let settings = parse_settings(input).unwrap();
        assert_eq!(settings.canvas_width, 1024);
        assert_eq!(settings.canvas_height, 768);
        assert_eq!(settings.pen.color, Rgb::new(255, 0, 0));
        assert_eq!(settings.pen.width, 3);
        assert!(!settings.pen.pen_down);
    }

    #[test]
    fn test_settings_unknown_key_ignored() {
        let settings = parse_settings("theme: dark\n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_invalid_number() {
        let err = parse_settings("# header\ncanvas_width: wide\n").unwrap_err();
        assert_eq!(err.line_number, 2);
        assert!(err.to_string().contains("canvas_width"));
    }

    #[test]
    fn test_settings_zero_canvas_rejected() {
        let err = parse_settings("canvas_width: 0").unwrap_err();
        assert!(err.message.contains("canvas_width"));
        let err = parse_settings("canvas_width: 10\ncanvas_height: 0").unwrap_err();
        assert_eq!(err.line_number, 2);
        assert!(parse_settings("canvas_width: 1\ncanvas_height: 1").is_ok());
    }

    #[test]
    fn test_settings_pen_width_range() {
        assert!(parse_settings("pen_width: 0").is_err());
        assert!(parse_settings("pen_width: 11").is_err());
        assert!(parse_settings("pen_width: 10").is_ok());
    }

    #[test]
    fn test_settings_pen_color_arity() {
        let err = parse_settings("pen_color: 1 2").unwrap_err();
        assert!(err.message.contains("three components"));
    }

    #[test]
    fn test_settings_missing_colon() {
        let err = parse_settings("canvas_width 10").unwrap_err();
        assert!(err.message.contains("key: value"));
    }

    #[test]
    fn test_settings_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turtle.conf");
        std::fs::write(&path, "canvas_height: 300\n").unwrap();
        assert_eq!(Settings::load(&path).unwrap().canvas_height, 300);
        assert!(Settings::load(&dir.path().join("missing.conf")).is_err());
    }
}
