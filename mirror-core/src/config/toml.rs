//! Simple TOML parser for the mirror configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `mirror.toml`. It does NOT support full TOML.
//!
//! Supported features:
//! - [section] headers
//! - Key = value pairs (string, integer)
//! - Comments (# ...)

use heapless::String;

use super::types::{InputConfig, LinkConfig, MirrorConfig, RenderConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type, is out of range, or the line is not `key = value`
    InvalidValue,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidSection => f.write_str("invalid section"),
            ConfigError::UnknownKey => f.write_str("unknown key"),
            ConfigError::InvalidValue => f.write_str("invalid value"),
        }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Render,
    Input,
}

/// Parse TOML configuration into MirrorConfig
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<MirrorConfig, ConfigError> {
    let mut config = MirrorConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .strip_suffix(']')
                .ok_or(ConfigError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        match section {
            Section::Root => return Err(ConfigError::UnknownKey),
            Section::Link => apply_link(&mut config.link, key, value)?,
            Section::Render => apply_render(&mut config.render, key, value)?,
            Section::Input => apply_input(&mut config.input, key, value)?,
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "link" => Ok(Section::Link),
        "render" => Ok(Section::Render),
        "input" => Ok(Section::Input),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn apply_link(link: &mut LinkConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "name_prefix" => {
            let prefix = parse_string(value)?;
            if prefix.is_empty() {
                return Err(ConfigError::InvalidValue);
            }
            link.name_prefix = String::try_from(prefix).map_err(|_| ConfigError::InvalidValue)?;
        }
        "readvertise_delay_ms" => link.readvertise_delay_ms = parse_int(value)?,
        "fragment_size" => link.fragment_size = parse_nonzero(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn apply_render(render: &mut RenderConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "tick_interval_ms" => render.tick_interval_ms = parse_nonzero(value)?,
        "width" => render.width = parse_nonzero(value)?,
        "height" => render.height = parse_nonzero(value)?,
        "name_max_chars" => render.name_max_chars = parse_nonzero(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn apply_input(input: &mut InputConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "debounce_ms" => input.debounce_ms = parse_int(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    // Remove inline comments
    let value = match value.find('#') {
        // Make sure # is not inside a string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigError::InvalidValue)
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ConfigError::InvalidValue)
}

/// Parse an integer value that must be at least one
fn parse_nonzero<T>(value: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr + PartialEq + Default,
{
    let parsed: T = parse_int(value)?;
    if parsed == T::default() {
        return Err(ConfigError::InvalidValue);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
# Mirror configuration

[link]
name_prefix = "Hall"          # shown as Hall-XXXX
readvertise_delay_ms = 1_000
fragment_size = 180

[render]
tick_interval_ms = 500
width = 320
height = 240
name_max_chars = 24

[input]
debounce_ms = 50
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.link.name_prefix.as_str(), "Hall");
        assert_eq!(config.link.readvertise_delay_ms, 1000);
        assert_eq!(config.link.fragment_size, 180);
        assert_eq!(config.render.tick_interval_ms, 500);
        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.height, 240);
        assert_eq!(config.render.name_max_chars, 24);
        assert_eq!(config.input.debounce_ms, 50);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, MirrorConfig::default());
        assert_eq!(config.link.name_prefix.as_str(), "Mirror");
        assert_eq!(config.link.readvertise_delay_ms, 500);
        assert_eq!(config.link.fragment_size, 20);
        assert_eq!(config.render.tick_interval_ms, 1000);
        assert_eq!(config.render.name_max_chars, 18);
        assert_eq!(config.input.debounce_ms, 30);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[render]\nwidth = 128\n").unwrap();
        assert_eq!(config.render.width, 128);
        assert_eq!(config.render.height, 240);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(parse_config("[wifi]\n"), Err(ConfigError::InvalidSection));
        assert_eq!(parse_config("[link\n"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[input]\nlong_press_ms = 800\n"),
            Err(ConfigError::UnknownKey)
        );
        assert_eq!(parse_config("width = 10\n"), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[render]\nwidth = wide\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[render]\ntick_interval_ms = 0\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[link]\nname_prefix = Mirror\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[link]\nname_prefix = \"AVeryLongPrefixName\"\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(parse_config("[link]\njunk\n"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_hash_inside_string_is_kept() {
        let config = parse_config("[link]\nname_prefix = \"M#1\"\n").unwrap();
        assert_eq!(config.link.name_prefix.as_str(), "M#1");
    }
}
