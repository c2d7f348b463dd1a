//! Build script for mirror-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates mirror.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in each section, with their allowed integer range
/// (`None` for string keys)
const LINK_KEYS: &[(&str, Option<(i64, i64)>)] = &[
    ("name_prefix", None),
    ("readvertise_delay_ms", Some((0, 60_000))),
    ("fragment_size", Some((1, 512))),
];

const RENDER_KEYS: &[(&str, Option<(i64, i64)>)] = &[
    ("tick_interval_ms", Some((1, 60_000))),
    ("width", Some((1, 1024))),
    ("height", Some((1, 1024))),
    ("name_max_chars", Some((1, 64))),
];

const INPUT_KEYS: &[(&str, Option<(i64, i64)>)] = &[("debounce_ms", Some((0, 1_000)))];

/// Longest prefix the firmware's name buffer holds
const MAX_PREFIX_LEN: usize = 16;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // cortex-m-rt, embassy-rp boot2 and defmt linker scripts
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate mirror.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=mirror.toml");

    let config_path = Path::new("mirror.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: mirror.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds mirror.toml at build time.                  ║\n\
            ║  Please create one in the mirror-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read mirror.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in mirror.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_section(&config, "link", LINK_KEYS, &mut errors);
    validate_section(&config, "render", RENDER_KEYS, &mut errors);
    validate_section(&config, "input", INPUT_KEYS, &mut errors);
    validate_name_prefix(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in mirror.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=mirror.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only the three known sections may appear, and nothing at the root
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        match name.as_str() {
            "link" | "render" | "input" => {
                if !value.is_table() {
                    errors.push(format!("[{}] must be a table", name));
                }
            }
            _ if value.is_table() => errors.push(format!("Unknown section [{}]", name)),
            _ => errors.push(format!("Key '{}' must be inside a section", name)),
        }
    }
}

/// Check key names, value types and integer ranges for one section
fn validate_section(
    config: &toml::Value,
    section: &str,
    keys: &[(&str, Option<(i64, i64)>)],
    errors: &mut Vec<String>,
) {
    let table = match config.get(section) {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    for (key, value) in table {
        let Some((_, range)) = keys.iter().find(|(name, _)| *name == key.as_str()) else {
            errors.push(format!("[{}] unknown key '{}'", section, key));
            continue;
        };

        match (range, value) {
            (None, toml::Value::String(_)) => {}
            (None, _) => errors.push(format!("[{}] {} must be a string", section, key)),
            (Some((min, max)), toml::Value::Integer(n)) => {
                if n < min || n > max {
                    errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                }
            }
            (Some(_), _) => errors.push(format!("[{}] {} must be an integer", section, key)),
        }
    }
}

fn validate_name_prefix(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::String(prefix)) = config.get("link").and_then(|l| l.get("name_prefix"))
    else {
        return;
    };

    if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN {
        errors.push(format!(
            "[link] name_prefix must be 1-{} characters",
            MAX_PREFIX_LEN
        ));
    }
    if !prefix.is_ascii() {
        errors.push("[link] name_prefix must be ASCII".to_string());
    }
    // HM-10 modules truncate names past 12 characters
    if prefix.len() + 5 > 12 {
        println!(
            "cargo:warning=name_prefix '{}' makes the advertised name longer than 12 characters",
            prefix
        );
    }
}
