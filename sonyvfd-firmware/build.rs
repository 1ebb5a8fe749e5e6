//! Build script for sonyvfd-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates mappings.json at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Grids addressable by the controller
const MAX_GRID: u64 = 31;
/// Bits per grid
const MAX_BIT: u64 = 15;

fn main() {
    setup_linker();
    validate_mappings();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate the embedded mapping document at compile time
fn validate_mappings() {
    println!("cargo:rerun-if-changed=mappings.json");

    let path = Path::new("mappings.json");

    if !path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: mappings.json not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a default mapping document.                 ║\n\
            ║  Create one in the sonyvfd-firmware directory; an empty          ║\n\
            ║  document is {{ \"mappings\": {{}} }}                                  ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read mappings.json                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let document: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid JSON in mappings.json                            ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = check_document(&document);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid entries in mappings.json                         ║\n\
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

    println!("cargo:warning=mappings.json validated successfully");
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

/// Check both document shapes; every leaf must be a `[grid, bit]` pair
fn check_document(document: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Value::Object(root) = document else {
        errors.push("top level must be an object".to_string());
        return errors;
    };

    if let Some(mappings) = root.get("mappings") {
        match mappings {
            Value::Object(categories) => {
                for (category, items) in categories {
                    check_table(&format!("mappings.{}", category), items, &mut errors);
                }
            }
            _ => errors.push("'mappings' must be an object".to_string()),
        }
    }

    if let Some(icons) = root.get("icons") {
        check_table("icons", icons, &mut errors);
    }

    if let Some(positions) = root.get("char_positions") {
        match positions {
            Value::Array(list) => {
                for (index, segments) in list.iter().enumerate() {
                    check_table(&format!("char_positions[{}]", index), segments, &mut errors);
                }
            }
            _ => errors.push("'char_positions' must be an array".to_string()),
        }
    }

    errors
}

fn check_table(path: &str, table: &Value, errors: &mut Vec<String>) {
    let Value::Object(items) = table else {
        errors.push(format!("{} must be an object", path));
        return;
    };

    for (name, value) in items {
        if !is_coordinate(value) {
            errors.push(format!(
                "{}.{} must be [grid 0-{}, bit 0-{}]",
                path, name, MAX_GRID, MAX_BIT
            ));
        }
    }
}

fn is_coordinate(value: &Value) -> bool {
    match value.as_array().map(Vec::as_slice) {
        Some([grid, bit]) => matches!(
            (grid.as_u64(), bit.as_u64()),
            (Some(g), Some(b)) if g <= MAX_GRID && b <= MAX_BIT
        ),
        _ => false,
    }
}
