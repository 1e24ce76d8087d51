//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Nodes
//!
//! ```text
//! 001 String to Combo (StringToCombo)
//!     Category: Pixit Custom Nodes
//!     Inputs: input_string: STRING
//!     Outputs: COMBO
//! ```
//!
//! ## Save
//!
//! ```text
//! 001 Pixit_0001.png
//!     Path: /renders/Pixit_0001.png
//!
//! Saved 1 image to /renders
//! ```

use crate::nodes::registry::Registry;
use crate::nodes::{InputSpec, NodeSchema};
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn input_list(specs: &[InputSpec]) -> String {
    specs
        .iter()
        .map(|s| format!("{}: {}", s.name, s.slot))
        .collect::<Vec<_>>()
        .join(", ")
}

fn output_list(schema: &NodeSchema) -> String {
    schema
        .outputs
        .iter()
        .map(|o| match o.name {
            Some(name) => format!("{name}: {}", o.slot),
            None => o.slot.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every registered node with its slots.
pub fn format_node_list(registry: &Registry) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in registry.entries().iter().enumerate() {
        let schema = (entry.create)().schema();
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            entry.display_name,
            entry.id
        ));
        if let Some(category) = schema.category {
            lines.push(format!("{}Category: {}", indent(1), category));
        }
        lines.push(format!("{}Inputs: {}", indent(1), input_list(&schema.required)));
        if !schema.optional.is_empty() {
            lines.push(format!(
                "{}Optional: {}",
                indent(1),
                input_list(&schema.optional)
            ));
        }
        lines.push(format!("{}Outputs: {}", indent(1), output_list(&schema)));
        if schema.output_node {
            lines.push(format!("{}Output node", indent(1)));
        }
    }
    lines
}

pub fn print_node_list(registry: &Registry) {
    for line in format_node_list(registry) {
        println!("{}", line);
    }
}

/// Files written by one save call, followed by a summary line.
pub fn format_save_output(paths: &[PathBuf], output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        lines.push(format!("{} {}", format_index(i + 1), name));
        lines.push(format!("{}Path: {}", indent(1), path.display()));
    }
    if !paths.is_empty() {
        lines.push(String::new());
    }
    let noun = if paths.len() == 1 { "image" } else { "images" };
    lines.push(format!(
        "Saved {} {} to {}",
        paths.len(),
        noun,
        output_dir.display()
    ));
    lines
}

pub fn print_save_output(paths: &[PathBuf], output_dir: &Path) {
    for line in format_save_output(paths, output_dir) {
        println!("{}", line);
    }
}

/// Named node outputs, one per line: `string_1: cat`.
pub fn format_named_values(pairs: &[(&str, String)]) -> Vec<String> {
    pairs
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect()
}

pub fn print_named_values(pairs: &[(&str, String)]) {
    for line in format_named_values(pairs) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::registry::registry;

    #[test]
    fn node_list_starts_with_first_registration() {
        let lines = format_node_list(registry());
        assert_eq!(lines[0], "001 String to Combo (StringToCombo)");
        assert_eq!(lines[1], "    Category: Pixit Custom Nodes");
        assert_eq!(lines[2], "    Inputs: input_string: STRING");
        assert_eq!(lines[3], "    Outputs: COMBO");
    }

    #[test]
    fn node_list_shows_optional_and_any_outputs() {
        let lines = format_node_list(registry());
        assert!(lines.contains(&"    Optional: delimiter: STRING".to_string()));
        assert!(
            lines
                .iter()
                .any(|l| l.contains("string_1: *") && l.contains("show_help: STRING"))
        );
    }

    #[test]
    fn node_list_flags_output_node() {
        let lines = format_node_list(registry());
        let save = lines
            .iter()
            .position(|l| l.contains("(ImageSave)"))
            .unwrap();
        assert!(lines[save + 1..].contains(&"    Output node".to_string()));
    }

    #[test]
    fn save_output_lists_files_and_summary() {
        let paths = vec![
            PathBuf::from("/out/Pixit_0001.png"),
            PathBuf::from("/out/Pixit_0002.png"),
        ];
        let lines = format_save_output(&paths, Path::new("/out"));
        assert_eq!(
            lines,
            vec![
                "001 Pixit_0001.png",
                "    Path: /out/Pixit_0001.png",
                "002 Pixit_0002.png",
                "    Path: /out/Pixit_0002.png",
                "",
                "Saved 2 images to /out",
            ]
        );
    }

    #[test]
    fn save_output_singular_summary() {
        let lines = format_save_output(&[PathBuf::from("/o/a.png")], Path::new("/o"));
        assert_eq!(lines.last().unwrap(), "Saved 1 image to /o");
    }

    #[test]
    fn save_output_empty_batch() {
        let lines = format_save_output(&[], Path::new("/o"));
        assert_eq!(lines, vec!["Saved 0 images to /o"]);
    }

    #[test]
    fn named_values_one_per_line() {
        let lines = format_named_values(&[("a", "x".into()), ("b", String::new())]);
        assert_eq!(lines, vec!["a: x", "b: "]);
    }
}
