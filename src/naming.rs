//! Counter-based filename convention for saved images.
//!
//! Saved files carry a zero-padded counter next to a user prefix, joined by a
//! delimiter. The counter goes after the prefix by default, or before it:
//!
//! - `Pixit_0001.png` → prefix `Pixit`, delimiter `_`, counter after
//! - `0001_Pixit.png` → same settings, counter first
//!
//! ## Counter discovery
//!
//! The next counter is derived from the directory listing on every call:
//! every entry whose name *starts with* the pattern contributes its number,
//! and the next counter is `max + 1` (or `1` for a fresh directory). Nothing
//! is persisted and nothing is locked, so two savers racing on one directory
//! can pick the same counter.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

/// Filename pattern for one save configuration.
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    prefix: String,
    delimiter: String,
    padding: usize,
    counter_first: bool,
    matcher: Regex,
}

impl FilenamePattern {
    pub fn new(prefix: &str, delimiter: &str, padding: usize, counter_first: bool) -> Self {
        let (prefix_re, delimiter_re) = (regex::escape(prefix), regex::escape(delimiter));
        let pattern = if counter_first {
            format!("^([0-9]+){delimiter_re}{prefix_re}")
        } else {
            format!("^{prefix_re}{delimiter_re}([0-9]+)")
        };
        Self {
            prefix: prefix.to_string(),
            delimiter: delimiter.to_string(),
            padding,
            counter_first,
            matcher: Regex::new(&pattern).expect("escaped filename pattern must compile"),
        }
    }

    /// Extract the counter from a filename that starts with this pattern.
    ///
    /// - `"Pixit_0007.png"` → `Some(7)`
    /// - `"Pixit_0007_upscaled.png"` → `Some(7)` (only the start is anchored)
    /// - `"old_Pixit_0007.png"` → `None`
    /// - digit runs that overflow `u64` → `None`
    pub fn parse_counter(&self, filename: &str) -> Option<u64> {
        self.matcher
            .captures(filename)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    }

    /// Build the filename for `counter`, padded to the configured width.
    ///
    /// `extension` is the dotted suffix, e.g. `".png"`.
    pub fn format(&self, counter: u64, extension: &str) -> String {
        let number = format!("{:0width$}", counter, width = self.padding);
        if self.counter_first {
            format!("{number}{}{}{extension}", self.delimiter, self.prefix)
        } else {
            format!("{}{}{number}{extension}", self.prefix, self.delimiter)
        }
    }

    /// All counters found in `dir`, unordered.
    pub fn existing_counters(&self, dir: &Path) -> io::Result<Vec<u64>> {
        let mut counters = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if let Some(n) = self.parse_counter(&entry.file_name().to_string_lossy()) {
                counters.push(n);
            }
        }
        Ok(counters)
    }

    /// First counter to use in `dir`: highest existing counter + 1, or 1.
    pub fn next_counter(&self, dir: &Path) -> io::Result<u64> {
        Ok(self
            .existing_counters(dir)?
            .into_iter()
            .max()
            .map_or(1, |n| n.saturating_add(1)))
    }
}
