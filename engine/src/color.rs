//! Per-container log color assignment (spec.md §2, "random terminal color
//! selection" — an out-of-core collaborator, kept here as a thin,
//! deterministic stand-in rather than left unimplemented).
//!
//! Cycles through a fixed palette in the order containers are launched, so
//! runs are visually stable without needing real randomness.

use owo_colors::{AnsiColors, OwoColorize};

const PALETTE: &[AnsiColors] = &[
    AnsiColors::Cyan,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Magenta,
    AnsiColors::Blue,
    AnsiColors::Red,
];

pub struct ColorPicker {
    next: usize,
}

impl ColorPicker {
    pub fn new() -> Self {
        ColorPicker { next: 0 }
    }

    pub fn next_color(&mut self) -> AnsiColors {
        let color = PALETTE[self.next % PALETTE.len()];
        self.next += 1;
        color
    }
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a single log line tagged with `[name]` in `color`.
pub fn tag_line(name: &str, color: AnsiColors, line: &str) -> String {
    format!("{} {}", format!("[{}]", name).color(color), line)
}
