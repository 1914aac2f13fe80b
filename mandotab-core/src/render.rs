//! # Tablature Renderer
//!
//! Formats tab positions as a plain-text grid with one line per string,
//! highest-pitched string on top:
//!
//! ```text
//! E|--------|
//! A|-0-2-3-5|
//! D|--------|
//! G|--------|
//! ```
//!
//! Every event occupies one 2-character column on every line, so the lines
//! always stay aligned.

use crate::note::TabPosition;
use crate::tuning::{self, Tuning};

const FILL: char = '-';
const CELL_WIDTH: usize = 2;

/// Formats a fret as a 2-character cell.
///
/// Single digits are left-padded with '-'. Wider numbers keep only their
/// last two digits, so fret 123 renders as "23".
pub fn format_fret_cell(fret: u32) -> String {
    let text = format!("{:->width$}", fret, width = CELL_WIDTH);
    text[text.len() - CELL_WIDTH..].to_string()
}

/// Renders `positions` as ASCII tab for `tuning`.
///
/// Positions are stably sorted by start time before layout. A position on a
/// string the tuning lacks still takes a column, filled on every line.
/// Empty input gives one bare "label|" line per string.
pub fn render_ascii_tab(positions: &[TabPosition], tuning: &Tuning) -> String {
    if positions.is_empty() {
        let lines: Vec<String> = tuning
            .strings()
            .map(|(_, open_pitch)| format!("{}|", tuning::string_label(open_pitch)))
            .collect();
        return lines.join("\n");
    }

    let mut ordered: Vec<&TabPosition> = positions.iter().collect();
    ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let blank = FILL.to_string().repeat(CELL_WIDTH);

    let lines: Vec<String> = tuning
        .strings()
        .map(|(string, open_pitch)| {
            let mut line = String::with_capacity(3 + CELL_WIDTH * ordered.len());
            line.push(tuning::string_label(open_pitch));
            line.push('|');
            for event in &ordered {
                if event.string == string {
                    line.push_str(&format_fret_cell(event.fret));
                } else {
                    line.push_str(&blank);
                }
            }
            line.push('|');
            line
        })
        .collect();

    lines.join("\n")
}

/// Renders `positions` against the standard mandolin tuning.
pub fn render_standard(positions: &[TabPosition]) -> String {
    render_ascii_tab(positions, &Tuning::mandolin_standard())
}
