//! # Tuning Module
//!
//! Open-string tables for the mandolin family.
//!
//! A tuning maps a string index to the pitch the string sounds when played
//! open. Index 1 is always the highest-pitched string and pitches fall as
//! the index grows, which is the numbering tab readers expect.
//!
//! ## Features
//! - Standard GDAE mandolin tuning
//! - A fixed set of alternate presets (cross tunings, mandola)
//! - Note name and string label lookups for rendering

use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::note::MAX_PITCH;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of the standard GDAE preset.
pub const STANDARD: &str = "standard";

/// An instrument tuning: string index to open pitch.
///
/// Deserialized tables go through `Tuning::new`, so a parsed tuning obeys the
/// same ordering rule as one built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TuningTable")]
pub struct Tuning {
    /// Preset or user-chosen name (e.g., "standard", "cross-aeae")
    pub name: String,
    strings: BTreeMap<u8, i32>,
}

/// Unvalidated wire form of a `Tuning`.
#[derive(Deserialize)]
struct TuningTable {
    name: String,
    strings: BTreeMap<u8, i32>,
}

impl TryFrom<TuningTable> for Tuning {
    type Error = anyhow::Error;

    fn try_from(table: TuningTable) -> Result<Self> {
        Tuning::new(table.name, table.strings)
    }
}

/// Statically built preset tunings.
///
/// Every entry honours the index rule, which the tests re-check through
/// `Tuning::new`.
static PRESETS: Lazy<Vec<Tuning>> = Lazy::new(|| {
    vec![
        Tuning::from_table(STANDARD, &[(4, 55), (3, 62), (2, 69), (1, 76)]),
        Tuning::from_table("cross-gdgd", &[(4, 55), (3, 62), (2, 67), (1, 74)]),
        Tuning::from_table("cross-adae", &[(4, 57), (3, 62), (2, 69), (1, 76)]),
        Tuning::from_table("cross-aeae", &[(4, 57), (3, 64), (2, 69), (1, 76)]),
        Tuning::from_table("mandola", &[(4, 48), (3, 55), (2, 62), (1, 69)]),
    ]
});

impl Tuning {
    /// Builds a validated tuning.
    ///
    /// # Errors
    /// * The table is empty
    /// * An open pitch lies outside 0-127
    /// * A lower string index does not sound strictly higher than the next one
    pub fn new(name: impl Into<String>, table: impl IntoIterator<Item = (u8, i32)>) -> Result<Self> {
        let name = name.into();
        let strings: BTreeMap<u8, i32> = table.into_iter().collect();
        if strings.is_empty() {
            bail!("tuning '{}' has no strings", name);
        }
        for (&string, &pitch) in &strings {
            if !(0..=MAX_PITCH).contains(&pitch) {
                bail!("tuning '{}': string {} has open pitch {} outside 0-{}", name, string, pitch, MAX_PITCH);
            }
        }
        let pitches: Vec<(u8, i32)> = strings.iter().map(|(&s, &p)| (s, p)).collect();
        for pair in pitches.windows(2) {
            let ((higher, higher_pitch), (lower, lower_pitch)) = (pair[0], pair[1]);
            if higher_pitch <= lower_pitch {
                bail!(
                    "tuning '{}': string {} ({}) must sound higher than string {} ({})",
                    name,
                    higher,
                    note_name(higher_pitch),
                    lower,
                    note_name(lower_pitch)
                );
            }
        }
        Ok(Self { name, strings })
    }

    fn from_table(name: &str, table: &[(u8, i32)]) -> Self {
        Self {
            name: name.to_string(),
            strings: table.iter().copied().collect(),
        }
    }

    /// Standard mandolin tuning, G3 D4 A4 E5.
    pub fn mandolin_standard() -> Self {
        PRESETS[0].clone()
    }

    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        PRESETS.iter().find(|t| t.name == name).cloned()
    }

    /// All presets, standard first.
    pub fn presets() -> &'static [Tuning] {
        &PRESETS
    }

    /// Open pitch of `string`, if the tuning has it.
    pub fn open_pitch(&self, string: u8) -> Option<i32> {
        self.strings.get(&string).copied()
    }

    /// `(string, open_pitch)` pairs in ascending index order, i.e. highest
    /// pitched string first.
    pub fn strings(&self) -> impl Iterator<Item = (u8, i32)> + '_ {
        self.strings.iter().map(|(&s, &p)| (s, p))
    }

    pub fn lowest_open_pitch(&self) -> i32 {
        self.strings.values().copied().min().unwrap_or(0)
    }

    pub fn highest_open_pitch(&self) -> i32 {
        self.strings.values().copied().max().unwrap_or(0)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::mandolin_standard()
    }
}

/// Scientific pitch name for a semitone number (60 = "C4").
pub fn note_name(pitch: i32) -> String {
    let name = NOTE_NAMES[pitch.rem_euclid(12) as usize];
    let octave = pitch.div_euclid(12) - 1;
    format!("{}{}", name, octave)
}

/// Single-character label for a string tuned to `open_pitch`.
///
/// Sharps collapse onto their letter, so a string tuned to C#4 is labelled 'C'.
pub fn string_label(open_pitch: i32) -> char {
    NOTE_NAMES[open_pitch.rem_euclid(12) as usize]
        .chars()
        .next()
        .unwrap_or('?')
}
