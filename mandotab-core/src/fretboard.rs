//! # Fretboard Module
//!
//! The resolver's configuration: which tuning is active and how far up the
//! neck a note may be placed. Profiles can be saved to and loaded from JSON
//! so alternate setups survive between sessions.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::note::FretPosition;
use crate::tuning::Tuning;

/// Highest fret considered playable unless configured otherwise.
pub const DEFAULT_FRET_CEILING: u32 = 20;

/// A tuning plus the fret ceiling applied to every string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fretboard {
    pub tuning: Tuning,
    pub fret_ceiling: u32,
}

impl Default for Fretboard {
    fn default() -> Self {
        Self {
            tuning: Tuning::mandolin_standard(),
            fret_ceiling: DEFAULT_FRET_CEILING,
        }
    }
}

impl Fretboard {
    pub fn new(tuning: Tuning, fret_ceiling: u32) -> Self {
        Self {
            tuning,
            fret_ceiling,
        }
    }

    /// Every (string, fret) that sounds `pitch`, in ascending string order.
    ///
    /// A candidate is valid when `0 <= pitch - open_pitch <= fret_ceiling`.
    /// Pitches outside the instrument's range yield an empty list.
    pub fn candidates_for(&self, pitch: i32) -> Vec<FretPosition> {
        self.tuning
            .strings()
            .filter_map(|(string, open_pitch)| {
                let fret = i64::from(pitch) - i64::from(open_pitch);
                (0..=i64::from(self.fret_ceiling))
                    .contains(&fret)
                    .then(|| FretPosition::new(string, fret as u32))
            })
            .collect()
    }

    /// Highest pitch reachable on this fretboard.
    pub fn max_playable_pitch(&self) -> i64 {
        i64::from(self.tuning.highest_open_pitch()) + i64::from(self.fret_ceiling)
    }
}

/// Saves a fretboard profile to a JSON file.
///
/// # Arguments
/// * `fretboard` - The profile to save
/// * `path` - Destination file (e.g., "fretboard.json")
pub fn save_fretboard(fretboard: &Fretboard, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(fretboard)
        .context("failed to serialize fretboard profile")?;
    let mut file = File::create(path)
        .with_context(|| format!("failed to create profile {}", path.display()))?;
    file.write_all(json_string.as_bytes())
        .with_context(|| format!("failed to write profile {}", path.display()))?;
    log::info!("[CONFIG] Saved fretboard profile '{}' to {}", fretboard.tuning.name, path.display());
    Ok(())
}

/// Loads a fretboard profile from a JSON file.
///
/// The tuning table is validated while parsing, so a hand-edited file that
/// breaks the string ordering is rejected here rather than producing strange
/// tab later.
pub fn load_fretboard(path: impl AsRef<Path>) -> Result<Fretboard> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .with_context(|| format!("failed to open profile {}", path.display()))?;
    let mut data = String::new();
    file.read_to_string(&mut data)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let fretboard: Fretboard = serde_json::from_str(&data)
        .with_context(|| format!("invalid profile {}", path.display()))?;
    log::info!("[CONFIG] Loaded fretboard profile '{}' from {}", fretboard.tuning.name, path.display());
    Ok(fretboard)
}
