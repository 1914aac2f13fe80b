//! # Note Model
//!
//! Value types that flow through the tab pipeline: the notes handed to us
//! by a pitch detector, and the positioned events we hand to the renderer.

use serde::{Deserialize, Serialize};

/// Highest pitch number accepted from the detector (MIDI range).
pub const MAX_PITCH: i32 = 127;

fn default_confidence() -> f32 {
    1.0
}

/// A single note reported by an upstream pitch detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchedNote {
    /// Onset in seconds
    pub start_time: f64,
    /// Release in seconds
    pub end_time: f64,
    /// Semitone number (0-127)
    pub pitch: i32,
    /// Detector confidence (0.0 to 1.0). Informational only.
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

impl PitchedNote {
    pub fn new(start_time: f64, end_time: f64, pitch: i32) -> Self {
        Self {
            start_time,
            end_time,
            pitch,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Checks the timing and pitch invariants a detector is expected to uphold.
    ///
    /// Notes failing this check are skipped by the resolver exactly like
    /// unplayable notes.
    pub fn is_well_formed(&self) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.end_time > self.start_time
            && (0..=MAX_PITCH).contains(&self.pitch)
    }
}

/// A (string, fret) pair on the fretboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FretPosition {
    /// String index, 1 is the highest-pitched string
    pub string: u8,
    /// Fret number, 0 is the open string
    pub fret: u32,
}

impl FretPosition {
    pub fn new(string: u8, fret: u32) -> Self {
        Self { string, fret }
    }
}

/// A note placed on the tablature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabPosition {
    pub start_time: f64,
    pub end_time: f64,
    pub string: u8,
    pub fret: u32,
    /// The detected pitch, kept for tracing back to the input
    pub pitch: i32,
}

impl TabPosition {
    /// Places `note` at `position`, copying its timing verbatim.
    pub fn place(note: &PitchedNote, position: FretPosition) -> Self {
        Self {
            start_time: note.start_time,
            end_time: note.end_time,
            string: position.string,
            fret: position.fret,
            pitch: note.pitch,
        }
    }

    pub fn position(&self) -> FretPosition {
        FretPosition::new(self.string, self.fret)
    }
}
