// mandotab-core/src/lib.rs

//! The core logic for turning detected notes into mandolin tablature.
//! This crate is responsible for choosing a string and fret for every
//! note of a monophonic line and rendering the result as ASCII tab.
//! It is completely headless and contains no audio or CLI code.

pub mod fretboard;
pub mod note;
pub mod position;
pub mod render;
pub mod tuning;

pub use fretboard::{DEFAULT_FRET_CEILING, Fretboard};
pub use note::{FretPosition, PitchedNote, TabPosition};
pub use position::{PositionResolver, PositionStrategy, WeightedDistance, notes_to_tab};
pub use render::{render_ascii_tab, render_standard};
pub use tuning::Tuning;
